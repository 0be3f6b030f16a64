use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use instagres::config::DEFAULT_BASE_URL;
use instagres::{Options, Outcome};
use tracing_subscriber::EnvFilter;

const SOURCE: &str = "instagres-cli";

#[derive(Parser, Debug)]
#[command(name = "instagres")]
#[command(about = "Get an instant Postgres connection string into your .env file", long_about = None)]
struct Args {
    /// Path to the .env file
    #[arg(long, default_value = ".env")]
    file: PathBuf,

    /// Name of the connection string in the .env file
    #[arg(long, default_value = "DATABASE_URL")]
    name: String,

    /// Use the connection pooler endpoint
    #[arg(long)]
    pooler: bool,

    /// Base URL of the Instagres service
    #[arg(long, env = "INSTAGRES_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Give up after this many polls (polls until ready by default)
    #[arg(long)]
    max_polls: Option<u32>,
}

impl From<Args> for Options {
    fn from(args: Args) -> Self {
        Options {
            dot_env_file: Some(args.file),
            dot_env_key: Some(args.name),
            with_pooler: args.pooler,
            base_url: Some(args.base_url),
            max_polls: args.max_polls,
            ..Options::new(SOURCE)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Lets RUST_LOG and INSTAGRES_BASE_URL come from a .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let outcome = instagres::instagres(args.into()).await?;

    Ok(match outcome {
        Outcome::Existing(_) | Outcome::Provisioned(_) => ExitCode::SUCCESS,
        Outcome::Declined => ExitCode::FAILURE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags() {
        let args = Args::try_parse_from(["instagres"]).unwrap();
        let options = Options::from(args);

        assert_eq!(options.dot_env_file, Some(PathBuf::from(".env")));
        assert_eq!(options.dot_env_key.as_deref(), Some("DATABASE_URL"));
        assert!(!options.with_pooler);
        assert_eq!(options.source, "instagres-cli");
        assert_eq!(options.max_polls, None);
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "instagres",
            "--file",
            ".env.local",
            "--name",
            "PG_URL",
            "--pooler",
            "--base-url",
            "http://127.0.0.1:4000",
            "--max-polls",
            "30",
        ])
        .unwrap();
        let options = Options::from(args);

        assert_eq!(options.dot_env_file, Some(PathBuf::from(".env.local")));
        assert_eq!(options.dot_env_key.as_deref(), Some("PG_URL"));
        assert!(options.with_pooler);
        assert_eq!(options.base_url.as_deref(), Some("http://127.0.0.1:4000"));
        assert_eq!(options.max_polls, Some(30));
    }
}
