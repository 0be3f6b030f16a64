use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// User-facing side of the provisioning flow.
#[async_trait]
pub trait Console: Send {
    /// Prints one line of output for the user.
    fn say(&mut self, line: &str);

    /// Shows `question` and returns the user's raw answer.
    async fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// Console backed by the process' stdin, stdout and stderr.
///
/// Messages go to stdout; the question goes to stderr so it is still visible
/// when stdout is redirected.
#[derive(Debug, Default)]
pub struct Terminal;

#[async_trait]
impl Console for Terminal {
    fn say(&mut self, line: &str) {
        println!("{line}");
    }

    async fn ask(&mut self, question: &str) -> io::Result<String> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(question.as_bytes()).await?;
        stderr.flush().await?;

        let mut answer = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut answer)
            .await?;
        Ok(answer)
    }
}

/// Only an explicit `n` declines; anything else, including no answer, is a yes.
pub fn is_decline(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("n")
}
