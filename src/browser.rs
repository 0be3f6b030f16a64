use std::io;

pub trait Browser {
    /// Starts opening `url` without waiting for the browser.
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Opens URLs with the platform's default browser.
#[derive(Debug, Default)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        open::that_detached(url)
    }
}
