pub mod geeknews;
pub mod search_api;

use std::time::Duration;

/// Browser-like User-Agent; some listing pages reject bare clients.
pub(crate) const BROWSER_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, crate::error::SourceError> {
    reqwest::Client::builder()
        .user_agent(BROWSER_UA)
        .connect_timeout(Duration::from_secs(4))
        .timeout(timeout)
        .build()
        .map_err(|e| crate::error::SourceError::Unavailable(format!("http client: {e}")))
}
