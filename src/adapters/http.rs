use crate::domain::ports::{Fetcher, Storage};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::is_remote;
use reqwest::Client;
use std::time::Duration;

/// Fetches http(s) locations with a single GET and reads anything else from storage.
pub struct HttpFetcher<S: Storage> {
    client: Client,
    storage: S,
}

impl<S: Storage> HttpFetcher<S> {
    pub fn new(storage: S, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, storage })
    }
}

#[async_trait::async_trait]
impl<S: Storage> Fetcher for HttpFetcher<S> {
    async fn fetch_text(&self, location: &str) -> Result<String> {
        if is_remote(location) {
            tracing::debug!("GET {}", location);
            let response = self.client.get(location).send().await?;
            tracing::debug!("Response status: {}", response.status());
            let body = response.error_for_status()?.text().await?;
            return Ok(body);
        }

        tracing::debug!("Reading local file: {}", location);
        let bytes = self.storage.read_file(location).await?;
        String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
            message: format!("{} is not valid UTF-8: {}", location, e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn fetcher(dir: &TempDir) -> HttpFetcher<LocalStorage> {
        HttpFetcher::new(
            LocalStorage::new(dir.path()),
            Duration::from_secs(5),
            "banks-etl-test",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_remote_document() {
        let server = MockServer::start();
        let page = server.mock(|when, then| {
            when.method(GET).path("/banks");
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<table></table>");
        });

        let dir = TempDir::new().unwrap();
        let body = fetcher(&dir).fetch_text(&server.url("/banks")).await.unwrap();

        page.assert();
        assert_eq!(body, "<table></table>");
    }

    #[tokio::test]
    async fn test_fetch_remote_error_status_fails() {
        let server = MockServer::start();
        let page = server.mock(|when, then| {
            when.method(GET).path("/gone");
            then.status(404);
        });

        let dir = TempDir::new().unwrap();
        let err = fetcher(&dir).fetch_text(&server.url("/gone")).await.unwrap_err();

        page.assert();
        assert!(matches!(err, EtlError::ApiError(_)));
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("exchange_rate.csv"), "Currency,Rate\nGBP,0.8\n").unwrap();

        let text = fetcher(&dir).fetch_text("exchange_rate.csv").await.unwrap();

        assert_eq!(text, "Currency,Rate\nGBP,0.8\n");
    }
}
