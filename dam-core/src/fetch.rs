use crate::error::{DamError, Result};
use log::{info, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Listing page whose first post is the newest bulletin.
pub const LISTING_URL: &str = "https://dams.kseb.in/?page_id=45";

const MAX_TRIES: u32 = 3;
const FIRST_BACKOFF_MILLIS: u64 = 1000;

/// Fetches bulletin pages with retry and exponential backoff.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> Result<PageFetcher> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DamError::Fetch {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(PageFetcher { client })
    }

    /// GET a page body. Non-200 responses and empty bodies count as failed
    /// attempts.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let mut sleep_millis = FIRST_BACKOFF_MILLIS;
        let mut last_failure = String::new();

        for attempt in 1..=MAX_TRIES {
            match self.client.get(url).send().await {
                Ok(response) => {
                    if response.status() != StatusCode::OK {
                        last_failure = format!("bad response status {}", response.status());
                    } else {
                        match response.text().await {
                            Ok(body) if body.trim().is_empty() => {
                                last_failure = "empty response".to_string();
                            }
                            Ok(body) => return Ok(body),
                            Err(e) => {
                                last_failure = format!("failed to read response body: {}", e);
                            }
                        }
                    }
                }
                Err(e) => {
                    last_failure = format!("request failed: {}", e);
                }
            }
            warn!("Attempt {}/{}: {} for {}", attempt, MAX_TRIES, last_failure, url);

            if attempt < MAX_TRIES {
                info!("Sleeping for {} milliseconds before retrying {}", sleep_millis, url);
                tokio::time::sleep(Duration::from_millis(sleep_millis)).await;
                sleep_millis *= 2;
            }
        }

        Err(DamError::Fetch {
            url: url.to_string(),
            reason: last_failure,
        })
    }
}
