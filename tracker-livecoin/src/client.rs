//! Livecoin ticker client

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use tracker_core::{CurrencyPair, SampleSource, TrackerResult, VolumeSample};

use crate::error::LivecoinError;
use crate::types::TickerItem;

pub const LIVECOIN_API_BASE: &str = "https://api.livecoin.net";

/// Livecoin API client
pub struct LivecoinClient {
    http: Client,
    base_url: String,
}

impl LivecoinClient {
    /// Create a client against the public Livecoin API
    pub fn new() -> Result<Self, LivecoinError> {
        Self::with_base_url(LIVECOIN_API_BASE)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, LivecoinError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("CryptoTracker/1.0")
            .build()
            .map_err(|e| LivecoinError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the full ticker
    ///
    /// Livecoin allows requesting a single pair, but with a limit of one
    /// request per second it is cheaper to pull every pair at once and filter.
    pub async fn fetch_ticker(&self) -> Result<Vec<TickerItem>, LivecoinError> {
        let url = format!("{}/exchange/ticker", self.base_url);
        debug!("[Livecoin] Fetching ticker from: {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LivecoinError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            warn!("[Livecoin] Ticker request failed with status {}", status);
            return Err(LivecoinError::HttpError(status));
        }

        let items: Vec<TickerItem> = response
            .json()
            .await
            .map_err(|e| LivecoinError::ParseError(e.to_string()))?;

        debug!("[Livecoin] Ticker returned {} symbols", items.len());
        Ok(items)
    }
}

#[async_trait]
impl SampleSource for LivecoinClient {
    async fn fetch_samples(&self, pairs: &[CurrencyPair]) -> TrackerResult<Vec<VolumeSample>> {
        let items = self.fetch_ticker().await?;
        let samples = samples_from_ticker(items, pairs, Utc::now());

        info!(
            "[Livecoin] Fetched {} samples for {} tracked pairs",
            samples.len(),
            pairs.len()
        );

        Ok(samples)
    }
}

/// Keep the ticker entries for the requested pairs, stamped with a single
/// fetch time. The first valid entry wins if a symbol appears more than once.
pub fn samples_from_ticker(
    items: Vec<TickerItem>,
    pairs: &[CurrencyPair],
    fetched_at: DateTime<Utc>,
) -> Vec<VolumeSample> {
    let mut seen: HashSet<CurrencyPair> = HashSet::new();

    items
        .into_iter()
        .filter_map(|item| {
            let pair = pairs.iter().copied().find(|p| p.as_str() == item.symbol)?;
            if !item.volume.is_finite() || item.volume < 0.0 {
                warn!(
                    "[Livecoin] Ignoring invalid volume {} for {}",
                    item.volume, pair
                );
                return None;
            }
            if !seen.insert(pair) {
                debug!("[Livecoin] Ignoring duplicate ticker entry for {}", pair);
                return None;
            }
            Some(VolumeSample::new(pair, fetched_at, item.volume))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::TrackerError;

    fn ticker_json() -> &'static str {
        r#"[
            {"cur": "XEM", "symbol": "XEM/BTC", "last": 0.0000061, "volume": 1520340.5, "vwap": 0.0000060},
            {"cur": "ETH", "symbol": "ETH/BTC", "last": 0.025, "volume": 410.2},
            {"cur": "DGB", "symbol": "DGB/BTC", "last": 0.0000003, "volume": 88000000},
            {"cur": "DGB", "symbol": "DGB/BTC", "last": 0.0000003, "volume": 1}
        ]"#
    }

    #[test]
    fn test_parse_ticker_ignores_extra_fields() {
        let items: Vec<TickerItem> = serde_json::from_str(ticker_json()).unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].symbol, "XEM/BTC");
        assert_eq!(items[2].volume, 88_000_000.0);
    }

    #[test]
    fn test_samples_filtered_to_tracked_pairs() {
        let items: Vec<TickerItem> = serde_json::from_str(ticker_json()).unwrap();
        let now = Utc::now();

        let samples = samples_from_ticker(items, &CurrencyPair::ALL, now);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], VolumeSample::new(CurrencyPair::XemBtc, now, 1_520_340.5));
        assert_eq!(samples[1], VolumeSample::new(CurrencyPair::DgbBtc, now, 88_000_000.0));
    }

    #[test]
    fn test_samples_respect_requested_subset() {
        let items: Vec<TickerItem> = serde_json::from_str(ticker_json()).unwrap();

        let samples = samples_from_ticker(items, &[CurrencyPair::DgbBtc], Utc::now());

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].pair, CurrencyPair::DgbBtc);
    }

    #[test]
    fn test_negative_volume_dropped() {
        let items = vec![TickerItem {
            symbol: "OTON/BTC".to_string(),
            volume: -4.0,
        }];

        assert!(samples_from_ticker(items, &CurrencyPair::ALL, Utc::now()).is_empty());
    }

    #[test]
    fn test_first_valid_duplicate_wins() {
        let items = vec![
            TickerItem {
                symbol: "DGB/BTC".to_string(),
                volume: f64::NAN,
            },
            TickerItem {
                symbol: "DGB/BTC".to_string(),
                volume: -1.0,
            },
            TickerItem {
                symbol: "DGB/BTC".to_string(),
                volume: 250.0,
            },
            TickerItem {
                symbol: "DGB/BTC".to_string(),
                volume: 9.0,
            },
        ];
        let now = Utc::now();

        let samples = samples_from_ticker(items, &CurrencyPair::ALL, now);

        assert_eq!(samples, vec![VolumeSample::new(CurrencyPair::DgbBtc, now, 250.0)]);
    }

    #[test]
    fn test_errors_map_to_source_unavailable() {
        let err: TrackerError = LivecoinError::HttpError(429).into();
        assert!(matches!(err, TrackerError::SourceUnavailable(_)));
    }

    /// Serve a bodiless `503` to every connection
    async fn unavailable_upstream() -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    )
                    .await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_error_status_is_http_error() {
        let client = LivecoinClient::with_base_url(unavailable_upstream().await).unwrap();

        let result = client.fetch_ticker().await;

        assert!(matches!(result, Err(LivecoinError::HttpError(503))));
    }

    #[tokio::test]
    async fn test_error_status_is_source_unavailable() {
        let client = LivecoinClient::with_base_url(unavailable_upstream().await).unwrap();

        let result = client.fetch_samples(&CurrencyPair::ALL).await;

        assert!(matches!(result, Err(TrackerError::SourceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_source_unavailable() {
        let client = LivecoinClient::with_base_url("http://127.0.0.1:9").unwrap();

        let result = client.fetch_samples(&CurrencyPair::ALL).await;

        assert!(matches!(result, Err(TrackerError::SourceUnavailable(_))));
    }
}
