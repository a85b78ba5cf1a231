//! HTTP fetcher for the trade statistics API.
//!
//! One GET per call, parsed into records. Transport failures, HTTP error
//! statuses and malformed documents are retried; once attempts run out the
//! caller gets an empty outcome naming the failed period.

use crate::source::TradeSource;
use crate::xml::parse_items;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use tradeprice_core::config::{ApiConfig, FetchConfig};
use tradeprice_core::{Error, HsCode, Outcome, Result, TradeRecord, YearMonth};

/// Query parameter names understood by the API.
pub mod param {
    pub const SERVICE_KEY: &str = "serviceKey";
    pub const START: &str = "strtYymm";
    pub const END: &str = "endYymm";
    pub const HS_CODE: &str = "hsSgn";
    pub const COUNTRY: &str = "cntyCd";
}

/// Trade statistics client with a fixed retry policy.
#[derive(Debug, Clone)]
pub struct TradeDataFetcher {
    client: Client,
    endpoint: String,
    api_key: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl TradeDataFetcher {
    /// Create a fetcher from configuration.
    pub fn new(api: &ApiConfig, fetch: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(fetch.timeout())
            .build()
            .map_err(|e| Error::http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: api.endpoint.clone(),
            api_key: api.api_key.clone(),
            max_attempts: fetch.max_attempts,
            retry_delay: fetch.retry_delay(),
        })
    }

    fn query_params(
        &self,
        start: YearMonth,
        end: YearMonth,
        hs_code: &HsCode,
        country: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            (param::SERVICE_KEY, self.api_key.clone()),
            (param::START, start.to_string()),
            (param::END, end.to_string()),
            (param::HS_CODE, hs_code.to_string()),
        ];
        if let Some(country) = country.map(str::trim).filter(|c| !c.is_empty()) {
            params.push((param::COUNTRY, country.to_string()));
        }
        params
    }

    /// Single attempt: GET, status check, parse.
    async fn request(&self, params: &[(&'static str, String)]) -> Result<Vec<TradeRecord>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(params)
            .send()
            .await
            .map_err(|e| Error::http(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::http(e.to_string()))?;

        let body = response.text().await.map_err(|e| Error::http(e.to_string()))?;
        parse_items(&body)
    }
}

impl TradeSource for TradeDataFetcher {
    async fn fetch(
        &self,
        start: YearMonth,
        end: YearMonth,
        hs_code: &HsCode,
        country: Option<&str>,
    ) -> Outcome<TradeRecord> {
        let params = self.query_params(start, end, hs_code, country);
        debug!(%start, %end, %hs_code, country = country.unwrap_or("-"), "Requesting trade statistics");

        for attempt in 1..=self.max_attempts {
            match self.request(&params).await {
                Ok(records) if records.is_empty() => {
                    return Outcome::empty(format!("no data found for {start}"));
                }
                Ok(records) => return Outcome::rows(records),
                Err(e) => {
                    warn!(
                        "Request failed ({}), attempt {}/{}: {}",
                        start, attempt, self.max_attempts, e
                    );
                    if attempt < self.max_attempts {
                        sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Outcome::empty(format!("request failed: {start}"))
    }
}
