use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Number;
use tracing::warn;

pub const PRICE_UNAVAILABLE: &str = "Price unavailable";

/// Current BTC/USD rate, or the marker shown when the price index is down.
///
/// The quote keeps the index's own number form (`67012` stays an integer).
#[derive(Debug, Clone, PartialEq)]
pub enum BtcPrice {
    Usd(Number),
    Unavailable,
}

impl Serialize for BtcPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BtcPrice::Usd(px) => px.serialize(serializer),
            BtcPrice::Unavailable => serializer.serialize_str(PRICE_UNAVAILABLE),
        }
    }
}

// { "bitcoin": { "usd": 67012.5 } }
#[derive(Debug, Deserialize)]
struct SimplePrice {
    bitcoin: UsdQuote,
}

#[derive(Debug, Deserialize)]
struct UsdQuote {
    usd: Number,
}

/// CoinGecko `/simple/price` client for the BTC spot price.
#[derive(Debug, Clone)]
pub struct PriceClient {
    http: Client,
    url: Url,
    api_key: Option<String>,
}

impl PriceClient {
    pub fn new(http: Client, base: Url, api_key: Option<String>) -> Self {
        let mut url = base;
        url.query_pairs_mut()
            .append_pair("ids", "bitcoin")
            .append_pair("vs_currencies", "usd");
        Self { http, url, api_key }
    }

    #[cfg(test)]
    pub(crate) fn url(&self) -> &Url {
        &self.url
    }

    /// BTC price in USD. Never fails: any problem degrades to `Unavailable`.
    pub async fn btc_usd(&self) -> BtcPrice {
        match self.fetch().await {
            Ok(px) => BtcPrice::Usd(px),
            Err(e) => {
                warn!("Price lookup failed, reporting unavailable: {:#}", e);
                BtcPrice::Unavailable
            }
        }
    }

    async fn fetch(&self) -> Result<Number> {
        let mut req = self
            .http
            .get(self.url.clone())
            .header("accept", "application/json");
        if let Some(key) = &self.api_key {
            req = req.header("x-cg-demo-api-key", key);
        }

        let resp = req
            .send()
            .await
            .context("coingecko: request failed")?
            .error_for_status()
            .context("coingecko: non-success status")?;

        let body = resp.bytes().await.context("coingecko: read body failed")?;

        let parsed: SimplePrice =
            serde_json::from_slice(&body).context("coingecko: parse JSON failed")?;

        Ok(parsed.bitcoin.usd)
    }
}
