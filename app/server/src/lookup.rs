use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{error, info};

use crate::config::Config;
use crate::error::LookupResult;
use crate::explorer::ExplorerClient;
use crate::price::PriceClient;
use crate::summary::{Flows, TransactionSummary};

/// Upstream clients shared by all requests. Built once from `Config`; never mutated.
#[derive(Debug, Clone)]
pub struct TxLookup {
    explorer: ExplorerClient,
    prices: PriceClient,
}

impl TxLookup {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("txlookup-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            explorer: ExplorerClient::new(http.clone(), config.explorer_base_url.clone()),
            prices: PriceClient::new(http, config.price_api_url.clone(), config.price_api_key.clone()),
        })
    }

    /// Look up one transaction and attach the current BTC price.
    ///
    /// The price index is only queried once the explorer answer has been
    /// shaped successfully; a price failure never fails the lookup.
    pub async fn lookup(&self, txid: &str) -> LookupResult<TransactionSummary> {
        info!("Looking up transaction {}", txid);

        let tx = self.explorer.get_transaction(txid).await?;
        let flows = Flows::from_raw(&tx).map_err(|e| {
            error!("Could not summarize transaction {}: {}", txid, e);
            e
        })?;

        let price = self.prices.btc_usd().await;

        let summary = TransactionSummary::new(tx, flows, price);
        info!(
            "Transaction {} summarized: {} sender(s), {} receiver(s)",
            txid,
            summary.sender_addresses.len(),
            summary.receiver_addresses.len()
        );
        Ok(summary)
    }
}
