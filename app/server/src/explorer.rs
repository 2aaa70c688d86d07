use crate::error::{LookupError, LookupResult};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{info, warn};

/// Transaction as returned by Esplora's `GET /tx/:txid`.
///
/// Only the fields the summary needs are modeled; every one of them may be
/// absent in the upstream payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub txid: Option<String>,
    #[serde(default)]
    pub fee: Option<u64>,
    #[serde(default)]
    pub status: Option<TxStatus>,
    #[serde(default)]
    pub vin: Vec<TxInput>,
    #[serde(default)]
    pub vout: Vec<TxOutput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxStatus {
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub block_height: Option<u64>,
    #[serde(default)]
    pub block_time: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxInput {
    /// Null for coinbase inputs.
    #[serde(default)]
    pub prevout: Option<TxOutput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxOutput {
    /// Absent for OP_RETURN and other non-standard scripts.
    #[serde(default)]
    pub scriptpubkey_address: Option<String>,
    #[serde(default)]
    pub value: Option<u64>,
}

impl TxStatus {
    /// Height of the including block, if the transaction is mined.
    pub fn confirmed_height(&self) -> Option<u64> {
        self.block_height.filter(|_| self.confirmed)
    }

    /// Time of the including block, if the transaction is mined.
    pub fn confirmed_time(&self) -> Option<u64> {
        self.block_time.filter(|_| self.confirmed)
    }
}

/// Client for an Esplora-compatible block explorer (Blockstream, mempool.space, electrs-http).
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    http: Client,
    base_url: Url,
}

impl ExplorerClient {
    /// `http` should already carry the request timeout.
    pub fn new(http: Client, base_url: Url) -> Self {
        info!("ExplorerClient using base URL {}", base_url);
        Self { http, base_url }
    }

    /// `{base}/tx/{txid}`, with the txid pushed as one percent-encoded segment.
    ///
    /// `.` and `..` are refused: URL normalization would drop them and hit `{base}/tx`.
    pub fn tx_url(&self, txid: &str) -> LookupResult<Url> {
        if matches!(txid, "." | "..") {
            return Err(LookupError::Processing(format!(
                "'{}' is not a transaction id",
                txid
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                LookupError::Processing(format!("explorer URL {} cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(["tx", txid]);
        Ok(url)
    }

    /// Fetch one transaction.
    ///
    /// Non-2xx answers map to `UpstreamHttp`, transport failures to
    /// `UpstreamTimeout`/`UpstreamUnreachable`, and a body that is not a
    /// transaction object to `Processing`.
    pub async fn get_transaction(&self, txid: &str) -> LookupResult<RawTransaction> {
        let url = self.tx_url(txid)?;

        let resp = self
            .http
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!("Explorer request for {} failed: {}", txid, e);
                LookupError::from(e)
            })?;

        let body = resp.bytes().await.map_err(|e| {
            warn!("Explorer body read for {} failed: {}", txid, e);
            LookupError::from(e)
        })?;

        let tx: RawTransaction = serde_json::from_slice(&body)?;
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base: &str) -> ExplorerClient {
        ExplorerClient::new(Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn tx_url_appends_segments() {
        let c = client("https://blockstream.info/api");
        assert_eq!(
            c.tx_url("abcd").unwrap().as_str(),
            "https://blockstream.info/api/tx/abcd"
        );

        let trailing = client("https://mempool.space/api/");
        assert_eq!(
            trailing.tx_url("abcd").unwrap().as_str(),
            "https://mempool.space/api/tx/abcd"
        );
    }

    #[test]
    fn tx_url_keeps_txid_in_one_segment() {
        let c = client("https://blockstream.info/api");
        let url = c.tx_url("../../address/x?y=1").unwrap();
        assert_eq!(url.path_segments().unwrap().count(), 3);
        assert!(url.query().is_none());
    }

    #[test]
    fn dot_segment_txids_are_refused() {
        let c = client("https://blockstream.info/api");
        for txid in [".", ".."] {
            assert_eq!(
                c.tx_url(txid),
                Err(LookupError::Processing(format!("'{}' is not a transaction id", txid)))
            );
        }
        assert_eq!(
            c.tx_url("...").unwrap().as_str(),
            "https://blockstream.info/api/tx/..."
        );
    }

    #[test]
    fn decodes_coinbase_and_unconfirmed_shapes() {
        let tx: RawTransaction = serde_json::from_value(json!({
            "txid": "cb",
            "vin": [{ "prevout": null, "is_coinbase": true }],
            "vout": [{ "scriptpubkey_type": "op_return", "value": 0 }],
            "status": { "confirmed": false }
        }))
        .unwrap();

        assert!(tx.vin[0].prevout.is_none());
        assert!(tx.vout[0].scriptpubkey_address.is_none());
        assert_eq!(tx.fee, None);
        let status = tx.status.unwrap();
        assert_eq!(status.confirmed_height(), None);
        assert_eq!(status.confirmed_time(), None);
    }

    #[test]
    fn height_is_ignored_unless_confirmed() {
        let status = TxStatus {
            confirmed: false,
            block_height: Some(800_000),
            block_time: Some(1_690_000_000),
        };
        assert_eq!(status.confirmed_height(), None);
        assert_eq!(status.confirmed_time(), None);

        let mined = TxStatus { confirmed: true, ..status };
        assert_eq!(mined.confirmed_height(), Some(800_000));
        assert_eq!(mined.confirmed_time(), Some(1_690_000_000));
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let tx: RawTransaction = serde_json::from_value(json!({ "txid": "x" })).unwrap();
        assert!(tx.vin.is_empty());
        assert!(tx.vout.is_empty());
        assert!(tx.status.is_none());
    }
}
