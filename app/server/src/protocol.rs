use serde::{Deserialize, Serialize};

use crate::error::{LookupError, LookupResult};
use crate::summary::TransactionSummary;

/// Form body of `POST /analyze`.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub txid: Option<String>,
}

impl AnalyzeRequest {
    /// The trimmed txid, or `MissingTxid` when absent or blank.
    pub fn txid(&self) -> LookupResult<&str> {
        self.txid
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(LookupError::MissingTxid)
    }
}

/// JSON body of `POST /analyze`: a summary, or `{"error": "..."}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Summary(TransactionSummary),
    Error { error: String },
}

impl From<LookupError> for AnalyzeResponse {
    fn from(err: LookupError) -> Self {
        AnalyzeResponse::Error { error: err.to_string() }
    }
}

impl From<LookupResult<TransactionSummary>> for AnalyzeResponse {
    fn from(result: LookupResult<TransactionSummary>) -> Self {
        match result {
            Ok(summary) => AnalyzeResponse::Summary(summary),
            Err(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(txid: Option<&str>) -> AnalyzeRequest {
        AnalyzeRequest { txid: txid.map(str::to_string) }
    }

    #[test]
    fn missing_or_blank_txid_is_rejected() {
        assert_eq!(request(None).txid(), Err(LookupError::MissingTxid));
        assert_eq!(request(Some("")).txid(), Err(LookupError::MissingTxid));
        assert_eq!(request(Some("  \n")).txid(), Err(LookupError::MissingTxid));
    }

    #[test]
    fn txid_is_trimmed_but_not_validated() {
        assert_eq!(request(Some("  abc123 ")).txid(), Ok("abc123"));
        assert_eq!(request(Some("not-hex")).txid(), Ok("not-hex"));
    }

    #[test]
    fn error_serializes_as_single_field() {
        let resp = AnalyzeResponse::from(LookupError::MissingTxid);
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({ "error": "No transaction ID provided" })
        );

        let resp = AnalyzeResponse::from(LookupError::UpstreamHttp(404));
        assert_eq!(serde_json::to_value(&resp).unwrap(), json!({ "error": "HTTP Error: 404" }));
    }
}
