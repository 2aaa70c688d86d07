//! HTTP routes
//!
//! `GET /` serves the lookup page, `POST /analyze` answers with JSON.
//! `/analyze` always replies 200; failures travel in the `error` field.

use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::lookup::TxLookup;
use crate::protocol::{AnalyzeRequest, AnalyzeResponse};

const INDEX_HTML: &str = include_str!("../static/index.html");

pub fn router(lookup: Arc<TxLookup>) -> Router {
    Router::new()
        .route("/", get(|| async { Html(INDEX_HTML) }))
        .route("/health", get(|| async { (StatusCode::OK, "OK") }))
        .route("/analyze", post(analyze))
        .with_state(lookup)
}

async fn analyze(
    State(lookup): State<Arc<TxLookup>>,
    form: Result<Form<AnalyzeRequest>, FormRejection>,
) -> impl IntoResponse {
    // A body that is not a form carries no txid.
    let request = match form {
        Ok(Form(request)) => request,
        Err(rejection) => {
            warn!("Unreadable /analyze form: {}", rejection);
            AnalyzeRequest::default()
        }
    };
    info!("HTTP POST /analyze request received: {:?}", request.txid);

    let txid = match request.txid() {
        Ok(txid) => txid,
        Err(e) => {
            warn!("Rejected /analyze request: {}", e);
            return Json(AnalyzeResponse::from(e));
        }
    };

    let result = lookup.lookup(txid).await;
    if let Err(e) = &result {
        warn!("Lookup for {} failed: {}", txid, e);
    }
    Json(AnalyzeResponse::from(result))
}
