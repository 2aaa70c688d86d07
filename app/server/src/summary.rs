//! Transaction summary shaping
//!
//! Turns an explorer transaction into the record the browser page renders.

use bitcoin::Amount;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

use crate::error::{LookupError, LookupResult};
use crate::explorer::RawTransaction;
use crate::price::BtcPrice;

pub const UNCONFIRMED: &str = "Unconfirmed";
pub const PENDING: &str = "Pending";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockHeight {
    Mined(u64),
    Unconfirmed,
}

impl Serialize for BlockHeight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BlockHeight::Mined(h) => serializer.serialize_u64(*h),
            BlockHeight::Unconfirmed => serializer.serialize_str(UNCONFIRMED),
        }
    }
}

/// Block time in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTime {
    Mined(u64),
    Pending,
}

impl Serialize for BlockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BlockTime::Mined(t) => serializer.serialize_u64(*t),
            BlockTime::Pending => serializer.serialize_str(PENDING),
        }
    }
}

/// Satoshi sums and address sets derived from a transaction's inputs and outputs.
///
/// Inputs without a previous-output address (coinbase) and outputs without
/// an address (OP_RETURN, bare scripts) contribute to neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flows {
    pub senders: BTreeSet<String>,
    pub receivers: BTreeSet<String>,
    pub input_sats: u64,
    pub output_sats: u64,
}

impl Flows {
    pub fn from_raw(tx: &RawTransaction) -> LookupResult<Self> {
        let mut flows = Flows::default();

        for (i, vin) in tx.vin.iter().enumerate() {
            let Some(prevout) = &vin.prevout else { continue };
            let Some(address) = &prevout.scriptpubkey_address else { continue };
            let value = prevout.value.ok_or_else(|| {
                LookupError::Processing(format!("input {} has no prevout value", i))
            })?;
            flows.senders.insert(address.clone());
            flows.input_sats = flows.input_sats.saturating_add(value);
        }

        for (i, vout) in tx.vout.iter().enumerate() {
            let Some(address) = &vout.scriptpubkey_address else { continue };
            let value = vout
                .value
                .ok_or_else(|| LookupError::Processing(format!("output {} has no value", i)))?;
            flows.receivers.insert(address.clone());
            flows.output_sats = flows.output_sats.saturating_add(value);
        }

        Ok(flows)
    }
}

/// Successful lookup result, keyed the way the page expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    #[serde(rename = "Transaction ID")]
    pub txid: Option<String>,
    #[serde(rename = "Block Height")]
    pub block_height: BlockHeight,
    #[serde(rename = "Total BTC Transferred")]
    pub total_transferred_btc: f64,
    #[serde(rename = "Total Input BTC")]
    pub total_input_btc: f64,
    #[serde(rename = "Total Output BTC")]
    pub total_output_btc: f64,
    #[serde(rename = "Fees (BTC)")]
    pub fee_btc: f64,
    #[serde(rename = "Sender Addresses")]
    pub sender_addresses: Vec<String>,
    #[serde(rename = "Receiver Addresses")]
    pub receiver_addresses: Vec<String>,
    #[serde(rename = "Timestamp")]
    pub timestamp: BlockTime,
    #[serde(rename = "BTC Price (USD)")]
    pub btc_price_usd: BtcPrice,
}

impl TransactionSummary {
    pub fn new(tx: RawTransaction, flows: Flows, price: BtcPrice) -> Self {
        let status = tx.status.unwrap_or_default();
        let block_height = status
            .confirmed_height()
            .map_or(BlockHeight::Unconfirmed, BlockHeight::Mined);
        let timestamp = status
            .confirmed_time()
            .map_or(BlockTime::Pending, BlockTime::Mined);

        let total_output_btc = sats_to_btc(flows.output_sats);

        Self {
            txid: tx.txid,
            block_height,
            total_transferred_btc: total_output_btc,
            total_input_btc: sats_to_btc(flows.input_sats),
            total_output_btc,
            fee_btc: sats_to_btc(tx.fee.unwrap_or(0)),
            sender_addresses: flows.senders.into_iter().collect(),
            receiver_addresses: flows.receivers.into_iter().collect(),
            timestamp,
            btc_price_usd: price,
        }
    }
}

/// 1 BTC = 100,000,000 sat.
pub fn sats_to_btc(sats: u64) -> f64 {
    Amount::from_sat(sats).to_btc()
}
