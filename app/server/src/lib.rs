//! Bitcoin transaction lookup server
//!
//! Summarizes a transaction fetched from an Esplora block explorer and
//! prices it with the CoinGecko BTC/USD rate.

pub mod config;
pub mod error;
pub mod explorer;
pub mod http;
pub mod lookup;
pub mod price;
pub mod protocol;
pub mod summary;
