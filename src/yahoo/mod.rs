//! Yahoo Finance daily history client
//! No API key needed for the public chart endpoint.

mod client;
mod types;

pub use client::{YahooClient, YahooProvider};
pub use types::*;
