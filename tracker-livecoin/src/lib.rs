//! Livecoin exchange client
//!
//! Fetches the public ticker and turns it into volume samples for the
//! tracked currency pairs. Free API, no authentication required.

pub mod client;
pub mod error;
pub mod types;

pub use client::LivecoinClient;
pub use error::LivecoinError;
pub use types::TickerItem;
