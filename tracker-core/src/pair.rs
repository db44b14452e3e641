//! The closed set of tracked currency pairs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency pairs tracked by the engine
///
/// The set is small on purpose: every pair costs one row per refresh cycle.
/// These were picked for their larger variance over short time scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CurrencyPair {
    #[serde(rename = "XEM/BTC")]
    XemBtc,
    #[serde(rename = "OTON/BTC")]
    OtonBtc,
    #[serde(rename = "DGB/BTC")]
    DgbBtc,
}

impl CurrencyPair {
    /// Every pair the tracker knows about
    pub const ALL: [CurrencyPair; 3] = [
        CurrencyPair::XemBtc,
        CurrencyPair::OtonBtc,
        CurrencyPair::DgbBtc,
    ];

    /// Exchange symbol, also the identifier persisted in the store
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyPair::XemBtc => "XEM/BTC",
            CurrencyPair::OtonBtc => "OTON/BTC",
            CurrencyPair::DgbBtc => "DGB/BTC",
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CurrencyPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim().to_uppercase();
        CurrencyPair::ALL
            .into_iter()
            .find(|pair| pair.as_str() == symbol)
            .ok_or_else(|| format!("Unknown currency pair: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_pairs() {
        assert_eq!("XEM/BTC".parse::<CurrencyPair>(), Ok(CurrencyPair::XemBtc));
        assert_eq!("oton/btc".parse::<CurrencyPair>(), Ok(CurrencyPair::OtonBtc));
        assert_eq!(" DGB/BTC ".parse::<CurrencyPair>(), Ok(CurrencyPair::DgbBtc));
    }

    #[test]
    fn test_reject_unknown_pair() {
        assert!("ETH/BTC".parse::<CurrencyPair>().is_err());
        assert!("".parse::<CurrencyPair>().is_err());
    }

    #[test]
    fn test_serde_uses_exchange_symbol() {
        let json = serde_json::to_string(&CurrencyPair::DgbBtc).unwrap();
        assert_eq!(json, "\"DGB/BTC\"");

        let pair: CurrencyPair = serde_json::from_str("\"OTON/BTC\"").unwrap();
        assert_eq!(pair, CurrencyPair::OtonBtc);
        assert!(serde_json::from_str::<CurrencyPair>("\"LTC/BTC\"").is_err());
    }
}
