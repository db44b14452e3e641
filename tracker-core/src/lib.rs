//! Core types for the CryptoTracker volume engine
//!
//! This crate defines the shared data structures used across the tracker:
//! the closed set of tracked currency pairs, volume samples and the
//! statistics derived from them, plus the sample source abstraction.

pub mod error;
pub mod pair;
pub mod source;
pub mod volume;

pub use error::{TrackerError, TrackerResult};
pub use pair::CurrencyPair;
pub use source::SampleSource;
pub use volume::{PairAverage, PairRank, PairSnapshot, VolumeSample};
