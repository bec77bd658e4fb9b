//! bv_core: Core types, domains, and ordering helpers for the season vote engine.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`bv_io`, `bv_algo`, `bv_pipeline`, `bv_report`, `bv_cli`).
//!
//! - Tokens: `GameId`, `PlayerName`
//! - `Season` (labelled by its ending calendar year)
//! - Source rows (`GameRecord`) and output rows (`SeasonLeaderboardEntry`)
//! - `WeightConfig` (statistic weights + win multiplier)
//! - Deterministic grouping / ordering helpers
//!
//! Serialization derives are gated behind the `serde` feature.

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidToken,
        InvalidName,
        InvalidSeason,
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidToken => write!(f, "invalid token"),
                CoreError::InvalidName => write!(f, "invalid player name"),
                CoreError::InvalidSeason => write!(f, "invalid season label"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod determinism;
pub mod entities;
pub mod ids;
pub mod variables;

pub use entities::{GameRecord, SeasonLeaderboardEntry};
pub use ids::{GameId, PlayerName, Season};
pub use variables::WeightConfig;
