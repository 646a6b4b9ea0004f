use serde::{Deserialize, Serialize};

/// reasons a transaction could not be turned into a summary
///
/// every variant other than `Fetch` is terminal, parsing is deterministic over finalized data
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "kebab-case")]
pub enum ParseFailure {
    #[error("ambiguous balance: {0}")]
    AmbiguousBalance(String),
    #[error("incomplete swap legs, found {found} distinguishable balance changes")]
    IncompleteSwapLegs { found: usize },
    /// the transaction was included but reverted, its balances show nothing but the fee
    #[error("transaction failed on-chain: {0}")]
    FailedOnChain(String),
    #[error("instruction mismatch: {0}")]
    InstructionMismatch(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
}

impl ParseFailure {
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}
