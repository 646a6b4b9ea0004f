use {
    crate::{classifier::TransactionKind, programs::KnownProgram, types::Instruction},
    serde::{Deserialize, Serialize},
};

/// display ready description of a transaction, one variant per recognized kind
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ParsedTransactionSummary {
    #[serde(rename_all = "camelCase")]
    Transfer {
        /// sending account, a token account for token transfers
        from: String,
        /// receiving account, a token account for token transfers
        to: String,
        from_owner: Option<String>,
        to_owner: Option<String>,
        mint: String,
        /// amount scaled by the mint decimals
        amount: f64,
        raw_amount: u64,
        decimals: u8,
        /// set for lamport transfers made through the system program
        native: bool,
        memo: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Swap {
        trader: Option<String>,
        program: KnownProgram,
        source_mint: String,
        source_amount: f64,
        destination_mint: String,
        destination_amount: f64,
    },
    #[serde(rename_all = "camelCase")]
    CloseAccount {
        account: String,
        owner: String,
        /// receives the rent held by the closed account
        destination: String,
    },
    Unknown { instructions: Vec<Instruction> },
}

impl ParsedTransactionSummary {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Self::Transfer { .. } => TransactionKind::Transfer,
            Self::Swap { .. } => TransactionKind::Swap,
            Self::CloseAccount { .. } => TransactionKind::CloseAccount,
            Self::Unknown { .. } => TransactionKind::Unknown,
        }
    }
}
