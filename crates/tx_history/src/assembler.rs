//! combines a raw record, its classification and the parser outcome into the entity handed to consumers
use {
    crate::{
        classifier::ClassificationResult, error::ParseFailure, summary::ParsedTransactionSummary,
        types::RawTransactionRecord,
    },
    serde::{Deserialize, Serialize},
};

/// lifecycle of an entity
///
/// `Requested -> Loading -> Parsed | Unparsed`, terminal states are only left through a refetch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityState {
    Requested,
    Loading,
    Parsed,
    Unparsed,
}

/// display ready view of a single transaction
///
/// entities are replaced as a whole when a transaction is refetched, they are never mutated in place
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransactionEntity {
    /// transaction signature
    pub id: String,
    pub raw: Option<RawTransactionRecord>,
    pub classification: Option<ClassificationResult>,
    /// `None` while loading or when parsing failed
    pub summary: Option<ParsedTransactionSummary>,
    pub failure: Option<ParseFailure>,
    pub loading: bool,
}

impl ParsedTransactionEntity {
    /// placeholder for an id nobody started fetching yet
    pub fn requested(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            raw: None,
            classification: None,
            summary: None,
            failure: None,
            loading: false,
        }
    }
    pub fn loading(id: impl Into<String>) -> Self {
        Self {
            loading: true,
            ..Self::requested(id)
        }
    }
    pub fn state(&self) -> EntityState {
        match (self.loading, &self.summary, &self.failure) {
            (true, _, _) => EntityState::Loading,
            (false, Some(_), _) => EntityState::Parsed,
            (false, None, Some(_)) => EntityState::Unparsed,
            (false, None, None) => EntityState::Requested,
        }
    }
    pub fn is_terminal(&self) -> bool {
        matches!(self.state(), EntityState::Parsed | EntityState::Unparsed)
    }
}

/// builds the terminal entity for a parsed transaction
///
/// # Returns
///
/// an entity with `summary` set on success, or `summary = None` and the failure recorded
pub fn assemble(
    id: &str,
    raw: RawTransactionRecord,
    classification: ClassificationResult,
    outcome: Result<ParsedTransactionSummary, ParseFailure>,
) -> ParsedTransactionEntity {
    let (summary, failure) = match outcome {
        Ok(summary) => (Some(summary), None),
        Err(err) => {
            log::debug!("transaction {id} is unparsed {err}");
            (None, Some(err))
        }
    };
    ParsedTransactionEntity {
        id: id.to_string(),
        raw: Some(raw),
        classification: Some(classification),
        summary,
        failure,
        loading: false,
    }
}
