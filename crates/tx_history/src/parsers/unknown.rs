use {
    super::TransactionParser,
    crate::{
        classifier::ClassificationResult, error::ParseFailure, summary::ParsedTransactionSummary,
        types::RawTransactionRecord,
    },
};

/// passes the raw instructions through for display, never fails
pub struct UnknownParser;

impl TransactionParser for UnknownParser {
    fn parse(
        &self,
        raw: &RawTransactionRecord,
        _classification: &ClassificationResult,
    ) -> Result<ParsedTransactionSummary, ParseFailure> {
        Ok(ParsedTransactionSummary::Unknown {
            instructions: raw.instructions.clone(),
        })
    }
}
