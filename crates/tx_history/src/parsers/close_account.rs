use {
    super::{ensure_succeeded, matched_instruction, TransactionParser},
    crate::{
        classifier::ClassificationResult,
        error::ParseFailure,
        parsable_instructions::{token::TokenInstructions, DecodedInstruction},
        summary::ParsedTransactionSummary,
        types::RawTransactionRecord,
    },
};

/// closing a token account needs no balance information, everything is in the instruction
pub struct CloseAccountParser;

impl TransactionParser for CloseAccountParser {
    fn parse(
        &self,
        raw: &RawTransactionRecord,
        classification: &ClassificationResult,
    ) -> Result<ParsedTransactionSummary, ParseFailure> {
        ensure_succeeded(raw)?;
        match matched_instruction(raw, classification)? {
            (_, DecodedInstruction::TokenInstruction(TokenInstructions::CloseAccount(close))) => {
                Ok(ParsedTransactionSummary::CloseAccount {
                    account: close.account,
                    owner: close.owner,
                    destination: close.destination,
                })
            }
            (_, decoded) => Err(ParseFailure::InstructionMismatch(format!(
                "expected closeAccount, found {decoded:?}"
            ))),
        }
    }
}
