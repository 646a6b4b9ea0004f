//! one parser per transaction kind, each turning a classified record into a summary
use crate::{
    classifier::{ClassificationResult, TransactionKind},
    error::ParseFailure,
    parsable_instructions::{self, DecodedInstruction},
    summary::ParsedTransactionSummary,
    types::{Instruction, RawTransactionRecord},
};

pub mod close_account;
pub mod swap;
pub mod transfer;
pub mod unknown;

pub trait TransactionParser: Send + Sync {
    fn parse(
        &self,
        raw: &RawTransactionRecord,
        classification: &ClassificationResult,
    ) -> Result<ParsedTransactionSummary, ParseFailure>;
}

pub fn parser_for(kind: TransactionKind) -> &'static dyn TransactionParser {
    match kind {
        TransactionKind::Transfer => &transfer::TransferParser,
        TransactionKind::Swap => &swap::SwapParser,
        TransactionKind::CloseAccount => &close_account::CloseAccountParser,
        TransactionKind::Unknown => &unknown::UnknownParser,
    }
}

pub fn parse(
    raw: &RawTransactionRecord,
    classification: &ClassificationResult,
) -> Result<ParsedTransactionSummary, ParseFailure> {
    parser_for(classification.kind).parse(raw, classification)
}

/// reverted transactions moved nothing, so no kind other than unknown can describe them
fn ensure_succeeded(raw: &RawTransactionRecord) -> Result<(), ParseFailure> {
    match &raw.err {
        Some(err) => Err(ParseFailure::FailedOnChain(err.clone())),
        None => Ok(()),
    }
}

/// decodes the instruction the classifier matched on
fn matched_instruction<'a>(
    raw: &'a RawTransactionRecord,
    classification: &ClassificationResult,
) -> Result<(&'a Instruction, DecodedInstruction), ParseFailure> {
    let (Some(idx), Some(program)) = (classification.instruction_index, classification.program)
    else {
        return Err(ParseFailure::InstructionMismatch(format!(
            "{:?} classification without a matched instruction",
            classification.kind
        )));
    };
    let ix = raw.instructions.get(idx).ok_or_else(|| {
        ParseFailure::InstructionMismatch(format!(
            "instruction {idx} out of range ({} instructions)",
            raw.instructions.len()
        ))
    })?;
    match parsable_instructions::decode_instruction(program, ix, &raw.account_keys) {
        Ok(Some(decoded)) => Ok((ix, decoded)),
        Ok(None) => Err(ParseFailure::InstructionMismatch(format!(
            "instruction {idx} is not a {:?} instruction",
            classification.kind
        ))),
        Err(err) => Err(ParseFailure::InstructionMismatch(format!(
            "failed to decode instruction {idx} {err:#}"
        ))),
    }
}
