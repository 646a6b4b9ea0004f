//! determines which kind of transaction we are looking at from the programs it invoked
//!
//! a transaction often contains several recognizable instructions (a swap is usually preceded by
//! token account setup, a transfer may be followed by closing the emptied account). instead of
//! trusting instruction order, each kind has a fixed priority and the most specific kind wins.
//! instructions of equal priority are resolved in favor of the earliest one.
use {
    crate::{
        parsable_instructions::{
            self, system::SystemInstructions, token::TokenInstructions, DecodedInstruction,
        },
        programs::{KnownProgram, ProgramTable, DEFAULT_PROGRAMS},
        types::{AccountKeySet, Instruction},
    },
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    Transfer,
    Swap,
    CloseAccount,
    Unknown,
}

/// most specific kind first
const KIND_PRIORITY: [TransactionKind; 3] = [
    TransactionKind::Swap,
    TransactionKind::Transfer,
    TransactionKind::CloseAccount,
];

impl TransactionKind {
    fn rank(&self) -> usize {
        KIND_PRIORITY
            .iter()
            .position(|kind| kind == self)
            .unwrap_or(KIND_PRIORITY.len())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub kind: TransactionKind,
    /// position of the instruction that determined the kind
    pub instruction_index: Option<usize>,
    pub program: Option<KnownProgram>,
}

impl ClassificationResult {
    pub fn unknown() -> Self {
        Self {
            kind: TransactionKind::Unknown,
            instruction_index: None,
            program: None,
        }
    }
}

/// classifies using the built-in program table
pub fn classify(instructions: &[Instruction], account_keys: &AccountKeySet) -> ClassificationResult {
    DEFAULT_PROGRAMS.classify(instructions, account_keys)
}

impl ProgramTable {
    pub fn classify(
        &self,
        instructions: &[Instruction],
        account_keys: &AccountKeySet,
    ) -> ClassificationResult {
        let mut best: Option<ClassificationResult> = None;
        for (idx, ix) in instructions.iter().enumerate() {
            let Some(program) = self.lookup(&ix.program_id) else {
                continue;
            };
            let Some(kind) = instruction_kind(program, ix, account_keys) else {
                continue;
            };
            // strict comparison keeps the earliest instruction on ties
            if best
                .as_ref()
                .map_or(true, |current| kind.rank() < current.kind.rank())
            {
                best = Some(ClassificationResult {
                    kind,
                    instruction_index: Some(idx),
                    program: Some(program),
                });
            }
        }
        best.unwrap_or_else(ClassificationResult::unknown)
    }
}

fn instruction_kind(
    program: KnownProgram,
    ix: &Instruction,
    account_keys: &AccountKeySet,
) -> Option<TransactionKind> {
    if program.is_swap() {
        return Some(TransactionKind::Swap);
    }
    match parsable_instructions::decode_instruction(program, ix, account_keys) {
        Ok(Some(DecodedInstruction::TokenInstruction(ix))) => match ix {
            TokenInstructions::Transfer(_)
            | TokenInstructions::TransferChecked(_)
            | TokenInstructions::TransferCheckedWithFee(_) => Some(TransactionKind::Transfer),
            TokenInstructions::CloseAccount(_) => Some(TransactionKind::CloseAccount),
        },
        Ok(Some(DecodedInstruction::SystemInstruction(
            SystemInstructions::Transfer(_) | SystemInstructions::TransferWithSeed(_),
        ))) => Some(TransactionKind::Transfer),
        // memos annotate other instructions
        Ok(Some(DecodedInstruction::Memo(_))) | Ok(None) => None,
        Err(err) => {
            log::debug!("failed to decode instruction for {}: {err:#}", ix.program_id);
            None
        }
    }
}
