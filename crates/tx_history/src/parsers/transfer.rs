use {
    super::{ensure_succeeded, matched_instruction, TransactionParser},
    crate::{
        balances::resolve_deltas,
        classifier::ClassificationResult,
        error::ParseFailure,
        parsable_instructions::{memo, token::TokenInstructions, DecodedInstruction},
        programs::{KnownProgram, DEFAULT_PROGRAMS},
        summary::ParsedTransactionSummary,
        types::{BalanceSlot, RawTransactionRecord, NATIVE_MINT},
    },
};

/// resolves the amount moved by a token or lamport transfer from balance changes
///
/// token transfers must debit the sender exactly what the receiver was credited, except for the
/// transfer fee of token2022 mints that withhold one. lamport transfers may additionally debit the
/// transaction fee, but only when the sender is the fee payer.
pub struct TransferParser;

struct TransferLeg {
    source: String,
    destination: String,
    /// amount stated by the instruction itself
    declared: Option<u64>,
    /// mint stated by the instruction, only transferChecked and lamport transfers have one
    mint: Option<String>,
    native: bool,
    /// token2022 transfer fee withheld from the receiver
    withheld: u64,
}

impl TransactionParser for TransferParser {
    fn parse(
        &self,
        raw: &RawTransactionRecord,
        classification: &ClassificationResult,
    ) -> Result<ParsedTransactionSummary, ParseFailure> {
        ensure_succeeded(raw)?;
        let leg = match matched_instruction(raw, classification)?.1 {
            DecodedInstruction::TokenInstruction(TokenInstructions::Transfer(tx)) => TransferLeg {
                declared: tx.amount(),
                source: tx.source,
                destination: tx.destination,
                mint: None,
                native: false,
                withheld: 0,
            },
            DecodedInstruction::TokenInstruction(TokenInstructions::TransferChecked(tx)) => {
                TransferLeg {
                    declared: tx.token_amount.amount.parse().ok(),
                    source: tx.source,
                    destination: tx.destination,
                    mint: Some(tx.mint),
                    native: false,
                    withheld: 0,
                }
            }
            DecodedInstruction::TokenInstruction(TokenInstructions::TransferCheckedWithFee(tx)) => {
                TransferLeg {
                    declared: tx.token_amount.amount.parse().ok(),
                    source: tx.source,
                    destination: tx.destination,
                    mint: Some(tx.mint),
                    native: false,
                    withheld: tx.fee_amount.amount.parse().map_err(|_| {
                        ParseFailure::InstructionMismatch(format!(
                            "invalid transfer fee {}",
                            tx.fee_amount.amount
                        ))
                    })?,
                }
            }
            DecodedInstruction::SystemInstruction(ix) => {
                let tx = ix.transfer();
                TransferLeg {
                    source: tx.source.clone(),
                    destination: tx.destination.clone(),
                    declared: Some(tx.lamports),
                    mint: Some(NATIVE_MINT.clone()),
                    native: true,
                    withheld: 0,
                }
            }
            decoded => {
                return Err(ParseFailure::InstructionMismatch(format!(
                    "expected a transfer, found {decoded:?}"
                )))
            }
        };
        let source_idx = account_index(raw, &leg.source)?;
        let destination_idx = account_index(raw, &leg.destination)?;
        let pre = raw.balances(BalanceSlot::Pre, leg.native);
        let post = raw.balances(BalanceSlot::Post, leg.native);
        let memo = find_memo(raw);

        if source_idx == destination_idx {
            // balances can't tell us anything about a transfer to self
            let balance = post
                .get(source_idx)
                .or_else(|| pre.get(source_idx))
                .ok_or_else(|| {
                    ParseFailure::AmbiguousBalance(format!("no balances recorded for {}", leg.source))
                })?;
            let raw_amount = leg.declared.ok_or_else(|| {
                ParseFailure::AmbiguousBalance("self transfer without a declared amount".to_string())
            })?;
            return Ok(ParsedTransactionSummary::Transfer {
                from: leg.source,
                to: leg.destination,
                from_owner: balance.owner.clone(),
                to_owner: balance.owner.clone(),
                mint: balance.mint.clone(),
                amount: raw_amount as f64 / 10_f64.powi(balance.decimals as i32),
                raw_amount,
                decimals: balance.decimals,
                native: leg.native,
                memo,
            });
        }

        let deltas = resolve_deltas(&pre, &post, [source_idx, destination_idx]);
        let sender = deltas.get(&source_idx).ok_or_else(|| {
            ParseFailure::AmbiguousBalance(format!("no balances recorded for sender {}", leg.source))
        })?;
        let receiver = deltas.get(&destination_idx).ok_or_else(|| {
            ParseFailure::AmbiguousBalance(format!(
                "no balances recorded for receiver {}",
                leg.destination
            ))
        })?;
        if sender.mint != receiver.mint {
            return Err(ParseFailure::AmbiguousBalance(format!(
                "sender mint {} differs from receiver mint {}",
                sender.mint, receiver.mint
            )));
        }
        if let Some(mint) = leg.mint.as_ref().filter(|mint| **mint != receiver.mint) {
            return Err(ParseFailure::AmbiguousBalance(format!(
                "instruction mint {mint} differs from balance mint {}",
                receiver.mint
            )));
        }

        let sent = -sender.raw;
        let received = receiver.raw;
        if sent < 0 {
            return Err(ParseFailure::AmbiguousBalance(format!(
                "sender balance increased by {}",
                sender.raw
            )));
        }
        if received < 0 {
            return Err(ParseFailure::AmbiguousBalance(format!(
                "receiver balance decreased by {}",
                -received
            )));
        }
        let fee_allowance = if leg.native && source_idx == 0 {
            raw.fee as i128
        } else {
            leg.withheld as i128
        };
        if sent < received || sent - received > fee_allowance {
            return Err(ParseFailure::AmbiguousBalance(format!(
                "sender debited {sent} but receiver credited {received} (fee allowance {fee_allowance})"
            )));
        }
        let raw_amount = u64::try_from(received).map_err(|_| {
            ParseFailure::AmbiguousBalance(format!("received amount {received} overflows"))
        })?;

        Ok(ParsedTransactionSummary::Transfer {
            from: leg.source,
            to: leg.destination,
            from_owner: sender.owner.clone(),
            to_owner: receiver.owner.clone(),
            mint: receiver.mint.clone(),
            amount: receiver.ui_amount(),
            raw_amount,
            decimals: receiver.decimals,
            native: leg.native,
            memo,
        })
    }
}

fn account_index(raw: &RawTransactionRecord, address: &str) -> Result<u8, ParseFailure> {
    raw.account_keys.index_of(address).ok_or_else(|| {
        ParseFailure::InstructionMismatch(format!("{address} is not part of the account keys"))
    })
}

/// text of the first memo instruction, if any
fn find_memo(raw: &RawTransactionRecord) -> Option<String> {
    raw.instructions
        .iter()
        .filter(|ix| DEFAULT_PROGRAMS.lookup(&ix.program_id) == Some(KnownProgram::Memo))
        .find_map(|ix| match memo::decode_memo(ix) {
            Ok(memo) => Some(memo),
            Err(err) => {
                log::debug!("failed to decode memo in {}: {err:#}", raw.signature);
                None
            }
        })
}
