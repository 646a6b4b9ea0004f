use {
    super::{ensure_succeeded, TransactionParser},
    crate::{
        balances::{resolve_deltas, touched_indices, BalanceDelta},
        classifier::ClassificationResult,
        error::ParseFailure,
        programs::KnownProgram,
        summary::ParsedTransactionSummary,
        types::{BalanceSlot, RawTransactionRecord, TokenBalanceSnapshot},
    },
    std::collections::HashSet,
};

/// rent exempt minimum of a 165 byte token account
pub const TOKEN_ACCOUNT_RENT: u64 = 2_039_280;

/// derives both legs of a swap from the token balance changes of the transaction
///
/// the fee payer is assumed to be the trader. balance changes of accounts it owns are preferred,
/// falling back to every changed account when its own accounts don't show both legs. token
/// balances are tried before lamports, which also pay the fee and the rent of opened accounts.
/// when the trader swapped native sol directly, its lamport change without fee and rent serves as
/// a leg.
pub struct SwapParser;

impl TransactionParser for SwapParser {
    fn parse(
        &self,
        raw: &RawTransactionRecord,
        classification: &ClassificationResult,
    ) -> Result<ParsedTransactionSummary, ParseFailure> {
        ensure_succeeded(raw)?;
        let empty = TokenBalanceSnapshot::default();
        let pre = raw.token_balances(BalanceSlot::Pre).unwrap_or(&empty);
        let post = raw.token_balances(BalanceSlot::Post).unwrap_or(&empty);
        let tokens = resolve_deltas(pre, post, touched_indices(pre, post))
            .into_values()
            .filter(|delta| !delta.is_zero())
            .collect::<Vec<_>>();
        let native = native_leg(raw, pre, post);

        let trader = raw.fee_payer().map(str::to_string);
        let owned = tokens
            .iter()
            .filter(|delta| trader.is_some() && delta.owner == trader)
            .cloned()
            .collect::<Vec<_>>();
        let with_native = |deltas: &[BalanceDelta]| {
            let mut deltas = deltas.to_vec();
            deltas.extend(native.clone());
            deltas
        };
        let Some((source, destination)) = legs(&owned)
            .or_else(|| legs(&with_native(&owned)))
            .or_else(|| legs(&tokens))
            .or_else(|| legs(&with_native(&tokens)))
        else {
            return Err(ParseFailure::IncompleteSwapLegs {
                found: with_native(&tokens)
                    .iter()
                    .map(|delta| delta.mint.as_str())
                    .collect::<HashSet<_>>()
                    .len(),
            });
        };

        Ok(ParsedTransactionSummary::Swap {
            trader,
            program: classification.program.unwrap_or(KnownProgram::CustomSwap),
            source_mint: source.mint.clone(),
            source_amount: -source.ui_amount(),
            destination_mint: destination.mint.clone(),
            destination_amount: destination.ui_amount(),
        })
    }
}

/// first outflow paired with the first inflow of a different mint
///
/// amounts of different mints are never compared, mints are picked in account key order and
/// only accounts of the same mint compete on amount
fn legs(deltas: &[BalanceDelta]) -> Option<(BalanceDelta, BalanceDelta)> {
    let source_mint = &deltas.iter().find(|delta| delta.raw < 0)?.mint;
    let source = deltas
        .iter()
        .filter(|delta| delta.raw < 0 && delta.mint == *source_mint)
        .min_by_key(|delta| delta.raw)?;
    let destination_mint = &deltas
        .iter()
        .find(|delta| delta.raw > 0 && delta.mint != *source_mint)?
        .mint;
    let destination = deltas
        .iter()
        .filter(|delta| delta.raw > 0 && delta.mint == *destination_mint)
        .max_by_key(|delta| delta.raw)?;
    Some((source.clone(), destination.clone()))
}

/// lamport change of the fee payer with the fee and token account rent added back
///
/// token accounts opened by the transaction are funded by the fee payer, closed ones refund it
fn native_leg(
    raw: &RawTransactionRecord,
    pre: &TokenBalanceSnapshot,
    post: &TokenBalanceSnapshot,
) -> Option<BalanceDelta> {
    if raw.pre_balances.is_empty() || raw.post_balances.is_empty() {
        return None;
    }
    let opened = post.indices().filter(|idx| pre.get(*idx).is_none()).count() as i128;
    let closed = pre.indices().filter(|idx| post.get(*idx).is_none()).count() as i128;
    let lamports_pre = raw.balances(BalanceSlot::Pre, true);
    let lamports_post = raw.balances(BalanceSlot::Post, true);
    let mut delta = resolve_deltas(&lamports_pre, &lamports_post, [0]).remove(&0)?;
    delta.raw += raw.fee as i128 + (opened - closed) * TOKEN_ACCOUNT_RENT as i128;
    delta.owner = raw.fee_payer().map(str::to_string);
    (!delta.is_zero()).then_some(delta)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        classifier::{classify, TransactionKind},
        programs::JUPITER_V6_PROGRAM_ID,
        test_utils::{self, *},
        types::{AccountKeySet, Instruction, InstructionData, NATIVE_MINT},
    };

    fn swap_record(
        pre: TokenBalanceSnapshot,
        post: TokenBalanceSnapshot,
    ) -> RawTransactionRecord {
        let mut raw = test_utils::record(
            vec![
                token_transfer_ix(TOKEN_ACCOUNT_A, TOKEN_ACCOUNT_C, 1),
                Instruction {
                    program_id: JUPITER_V6_PROGRAM_ID.to_string(),
                    accounts: vec![0, 1, 2, 4],
                    data: InstructionData::Opaque("2UzHM".to_string()),
                },
            ],
            pre,
            post,
        );
        raw.account_keys = AccountKeySet::new(
            raw.account_keys
                .iter()
                .cloned()
                .chain(std::iter::once(JUPITER_V6_PROGRAM_ID.to_string()))
                .collect(),
        );
        raw
    }

    fn parse(raw: &RawTransactionRecord) -> Result<ParsedTransactionSummary, ParseFailure> {
        let classification = classify(&raw.instructions, &raw.account_keys);
        assert_eq!(classification.kind, TransactionKind::Swap);
        SwapParser.parse(raw, &classification)
    }

    #[test]
    fn test_swap_legs() {
        // wallet swaps 10 USDC for 2,500,000 BONK, the pool account C pays out the BONK
        let raw = swap_record(
            snapshot(vec![
                (1, balance(USDC, WALLET, 50_000_000, 6)),
                (4, balance(BONK, RECIPIENT, 900_000_000_000, 5)),
            ]),
            snapshot(vec![
                (1, balance(USDC, WALLET, 40_000_000, 6)),
                (2, balance(BONK, WALLET, 250_000_000_000, 5)),
                (4, balance(BONK, RECIPIENT, 650_000_000_000, 5)),
            ]),
        );
        assert_eq!(
            parse(&raw).unwrap(),
            ParsedTransactionSummary::Swap {
                trader: Some(WALLET.to_string()),
                program: KnownProgram::JupiterV6,
                source_mint: USDC.to_string(),
                source_amount: 10.0,
                destination_mint: BONK.to_string(),
                destination_amount: 2_500_000.0,
            }
        );
    }

    #[test]
    fn test_swap_without_owner_information() {
        let mut pre_usdc = balance(USDC, WALLET, 50_000_000, 6);
        pre_usdc.owner = None;
        let mut post_usdc = pre_usdc.clone();
        post_usdc.amount = 40_000_000;
        let mut post_bonk = balance(BONK, WALLET, 250_000_000_000, 5);
        post_bonk.owner = None;
        let raw = swap_record(
            snapshot(vec![(1, pre_usdc)]),
            snapshot(vec![(1, post_usdc), (2, post_bonk)]),
        );
        let ParsedTransactionSummary::Swap {
            source_mint,
            destination_mint,
            ..
        } = parse(&raw).unwrap()
        else {
            panic!("expected swap");
        };
        assert_eq!(source_mint, USDC);
        assert_eq!(destination_mint, BONK);
    }

    #[test]
    fn test_swap_native_leg() {
        // wallet pays 0.5 sol directly, receives USDC into a new account
        let mut raw = swap_record(
            snapshot(vec![]),
            snapshot(vec![(2, balance(USDC, WALLET, 75_000_000, 6))]),
        );
        // the fee payer also funds the new USDC account
        raw.pre_balances = vec![2_000_000_000];
        raw.post_balances = vec![2_000_000_000 - 500_000_000 - 5_000 - TOKEN_ACCOUNT_RENT];
        let ParsedTransactionSummary::Swap {
            source_mint,
            source_amount,
            destination_mint,
            destination_amount,
            ..
        } = parse(&raw).unwrap()
        else {
            panic!("expected swap");
        };
        assert_eq!(source_mint, *NATIVE_MINT);
        assert_eq!(source_amount, 0.5);
        assert_eq!(destination_mint, USDC);
        assert_eq!(destination_amount, 75.0);
    }

    #[test]
    fn test_swap_single_leg() {
        let raw = swap_record(
            snapshot(vec![(1, balance(USDC, WALLET, 50_000_000, 6))]),
            snapshot(vec![(1, balance(USDC, WALLET, 40_000_000, 6))]),
        );
        assert_eq!(
            parse(&raw),
            Err(ParseFailure::IncompleteSwapLegs { found: 1 })
        );
    }

    #[test]
    fn test_swap_same_mint_is_not_distinguishable() {
        let raw = swap_record(
            snapshot(vec![
                (1, balance(USDC, WALLET, 50_000_000, 6)),
                (2, balance(USDC, WALLET, 0, 6)),
            ]),
            snapshot(vec![
                (1, balance(USDC, WALLET, 40_000_000, 6)),
                (2, balance(USDC, WALLET, 10_000_000, 6)),
            ]),
        );
        assert_eq!(
            parse(&raw),
            Err(ParseFailure::IncompleteSwapLegs { found: 1 })
        );
    }

    #[test]
    fn test_swap_prefers_token_legs_over_lamports() {
        // 1 USDC for 1000 BONK, the fee payer pays the fee and the rent of the new BONK account
        let mut raw = swap_record(
            snapshot(vec![(1, balance(USDC, WALLET, 5_000_000, 6))]),
            snapshot(vec![
                (1, balance(USDC, WALLET, 4_000_000, 6)),
                (2, balance(BONK, WALLET, 100_000_000, 5)),
            ]),
        );
        raw.pre_balances = vec![1_000_000_000];
        raw.post_balances = vec![1_000_000_000 - 5_000 - TOKEN_ACCOUNT_RENT];
        let ParsedTransactionSummary::Swap {
            source_mint,
            source_amount,
            destination_mint,
            destination_amount,
            ..
        } = parse(&raw).unwrap()
        else {
            panic!("expected swap");
        };
        assert_eq!(source_mint, USDC);
        assert_eq!(source_amount, 1.0);
        assert_eq!(destination_mint, BONK);
        assert_eq!(destination_amount, 1000.0);
    }

    #[test]
    fn test_swap_rent_is_not_a_leg() {
        // the opened BONK account never received anything
        let mut raw = swap_record(
            snapshot(vec![(1, balance(USDC, WALLET, 5_000_000, 6))]),
            snapshot(vec![
                (1, balance(USDC, WALLET, 4_000_000, 6)),
                (2, balance(BONK, WALLET, 0, 5)),
            ]),
        );
        raw.pre_balances = vec![1_000_000_000];
        raw.post_balances = vec![1_000_000_000 - 5_000 - TOKEN_ACCOUNT_RENT];
        assert_eq!(
            parse(&raw),
            Err(ParseFailure::IncompleteSwapLegs { found: 1 })
        );
    }

    #[test]
    fn test_swap_failed_on_chain() {
        let mut raw = swap_record(
            snapshot(vec![(1, balance(USDC, WALLET, 50_000_000, 6))]),
            snapshot(vec![(1, balance(USDC, WALLET, 50_000_000, 6))]),
        );
        raw.err = Some("InstructionError(1, Custom(6001))".to_string());
        assert_eq!(
            parse(&raw),
            Err(ParseFailure::FailedOnChain(
                "InstructionError(1, Custom(6001))".to_string()
            ))
        );
    }
}
