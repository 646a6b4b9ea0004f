//! fixtures shared by the parser and pipeline tests
use crate::{
    programs::{MEMO_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID},
    types::{
        AccountKeySet, Instruction, InstructionData, RawTransactionRecord, TokenBalance,
        TokenBalanceSnapshot,
    },
};

pub const WALLET: &str = "BbaLXTZg7xEkff2TdShu6FHfcDVuywdmqKu77f13hfRt";
pub const RECIPIENT: &str = "4ECMsSTxTZ4UqrLBJpMqWG6G4XdX1XXfXdjHdhfva8gJ";
pub const TOKEN_ACCOUNT_A: &str = "7GWrFUVjTv7fZ9s1L5asqCfrMTWqhjA5otdgW7Wkd1n9";
pub const TOKEN_ACCOUNT_B: &str = "5ruvMsmvCk6Uahrtc475LjBBKRkez1sw7ctTmM6MoNWD";
pub const TOKEN_ACCOUNT_C: &str = "DSJjnhv1AcTbQ9GxKvsMe4pAEvJWEkQmKyXwBKe2nX5B";
pub const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const BONK: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";

pub fn keys() -> AccountKeySet {
    AccountKeySet::new(
        [
            WALLET,
            TOKEN_ACCOUNT_A,
            TOKEN_ACCOUNT_B,
            RECIPIENT,
            TOKEN_ACCOUNT_C,
            TOKEN_PROGRAM_ID,
            SYSTEM_PROGRAM_ID,
        ]
        .into_iter()
        .map(str::to_string)
        .collect(),
    )
}

pub fn balance(mint: &str, owner: &str, amount: u64, decimals: u8) -> TokenBalance {
    TokenBalance {
        mint: mint.to_string(),
        owner: Some(owner.to_string()),
        amount,
        decimals,
    }
}

pub fn snapshot(balances: Vec<(u8, TokenBalance)>) -> TokenBalanceSnapshot {
    TokenBalanceSnapshot::new(balances.into_iter().collect())
}

pub fn parsed_ix(program_id: &str, program: &str, parsed: serde_json::Value) -> Instruction {
    let keys = keys();
    let mut accounts = vec![];
    if let Some(info) = parsed.get("info").and_then(|info| info.as_object()) {
        for value in info.values() {
            if let Some(idx) = value.as_str().and_then(|addr| keys.index_of(addr)) {
                accounts.push(idx);
            }
        }
    }
    Instruction {
        program_id: program_id.to_string(),
        accounts,
        data: InstructionData::Parsed {
            program: program.to_string(),
            parsed,
        },
    }
}

pub fn token_transfer_ix(source: &str, destination: &str, amount: u64) -> Instruction {
    parsed_ix(
        TOKEN_PROGRAM_ID,
        "spl-token",
        serde_json::json!({
            "type": "transfer",
            "info": {
                "source": source,
                "destination": destination,
                "authority": WALLET,
                "amount": amount.to_string(),
            }
        }),
    )
}

pub fn system_transfer_ix(source: &str, destination: &str, lamports: u64) -> Instruction {
    parsed_ix(
        SYSTEM_PROGRAM_ID,
        "system",
        serde_json::json!({
            "type": "transfer",
            "info": {
                "source": source,
                "destination": destination,
                "lamports": lamports,
            }
        }),
    )
}

pub fn memo_ix(memo: &str) -> Instruction {
    parsed_ix(MEMO_PROGRAM_ID, "spl-memo", serde_json::json!(memo))
}

pub fn record(
    instructions: Vec<Instruction>,
    pre_token_balances: TokenBalanceSnapshot,
    post_token_balances: TokenBalanceSnapshot,
) -> RawTransactionRecord {
    RawTransactionRecord {
        signature: "5h6xBEauJ3PK6SWCZ1PGjBvj8vDdWG3KpwATGy1ARAXFSDwt8GFXM7W5Ncn16wmqokgpiKRLuS83KUxyZyv2sUYv"
            .to_string(),
        slot: 301234567,
        block_time: Some(1726000000),
        fee: 5000,
        err: None,
        account_keys: keys(),
        instructions,
        pre_token_balances: Some(pre_token_balances),
        post_token_balances: Some(post_token_balances),
        pre_balances: vec![],
        post_balances: vec![],
        log_messages: vec![],
    }
}

/// token transfer of 1 USDC from account A to account B
pub fn usdc_transfer_record() -> RawTransactionRecord {
    record(
        vec![token_transfer_ix(TOKEN_ACCOUNT_A, TOKEN_ACCOUNT_B, 1_000_000)],
        snapshot(vec![
            (1, balance(USDC, WALLET, 5_000_000, 6)),
            (2, balance(USDC, RECIPIENT, 2_000_000, 6)),
        ]),
        snapshot(vec![
            (1, balance(USDC, WALLET, 4_000_000, 6)),
            (2, balance(USDC, RECIPIENT, 3_000_000, 6)),
        ]),
    )
}
