use {
    crate::{
        programs::KnownProgram,
        types::{AccountKeySet, Instruction, InstructionData},
    },
    anyhow::{anyhow, Context},
    lazy_static::lazy_static,
    serde::{Deserialize, Serialize},
    solana_account_decoder::parse_token::UiTokenAmount,
    system::SystemInstructions,
    token::TokenInstructions,
};

#[derive(serde::Serialize, serde::Deserialize)]
pub struct PartiallyDecodedInstruction {
    pub info: serde_json::Value,
    #[serde(alias = "type")]
    pub type_: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DecodedInstruction {
    SystemInstruction(SystemInstructions),
    TokenInstruction(TokenInstructions),
    Memo(String),
}

/// # Returns
///
/// Ok(None) if decoding succeeded, but this is an unsupported / unrecognized instruction
/// Ok(Some) if decoding succeeded, and the instruction is supported
/// Err      if an error was encountered
pub fn decode_instruction(
    program: KnownProgram,
    ix: &Instruction,
    keys: &AccountKeySet,
) -> anyhow::Result<Option<DecodedInstruction>> {
    match program {
        KnownProgram::System => Ok(system::decode_system_instruction(ix, keys)
            .with_context(|| "failed to decode system instruction")?
            .map(DecodedInstruction::SystemInstruction)),
        KnownProgram::SplToken | KnownProgram::Token2022 => {
            Ok(token::decode_token_instruction(ix, keys)
                .with_context(|| "failed to decode token instruction")?
                .map(DecodedInstruction::TokenInstruction))
        }
        KnownProgram::Memo => Ok(Some(DecodedInstruction::Memo(
            memo::decode_memo(ix).with_context(|| "failed to decode memo")?,
        ))),
        _ => Ok(None),
    }
}

/// splits node-parsed instruction data into its name and info object
fn partially_decode(
    parsed: &serde_json::Value,
) -> anyhow::Result<PartiallyDecodedInstruction> {
    match PartiallyDecodedInstruction::deserialize(parsed) {
        Ok(partially_decoded) => Ok(partially_decoded),
        Err(err) => Err(anyhow!("failed to partially decode instruction {err:#?}")),
    }
}

fn read_u64(data: &[u8], offset: usize) -> anyhow::Result<u64> {
    let bytes = data
        .get(offset..offset + 8)
        .with_context(|| format!("instruction data too short ({} bytes)", data.len()))?;
    let mut buf = [0_u8; 8];
    buf.copy_from_slice(bytes);
    Ok(u64::from_le_bytes(buf))
}

/// address of the account at `position`, erroring when the instruction has too few accounts
fn account_at(ix: &Instruction, keys: &AccountKeySet, position: usize) -> anyhow::Result<String> {
    ix.account(keys, position)
        .map(str::to_string)
        .with_context(|| format!("instruction is missing account #{position}"))
}

pub mod system {

    use super::*;

    lazy_static! {
        static ref TRANSFER: String = "transfer".to_string();
        static ref TRANSFER_WITH_SEED: String = "transferWithSeed".to_string();
    }

    const TRANSFER_TAG: u32 = 2;
    const TRANSFER_WITH_SEED_TAG: u32 = 11;

    #[derive(Clone, Debug, PartialEq)]
    pub enum SystemInstructions {
        Transfer(Transfer),
        TransferWithSeed(Transfer),
    }

    impl SystemInstructions {
        pub fn transfer(&self) -> &Transfer {
            match self {
                Self::Transfer(tx) | Self::TransferWithSeed(tx) => tx,
            }
        }
    }

    /// also used for transferWithSeed, whose seed fields we don't need
    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct Transfer {
        pub source: String,
        pub destination: String,
        pub lamports: u64,
    }

    /// # Returns
    ///
    /// Err if decoding failed
    /// Ok(None) if this isn't a system instruction we are interested in decoding
    /// Ok(Some) if this is a system instruction we are interested in decoding
    pub fn decode_system_instruction(
        ix: &Instruction,
        keys: &AccountKeySet,
    ) -> anyhow::Result<Option<SystemInstructions>> {
        match &ix.data {
            InstructionData::Parsed { parsed, .. } => {
                let partially_decoded = partially_decode(parsed)?;
                let ix_type = &partially_decoded.type_;
                if TRANSFER.eq(ix_type) {
                    Ok(Some(SystemInstructions::Transfer(serde_json::from_value(
                        partially_decoded.info,
                    )?)))
                } else if TRANSFER_WITH_SEED.eq(ix_type) {
                    Ok(Some(SystemInstructions::TransferWithSeed(
                        serde_json::from_value(partially_decoded.info)?,
                    )))
                } else {
                    Ok(None)
                }
            }
            InstructionData::Opaque(_) => {
                let data = ix.opaque_bytes()?.unwrap_or_default();
                let Some(tag) = data.get(0..4) else {
                    return Ok(None);
                };
                match u32::from_le_bytes([tag[0], tag[1], tag[2], tag[3]]) {
                    TRANSFER_TAG => Ok(Some(SystemInstructions::Transfer(Transfer {
                        source: account_at(ix, keys, 0)?,
                        destination: account_at(ix, keys, 1)?,
                        lamports: read_u64(&data, 4)?,
                    }))),
                    // accounts are [source, base, destination]
                    TRANSFER_WITH_SEED_TAG => {
                        Ok(Some(SystemInstructions::TransferWithSeed(Transfer {
                            source: account_at(ix, keys, 0)?,
                            destination: account_at(ix, keys, 2)?,
                            lamports: read_u64(&data, 4)?,
                        })))
                    }
                    _ => Ok(None),
                }
            }
        }
    }
}

// can be used for both spl-token and token2022
pub mod token {

    use super::*;

    lazy_static! {
        static ref TRANSFER: String = "transfer".to_string();
        static ref TRANSFER_CHECKED: String = "transferChecked".to_string();
        static ref TRANSFER_CHECKED_WITH_FEE: String = "transferCheckedWithFee".to_string();
        static ref CLOSE_ACCOUNT: String = "closeAccount".to_string();
    }

    const TRANSFER_TAG: u8 = 3;
    const CLOSE_ACCOUNT_TAG: u8 = 9;
    const TRANSFER_CHECKED_TAG: u8 = 12;
    /// token2022 transfer fee extension, followed by a sub instruction tag
    const TRANSFER_FEE_EXTENSION_TAG: u8 = 26;
    const TRANSFER_CHECKED_WITH_FEE_TAG: u8 = 1;

    #[derive(Clone, Debug, PartialEq)]
    pub enum TokenInstructions {
        Transfer(Transfer),
        TransferChecked(TransferChecked),
        TransferCheckedWithFee(TransferCheckedWithFee),
        CloseAccount(CloseAccount),
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct Transfer {
        pub source: String,
        pub destination: String,
        pub amount: String,
        #[serde(default, alias = "multisigAuthority")]
        pub authority: Option<String>,
    }

    impl Transfer {
        pub fn amount(&self) -> Option<u64> {
            self.amount.parse().ok()
        }
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct TransferChecked {
        pub source: String,
        pub mint: String,
        pub destination: String,
        #[serde(default, alias = "multisigAuthority")]
        pub authority: Option<String>,
        #[serde(alias = "tokenAmount")]
        pub token_amount: UiTokenAmount,
    }

    /// token2022 transfer of a mint with a transfer fee, the fee is withheld in the destination
    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct TransferCheckedWithFee {
        pub source: String,
        pub mint: String,
        pub destination: String,
        #[serde(default, alias = "multisigAuthority")]
        pub authority: Option<String>,
        #[serde(alias = "tokenAmount")]
        pub token_amount: UiTokenAmount,
        #[serde(alias = "feeAmount")]
        pub fee_amount: UiTokenAmount,
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct CloseAccount {
        pub account: String,
        pub destination: String,
        #[serde(alias = "multisigOwner")]
        pub owner: String,
    }

    /// # Returns
    ///
    /// Err if decoding failed
    /// Ok(None) if this isn't a token instruction we are interested in decoding
    /// Ok(Some) if this is a token instruction we are interested in decoding
    pub fn decode_token_instruction(
        ix: &Instruction,
        keys: &AccountKeySet,
    ) -> anyhow::Result<Option<TokenInstructions>> {
        match &ix.data {
            InstructionData::Parsed { parsed, .. } => {
                let partially_decoded = partially_decode(parsed)?;
                let ix_type = &partially_decoded.type_;
                if TRANSFER.eq(ix_type) {
                    Ok(Some(TokenInstructions::Transfer(serde_json::from_value(
                        partially_decoded.info,
                    )?)))
                } else if TRANSFER_CHECKED.eq(ix_type) {
                    Ok(Some(TokenInstructions::TransferChecked(
                        serde_json::from_value(partially_decoded.info)?,
                    )))
                } else if TRANSFER_CHECKED_WITH_FEE.eq(ix_type) {
                    Ok(Some(TokenInstructions::TransferCheckedWithFee(
                        serde_json::from_value(partially_decoded.info)?,
                    )))
                } else if CLOSE_ACCOUNT.eq(ix_type) {
                    Ok(Some(TokenInstructions::CloseAccount(
                        serde_json::from_value(partially_decoded.info)?,
                    )))
                } else {
                    Ok(None)
                }
            }
            InstructionData::Opaque(_) => {
                let data = ix.opaque_bytes()?.unwrap_or_default();
                match data.first().copied() {
                    Some(TRANSFER_TAG) => Ok(Some(TokenInstructions::Transfer(Transfer {
                        source: account_at(ix, keys, 0)?,
                        destination: account_at(ix, keys, 1)?,
                        amount: read_u64(&data, 1)?.to_string(),
                        authority: ix.account(keys, 2).map(str::to_string),
                    }))),
                    Some(TRANSFER_CHECKED_TAG) => {
                        let amount = read_u64(&data, 1)?;
                        let decimals = *data
                            .get(9)
                            .with_context(|| "transferChecked is missing decimals")?;
                        Ok(Some(TokenInstructions::TransferChecked(TransferChecked {
                            source: account_at(ix, keys, 0)?,
                            mint: account_at(ix, keys, 1)?,
                            destination: account_at(ix, keys, 2)?,
                            authority: ix.account(keys, 3).map(str::to_string),
                            token_amount: UiTokenAmount {
                                ui_amount: None,
                                decimals,
                                amount: amount.to_string(),
                                ui_amount_string: String::new(),
                            },
                        })))
                    }
                    Some(TRANSFER_FEE_EXTENSION_TAG)
                        if data.get(1) == Some(&TRANSFER_CHECKED_WITH_FEE_TAG) =>
                    {
                        let decimals = *data
                            .get(10)
                            .with_context(|| "transferCheckedWithFee is missing decimals")?;
                        let ui_amount = |amount: u64| UiTokenAmount {
                            ui_amount: None,
                            decimals,
                            amount: amount.to_string(),
                            ui_amount_string: String::new(),
                        };
                        Ok(Some(TokenInstructions::TransferCheckedWithFee(
                            TransferCheckedWithFee {
                                source: account_at(ix, keys, 0)?,
                                mint: account_at(ix, keys, 1)?,
                                destination: account_at(ix, keys, 2)?,
                                authority: ix.account(keys, 3).map(str::to_string),
                                token_amount: ui_amount(read_u64(&data, 2)?),
                                fee_amount: ui_amount(read_u64(&data, 11)?),
                            },
                        )))
                    }
                    Some(CLOSE_ACCOUNT_TAG) => {
                        Ok(Some(TokenInstructions::CloseAccount(CloseAccount {
                            account: account_at(ix, keys, 0)?,
                            destination: account_at(ix, keys, 1)?,
                            owner: account_at(ix, keys, 2)?,
                        })))
                    }
                    _ => Ok(None),
                }
            }
        }
    }
}

pub mod memo {
    use super::*;

    /// node-parsed memos are plain strings, raw memos are utf8 bytes
    pub fn decode_memo(ix: &Instruction) -> anyhow::Result<String> {
        match &ix.data {
            InstructionData::Parsed { parsed, .. } => parsed
                .as_str()
                .map(str::to_string)
                .with_context(|| "parsed memo is not a string"),
            InstructionData::Opaque(_) => {
                let data = ix.opaque_bytes()?.unwrap_or_default();
                String::from_utf8(data).with_context(|| "memo is not valid utf8")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn keys() -> AccountKeySet {
        AccountKeySet::new(vec![
            "BbaLXTZg7xEkff2TdShu6FHfcDVuywdmqKu77f13hfRt".to_string(),
            "7GWrFUVjTv7fZ9s1L5asqCfrMTWqhjA5otdgW7Wkd1n9".to_string(),
            "5ruvMsmvCk6Uahrtc475LjBBKRkez1sw7ctTmM6MoNWD".to_string(),
            "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
        ])
    }

    fn parsed(program: &str, program_id: &str, parsed: serde_json::Value) -> Instruction {
        Instruction {
            program_id: program_id.to_string(),
            accounts: vec![],
            data: InstructionData::Parsed {
                program: program.to_string(),
                parsed,
            },
        }
    }

    fn opaque(program_id: &str, accounts: Vec<u8>, data: &[u8]) -> Instruction {
        Instruction {
            program_id: program_id.to_string(),
            accounts,
            data: InstructionData::Opaque(bs58::encode(data).into_string()),
        }
    }

    #[test]
    fn test_decode_token_transfer() {
        let ix = parsed(
            "spl-token",
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
            serde_json::json!({
                "info": {
                    "amount": "8141292030",
                    "source": "7GWrFUVjTv7fZ9s1L5asqCfrMTWqhjA5otdgW7Wkd1n9",
                    "authority": "BbaLXTZg7xEkff2TdShu6FHfcDVuywdmqKu77f13hfRt",
                    "destination": "5ruvMsmvCk6Uahrtc475LjBBKRkez1sw7ctTmM6MoNWD"
                },
                "type": "transfer"
            }),
        );
        let decoded_ix = decode_instruction(KnownProgram::SplToken, &ix, &keys())
            .unwrap()
            .unwrap();
        let DecodedInstruction::TokenInstruction(TokenInstructions::Transfer(transfer)) =
            decoded_ix
        else {
            panic!("unexpected instruction {decoded_ix:?}");
        };
        assert_eq!(transfer.amount(), Some(8141292030));
    }

    #[test]
    fn test_decode_token_transfer_checked() {
        let ix = parsed(
            "spl-token",
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
            serde_json::json!({
                "info": {
                    "mint": "So11111111111111111111111111111111111111112",
                    "source": "EmwPSZuqkZRUoHdWChu6omcNmv8BoUavkv2qLyUhzYi4",
                    "authority": "8FbVeDtxTUKLJB9rqxDFM9eKh3aYfmEn2EN1Q2hSKy4S",
                    "destination": "DSJjnhv1AcTbQ9GxKvsMe4pAEvJWEkQmKyXwBKe2nX5B",
                    "tokenAmount": {
                        "amount": "4140632274",
                        "decimals": 9,
                        "uiAmount": 4.140632274,
                        "uiAmountString": "4.140632274"
                    }
                },
                "type": "transferChecked"
            }),
        );
        let decoded_ix = decode_instruction(KnownProgram::Token2022, &ix, &keys())
            .unwrap()
            .unwrap();
        assert!(matches!(
            decoded_ix,
            DecodedInstruction::TokenInstruction(TokenInstructions::TransferChecked(..))
        ));
    }

    #[test]
    fn test_decode_multisig_close_account() {
        let ix = parsed(
            "spl-token",
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
            serde_json::json!({
                "info": {
                    "account": "7GWrFUVjTv7fZ9s1L5asqCfrMTWqhjA5otdgW7Wkd1n9",
                    "destination": "BbaLXTZg7xEkff2TdShu6FHfcDVuywdmqKu77f13hfRt",
                    "multisigOwner": "8FbVeDtxTUKLJB9rqxDFM9eKh3aYfmEn2EN1Q2hSKy4S",
                    "signers": ["BbaLXTZg7xEkff2TdShu6FHfcDVuywdmqKu77f13hfRt"]
                },
                "type": "closeAccount"
            }),
        );
        let decoded_ix = decode_instruction(KnownProgram::SplToken, &ix, &keys())
            .unwrap()
            .unwrap();
        let DecodedInstruction::TokenInstruction(TokenInstructions::CloseAccount(close)) =
            decoded_ix
        else {
            panic!("unexpected instruction {decoded_ix:?}");
        };
        assert_eq!(close.owner, "8FbVeDtxTUKLJB9rqxDFM9eKh3aYfmEn2EN1Q2hSKy4S");
    }

    #[test]
    fn test_decode_opaque_token_instructions() {
        let mut data = vec![3_u8];
        data.extend_from_slice(&1_000_000_u64.to_le_bytes());
        let ix = opaque("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA", vec![1, 2, 0], &data);
        let decoded_ix = decode_instruction(KnownProgram::SplToken, &ix, &keys())
            .unwrap()
            .unwrap();
        assert_eq!(
            decoded_ix,
            DecodedInstruction::TokenInstruction(TokenInstructions::Transfer(token::Transfer {
                source: "7GWrFUVjTv7fZ9s1L5asqCfrMTWqhjA5otdgW7Wkd1n9".to_string(),
                destination: "5ruvMsmvCk6Uahrtc475LjBBKRkez1sw7ctTmM6MoNWD".to_string(),
                amount: "1000000".to_string(),
                authority: Some("BbaLXTZg7xEkff2TdShu6FHfcDVuywdmqKu77f13hfRt".to_string()),
            }))
        );

        let mut data = vec![12_u8];
        data.extend_from_slice(&42_u64.to_le_bytes());
        data.push(6);
        let ix = opaque("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA", vec![1, 3, 2, 0], &data);
        let Some(DecodedInstruction::TokenInstruction(TokenInstructions::TransferChecked(tx))) =
            decode_instruction(KnownProgram::SplToken, &ix, &keys()).unwrap()
        else {
            panic!("expected transferChecked");
        };
        assert_eq!(tx.mint, "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");
        assert_eq!(tx.token_amount.decimals, 6);
        assert_eq!(tx.token_amount.amount, "42");

        let ix = opaque("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA", vec![1, 0, 0], &[9]);
        assert!(matches!(
            decode_instruction(KnownProgram::SplToken, &ix, &keys()).unwrap(),
            Some(DecodedInstruction::TokenInstruction(TokenInstructions::CloseAccount(..)))
        ));

        // approve is not decoded
        let ix = opaque("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA", vec![1, 2, 0], &[4, 1, 0, 0, 0, 0, 0, 0, 0]);
        assert!(decode_instruction(KnownProgram::SplToken, &ix, &keys())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_decode_transfer_checked_with_fee() {
        let ix = parsed(
            "spl-token",
            "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb",
            serde_json::json!({
                "info": {
                    "source": "7GWrFUVjTv7fZ9s1L5asqCfrMTWqhjA5otdgW7Wkd1n9",
                    "mint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
                    "destination": "5ruvMsmvCk6Uahrtc475LjBBKRkez1sw7ctTmM6MoNWD",
                    "authority": "BbaLXTZg7xEkff2TdShu6FHfcDVuywdmqKu77f13hfRt",
                    "tokenAmount": {
                        "amount": "1000000",
                        "decimals": 6,
                        "uiAmount": 1.0,
                        "uiAmountString": "1"
                    },
                    "feeAmount": {
                        "amount": "10000",
                        "decimals": 6,
                        "uiAmount": 0.01,
                        "uiAmountString": "0.01"
                    }
                },
                "type": "transferCheckedWithFee"
            }),
        );
        let Some(DecodedInstruction::TokenInstruction(TokenInstructions::TransferCheckedWithFee(
            parsed_tx,
        ))) = decode_instruction(KnownProgram::Token2022, &ix, &keys()).unwrap()
        else {
            panic!("expected transferCheckedWithFee");
        };
        assert_eq!(parsed_tx.fee_amount.amount, "10000");

        let mut data = vec![26_u8, 1];
        data.extend_from_slice(&1_000_000_u64.to_le_bytes());
        data.push(6);
        data.extend_from_slice(&10_000_u64.to_le_bytes());
        let ix = opaque("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb", vec![1, 3, 2, 0], &data);
        let Some(DecodedInstruction::TokenInstruction(TokenInstructions::TransferCheckedWithFee(
            opaque_tx,
        ))) = decode_instruction(KnownProgram::Token2022, &ix, &keys()).unwrap()
        else {
            panic!("expected transferCheckedWithFee");
        };
        assert_eq!(opaque_tx.source, parsed_tx.source);
        assert_eq!(opaque_tx.mint, parsed_tx.mint);
        assert_eq!(opaque_tx.destination, parsed_tx.destination);
        assert_eq!(opaque_tx.token_amount.amount, "1000000");
        assert_eq!(opaque_tx.token_amount.decimals, 6);
        assert_eq!(opaque_tx.fee_amount.amount, "10000");

        // other transfer fee extension instructions are not decoded
        let ix = opaque("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb", vec![1, 3], &[26, 0]);
        assert!(decode_instruction(KnownProgram::Token2022, &ix, &keys())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_decode_system_transfer() {
        let ix = parsed(
            "system",
            "11111111111111111111111111111111",
            serde_json::json!({
                "info": {
                    "source": "MVDv8FHLovYWapDcz2JemwDoWhGPWoVQmygeNnLorXK",
                    "lamports": 1,
                    "destination": "4ECMsSTxTZ4UqrLBJpMqWG6G4XdX1XXfXdjHdhfva8gJ"
                },
                "type": "transfer"
            }),
        );
        let decoded_ix = decode_instruction(KnownProgram::System, &ix, &keys())
            .unwrap()
            .unwrap();
        assert!(matches!(
            decoded_ix,
            DecodedInstruction::SystemInstruction(SystemInstructions::Transfer(..))
        ));

        let mut data = 2_u32.to_le_bytes().to_vec();
        data.extend_from_slice(&5_000_u64.to_le_bytes());
        let ix = opaque("11111111111111111111111111111111", vec![0, 1], &data);
        let Some(DecodedInstruction::SystemInstruction(ix)) =
            decode_instruction(KnownProgram::System, &ix, &keys()).unwrap()
        else {
            panic!("expected system transfer");
        };
        assert_eq!(ix.transfer().lamports, 5_000);
    }

    #[test]
    fn test_decode_system_create_account_ignored() {
        let ix = parsed(
            "system",
            "11111111111111111111111111111111",
            serde_json::json!({
                "info": {
                    "owner": "3tZPEagumHvtgBhivFJCmhV9AyhBHGW9VgdsK52i4gwP",
                    "space": 32,
                    "source": "BgU4TACDKnBYJzAGTSPQgunhp5BYD7vx9ZW95NEzWTbk",
                    "lamports": 1113600,
                    "newAccount": "2Rf7adcTkVwKk3AJLRmnkMqP2VN6JxiKrdYDPHctVbF2"
                },
                "type": "createAccount"
            }),
        );
        assert!(decode_instruction(KnownProgram::System, &ix, &keys())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_decode_memo() {
        let ix = parsed(
            "spl-memo",
            "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr",
            serde_json::json!("thanks for lunch"),
        );
        assert_eq!(
            decode_instruction(KnownProgram::Memo, &ix, &keys()).unwrap(),
            Some(DecodedInstruction::Memo("thanks for lunch".to_string()))
        );
        let ix = opaque("MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr", vec![], b"gm");
        assert_eq!(
            decode_instruction(KnownProgram::Memo, &ix, &keys()).unwrap(),
            Some(DecodedInstruction::Memo("gm".to_string()))
        );
    }

    #[test]
    fn test_decode_swap_program_is_unrecognized() {
        let ix = opaque("JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4", vec![0, 1], &[1, 2, 3]);
        assert!(decode_instruction(KnownProgram::JupiterV6, &ix, &keys())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_decode_invalid_json() {
        let ix = parsed(
            "spl-token",
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
            serde_json::json!({"a": "b"}),
        );
        assert!(decode_instruction(KnownProgram::SplToken, &ix, &keys()).is_err());
    }
}
