//! serde friendly representation of a confirmed transaction, decoupled from the rpc response types
use {
    anyhow::{anyhow, Context, Result},
    chrono::{DateTime, Utc},
    lazy_static::lazy_static,
    serde::{Deserialize, Serialize},
    solana_transaction_status::{
        option_serializer::OptionSerializer, EncodedConfirmedTransactionWithStatusMeta,
        EncodedTransaction, UiCompiledInstruction, UiInstruction, UiMessage,
        UiParsedInstruction, UiTransactionTokenBalance,
    },
    std::{borrow::Cow, collections::BTreeMap},
};

lazy_static! {
    /// identifies native sol balances, as opposed to wsol token balances
    pub static ref NATIVE_MINT: String = "So11111111111111111111111111111111111111111".to_string();
}

pub const NATIVE_DECIMALS: u8 = 9;

/// ordered account keys of a transaction, instructions and balances refer to keys by position
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountKeySet(Vec<String>);

impl AccountKeySet {
    pub fn new(keys: Vec<String>) -> Self {
        Self(keys)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
    /// # Panics
    ///
    /// if `index` is outside of the key set, which means the record was built incorrectly
    pub fn address(&self, index: u8) -> &str {
        self.check(index);
        &self.0[index as usize]
    }
    pub fn index_of(&self, address: &str) -> Option<u8> {
        self.0
            .iter()
            .position(|key| key == address)
            .and_then(|idx| u8::try_from(idx).ok())
    }
    pub fn check(&self, index: u8) {
        assert!(
            (index as usize) < self.0.len(),
            "account index {index} out of bounds for {} account keys",
            self.0.len()
        );
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InstructionData {
    /// instruction decoded by the rpc node (jsonParsed encoding)
    Parsed {
        program: String,
        parsed: serde_json::Value,
    },
    /// base58 encoded instruction data
    Opaque(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub program_id: String,
    /// indices into the transaction's account keys
    pub accounts: Vec<u8>,
    pub data: InstructionData,
}

impl Instruction {
    pub fn from_ui(ix: UiInstruction, keys: &AccountKeySet) -> Result<Self> {
        match ix {
            UiInstruction::Compiled(ix) => Ok(Self::from_compiled(ix, keys)),
            UiInstruction::Parsed(UiParsedInstruction::Parsed(ix)) => Ok(Self {
                accounts: referenced_accounts(&ix.parsed, keys),
                program_id: ix.program_id,
                data: InstructionData::Parsed {
                    program: ix.program,
                    parsed: ix.parsed,
                },
            }),
            UiInstruction::Parsed(UiParsedInstruction::PartiallyDecoded(ix)) => {
                let accounts = ix
                    .accounts
                    .iter()
                    .map(|account| {
                        keys.index_of(account)
                            .with_context(|| format!("account {account} missing from account keys"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self {
                    program_id: ix.program_id,
                    accounts,
                    data: InstructionData::Opaque(ix.data),
                })
            }
        }
    }
    pub fn from_compiled(ix: UiCompiledInstruction, keys: &AccountKeySet) -> Self {
        ix.accounts.iter().for_each(|idx| keys.check(*idx));
        Self {
            program_id: keys.address(ix.program_id_index).to_string(),
            accounts: ix.accounts,
            data: InstructionData::Opaque(ix.data),
        }
    }
    /// the instruction name for node-parsed instructions, ie "transferChecked"
    pub fn parsed_type(&self) -> Option<&str> {
        match &self.data {
            InstructionData::Parsed { parsed, .. } => parsed.get("type")?.as_str(),
            InstructionData::Opaque(_) => None,
        }
    }
    pub fn opaque_bytes(&self) -> Result<Option<Vec<u8>>> {
        match &self.data {
            InstructionData::Opaque(data) => Ok(Some(
                bs58::decode(data)
                    .into_vec()
                    .with_context(|| "failed to decode instruction data")?,
            )),
            InstructionData::Parsed { .. } => Ok(None),
        }
    }
    /// address of the n'th account passed to the instruction
    pub fn account<'a>(&self, keys: &'a AccountKeySet, position: usize) -> Option<&'a str> {
        self.accounts.get(position).map(|idx| keys.address(*idx))
    }
}

/// node-parsed instructions reference accounts by address inside their `info` object
fn referenced_accounts(parsed: &serde_json::Value, keys: &AccountKeySet) -> Vec<u8> {
    let mut accounts = vec![];
    if let Some(info) = parsed.get("info").and_then(|info| info.as_object()) {
        for value in info.values() {
            let Some(idx) = value.as_str().and_then(|addr| keys.index_of(addr)) else {
                continue;
            };
            if !accounts.contains(&idx) {
                accounts.push(idx);
            }
        }
    }
    accounts
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub mint: String,
    /// older transactions don't record the owner
    pub owner: Option<String>,
    /// amount in base units
    pub amount: u64,
    pub decimals: u8,
}

/// token balances keyed by account index
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenBalanceSnapshot(BTreeMap<u8, TokenBalance>);

impl TokenBalanceSnapshot {
    pub fn new(balances: BTreeMap<u8, TokenBalance>) -> Self {
        Self(balances)
    }
    pub fn get(&self, index: u8) -> Option<&TokenBalance> {
        self.0.get(&index)
    }
    pub fn insert(&mut self, index: u8, balance: TokenBalance) -> Option<TokenBalance> {
        self.0.insert(index, balance)
    }
    pub fn indices(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.keys().copied()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// treats lamport balances as a token with the native mint
    pub fn from_native(lamports: &[u64]) -> Self {
        Self(
            lamports
                .iter()
                .enumerate()
                .filter_map(|(idx, amount)| {
                    Some((
                        u8::try_from(idx).ok()?,
                        TokenBalance {
                            mint: NATIVE_MINT.clone(),
                            owner: None,
                            amount: *amount,
                            decimals: NATIVE_DECIMALS,
                        },
                    ))
                })
                .collect(),
        )
    }
    pub fn from_ui(balances: &[UiTransactionTokenBalance]) -> Result<Self> {
        let mut snapshot = Self::default();
        for balance in balances {
            snapshot.insert(
                balance.account_index,
                TokenBalance {
                    mint: balance.mint.clone(),
                    owner: Into::<Option<String>>::into(balance.owner.clone())
                        .filter(|owner| !owner.is_empty()),
                    amount: balance.ui_token_amount.amount.parse().with_context(|| {
                        format!("invalid token amount {}", balance.ui_token_amount.amount)
                    })?,
                    decimals: balance.ui_token_amount.decimals,
                },
            );
        }
        Ok(snapshot)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceSlot {
    Pre,
    Post,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransactionRecord {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
    /// lamports paid by the fee payer
    pub fee: u64,
    /// set when the transaction failed on-chain
    pub err: Option<String>,
    pub account_keys: AccountKeySet,
    pub instructions: Vec<Instruction>,
    pub pre_token_balances: Option<TokenBalanceSnapshot>,
    pub post_token_balances: Option<TokenBalanceSnapshot>,
    #[serde(default)]
    pub pre_balances: Vec<u64>,
    #[serde(default)]
    pub post_balances: Vec<u64>,
    #[serde(default)]
    pub log_messages: Vec<String>,
}

impl RawTransactionRecord {
    /// the first account key always pays the fee
    pub fn fee_payer(&self) -> Option<&str> {
        (!self.account_keys.is_empty()).then(|| self.account_keys.address(0))
    }
    pub fn block_time_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.block_time?, 0)
    }
    pub fn token_balances(&self, slot: BalanceSlot) -> Option<&TokenBalanceSnapshot> {
        match slot {
            BalanceSlot::Pre => self.pre_token_balances.as_ref(),
            BalanceSlot::Post => self.post_token_balances.as_ref(),
        }
    }
    /// returns either the token balances, or lamport balances when `native` is set
    pub fn balances(&self, slot: BalanceSlot, native: bool) -> Cow<'_, TokenBalanceSnapshot> {
        if native {
            let lamports = match slot {
                BalanceSlot::Pre => &self.pre_balances,
                BalanceSlot::Post => &self.post_balances,
            };
            return Cow::Owned(TokenBalanceSnapshot::from_native(lamports));
        }
        match self.token_balances(slot) {
            Some(snapshot) => Cow::Borrowed(snapshot),
            None => Cow::Owned(TokenBalanceSnapshot::default()),
        }
    }
    /// # Panics
    ///
    /// if any instruction or balance refers to an account index outside of the key set
    pub fn check_bounds(&self) {
        for ix in &self.instructions {
            ix.accounts.iter().for_each(|idx| self.account_keys.check(*idx));
        }
        for snapshot in [&self.pre_token_balances, &self.post_token_balances]
            .into_iter()
            .flatten()
        {
            snapshot.indices().for_each(|idx| self.account_keys.check(idx));
        }
        for lamports in [&self.pre_balances, &self.post_balances] {
            assert!(
                lamports.len() <= self.account_keys.len(),
                "{} lamport balances for {} account keys",
                lamports.len(),
                self.account_keys.len()
            );
        }
    }
}

impl TryFrom<EncodedConfirmedTransactionWithStatusMeta> for RawTransactionRecord {
    type Error = anyhow::Error;
    fn try_from(value: EncodedConfirmedTransactionWithStatusMeta) -> Result<Self> {
        let EncodedTransaction::Json(ui_tx) = value.transaction.transaction else {
            return Err(anyhow!("unsupported tx encoding"));
        };
        let meta = value.transaction.meta.with_context(|| "meta is none")?;
        let signature = ui_tx
            .signatures
            .first()
            .cloned()
            .with_context(|| "tx has no signatures")?;

        let (account_keys, instructions) = match ui_tx.message {
            UiMessage::Parsed(msg) => {
                // parsed messages already include addresses loaded from lookup tables
                let keys = AccountKeySet::new(
                    msg.account_keys.into_iter().map(|key| key.pubkey).collect(),
                );
                let instructions = msg
                    .instructions
                    .into_iter()
                    .map(|ix| Instruction::from_ui(ix, &keys))
                    .collect::<Result<Vec<_>>>()?;
                (keys, instructions)
            }
            UiMessage::Raw(msg) => {
                let mut keys = msg.account_keys;
                if let OptionSerializer::Some(loaded) = &meta.loaded_addresses {
                    keys.extend(loaded.writable.iter().cloned());
                    keys.extend(loaded.readonly.iter().cloned());
                }
                let keys = AccountKeySet::new(keys);
                let instructions = msg
                    .instructions
                    .into_iter()
                    .map(|ix| Instruction::from_compiled(ix, &keys))
                    .collect();
                (keys, instructions)
            }
        };

        let pre_token_balances = match &meta.pre_token_balances {
            OptionSerializer::Some(balances) => Some(TokenBalanceSnapshot::from_ui(balances)?),
            _ => None,
        };
        let post_token_balances = match &meta.post_token_balances {
            OptionSerializer::Some(balances) => Some(TokenBalanceSnapshot::from_ui(balances)?),
            _ => None,
        };

        let record = Self {
            signature,
            slot: value.slot,
            block_time: value.block_time,
            fee: meta.fee,
            err: meta.err.map(|err| format!("{err:?}")),
            account_keys,
            instructions,
            pre_token_balances,
            post_token_balances,
            pre_balances: meta.pre_balances,
            post_balances: meta.post_balances,
            log_messages: Into::<Option<Vec<String>>>::into(meta.log_messages).unwrap_or_default(),
        };
        record.check_bounds();
        Ok(record)
    }
}
