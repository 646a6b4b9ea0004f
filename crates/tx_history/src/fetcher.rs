//! sources of raw transaction records
use {
    crate::{
        error::ParseFailure,
        types::{AccountKeySet, BalanceSlot, RawTransactionRecord, TokenBalanceSnapshot},
    },
    anyhow::Context,
    async_trait::async_trait,
    solana_client::{nonblocking::rpc_client::RpcClient, rpc_config::RpcTransactionConfig},
    solana_sdk::{commitment_config::CommitmentConfig, signature::Signature},
    solana_transaction_status::{EncodedConfirmedTransactionWithStatusMeta, UiTransactionEncoding},
    std::{collections::HashMap, str::FromStr, sync::Arc, time::Duration},
};

#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// fetches the confirmed transaction identified by its signature
    async fn fetch_transaction(&self, id: &str) -> Result<RawTransactionRecord, ParseFailure>;
    /// fetches a balance snapshot for records that were returned without one
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the source can't provide historical balances
    async fn fetch_account_balances(
        &self,
        _account_keys: &AccountKeySet,
        _slot: BalanceSlot,
    ) -> Result<Option<TokenBalanceSnapshot>, ParseFailure> {
        Ok(None)
    }
}

/// fetches transactions through the json rpc `getTransaction` method
#[derive(Clone)]
pub struct RpcSource {
    rpc: Arc<RpcClient>,
    commitment: CommitmentConfig,
}

impl RpcSource {
    pub fn new(url: String, timeout: Duration, commitment: CommitmentConfig) -> Self {
        Self {
            rpc: Arc::new(RpcClient::new_with_timeout(url, timeout)),
            commitment,
        }
    }
    pub fn from_config(cfg: &crate::config::Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            cfg.rpc_url.clone(),
            Duration::from_secs(cfg.request_timeout_secs),
            cfg.commitment_config()?,
        ))
    }
}

#[async_trait]
impl TransactionSource for RpcSource {
    async fn fetch_transaction(&self, id: &str) -> Result<RawTransactionRecord, ParseFailure> {
        let signature = Signature::from_str(id)
            .map_err(|err| ParseFailure::Fetch(format!("invalid signature {id} {err}")))?;
        let tx = self
            .rpc
            .get_transaction_with_config(
                &signature,
                RpcTransactionConfig {
                    encoding: Some(UiTransactionEncoding::JsonParsed),
                    commitment: Some(self.commitment),
                    max_supported_transaction_version: Some(0),
                },
            )
            .await
            .map_err(|err| ParseFailure::Fetch(format!("failed to fetch tx({id}) {err}")))?;
        log::debug!("fetched tx(hash={id}, slot={})", tx.slot);
        RawTransactionRecord::try_from(tx)
            .map_err(|err| ParseFailure::Fetch(format!("failed to decode tx({id}) {err:#}")))
    }
}

/// serves records that were loaded ahead of time, such as the contents of an exported file
#[derive(Clone, Debug, Default)]
pub struct PreloadedSource {
    records: HashMap<String, RawTransactionRecord>,
}

impl PreloadedSource {
    pub fn new(records: impl IntoIterator<Item = RawTransactionRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.signature.clone(), record))
                .collect(),
        }
    }
    /// accepts a single transaction or an array, each either an exported record or a
    /// `getTransaction` response
    pub fn from_json(data: &str) -> anyhow::Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(data).with_context(|| "failed to deserialize transactions")?;
        let items = match value {
            serde_json::Value::Array(items) => items,
            value => vec![value],
        };
        let records = items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                let record_err =
                    match serde_json::from_value::<RawTransactionRecord>(item.clone()) {
                        Ok(record) => {
                            record.check_bounds();
                            return Ok(record);
                        }
                        Err(err) => err,
                    };
                log::debug!("transaction at position {idx} is not an exported record {record_err}");
                let tx: EncodedConfirmedTransactionWithStatusMeta = serde_json::from_value(item)
                    .with_context(|| {
                        format!(
                            "unrecognized transaction at position {idx} (as exported record: {record_err})"
                        )
                    })?;
                RawTransactionRecord::try_from(tx)
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self::new(records))
    }
    pub fn signatures(&self) -> impl Iterator<Item = &String> {
        self.records.keys()
    }
}

#[async_trait]
impl TransactionSource for PreloadedSource {
    async fn fetch_transaction(&self, id: &str) -> Result<RawTransactionRecord, ParseFailure> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| ParseFailure::Fetch(format!("tx({id}) not found")))
    }
}
