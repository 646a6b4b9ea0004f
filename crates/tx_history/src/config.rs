use {
    crate::programs::ProgramTable,
    anyhow::{anyhow, Context, Result},
    solana_sdk::commitment_config::CommitmentConfig,
    std::str::FromStr,
};

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    pub rpc_url: String,
    /// one of processed, confirmed, finalized
    pub commitment: String,
    pub request_timeout_secs: u64,
    /// address the history api binds to
    pub listen_url: String,
    /// program ids classified as swaps in addition to the built-in ones
    #[serde(default)]
    pub extra_swap_programs: Vec<String>,
    /// if not empty, parsed entities are persisted to this file when the api shuts down
    #[serde(default)]
    pub store_snapshot: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            commitment: "finalized".to_string(),
            request_timeout_secs: 30,
            listen_url: "127.0.0.1:3000".to_string(),
            extra_swap_programs: vec![],
            store_snapshot: String::new(),
        }
    }
}

impl Config {
    pub async fn load(path: &str) -> Result<Self> {
        serde_yaml::from_str(
            &tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read config {path}"))?,
        )
        .with_context(|| "failed to deserialize config")
    }
    pub async fn save(&self, path: &str) -> Result<()> {
        tokio::fs::write(
            path,
            serde_yaml::to_string(self).with_context(|| "failed to serialize config")?,
        )
        .await
        .with_context(|| "failed to write config")
    }
    pub fn programs(&self) -> ProgramTable {
        ProgramTable::with_swap_programs(&self.extra_swap_programs)
    }
    pub fn commitment_config(&self) -> Result<CommitmentConfig> {
        CommitmentConfig::from_str(&self.commitment)
            .map_err(|err| anyhow!("invalid commitment {} {err}", self.commitment))
    }
}
