use {
    lazy_static::lazy_static,
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
};

pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const TOKEN_2022_PROGRAM_ID: &str = "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb";
pub const MEMO_PROGRAM_ID: &str = "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr";
pub const MEMO_V1_PROGRAM_ID: &str = "Memo1UhkJRfHyvLMcVucJwxXeuD728EqVDDwQDxFMNo";
pub const ORCA_TOKEN_SWAP_PROGRAM_ID: &str = "DjVE6JNiYqPL2QXyCUUh8rNjHrbz9hXHNYt99MQ59qw1";
pub const ORCA_TOKEN_SWAP_V2_PROGRAM_ID: &str = "9W959DqEETiGZocYWCQPaJ6sBmUzgfxXfqGeTEdp3aQP";
pub const ORCA_WHIRLPOOL_PROGRAM_ID: &str = "whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc";
pub const RAYDIUM_AMM_V4_PROGRAM_ID: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";
pub const JUPITER_V6_PROGRAM_ID: &str = "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4";

lazy_static! {
    /// table used when no extra swap programs are configured
    pub static ref DEFAULT_PROGRAMS: ProgramTable = ProgramTable::default();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KnownProgram {
    System,
    SplToken,
    Token2022,
    Memo,
    OrcaTokenSwap,
    OrcaWhirlpool,
    RaydiumAmmV4,
    JupiterV6,
    /// swap program added through configuration
    CustomSwap,
}

impl KnownProgram {
    pub fn is_swap(&self) -> bool {
        matches!(
            self,
            Self::OrcaTokenSwap
                | Self::OrcaWhirlpool
                | Self::RaydiumAmmV4
                | Self::JupiterV6
                | Self::CustomSwap
        )
    }
    /// spl-token and token2022 share instruction layouts for everything we decode
    pub fn is_token(&self) -> bool {
        matches!(self, Self::SplToken | Self::Token2022)
    }
}

/// maps program ids to the programs the classifier understands
#[derive(Clone, Debug)]
pub struct ProgramTable {
    programs: HashMap<String, KnownProgram>,
}

impl Default for ProgramTable {
    fn default() -> Self {
        let programs = [
            (SYSTEM_PROGRAM_ID, KnownProgram::System),
            (TOKEN_PROGRAM_ID, KnownProgram::SplToken),
            (TOKEN_2022_PROGRAM_ID, KnownProgram::Token2022),
            (MEMO_PROGRAM_ID, KnownProgram::Memo),
            (MEMO_V1_PROGRAM_ID, KnownProgram::Memo),
            (ORCA_TOKEN_SWAP_PROGRAM_ID, KnownProgram::OrcaTokenSwap),
            (ORCA_TOKEN_SWAP_V2_PROGRAM_ID, KnownProgram::OrcaTokenSwap),
            (ORCA_WHIRLPOOL_PROGRAM_ID, KnownProgram::OrcaWhirlpool),
            (RAYDIUM_AMM_V4_PROGRAM_ID, KnownProgram::RaydiumAmmV4),
            (JUPITER_V6_PROGRAM_ID, KnownProgram::JupiterV6),
        ]
        .into_iter()
        .map(|(id, program)| (id.to_string(), program))
        .collect();
        Self { programs }
    }
}

impl ProgramTable {
    /// default table extended with additional swap programs, existing entries are never overridden
    pub fn with_swap_programs(swap_programs: &[String]) -> Self {
        let mut table = Self::default();
        for program_id in swap_programs {
            if table.programs.contains_key(program_id) {
                log::warn!("ignoring swap program {program_id}, already known");
                continue;
            }
            table
                .programs
                .insert(program_id.clone(), KnownProgram::CustomSwap);
        }
        table
    }
    pub fn lookup(&self, program_id: &str) -> Option<KnownProgram> {
        self.programs.get(program_id).copied()
    }
    pub fn len(&self) -> usize {
        self.programs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}
