use {
    crate::types::TokenBalanceSnapshot,
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
};

/// signed balance change of a single account, in base units
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceDelta {
    pub mint: String,
    pub owner: Option<String>,
    pub raw: i128,
    pub decimals: u8,
}

impl BalanceDelta {
    pub fn ui_amount(&self) -> f64 {
        self.raw as f64 / 10_f64.powi(self.decimals as i32)
    }
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }
}

/// computes post - pre for every requested account index
///
/// an account missing from one side (created or closed by the transaction) counts as zero on that side,
/// an account missing from both sides is omitted as its delta is unknown
pub fn resolve_deltas(
    pre: &TokenBalanceSnapshot,
    post: &TokenBalanceSnapshot,
    indices: impl IntoIterator<Item = u8>,
) -> BTreeMap<u8, BalanceDelta> {
    let mut deltas = BTreeMap::new();
    for idx in indices {
        let delta = match (pre.get(idx), post.get(idx)) {
            (Some(before), Some(after)) => {
                if before.mint != after.mint {
                    log::warn!(
                        "mint changed for account index {idx} ({} -> {})",
                        before.mint,
                        after.mint
                    );
                }
                BalanceDelta {
                    mint: after.mint.clone(),
                    owner: after.owner.clone().or_else(|| before.owner.clone()),
                    raw: after.amount as i128 - before.amount as i128,
                    decimals: after.decimals,
                }
            }
            (Some(before), None) => BalanceDelta {
                mint: before.mint.clone(),
                owner: before.owner.clone(),
                raw: -(before.amount as i128),
                decimals: before.decimals,
            },
            (None, Some(after)) => BalanceDelta {
                mint: after.mint.clone(),
                owner: after.owner.clone(),
                raw: after.amount as i128,
                decimals: after.decimals,
            },
            (None, None) => continue,
        };
        deltas.insert(idx, delta);
    }
    deltas
}

/// every account index present in either snapshot
pub fn touched_indices(pre: &TokenBalanceSnapshot, post: &TokenBalanceSnapshot) -> Vec<u8> {
    let mut indices = pre.indices().chain(post.indices()).collect::<Vec<_>>();
    indices.sort_unstable();
    indices.dedup();
    indices
}
