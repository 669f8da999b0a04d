//! Which program, which pool, and the mint decimals used for display.
//!
//! Passed explicitly to every instruction builder and view; nothing here is
//! global, so several pools can be handled side by side.

use std::str::FromStr;

use solana_program::pubkey::Pubkey;

use crate::constants::DEFAULT_TOKEN_DECIMALS;
use crate::error::{Result, StakingSdkError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakingContext {
    pub program_id: Pubkey,
    pub pool: Pubkey,
    pub staking_decimals: u8,
    pub reward_decimals: u8,
}

impl StakingContext {
    pub fn new(program_id: Pubkey, pool: Pubkey) -> Self {
        Self {
            program_id,
            pool,
            staking_decimals: DEFAULT_TOKEN_DECIMALS,
            reward_decimals: DEFAULT_TOKEN_DECIMALS,
        }
    }

    pub fn with_decimals(mut self, staking_decimals: u8, reward_decimals: u8) -> Self {
        self.staking_decimals = staking_decimals;
        self.reward_decimals = reward_decimals;
        self
    }

    /// Build from the process environment.
    ///
    /// Required: `STAKING_PROGRAM_ID`, `STAKING_POOL`.
    /// Optional: `STAKING_TOKEN_DECIMALS`, `REWARD_TOKEN_DECIMALS` (default 9).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a caller-supplied source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let program_id = required_pubkey(&lookup, "STAKING_PROGRAM_ID")?;
        let pool = required_pubkey(&lookup, "STAKING_POOL")?;
        let staking_decimals = optional_decimals(&lookup, "STAKING_TOKEN_DECIMALS")?;
        let reward_decimals = optional_decimals(&lookup, "REWARD_TOKEN_DECIMALS")?;

        Ok(Self {
            program_id,
            pool,
            staking_decimals,
            reward_decimals,
        })
    }

    // ── PDA Helpers ─────────────────────────────────────────────────────────

    /// Per-wallet user storage: seeds `[wallet, pool]`.
    pub fn find_user_storage(&self, wallet: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[wallet.as_ref(), self.pool.as_ref()], &self.program_id)
    }

    /// Authority over the pool's vaults: seeds `[pool]`.
    pub fn find_pool_signer(&self) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[self.pool.as_ref()], &self.program_id)
    }

    pub fn user_token_account(&self, wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
        spl_associated_token_account::get_associated_token_address(wallet, mint)
    }
}

fn required_pubkey<F>(lookup: &F, key: &str) -> Result<Pubkey>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).ok_or_else(|| StakingSdkError::InvalidConfig {
        key: key.to_string(),
        reason: "not set".to_string(),
    })?;
    Pubkey::from_str(raw.trim()).map_err(|e| StakingSdkError::InvalidConfig {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

fn optional_decimals<F>(lookup: &F, key: &str) -> Result<u8>
where
    F: Fn(&str) -> Option<String>,
{
    let decimals = match lookup(key) {
        Some(raw) => raw.trim().parse::<u8>().map_err(|e| StakingSdkError::InvalidConfig {
            key: key.to_string(),
            reason: e.to_string(),
        })?,
        None => DEFAULT_TOKEN_DECIMALS,
    };
    // 10^decimals must fit a u64 raw amount
    if decimals > 19 {
        return Err(StakingSdkError::InvalidConfig {
            key: key.to_string(),
            reason: format!("{} decimals is out of range", decimals),
        });
    }
    Ok(decimals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let program_id = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let ctx = StakingContext::from_lookup(lookup_from(&[
            ("STAKING_PROGRAM_ID", program_id.to_string()),
            ("STAKING_POOL", pool.to_string()),
        ]))
        .unwrap();
        assert_eq!(ctx, StakingContext::new(program_id, pool));
        assert_eq!(ctx.staking_decimals, 9);
        assert_eq!(ctx.reward_decimals, 9);
    }

    #[test]
    fn test_from_lookup_decimals() {
        let ctx = StakingContext::from_lookup(lookup_from(&[
            ("STAKING_PROGRAM_ID", Pubkey::new_unique().to_string()),
            ("STAKING_POOL", Pubkey::new_unique().to_string()),
            ("STAKING_TOKEN_DECIMALS", "6".to_string()),
            ("REWARD_TOKEN_DECIMALS", " 2 ".to_string()),
        ]))
        .unwrap();
        assert_eq!(ctx.staking_decimals, 6);
        assert_eq!(ctx.reward_decimals, 2);
    }

    #[test]
    fn test_from_lookup_errors() {
        let err = StakingContext::from_lookup(lookup_from(&[(
            "STAKING_POOL",
            Pubkey::new_unique().to_string(),
        )]))
        .unwrap_err();
        assert!(matches!(err, StakingSdkError::InvalidConfig { ref key, .. } if key == "STAKING_PROGRAM_ID"));

        let err = StakingContext::from_lookup(lookup_from(&[
            ("STAKING_PROGRAM_ID", Pubkey::new_unique().to_string()),
            ("STAKING_POOL", "not-a-key".to_string()),
        ]))
        .unwrap_err();
        assert!(matches!(err, StakingSdkError::InvalidConfig { ref key, .. } if key == "STAKING_POOL"));

        let err = StakingContext::from_lookup(lookup_from(&[
            ("STAKING_PROGRAM_ID", Pubkey::new_unique().to_string()),
            ("STAKING_POOL", Pubkey::new_unique().to_string()),
            ("REWARD_TOKEN_DECIMALS", "20".to_string()),
        ]))
        .unwrap_err();
        assert!(matches!(err, StakingSdkError::InvalidConfig { ref key, .. } if key == "REWARD_TOKEN_DECIMALS"));
    }

    #[test]
    fn test_pdas_are_deterministic_and_scoped() {
        let ctx = StakingContext::new(Pubkey::new_unique(), Pubkey::new_unique());
        let wallet = Pubkey::new_unique();

        let (a, bump_a) = ctx.find_user_storage(&wallet);
        let (b, bump_b) = ctx.find_user_storage(&wallet);
        assert_eq!((a, bump_a), (b, bump_b));

        let other_pool = StakingContext::new(ctx.program_id, Pubkey::new_unique());
        assert_ne!(other_pool.find_user_storage(&wallet).0, a);
        assert_ne!(ctx.find_pool_signer().0, other_pool.find_pool_signer().0);

        let expected = Pubkey::create_program_address(
            &[wallet.as_ref(), ctx.pool.as_ref(), &[bump_a]],
            &ctx.program_id,
        )
        .unwrap();
        assert_eq!(expected, a);
    }

    #[test]
    fn test_user_token_account_is_ata() {
        let ctx = StakingContext::new(Pubkey::new_unique(), Pubkey::new_unique());
        let wallet = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        assert_eq!(
            ctx.user_token_account(&wallet, &mint),
            spl_associated_token_account::get_associated_token_address(&wallet, &mint)
        );
    }
}
