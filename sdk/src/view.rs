//! Display-only renderings of pool and user records.
//!
//! Addresses are base-58, token amounts are six-digit decimals. Nothing here
//! feeds back into reward accounting.

use serde::Serialize;

use crate::context::StakingContext;
use crate::error::{Result, StakingSdkError};
use crate::fixed_point::raw_to_ui;
use crate::rewards::{reward_per_second_display, reward_per_token_display, RewardSnapshot};
use crate::state::{PoolRecord, UserRecord};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PoolView {
    pub address: String,
    pub owner_wallet: String,
    pub staking_mint: String,
    pub staking_vault: String,
    pub reward_mint: String,
    pub reward_vault: String,
    pub reward_per_second: String,
    pub reward_per_token: String,
    pub reward_duration: u64,
    pub reward_duration_end: u64,
    pub last_update_time: u64,
    pub user_stake_count: u32,
    pub funders: Vec<String>,
    pub unstake_penalty_basis_points: u16,
    pub locking_duration: u64,
    pub penalty_deposit_account: String,
}

impl PoolView {
    pub fn from_record(ctx: &StakingContext, pool: &PoolRecord) -> Result<Self> {
        Ok(Self {
            address: ctx.pool.to_string(),
            owner_wallet: pool.owner_wallet.to_string(),
            staking_mint: pool.staking_mint.to_string(),
            staking_vault: pool.staking_vault.to_string(),
            reward_mint: pool.reward_mint.to_string(),
            reward_vault: pool.reward_vault.to_string(),
            reward_per_second: reward_per_second_display(pool, ctx.reward_decimals)?.to_string(),
            reward_per_token: reward_per_token_display(pool, ctx.reward_decimals)?.to_string(),
            reward_duration: pool.reward_duration,
            reward_duration_end: pool.reward_duration_end,
            last_update_time: pool.total_stake_last_update_time,
            user_stake_count: pool.user_stake_count,
            funders: pool
                .funder_registry()
                .occupied()
                .map(|(_, key)| key.to_string())
                .collect(),
            unstake_penalty_basis_points: pool.unstake_penalty_basis_points,
            locking_duration: pool.locking_duration,
            penalty_deposit_account: pool.penalty_deposit_account.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        to_json(self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub user_wallet: String,
    pub pool: String,
    pub balance_staked: String,
    /// Settled reward, plus accrual when rendered against a snapshot.
    pub reward_pending: String,
    pub unstake_penalty_duration_end: u64,
    pub last_staked_timestamp: u64,
}

impl UserView {
    pub fn from_record(
        ctx: &StakingContext,
        user: &UserRecord,
        snapshot: Option<&RewardSnapshot>,
    ) -> Result<Self> {
        let pending = match snapshot {
            Some(s) => s.pending_for(user)?,
            None => user.reward_pending,
        };
        Ok(Self {
            user_wallet: user.user_wallet.to_string(),
            pool: user.pool.to_string(),
            balance_staked: raw_to_ui(user.balance_staked, ctx.staking_decimals)?.to_string(),
            reward_pending: raw_to_ui(pending, ctx.reward_decimals)?.to_string(),
            unstake_penalty_duration_end: user.unstake_penalty_duration_end,
            last_staked_timestamp: user.last_staked_timestamp,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        to_json(self)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| StakingSdkError::Deserialize(e.to_string()))
}
