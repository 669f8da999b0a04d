//! Unstake penalty, locking period and close-account rules.
//!
//! A pool carries either a penalty (a share of every early unstake goes to the
//! penalty deposit account) or a locking duration (no unstake or claim until
//! the lock has run). Both stop applying once the reward period is over.

use solana_program::msg;

use crate::constants::{BASIS_POINTS_DENOMINATOR, MAX_PENALTY_BASIS_POINTS};
use crate::error::{Result, StakingSdkError};
use crate::rewards::settle;
use crate::state::{PoolRecord, UserRecord};

/// Where an unstaked amount ends up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnstakeSplit {
    pub to_user: u64,
    pub to_penalty: u64,
}

impl UnstakeSplit {
    pub fn total(&self) -> u64 {
        self.to_user.saturating_add(self.to_penalty)
    }
}

// ---------------------------------------------------------------------------
// Locking
// ---------------------------------------------------------------------------

/// Fails with `StillLocked` while the user's last stake is younger than the
/// pool's locking duration and the reward period is still running.
pub fn check_locking(pool: &PoolRecord, user: &UserRecord, now: u64) -> Result<()> {
    let staked_for = now
        .checked_sub(user.last_staked_timestamp)
        .ok_or(StakingSdkError::ArithmeticOverflow)?;

    if staked_for < pool.locking_duration && pool.is_reward_period_active(now) {
        let unlocks_at = user
            .last_staked_timestamp
            .saturating_add(pool.locking_duration);
        msg!("StakingSdkError::StillLocked");
        msg!("staked for {}s, locking duration {}s", staked_for, pool.locking_duration);
        return Err(StakingSdkError::StillLocked { unlocks_at });
    }
    Ok(())
}

/// Claiming is gated by the same lock as unstaking.
pub fn check_claim(pool: &PoolRecord, user: &UserRecord, now: u64) -> Result<()> {
    check_locking(pool, user, now)
}

/// Outcome of a claim: settled records and the amount transferred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimPlan {
    pub pool: PoolRecord,
    pub user: UserRecord,
    pub payout: u64,
    /// Settled reward the reward vault could not cover. The program clears it anyway.
    pub forfeited: u64,
}

/// Lock gate, reward settlement, then a payout capped by the reward vault.
pub fn plan_claim(
    pool: &PoolRecord,
    user: &UserRecord,
    total_staked: u64,
    reward_vault_balance: u64,
    now: u64,
) -> Result<ClaimPlan> {
    check_claim(pool, user, now)?;

    let settled = settle(pool, Some(user), total_staked, now)?;
    let mut user = settled.user.unwrap_or(*user);
    let pending = std::mem::take(&mut user.reward_pending);
    let payout = pending.min(reward_vault_balance);

    Ok(ClaimPlan {
        pool: settled.pool,
        user,
        payout,
        forfeited: pending - payout,
    })
}

// ---------------------------------------------------------------------------
// Penalty
// ---------------------------------------------------------------------------

/// Whether an unstake at `now` pays the pool's penalty.
pub fn penalty_applies(pool: &PoolRecord, user: &UserRecord, now: u64) -> bool {
    pool.unstake_penalty_basis_points > 0
        && pool.is_reward_period_active(now)
        && now < user.unstake_penalty_duration_end
}

/// Split `amount` between the user and the penalty deposit account.
pub fn penalty_split(pool: &PoolRecord, user: &UserRecord, amount: u64, now: u64) -> Result<UnstakeSplit> {
    if !penalty_applies(pool, user, now) {
        return Ok(UnstakeSplit {
            to_user: amount,
            to_penalty: 0,
        });
    }

    let penalty = (amount as u128)
        .checked_mul(pool.unstake_penalty_basis_points as u128)
        .ok_or(StakingSdkError::ArithmeticOverflow)?
        / BASIS_POINTS_DENOMINATOR;
    let to_penalty = u64::try_from(penalty).map_err(|_| StakingSdkError::ArithmeticOverflow)?;
    let to_user = amount
        .checked_sub(to_penalty)
        .ok_or(StakingSdkError::ArithmeticOverflow)?;

    Ok(UnstakeSplit { to_user, to_penalty })
}

/// Every check the program runs before an unstake, then the payout split.
pub fn plan_unstake(pool: &PoolRecord, user: &UserRecord, amount: u64, now: u64) -> Result<UnstakeSplit> {
    if amount == 0 {
        msg!("StakingSdkError::ZeroAmount");
        return Err(StakingSdkError::ZeroAmount);
    }
    if user.balance_staked < amount {
        msg!("StakingSdkError::InsufficientStake");
        return Err(StakingSdkError::InsufficientStake {
            requested: amount,
            staked: user.balance_staked,
        });
    }
    check_locking(pool, user, now)?;
    penalty_split(pool, user, amount, now)
}

// ---------------------------------------------------------------------------
// Pool terms and closing
// ---------------------------------------------------------------------------

pub fn validate_pool_terms(penalty_basis_points: u16, locking_duration: u64) -> Result<()> {
    if penalty_basis_points > MAX_PENALTY_BASIS_POINTS {
        msg!("StakingSdkError::InvalidBasisPoints");
        return Err(StakingSdkError::InvalidBasisPoints(penalty_basis_points));
    }
    if penalty_basis_points != 0 && locking_duration != 0 {
        msg!("StakingSdkError::PenaltyAndLockExclusive");
        return Err(StakingSdkError::PenaltyAndLockExclusive);
    }
    Ok(())
}

pub fn check_close_user(user: &UserRecord) -> Result<()> {
    if user.balance_staked != 0 || user.reward_pending != 0 {
        msg!("StakingSdkError::UserBalanceNonZero");
        return Err(StakingSdkError::UserBalanceNonZero);
    }
    Ok(())
}

/// A pool closes only after a reward period has both started and ended, with
/// no user records left and an empty staking vault.
pub fn check_close_pool(pool: &PoolRecord, total_staked: u64, now: u64) -> Result<()> {
    if !pool.is_funded()
        || pool.reward_duration_end >= now
        || pool.user_stake_count != 0
        || total_staked != 0
    {
        msg!("StakingSdkError::PoolStillActive");
        return Err(StakingSdkError::PoolStillActive);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
