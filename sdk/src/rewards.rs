//! Reward accumulator mirror (Synthetix pattern).
//!
//! Reproduces the program's read-side math step for step: the same operand
//! order, the same u128 checked arithmetic and the same u64 bound on earned
//! rewards. Any drift would show users a pending reward the program will not
//! pay, so the functions here are pure and take time as an input.

use std::time::{SystemTime, UNIX_EPOCH};

use solana_program::{msg, pubkey::Pubkey};

use crate::constants::REWARD_PRECISION;
use crate::error::{Result, StakingSdkError};
use crate::fixed_point::{raw_scale, scaled_divide, ScaledDecimal};
use crate::state::{PoolRecord, UserRecord};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Current wall-clock time in unix seconds.
pub fn unix_timestamp() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| StakingSdkError::ClockUnavailable(e.to_string()))
}

/// Rewards stop accruing at the end of the reward period.
pub fn last_time_reward_applicable(reward_duration_end: u64, now: u64) -> u64 {
    now.min(reward_duration_end)
}

// ---------------------------------------------------------------------------
// Accumulator math
// ---------------------------------------------------------------------------

/// Advance the accumulator from `last_update_time` to `applicable_time`.
///
/// Returns `stored` unchanged when nothing is staked or when no time has
/// elapsed (a clock behind the pool's last update never moves it backwards).
pub fn reward_per_token(
    stored: u128,
    reward_rate: u64,
    last_update_time: u64,
    applicable_time: u64,
    total_staked: u64,
) -> Result<u128> {
    if total_staked == 0 || applicable_time <= last_update_time {
        return Ok(stored);
    }

    let elapsed = (applicable_time - last_update_time) as u128;
    let increment = (reward_rate as u128)
        .checked_mul(elapsed)
        .ok_or(StakingSdkError::ArithmeticOverflow)?
        .checked_mul(REWARD_PRECISION)
        .ok_or(StakingSdkError::ArithmeticOverflow)?
        / (total_staked as u128);

    stored
        .checked_add(increment)
        .ok_or(StakingSdkError::ArithmeticOverflow)
}

/// Settled pending reward plus what `balance` earned since `completed`.
pub fn earned(
    balance_staked: u64,
    current_reward_per_token: u128,
    reward_per_token_completed: u128,
    reward_pending: u64,
) -> Result<u64> {
    let delta = current_reward_per_token
        .checked_sub(reward_per_token_completed)
        .ok_or(StakingSdkError::ArithmeticOverflow)?;

    let new_earned = (balance_staked as u128)
        .checked_mul(delta)
        .ok_or(StakingSdkError::ArithmeticOverflow)?
        / REWARD_PRECISION;

    // The program rejects anything not strictly below u64::MAX.
    if new_earned >= u64::MAX as u128 {
        msg!("StakingSdkError::ArithmeticOverflow");
        return Err(StakingSdkError::ArithmeticOverflow);
    }

    reward_pending
        .checked_add(new_earned as u64)
        .ok_or(StakingSdkError::ArithmeticOverflow)
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The pool accumulator evaluated once, at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardSnapshot {
    pub now: u64,
    pub effective_time: u64,
    pub total_staked: u64,
    pub reward_per_token: u128,
}

impl RewardSnapshot {
    pub fn capture(pool: &PoolRecord, total_staked: u64, now: u64) -> Result<Self> {
        let effective_time = last_time_reward_applicable(pool.reward_duration_end, now);
        let reward_per_token = reward_per_token(
            pool.reward_per_token_stored,
            pool.reward_rate,
            pool.total_stake_last_update_time,
            effective_time,
            total_staked,
        )?;
        Ok(Self {
            now,
            effective_time,
            total_staked,
            reward_per_token,
        })
    }

    pub fn pending_for(&self, user: &UserRecord) -> Result<u64> {
        earned(
            user.balance_staked,
            self.reward_per_token,
            user.reward_per_token_completed,
            user.reward_pending,
        )
    }
}

/// Pending reward for a wallet, in raw reward units.
///
/// `pool` missing is an error; `user` missing means the wallet never staked
/// and yields zero. `now` defaults to the system clock, sampled once.
pub fn pending_rewards(
    pool: Option<&PoolRecord>,
    user: Option<&UserRecord>,
    total_staked: u64,
    now: Option<u64>,
) -> Result<u64> {
    let pool = pool.ok_or_else(|| {
        msg!("StakingSdkError::PoolNotFound");
        StakingSdkError::PoolNotFound
    })?;
    let Some(user) = user else {
        return Ok(0);
    };
    let now = match now {
        Some(t) => t,
        None => unix_timestamp()?,
    };
    RewardSnapshot::capture(pool, total_staked, now)?.pending_for(user)
}

// ---------------------------------------------------------------------------
// State transitions (read-side previews)
// ---------------------------------------------------------------------------

/// Records after the program's reward update at `now`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub pool: PoolRecord,
    pub user: Option<UserRecord>,
}

/// Fold accrued rewards into copies of `pool` and (optionally) `user`, as the
/// program does at the start of every stake, unstake, claim and fund.
pub fn settle(
    pool: &PoolRecord,
    user: Option<&UserRecord>,
    total_staked: u64,
    now: u64,
) -> Result<Settlement> {
    let snapshot = RewardSnapshot::capture(pool, total_staked, now)?;

    let mut pool = *pool;
    pool.reward_per_token_stored = snapshot.reward_per_token;
    pool.total_stake_last_update_time = snapshot.effective_time;

    let user = match user {
        Some(u) => {
            let mut u = *u;
            u.reward_pending = snapshot.pending_for(&u)?;
            u.reward_per_token_completed = snapshot.reward_per_token;
            Some(u)
        }
        None => None,
    };

    Ok(Settlement { pool, user })
}

/// Records after a stake has been credited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeProjection {
    pub pool: PoolRecord,
    pub user: UserRecord,
}

/// Records after `user` stakes `amount` raw units at `now`.
///
/// `total_staked` is the vault balance before the deposit. The user's penalty
/// window and lock restart: the penalty window runs to the current period
/// end, the lock counts from `now`.
pub fn project_stake(
    pool: &PoolRecord,
    user: &UserRecord,
    amount: u64,
    total_staked: u64,
    now: u64,
) -> Result<StakeProjection> {
    if amount == 0 {
        msg!("StakingSdkError::ZeroAmount");
        return Err(StakingSdkError::ZeroAmount);
    }

    let mut stamped = *user;
    stamped.unstake_penalty_duration_end = pool.reward_duration_end;
    stamped.last_staked_timestamp = now;

    let settled = settle(pool, Some(&stamped), total_staked, now)?;
    let mut user = settled.user.unwrap_or(stamped);
    user.balance_staked = user
        .balance_staked
        .checked_add(amount)
        .ok_or(StakingSdkError::ArithmeticOverflow)?;

    Ok(StakeProjection {
        pool: settled.pool,
        user,
    })
}

/// Pool state after `funder` adds `amount` raw reward units and extends the
/// period by `extend_duration` seconds.
///
/// While a period is running, undistributed rewards are carried into the new
/// rate and the end moves out by `extend_duration`; otherwise a new period
/// starts at `now`.
pub fn project_funding(
    pool: &PoolRecord,
    funder: &Pubkey,
    amount: u64,
    extend_duration: u64,
    total_staked: u64,
    now: u64,
) -> Result<PoolRecord> {
    if !pool.is_authorized_funder(funder) {
        msg!("StakingSdkError::UnauthorizedFunder");
        return Err(StakingSdkError::UnauthorizedFunder);
    }

    let mut next = settle(pool, None, total_staked, now)?.pool;

    let mut reward_amount = amount;
    if now < next.reward_duration_end {
        let remaining = next.reward_duration_end - now;
        let leftover = remaining
            .checked_mul(next.reward_rate)
            .ok_or(StakingSdkError::ArithmeticOverflow)?;
        reward_amount = amount
            .checked_add(leftover)
            .ok_or(StakingSdkError::ArithmeticOverflow)?;
        next.reward_duration_end = next
            .reward_duration_end
            .checked_add(extend_duration)
            .ok_or(StakingSdkError::ArithmeticOverflow)?;
    } else {
        next.reward_duration_end = now
            .checked_add(extend_duration)
            .ok_or(StakingSdkError::ArithmeticOverflow)?;
    }

    if next.reward_duration_end <= now {
        msg!("StakingSdkError::DurationTooShort");
        return Err(StakingSdkError::DurationTooShort);
    }

    let new_duration = next.reward_duration_end - now;
    next.reward_rate = reward_amount / new_duration;
    next.reward_duration = new_duration;
    next.total_stake_last_update_time = now;

    msg!(
        "EVENT:FundingProjected:{{\"funder\":\"{}\",\"amount\":{},\"reward_rate\":{},\"reward_duration_end\":{}}}",
        funder,
        amount,
        next.reward_rate,
        next.reward_duration_end,
    );

    Ok(next)
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Stored accumulator as reward tokens per staked unit. Display only: the raw
/// u128 accumulator stays authoritative for all math.
pub fn reward_per_token_display(pool: &PoolRecord, reward_decimals: u8) -> Result<ScaledDecimal> {
    let denominator = REWARD_PRECISION
        .checked_mul(raw_scale(reward_decimals)?)
        .ok_or(StakingSdkError::ArithmeticOverflow)?;
    scaled_divide(pool.reward_per_token_stored, denominator)
}

/// Reward tokens released per second.
pub fn reward_per_second_display(pool: &PoolRecord, reward_decimals: u8) -> Result<ScaledDecimal> {
    scaled_divide(pool.reward_rate as u128, raw_scale(reward_decimals)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
