//! Staking pool layout sizes, instruction discriminators, and fixed-point scales.

// ── Account Layouts ─────────────────────────────────────────────────────────

/// Pool record size on the wire.
/// 1 + 5*32 + 8 + 8 + 8 + 16 + 4 + 1 + 5*32 + 8 + 2 + 8 + 32 = 416
pub const POOL_RECORD_LEN: usize = 416;

/// User record size on the wire.
/// 1 + 32 + 32 + 8 + 1 + 8 + 16 + 8 + 8 = 114
pub const USER_RECORD_LEN: usize = 114;

/// Number of funder slots embedded in the pool record.
pub const MAX_FUNDERS: usize = 5;

// ── Instruction Discriminators ──────────────────────────────────────────────

pub const IX_INITIALIZE_POOL: u8 = 0;
pub const IX_CREATE_USER: u8 = 1;
pub const IX_STAKE: u8 = 2;
pub const IX_UNSTAKE: u8 = 3;
pub const IX_CLAIM_REWARDS: u8 = 4;
pub const IX_ADD_FUNDER: u8 = 5;
pub const IX_REMOVE_FUNDER: u8 = 6;
pub const IX_FUND_POOL: u8 = 7;
pub const IX_CLOSE_POOL: u8 = 8;
pub const IX_CLOSE_USER: u8 = 9;

// ── Fixed-Point Scales ──────────────────────────────────────────────────────

/// Scale applied to reward-per-token values. Chosen by the program to keep
/// precision across the division by total stake; the accumulator is a u128.
pub const REWARD_PRECISION: u128 = u64::MAX as u128;

/// Denominator for basis-point fractions (100% = 10_000 bps).
pub const BASIS_POINTS_DENOMINATOR: u128 = 10_000;

/// Largest accepted unstake penalty.
pub const MAX_PENALTY_BASIS_POINTS: u16 = 10_000;

/// Six fractional digits for human-facing decimals.
pub const DECIMAL_PRECISION: u128 = 1_000_000;

/// Number of fractional digits carried by [`DECIMAL_PRECISION`].
pub const DECIMAL_PRECISION_DIGITS: u32 = 6;

// ── Defaults ────────────────────────────────────────────────────────────────

/// Default mint decimals for both the staking and the reward token.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 9;

pub const SECONDS_PER_DAY: u64 = 86_400;
