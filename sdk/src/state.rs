//! Pool and user account records, byte-exact with the staking program.
//!
//! Records are Borsh structs: little-endian integers, addresses as raw 32
//! bytes, the funder list as a fixed array. On chain an account may be
//! allocated larger than its record, so decoding reads exactly the declared
//! length, fails on a shortfall, and ignores any surplus.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::constants::{MAX_FUNDERS, POOL_RECORD_LEN, USER_RECORD_LEN};
use crate::error::{Result, StakingSdkError};

// ---------------------------------------------------------------------------
// Account type tag
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AccountType {
    Uninitialized = 0,
    PoolV1 = 2,
    UserV1 = 3,
}

impl TryFrom<u8> for AccountType {
    type Error = StakingSdkError;
    fn try_from(v: u8) -> Result<Self> {
        match v {
            0 => Ok(Self::Uninitialized),
            2 => Ok(Self::PoolV1),
            3 => Ok(Self::UserV1),
            other => Err(StakingSdkError::UnknownAccountType(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolRecord {
    pub account_type: u8,
    pub owner_wallet: Pubkey,
    pub staking_vault: Pubkey,
    pub staking_mint: Pubkey,
    pub reward_vault: Pubkey,
    pub reward_mint: Pubkey,
    /// Raw reward units released per second.
    pub reward_rate: u64,
    pub reward_duration: u64,
    pub total_stake_last_update_time: u64,
    /// Cumulative reward per staked unit, scaled by `REWARD_PRECISION`.
    pub reward_per_token_stored: u128,
    pub user_stake_count: u32,
    pub pda_nonce: u8,
    /// Empty slots hold `Pubkey::default()`.
    pub funders: [Pubkey; MAX_FUNDERS],
    pub reward_duration_end: u64,
    pub unstake_penalty_basis_points: u16,
    pub locking_duration: u64,
    /// Token account receiving unstake penalties.
    pub penalty_deposit_account: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserRecord {
    pub account_type: u8,
    pub user_wallet: Pubkey,
    pub pool: Pubkey,
    pub balance_staked: u64,
    pub nonce: u8,
    /// Settled but unclaimed reward, in raw reward units.
    pub reward_pending: u64,
    /// Pool accumulator value already credited to this user.
    pub reward_per_token_completed: u128,
    pub unstake_penalty_duration_end: u64,
    pub last_staked_timestamp: u64,
}

impl PoolRecord {
    /// True once the pool has been funded at least once.
    pub fn is_funded(&self) -> bool {
        self.reward_duration_end > 0
    }

    /// Whether rewards are still being emitted at `now`.
    pub fn is_reward_period_active(&self, now: u64) -> bool {
        now < self.reward_duration_end
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// A fixed-length account record with a declared wire size and type tag.
pub trait AccountRecord: BorshSerialize + BorshDeserialize + Sized {
    const LEN: usize;
    const ACCOUNT_TYPE: AccountType;

    fn account_type(&self) -> u8;

    /// Decode the first `LEN` bytes, ignoring any trailing bytes.
    fn decode(bytes: &[u8]) -> Result<Self> {
        decode_exact(bytes, Self::LEN)
    }

    /// Like [`decode`](Self::decode), additionally requiring the expected type tag.
    fn decode_checked(bytes: &[u8]) -> Result<Self> {
        let record = Self::decode(bytes)?;
        let found = record.account_type();
        if AccountType::try_from(found).map_err(|e| {
            msg!("StakingSdkError::UnknownAccountType");
            e
        })? != Self::ACCOUNT_TYPE
        {
            msg!("StakingSdkError::AccountTypeMismatch");
            return Err(StakingSdkError::AccountTypeMismatch {
                expected: Self::ACCOUNT_TYPE as u8,
                found,
            });
        }
        Ok(record)
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(Self::LEN);
        self.serialize(&mut data)?;
        if data.len() != Self::LEN {
            return Err(StakingSdkError::Deserialize(format!(
                "encoded {} bytes, layout declares {}",
                data.len(),
                Self::LEN
            )));
        }
        Ok(data)
    }
}

impl AccountRecord for PoolRecord {
    const LEN: usize = POOL_RECORD_LEN;
    const ACCOUNT_TYPE: AccountType = AccountType::PoolV1;

    fn account_type(&self) -> u8 {
        self.account_type
    }
}

impl AccountRecord for UserRecord {
    const LEN: usize = USER_RECORD_LEN;
    const ACCOUNT_TYPE: AccountType = AccountType::UserV1;

    fn account_type(&self) -> u8 {
        self.account_type
    }
}

/// Read exactly `declared_len` bytes as `T`. Shortfall is an error; surplus is ignored.
pub fn decode_exact<T: BorshDeserialize>(bytes: &[u8], declared_len: usize) -> Result<T> {
    if bytes.len() < declared_len {
        msg!("StakingSdkError::TruncatedBuffer");
        return Err(StakingSdkError::TruncatedBuffer {
            expected: declared_len,
            actual: bytes.len(),
        });
    }
    T::try_from_slice(&bytes[..declared_len])
        .map_err(|e| StakingSdkError::Deserialize(e.to_string()))
}

/// Decode account data that may not exist. `None` stays `None`.
pub fn decode_optional<T: AccountRecord>(bytes: Option<&[u8]>) -> Result<Option<T>> {
    bytes.map(T::decode_checked).transpose()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
