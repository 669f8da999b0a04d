//! Staking program instruction builders.
//!
//! Instructions:
//!   0 = InitializePool
//!   1 = CreateUser
//!   2 = Stake
//!   3 = Unstake
//!   4 = ClaimRewards
//!   5 = AddFunder
//!   6 = RemoveFunder
//!   7 = FundPool
//!   8 = ClosePool
//!   9 = CloseUser
//!
//! Payload = one discriminator byte followed by the Borsh-encoded arguments.
//! Submitting the instruction is left to the caller.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    msg,
    pubkey::Pubkey,
    system_program,
};

use crate::constants::*;
use crate::context::StakingContext;
use crate::error::{Result, StakingSdkError};
use crate::state::PoolRecord;

// ── Param Structs (exact Borsh match to program) ────────────────────────────

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitializePoolArgs {
    pub reward_duration: u64,
    pub pool_nonce: u8,
    pub unstake_penalty_basis_points: u16,
    pub locking_duration: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreateUserArgs {
    pub nonce: u8,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmountArgs {
    pub amount: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FundPoolArgs {
    pub amount: u64,
    pub extend_duration: u64,
}

// ── Decoded Instruction ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakingInstruction {
    InitializePool(InitializePoolArgs),
    CreateUser(CreateUserArgs),
    Stake(AmountArgs),
    Unstake(AmountArgs),
    ClaimRewards,
    AddFunder,
    RemoveFunder,
    FundPool(FundPoolArgs),
    ClosePool,
    CloseUser,
}

impl StakingInstruction {
    /// Decode a payload. Bytes past the arguments are ignored, as the program does.
    pub fn unpack(input: &[u8]) -> Result<Self> {
        let (&tag, rest) = input.split_first().ok_or_else(|| {
            msg!("StakingSdkError::InvalidInstruction");
            StakingSdkError::InvalidInstruction
        })?;

        Ok(match tag {
            IX_INITIALIZE_POOL => Self::InitializePool(unpack_args(rest)?),
            IX_CREATE_USER => Self::CreateUser(unpack_args(rest)?),
            IX_STAKE => Self::Stake(unpack_args(rest)?),
            IX_UNSTAKE => Self::Unstake(unpack_args(rest)?),
            IX_CLAIM_REWARDS => Self::ClaimRewards,
            IX_ADD_FUNDER => Self::AddFunder,
            IX_REMOVE_FUNDER => Self::RemoveFunder,
            IX_FUND_POOL => Self::FundPool(unpack_args(rest)?),
            IX_CLOSE_POOL => Self::ClosePool,
            IX_CLOSE_USER => Self::CloseUser,
            other => {
                msg!("StakingSdkError::InvalidInstruction: tag {}", other);
                return Err(StakingSdkError::InvalidInstruction);
            }
        })
    }

    pub fn pack(&self) -> Result<Vec<u8>> {
        match self {
            Self::InitializePool(args) => encode(IX_INITIALIZE_POOL, args),
            Self::CreateUser(args) => encode(IX_CREATE_USER, args),
            Self::Stake(args) => encode(IX_STAKE, args),
            Self::Unstake(args) => encode(IX_UNSTAKE, args),
            Self::ClaimRewards => Ok(vec![IX_CLAIM_REWARDS]),
            Self::AddFunder => Ok(vec![IX_ADD_FUNDER]),
            Self::RemoveFunder => Ok(vec![IX_REMOVE_FUNDER]),
            Self::FundPool(args) => encode(IX_FUND_POOL, args),
            Self::ClosePool => Ok(vec![IX_CLOSE_POOL]),
            Self::CloseUser => Ok(vec![IX_CLOSE_USER]),
        }
    }
}

fn unpack_args<T: BorshDeserialize>(mut rest: &[u8]) -> Result<T> {
    T::deserialize(&mut rest).map_err(|_| {
        msg!("StakingSdkError::InvalidInstruction: short arguments");
        StakingSdkError::InvalidInstruction
    })
}

fn encode<T: BorshSerialize>(tag: u8, args: &T) -> Result<Vec<u8>> {
    let mut data = vec![tag];
    args.serialize(&mut data)?;
    Ok(data)
}

// ── Payloads ────────────────────────────────────────────────────────────────

pub fn initialize_pool_data(
    reward_duration: u64,
    pool_nonce: u8,
    unstake_penalty_basis_points: u16,
    locking_duration: u64,
) -> Result<Vec<u8>> {
    StakingInstruction::InitializePool(InitializePoolArgs {
        reward_duration,
        pool_nonce,
        unstake_penalty_basis_points,
        locking_duration,
    })
    .pack()
}

pub fn create_user_data(nonce: u8) -> Result<Vec<u8>> {
    StakingInstruction::CreateUser(CreateUserArgs { nonce }).pack()
}

pub fn stake_data(amount: u64) -> Result<Vec<u8>> {
    StakingInstruction::Stake(AmountArgs { amount }).pack()
}

pub fn unstake_data(amount: u64) -> Result<Vec<u8>> {
    StakingInstruction::Unstake(AmountArgs { amount }).pack()
}

pub fn claim_rewards_data() -> Vec<u8> {
    vec![IX_CLAIM_REWARDS]
}

pub fn add_funder_data() -> Vec<u8> {
    vec![IX_ADD_FUNDER]
}

pub fn remove_funder_data() -> Vec<u8> {
    vec![IX_REMOVE_FUNDER]
}

pub fn fund_pool_data(amount: u64, extend_duration: u64) -> Result<Vec<u8>> {
    StakingInstruction::FundPool(FundPoolArgs {
        amount,
        extend_duration,
    })
    .pack()
}

pub fn close_pool_data() -> Vec<u8> {
    vec![IX_CLOSE_POOL]
}

pub fn close_user_data() -> Vec<u8> {
    vec![IX_CLOSE_USER]
}

// ── Instruction Builders ────────────────────────────────────────────────────

/// Pool account keys needed when creating a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolAccounts {
    pub staking_mint: Pubkey,
    pub staking_vault: Pubkey,
    pub reward_mint: Pubkey,
    pub reward_vault: Pubkey,
    pub penalty_deposit_account: Pubkey,
}

/// Initialize the pool at `ctx.pool`. The nonce is the pool signer bump.
///
/// Accounts:
///   0. `[signer]` owner
///   1. `[writable]` pool
///   2. `[]` staking mint
///   3. `[writable]` staking vault
///   4. `[]` reward mint
///   5. `[writable]` reward vault
///   6. `[]` token_program
///   7. `[]` penalty deposit account
pub fn create_initialize_pool_instruction(
    ctx: &StakingContext,
    owner: &Pubkey,
    accounts: &PoolAccounts,
    reward_duration: u64,
    unstake_penalty_basis_points: u16,
    locking_duration: u64,
) -> Result<Instruction> {
    let (_, pool_nonce) = ctx.find_pool_signer();
    let data = initialize_pool_data(
        reward_duration,
        pool_nonce,
        unstake_penalty_basis_points,
        locking_duration,
    )?;

    Ok(Instruction {
        program_id: ctx.program_id,
        accounts: vec![
            AccountMeta::new_readonly(*owner, true),
            AccountMeta::new(ctx.pool, false),
            AccountMeta::new_readonly(accounts.staking_mint, false),
            AccountMeta::new(accounts.staking_vault, false),
            AccountMeta::new_readonly(accounts.reward_mint, false),
            AccountMeta::new(accounts.reward_vault, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(accounts.penalty_deposit_account, false),
        ],
        data,
    })
}

/// Create the wallet's user storage PDA.
///
/// Accounts:
///   0. `[signer]` wallet
///   1. `[writable]` user storage PDA
///   2. `[writable]` pool
///   3. `[]` system_program
pub fn create_create_user_instruction(ctx: &StakingContext, wallet: &Pubkey) -> Result<Instruction> {
    let (user_storage, nonce) = ctx.find_user_storage(wallet);
    let data = create_user_data(nonce)?;

    Ok(Instruction {
        program_id: ctx.program_id,
        accounts: vec![
            AccountMeta::new_readonly(*wallet, true),
            AccountMeta::new(user_storage, false),
            AccountMeta::new(ctx.pool, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data,
    })
}

/// Stake from the wallet's staking-mint ATA.
///
/// Accounts:
///   0. `[signer]` wallet
///   1. `[writable]` user storage PDA
///   2. `[writable]` pool
///   3. `[writable]` staking vault
///   4. `[writable]` wallet staking ATA
///   5. `[]` token_program
pub fn create_stake_instruction(
    ctx: &StakingContext,
    pool: &PoolRecord,
    wallet: &Pubkey,
    amount: u64,
) -> Result<Instruction> {
    let (user_storage, _) = ctx.find_user_storage(wallet);
    let source = ctx.user_token_account(wallet, &pool.staking_mint);
    let data = stake_data(amount)?;

    Ok(Instruction {
        program_id: ctx.program_id,
        accounts: vec![
            AccountMeta::new_readonly(*wallet, true),
            AccountMeta::new(user_storage, false),
            AccountMeta::new(ctx.pool, false),
            AccountMeta::new(pool.staking_vault, false),
            AccountMeta::new(source, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data,
    })
}

/// Unstake into the wallet's staking-mint ATA.
///
/// Accounts:
///   0. `[signer]` wallet
///   1. `[writable]` user storage PDA
///   2. `[writable]` pool
///   3. `[writable]` staking vault
///   4. `[writable]` wallet staking ATA
///   5. `[]` pool signer PDA
///   6. `[]` token_program
///   7. `[writable]` penalty deposit account
pub fn create_unstake_instruction(
    ctx: &StakingContext,
    pool: &PoolRecord,
    wallet: &Pubkey,
    amount: u64,
) -> Result<Instruction> {
    let (user_storage, _) = ctx.find_user_storage(wallet);
    let (pool_signer, _) = ctx.find_pool_signer();
    let destination = ctx.user_token_account(wallet, &pool.staking_mint);
    let data = unstake_data(amount)?;

    Ok(Instruction {
        program_id: ctx.program_id,
        accounts: vec![
            AccountMeta::new_readonly(*wallet, true),
            AccountMeta::new(user_storage, false),
            AccountMeta::new(ctx.pool, false),
            AccountMeta::new(pool.staking_vault, false),
            AccountMeta::new(destination, false),
            AccountMeta::new_readonly(pool_signer, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new(pool.penalty_deposit_account, false),
        ],
        data,
    })
}

/// Claim pending rewards into the wallet's reward-mint ATA.
///
/// Accounts:
///   0. `[signer]` wallet
///   1. `[writable]` user storage PDA
///   2. `[writable]` pool
///   3. `[writable]` staking vault
///   4. `[writable]` reward vault
///   5. `[writable]` wallet reward ATA
///   6. `[]` pool signer PDA
///   7. `[]` token_program
pub fn create_claim_rewards_instruction(
    ctx: &StakingContext,
    pool: &PoolRecord,
    wallet: &Pubkey,
) -> Instruction {
    let (user_storage, _) = ctx.find_user_storage(wallet);
    let (pool_signer, _) = ctx.find_pool_signer();
    let destination = ctx.user_token_account(wallet, &pool.reward_mint);

    Instruction {
        program_id: ctx.program_id,
        accounts: vec![
            AccountMeta::new_readonly(*wallet, true),
            AccountMeta::new(user_storage, false),
            AccountMeta::new(ctx.pool, false),
            AccountMeta::new(pool.staking_vault, false),
            AccountMeta::new(pool.reward_vault, false),
            AccountMeta::new(destination, false),
            AccountMeta::new_readonly(pool_signer, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data: claim_rewards_data(),
    }
}

fn funder_instruction(ctx: &StakingContext, owner: &Pubkey, funder: &Pubkey, data: Vec<u8>) -> Instruction {
    Instruction {
        program_id: ctx.program_id,
        accounts: vec![
            AccountMeta::new_readonly(*owner, true),
            AccountMeta::new(ctx.pool, false),
            AccountMeta::new_readonly(*funder, false),
        ],
        data,
    }
}

/// Register a funder.
///
/// Accounts:
///   0. `[signer]` owner
///   1. `[writable]` pool
///   2. `[]` funder wallet
pub fn create_add_funder_instruction(ctx: &StakingContext, owner: &Pubkey, funder: &Pubkey) -> Instruction {
    funder_instruction(ctx, owner, funder, add_funder_data())
}

/// Remove a funder. Same accounts as [`create_add_funder_instruction`].
pub fn create_remove_funder_instruction(ctx: &StakingContext, owner: &Pubkey, funder: &Pubkey) -> Instruction {
    funder_instruction(ctx, owner, funder, remove_funder_data())
}

/// Fund the pool from the funder's reward-mint ATA.
///
/// Accounts:
///   0. `[signer]` funder
///   1. `[writable]` pool
///   2. `[writable]` staking vault
///   3. `[writable]` reward vault
///   4. `[writable]` funder reward ATA
///   5. `[]` token_program
pub fn create_fund_pool_instruction(
    ctx: &StakingContext,
    pool: &PoolRecord,
    funder: &Pubkey,
    amount: u64,
    extend_duration: u64,
) -> Result<Instruction> {
    let source = ctx.user_token_account(funder, &pool.reward_mint);
    let data = fund_pool_data(amount, extend_duration)?;

    Ok(Instruction {
        program_id: ctx.program_id,
        accounts: vec![
            AccountMeta::new_readonly(*funder, true),
            AccountMeta::new(ctx.pool, false),
            AccountMeta::new(pool.staking_vault, false),
            AccountMeta::new(pool.reward_vault, false),
            AccountMeta::new(source, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data,
    })
}

/// Close the pool, refunding both vaults to the owner's ATAs.
///
/// Accounts:
///   0. `[signer]` owner
///   1. `[writable]` staking vault
///   2. `[writable]` owner staking ATA
///   3. `[writable]` reward vault
///   4. `[writable]` owner reward ATA
///   5. `[writable]` pool
///   6. `[]` pool signer PDA
///   7. `[]` token_program
pub fn create_close_pool_instruction(ctx: &StakingContext, pool: &PoolRecord, owner: &Pubkey) -> Instruction {
    let (pool_signer, _) = ctx.find_pool_signer();
    let staking_refund = ctx.user_token_account(owner, &pool.staking_mint);
    let reward_refund = ctx.user_token_account(owner, &pool.reward_mint);

    Instruction {
        program_id: ctx.program_id,
        accounts: vec![
            AccountMeta::new_readonly(*owner, true),
            AccountMeta::new(pool.staking_vault, false),
            AccountMeta::new(staking_refund, false),
            AccountMeta::new(pool.reward_vault, false),
            AccountMeta::new(reward_refund, false),
            AccountMeta::new(ctx.pool, false),
            AccountMeta::new_readonly(pool_signer, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data: close_pool_data(),
    }
}

/// Close the wallet's user storage.
///
/// Accounts:
///   0. `[signer]` wallet
///   1. `[writable]` user storage PDA
///   2. `[writable]` pool
pub fn create_close_user_instruction(ctx: &StakingContext, wallet: &Pubkey) -> Instruction {
    let (user_storage, _) = ctx.find_user_storage(wallet);

    Instruction {
        program_id: ctx.program_id,
        accounts: vec![
            AccountMeta::new_readonly(*wallet, true),
            AccountMeta::new(user_storage, false),
            AccountMeta::new(ctx.pool, false),
        ],
        data: close_user_data(),
    }
}

// ---- Tests ----
