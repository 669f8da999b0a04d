//! Staking pool SDK: account codecs, reward projections, unstake policy and
//! instruction builders for the staking program.
//!
//! Everything is synchronous and pure. Callers fetch account bytes and vault
//! balances, pass them in with a timestamp, and submit the instructions built
//! here themselves.

pub mod constants;
pub mod context;
pub mod error;
pub mod fixed_point;
pub mod funders;
pub mod instruction;
pub mod policy;
pub mod rewards;
pub mod state;
pub mod view;

pub use context::StakingContext;
pub use error::{Result, StakingSdkError};
pub use state::{AccountRecord, AccountType, PoolRecord, UserRecord};
