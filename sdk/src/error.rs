use solana_program::program_error::ProgramError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StakingSdkError {
    #[error("Buffer too short: expected {expected} bytes, got {actual}")]
    TruncatedBuffer { expected: usize, actual: usize },
    #[error("Account type mismatch: expected {expected}, found {found}")]
    AccountTypeMismatch { expected: u8, found: u8 },
    #[error("Unknown account type tag {0}")]
    UnknownAccountType(u8),
    #[error("Account data could not be deserialized: {0}")]
    Deserialize(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Pool does not exist")]
    PoolNotFound,
    #[error("Wallet is not authorized to fund this pool")]
    UnauthorizedFunder,
    #[error("System clock unavailable: {0}")]
    ClockUnavailable(String),
    #[error("Funder registry is full")]
    RegistryFull,
    #[error("Funder already present")]
    DuplicateFunder,
    #[error("Funder is not present in funder list")]
    FunderNotFound,
    #[error("Sentinel address cannot be used as a funder")]
    InvalidFunder,
    #[error("Pool owner cannot be removed from funders")]
    CannotRemoveOwner,
    #[error("Stake is locked until {unlocks_at}")]
    StillLocked { unlocks_at: u64 },
    #[error("Amount must be greater than zero")]
    ZeroAmount,
    #[error("Insufficient staked balance: requested {requested}, staked {staked}")]
    InsufficientStake { requested: u64, staked: u64 },
    #[error("Unstake penalty of {0} bps exceeds 10000")]
    InvalidBasisPoints(u16),
    #[error("Pool can have either an unstake penalty or a locking duration")]
    PenaltyAndLockExclusive,
    #[error("Reward duration too short")]
    DurationTooShort,
    #[error("User balance or pending reward is non-zero")]
    UserBalanceNonZero,
    #[error("Pool still active")]
    PoolStillActive,
    #[error("Invalid instruction data")]
    InvalidInstruction,
    #[error("Invalid configuration {key}: {reason}")]
    InvalidConfig { key: String, reason: String },
}

impl StakingSdkError {
    /// Stable numeric code, used when surfacing the error as a `ProgramError`.
    pub fn code(&self) -> u32 {
        match self {
            Self::TruncatedBuffer { .. } => 0,
            Self::AccountTypeMismatch { .. } => 1,
            Self::Deserialize(_) => 2,
            Self::DivisionByZero => 3,
            Self::ArithmeticOverflow => 4,
            Self::InvalidAmount(_) => 5,
            Self::PoolNotFound => 6,
            Self::RegistryFull => 7,
            Self::DuplicateFunder => 8,
            Self::FunderNotFound => 9,
            Self::InvalidFunder => 10,
            Self::CannotRemoveOwner => 11,
            Self::StillLocked { .. } => 12,
            Self::ZeroAmount => 13,
            Self::InsufficientStake { .. } => 14,
            Self::InvalidBasisPoints(_) => 15,
            Self::PenaltyAndLockExclusive => 16,
            Self::DurationTooShort => 17,
            Self::UserBalanceNonZero => 18,
            Self::PoolStillActive => 19,
            Self::InvalidInstruction => 20,
            Self::InvalidConfig { .. } => 21,
            Self::UnauthorizedFunder => 22,
            Self::ClockUnavailable(_) => 23,
            Self::UnknownAccountType(_) => 24,
        }
    }
}

impl From<StakingSdkError> for ProgramError {
    fn from(e: StakingSdkError) -> Self {
        ProgramError::Custom(e.code())
    }
}

impl From<std::io::Error> for StakingSdkError {
    fn from(e: std::io::Error) -> Self {
        StakingSdkError::Deserialize(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StakingSdkError>;
