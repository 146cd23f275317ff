//! Error types for clan operations.
//!
//! Every operation validates before it mutates, so any error here means
//! no state changed. Errors are grouped into coarse categories via
//! [`ClanError::kind`] so a front end can pick severity and formatting
//! without matching every variant.

use crate::economy::WalletError;
use crate::store::StoreError;
use thiserror::Error;

/// Coarse category of a [`ClanError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input from the requester (bad name, bad amount).
    UserInput,
    /// The requester lacks the required role.
    Authorization,
    /// The operation conflicts with current membership state.
    StateConflict,
    /// Money is unavailable, or the economy backend is absent.
    Resource,
    /// A referenced clan, player, or invite does not exist.
    NotFound,
    /// Store failure; not attributable to the requester.
    Internal,
}

/// Errors from clan registry, membership, and ledger operations.
#[derive(Debug, Error)]
pub enum ClanError {
    #[error("Clan name must be {NAME_MIN}-{NAME_MAX} characters (got {len})",
        NAME_MIN = crate::clan::NAME_MIN_LEN,
        NAME_MAX = crate::clan::NAME_MAX_LEN)]
    InvalidNameLength { len: usize },

    #[error("Clan tag must be at most {TAG_MAX} characters (got {len})",
        TAG_MAX = crate::clan::TAG_MAX_LEN)]
    TagTooLong { len: usize },

    #[error("Amount must be positive (got {amount})")]
    NonPositiveAmount { amount: i64 },

    #[error("Only the clan leader can do that")]
    NotLeader,

    #[error("Requires the {required} role")]
    InsufficientRole { required: &'static str },

    #[error("You're already in a clan")]
    AlreadyInClan,

    #[error("You're not in a clan")]
    NotInClan,

    #[error("Clan name '{name}' is already taken")]
    NameTaken { name: String },

    #[error("{name} is already in a clan")]
    TargetAlreadyInClan { name: String },

    #[error("{name} is not in your clan")]
    TargetNotInSameClan { name: String },

    #[error("{name} is the clan leader")]
    TargetIsLeader { name: String },

    #[error("{name} is already an officer")]
    AlreadyOfficer { name: String },

    #[error("{name} is not an officer")]
    TargetNotOfficer { name: String },

    #[error("Leaders cannot leave their clan; disband it instead")]
    IsLeader,

    #[error("Economy backend is not available")]
    NoEconomyBackend,

    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientWalletFunds { balance: i64, requested: i64 },

    #[error("Withdrawal of {requested} exceeds your balance of {available}")]
    ExceedsPersonalBalance { available: i64, requested: i64 },

    #[error("Withdrawal of {requested} exceeds the clan bank of {bank}")]
    ExceedsClanBank { bank: i64, requested: i64 },

    #[error("Player '{name}' not found")]
    TargetNotFound { name: String },

    #[error("You have no pending clan invite")]
    NoPendingInvite,

    #[error("Clan '{name}' no longer exists")]
    ClanNoLongerExists { name: String },

    #[error("Clan '{name}' not found")]
    ClanNotFound { name: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),
}

impl ClanError {
    /// Category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        use ClanError::*;
        match self {
            InvalidNameLength { .. } | TagTooLong { .. } | NonPositiveAmount { .. } => {
                ErrorKind::UserInput
            }
            NotLeader | InsufficientRole { .. } => ErrorKind::Authorization,
            AlreadyInClan
            | NotInClan
            | NameTaken { .. }
            | TargetAlreadyInClan { .. }
            | TargetNotInSameClan { .. }
            | TargetIsLeader { .. }
            | AlreadyOfficer { .. }
            | TargetNotOfficer { .. }
            | IsLeader => ErrorKind::StateConflict,
            NoEconomyBackend
            | InsufficientWalletFunds { .. }
            | ExceedsPersonalBalance { .. }
            | ExceedsClanBank { .. }
            | Wallet(_) => ErrorKind::Resource,
            TargetNotFound { .. } | NoPendingInvite | ClanNoLongerExists { .. }
            | ClanNotFound { .. } => ErrorKind::NotFound,
            Store(_) => ErrorKind::Internal,
        }
    }
}
