//! Clan domain types.
//!
//! Contains the persisted record shapes: the clan itself (leadership,
//! membership sets, shared bank) and the per-player member record
//! (affiliation, role, personal deposits and accrued interest).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Minimum clan name length in characters.
pub const NAME_MIN_LEN: usize = 3;

/// Maximum clan name length in characters.
pub const NAME_MAX_LEN: usize = 16;

/// Maximum clan tag length in characters.
pub const TAG_MAX_LEN: usize = 4;

/// Displayed member capacity. Not enforced when members join.
pub const MEMBER_CAP: usize = 20;

/// Fixed daily interest rate applied to deposited principal.
pub const DAILY_INTEREST_RATE: f64 = 0.02;

/// A member's rank within their clan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Leader,
    Officer,
    Member,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Leader => "Leader",
            Role::Officer => "Officer",
            Role::Member => "Member",
        }
    }

    /// Whether this role may invite and kick members.
    pub fn can_manage_members(&self) -> bool {
        matches!(self, Role::Leader | Role::Officer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A saved clan home location. Currently never set; the teleport
/// feature is not implemented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClanHome {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A clan record, keyed in the clan store by its unique name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clan {
    /// The clan leader. Always present in `members`.
    pub leader: String,

    /// Short display tag, at most [`TAG_MAX_LEN`] characters.
    pub tag: String,

    /// All member names, including the leader.
    pub members: BTreeSet<String>,

    /// Officer names. Subset of `members`, never contains the leader.
    pub officers: BTreeSet<String>,

    /// Shared bank total in whole currency units.
    ///
    /// Always equals the sum of every member's deposited principal
    /// plus accrued interest.
    pub bank: i64,

    /// Creation time as unix seconds.
    pub created: u64,

    /// Optional home location (unused feature stub).
    #[serde(default)]
    pub home: Option<ClanHome>,
}

impl Clan {
    /// Create a fresh clan founded by `leader` at `now` (unix seconds).
    ///
    /// The tag is auto-derived from the first [`TAG_MAX_LEN`] characters
    /// of the name; the founder is the only member.
    pub fn found(name: &str, leader: impl Into<String>, now: u64) -> Self {
        let leader = leader.into();
        let mut members = BTreeSet::new();
        members.insert(leader.clone());

        Self {
            leader,
            tag: derive_tag(name),
            members,
            officers: BTreeSet::new(),
            bank: 0,
            created: now,
            home: None,
        }
    }
}

/// Derive the default clan tag from a clan name.
pub fn derive_tag(name: &str) -> String {
    name.chars().take(TAG_MAX_LEN).collect()
}

/// A per-player membership record, keyed in the member store by
/// player name. A player has at most one record at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Name of the clan this player belongs to.
    pub clan: String,

    /// The player's rank within that clan.
    pub role: Role,

    /// Principal the player has deposited into the clan bank.
    pub deposited: i64,

    /// Interest accrued on deposits, not yet withdrawn.
    pub interest: i64,

    /// Join time as unix seconds.
    pub joined: u64,
}

impl Member {
    /// Record for a clan founder.
    pub fn founder(clan: impl Into<String>, now: u64) -> Self {
        Self {
            clan: clan.into(),
            role: Role::Leader,
            deposited: 0,
            interest: 0,
            joined: now,
        }
    }

    /// Record for a newly recruited member.
    pub fn recruit(clan: impl Into<String>, now: u64) -> Self {
        Self {
            clan: clan.into(),
            role: Role::Member,
            deposited: 0,
            interest: 0,
            joined: now,
        }
    }

    /// Total the member could withdraw: principal plus interest.
    pub fn available(&self) -> i64 {
        self.deposited + self.interest
    }
}

/// One day's interest on a deposited principal, truncated to whole units.
pub fn daily_interest(deposited: i64) -> i64 {
    (deposited as f64 * DAILY_INTEREST_RATE) as i64
}
