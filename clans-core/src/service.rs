//! ClanService - the application context shared by every engine.
//!
//! One long-lived instance owns the two persisted stores (clans,
//! members), the in-memory invite table, and handles to the external
//! collaborators. Registry, membership, and ledger operations are
//! implemented on this type in their own modules.
//!
//! All operations run to completion synchronously; hosts on a
//! concurrent runtime serialize them behind a single
//! `tokio::sync::Mutex` (the interest scheduler takes the same lock).

use crate::clan::{Clan, Member, DAILY_INTEREST_RATE};
use crate::economy::WalletGateway;
use crate::error::ClanError;
use crate::presence::PresenceDirectory;
use crate::store::RecordStore;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// The clan engine context.
///
/// Generic over the clan and member store implementations so tests can
/// run fully in memory while production uses durable stores.
pub struct ClanService<C, M> {
    pub(crate) clans: C,
    pub(crate) members: M,

    /// Pending invites: invitee name -> clan name. Never persisted;
    /// invites are lost on restart.
    pub(crate) invites: HashMap<String, String>,

    pub(crate) wallet: Option<Box<dyn WalletGateway>>,
    pub(crate) presence: Box<dyn PresenceDirectory>,
}

impl<C, M> ClanService<C, M>
where
    C: RecordStore<Clan>,
    M: RecordStore<Member>,
{
    /// Build a service from pre-loaded stores. Starts with no economy
    /// backend; hook one with [`with_wallet`](Self::with_wallet).
    pub fn new(clans: C, members: M, presence: impl PresenceDirectory + 'static) -> Self {
        info!(
            clans = clans.len(),
            members = members.len(),
            rate_percent = DAILY_INTEREST_RATE * 100.0,
            "clan service ready"
        );

        Self {
            clans,
            members,
            invites: HashMap::new(),
            wallet: None,
            presence: Box::new(presence),
        }
    }

    /// Hook the external economy backend, enabling deposit/withdraw.
    pub fn with_wallet(mut self, wallet: impl WalletGateway + 'static) -> Self {
        info!("economy backend hooked");
        self.wallet = Some(Box::new(wallet));
        self
    }

    /// Whether deposit/withdraw are available.
    pub fn has_economy(&self) -> bool {
        self.wallet.is_some()
    }

    /// Number of pending invites.
    pub fn pending_invites(&self) -> usize {
        self.invites.len()
    }

    /// The clan a player would join if they accepted their invite.
    pub fn invite_for(&self, player: &str) -> Option<&str> {
        self.invites.get(player).map(String::as_str)
    }

    /// Flush both stores to durable storage. Called on shutdown and
    /// after every mutating operation.
    pub fn flush(&self) -> Result<(), ClanError> {
        self.clans.save()?;
        self.members.save()?;
        Ok(())
    }

    /// Look up the requester's member record.
    pub(crate) fn member_record(&self, player: &str) -> Result<Member, ClanError> {
        self.members.get(player).cloned().ok_or(ClanError::NotInClan)
    }

    /// Look up a clan record. Missing clans referenced by a member
    /// record indicate store inconsistency.
    pub(crate) fn clan_record(&self, name: &str) -> Result<Clan, ClanError> {
        self.clans
            .get(name)
            .cloned()
            .ok_or_else(|| ClanError::ClanNotFound {
                name: name.to_string(),
            })
    }

    /// Current time as unix seconds.
    pub(crate) fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
