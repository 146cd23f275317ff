//! Test utilities for the clan engine.
//!
//! Provides a fully in-memory [`TestHarness`] (memory stores, mock
//! wallet, static presence) plus assertion helpers for the two
//! structural invariants: bank conservation and single leadership.

use crate::clan::{Clan, Member, Role};
use crate::economy::{MockWallet, WalletGateway};
use crate::presence::StaticPresence;
use crate::service::ClanService;
use crate::store::{MemoryStore, RecordStore};

/// An in-memory clan service wired with mock collaborators.
pub struct TestHarness {
    pub service: ClanService<MemoryStore<Clan>, MemoryStore<Member>>,
}

impl TestHarness {
    /// Harness with a mock wallet and nobody online.
    pub fn new() -> Self {
        Self::with_online(std::iter::empty::<&str>())
    }

    /// Harness with a mock wallet and the given players online
    /// (required for invites).
    pub fn with_online(online: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let service = ClanService::new(
            MemoryStore::new(),
            MemoryStore::new(),
            StaticPresence::new(online),
        )
        .with_wallet(MockWallet::new());
        Self { service }
    }

    /// Harness with no economy backend hooked.
    pub fn without_economy() -> Self {
        let service = ClanService::new(
            MemoryStore::new(),
            MemoryStore::new(),
            StaticPresence::default(),
        );
        Self { service }
    }

    /// Put money in a player's wallet.
    #[track_caller]
    pub fn fund(&mut self, player: &str, amount: i64) {
        self.service
            .wallet
            .as_mut()
            .expect("harness has a wallet")
            .credit(player, amount)
            .expect("mock wallet credit cannot fail");
    }

    /// A player's current wallet balance.
    #[track_caller]
    pub fn wallet_balance(&self, player: &str) -> i64 {
        self.service
            .wallet
            .as_ref()
            .expect("harness has a wallet")
            .balance(player)
            .expect("mock wallet balance cannot fail")
    }

    /// Invite `target` (who must be online) and accept on their behalf.
    #[track_caller]
    pub fn recruit(&mut self, inviter: &str, target: &str) {
        self.service
            .invite(inviter, target)
            .expect("invite should succeed");
        self.service
            .accept_invite(target)
            .expect("accept should succeed");
    }

    /// A player's current role, if they are in a clan.
    pub fn role_of(&self, player: &str) -> Option<Role> {
        self.service.members.get(player).map(|m| m.role)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert a clan's bank equals the sum of its members' deposits plus
/// interest.
#[track_caller]
pub fn assert_bank_consistent<C, M>(service: &ClanService<C, M>, clan: &str)
where
    C: RecordStore<Clan>,
    M: RecordStore<Member>,
{
    let record = service.clans.get(clan).expect("clan should exist");
    let total: i64 = record
        .members
        .iter()
        .filter_map(|name| service.members.get(name))
        .map(|m| m.deposited + m.interest)
        .sum();
    assert_eq!(
        record.bank, total,
        "clan '{clan}' bank {} != member deposits+interest {total}",
        record.bank
    );
}

/// Assert a clan has exactly one leader, who is a member and not an
/// officer.
#[track_caller]
pub fn assert_single_leader<C, M>(service: &ClanService<C, M>, clan: &str)
where
    C: RecordStore<Clan>,
    M: RecordStore<Member>,
{
    let record = service.clans.get(clan).expect("clan should exist");

    let leaders: Vec<&String> = record
        .members
        .iter()
        .filter(|name| {
            service
                .members
                .get(name)
                .map(|m| m.role == Role::Leader)
                .unwrap_or(false)
        })
        .collect();
    assert_eq!(
        leaders,
        vec![&record.leader],
        "clan '{clan}' must have exactly one leader"
    );
    assert!(
        record.members.contains(&record.leader),
        "leader of '{clan}' must be a member"
    );
    assert!(
        !record.officers.contains(&record.leader),
        "leader of '{clan}' must not be an officer"
    );
}
