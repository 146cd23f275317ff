//! Membership state machine: invites, joining, leaving, and rank changes.
//!
//! Every mutation touches the clan record's membership sets and the
//! player's member record as a pair, then persists both stores; no
//! caller ever observes a half-updated pair.

use crate::clan::{Clan, Member, Role};
use crate::error::ClanError;
use crate::service::ClanService;
use crate::store::RecordStore;
use tracing::info;

/// Result of a successful invite.
#[derive(Debug, Clone, PartialEq)]
pub struct InviteReceipt {
    /// Canonical name of the invited player.
    pub target: String,
    /// Clan the player was invited to.
    pub clan: String,
}

impl<C, M> ClanService<C, M>
where
    C: RecordStore<Clan>,
    M: RecordStore<Member>,
{
    /// Invite an online player to the requester's clan.
    ///
    /// Leaders and officers only. The target is resolved through the
    /// presence directory (prefix match) and must not already be in a
    /// clan anywhere. A new invite overwrites any earlier one held by
    /// the same player.
    pub fn invite(&mut self, requester: &str, target: &str) -> Result<InviteReceipt, ClanError> {
        let record = self.member_record(requester)?;
        if !record.role.can_manage_members() {
            return Err(ClanError::InsufficientRole {
                required: "Leader or Officer",
            });
        }

        let target = self
            .presence
            .find_by_prefix(target)
            .ok_or_else(|| ClanError::TargetNotFound {
                name: target.to_string(),
            })?;

        if self.members.exists(&target) {
            return Err(ClanError::TargetAlreadyInClan { name: target });
        }

        self.invites.insert(target.clone(), record.clan.clone());
        Ok(InviteReceipt {
            target,
            clan: record.clan,
        })
    }

    /// Accept a pending invite and join the clan.
    ///
    /// The invite is consumed whether or not joining succeeds; if the
    /// clan was disbanded in the meantime the player is told so and is
    /// left clanless. A player who joined or founded another clan
    /// since being invited keeps that clan; accepting would otherwise
    /// clobber their member record.
    pub fn accept_invite(&mut self, player: &str) -> Result<String, ClanError> {
        let clan_name = self
            .invites
            .remove(player)
            .ok_or(ClanError::NoPendingInvite)?;

        if self.members.exists(player) {
            return Err(ClanError::AlreadyInClan);
        }

        let Some(mut clan) = self.clans.get(&clan_name).cloned() else {
            return Err(ClanError::ClanNoLongerExists { name: clan_name });
        };

        clan.members.insert(player.to_string());
        self.clans.set(&clan_name, clan);
        self.members
            .set(player, Member::recruit(clan_name.as_str(), Self::now()));
        self.flush()?;

        info!(clan = %clan_name, player, "player joined clan");
        Ok(clan_name)
    }

    /// Decline a pending invite, consuming it.
    pub fn deny_invite(&mut self, player: &str) -> Result<String, ClanError> {
        self.invites
            .remove(player)
            .ok_or(ClanError::NoPendingInvite)
    }

    /// Leave the current clan voluntarily.
    ///
    /// Leaders cannot leave; they must disband instead.
    pub fn leave_clan(&mut self, player: &str) -> Result<String, ClanError> {
        let record = self.member_record(player)?;
        if record.role == Role::Leader {
            return Err(ClanError::IsLeader);
        }

        let mut clan = self.clan_record(&record.clan)?;
        clan.members.remove(player);
        clan.officers.remove(player);
        self.clans.set(&record.clan, clan);
        self.members.remove(player);
        self.flush()?;

        info!(clan = %record.clan, player, "player left clan");
        Ok(record.clan)
    }

    /// Remove a member from the requester's clan.
    ///
    /// Leaders and officers only; the leader cannot be kicked. Players
    /// outside the requester's clan (including unknown names) are
    /// reported as not in the same clan.
    pub fn kick(&mut self, requester: &str, target: &str) -> Result<String, ClanError> {
        let record = self.member_record(requester)?;
        if !record.role.can_manage_members() {
            return Err(ClanError::InsufficientRole {
                required: "Leader or Officer",
            });
        }

        let target_record = self.same_clan_record(&record, target)?;
        if target_record.role == Role::Leader {
            return Err(ClanError::TargetIsLeader {
                name: target.to_string(),
            });
        }

        let mut clan = self.clan_record(&record.clan)?;
        clan.members.remove(target);
        clan.officers.remove(target);
        self.clans.set(&record.clan, clan);
        self.members.remove(target);
        self.flush()?;

        info!(clan = %record.clan, target, by = requester, "player kicked");
        Ok(record.clan)
    }

    /// Promote a clan member to officer. Leader only.
    pub fn promote(&mut self, requester: &str, target: &str) -> Result<(), ClanError> {
        let record = self.member_record(requester)?;
        if record.role != Role::Leader {
            return Err(ClanError::InsufficientRole { required: "Leader" });
        }

        let mut target_record = self.same_clan_record(&record, target)?;
        match target_record.role {
            // The leader never appears in the officer set.
            Role::Leader => {
                return Err(ClanError::TargetIsLeader {
                    name: target.to_string(),
                })
            }
            Role::Officer => {
                return Err(ClanError::AlreadyOfficer {
                    name: target.to_string(),
                })
            }
            Role::Member => {}
        }

        target_record.role = Role::Officer;
        self.members.set(target, target_record);

        let mut clan = self.clan_record(&record.clan)?;
        clan.officers.insert(target.to_string());
        self.clans.set(&record.clan, clan);
        self.flush()?;

        info!(clan = %record.clan, target, "member promoted to officer");
        Ok(())
    }

    /// Demote an officer back to member. Leader only.
    pub fn demote(&mut self, requester: &str, target: &str) -> Result<(), ClanError> {
        let record = self.member_record(requester)?;
        if record.role != Role::Leader {
            return Err(ClanError::InsufficientRole { required: "Leader" });
        }

        let mut target_record = self.same_clan_record(&record, target)?;
        if target_record.role != Role::Officer {
            return Err(ClanError::TargetNotOfficer {
                name: target.to_string(),
            });
        }

        target_record.role = Role::Member;
        self.members.set(target, target_record);

        let mut clan = self.clan_record(&record.clan)?;
        clan.officers.remove(target);
        self.clans.set(&record.clan, clan);
        self.flush()?;

        info!(clan = %record.clan, target, "officer demoted to member");
        Ok(())
    }

    /// A target's member record, required to be in the requester's clan.
    fn same_clan_record(&self, requester: &Member, target: &str) -> Result<Member, ClanError> {
        let target_record =
            self.members
                .get(target)
                .cloned()
                .ok_or_else(|| ClanError::TargetNotInSameClan {
                    name: target.to_string(),
                })?;
        if target_record.clan != requester.clan {
            return Err(ClanError::TargetNotInSameClan {
                name: target.to_string(),
            });
        }
        Ok(target_record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_bank_consistent, assert_single_leader, TestHarness};

    #[test]
    fn test_invite_requires_rank() {
        let mut h = TestHarness::with_online(["Bren", "Cato"]);
        h.service.create_clan("Avia", "Embers").unwrap();
        h.recruit("Avia", "Bren");

        let err = h.service.invite("Bren", "Cato").unwrap_err();
        assert!(matches!(err, ClanError::InsufficientRole { .. }));

        // Officers may invite.
        h.service.promote("Avia", "Bren").unwrap();
        assert!(h.service.invite("Bren", "Cato").is_ok());
    }

    #[test]
    fn test_invite_resolves_by_prefix() {
        let mut h = TestHarness::with_online(["Brenna"]);
        h.service.create_clan("Avia", "Embers").unwrap();

        let receipt = h.service.invite("Avia", "bre").unwrap();
        assert_eq!(receipt.target, "Brenna");
        assert_eq!(receipt.clan, "Embers");
        assert_eq!(h.service.invite_for("Brenna"), Some("Embers"));
    }

    #[test]
    fn test_invite_rejects_offline_and_clanned_targets() {
        let mut h = TestHarness::with_online(["Bren"]);
        h.service.create_clan("Avia", "Embers").unwrap();
        h.recruit("Avia", "Bren");

        assert!(matches!(
            h.service.invite("Avia", "Ghost"),
            Err(ClanError::TargetNotFound { .. })
        ));
        assert!(matches!(
            h.service.invite("Avia", "Bren"),
            Err(ClanError::TargetAlreadyInClan { .. })
        ));
    }

    #[test]
    fn test_later_invite_overwrites_earlier() {
        let mut h = TestHarness::with_online(["Cato"]);
        h.service.create_clan("Avia", "Embers").unwrap();
        h.service.create_clan("Bren", "Ashfall").unwrap();

        h.service.invite("Avia", "Cato").unwrap();
        h.service.invite("Bren", "Cato").unwrap();
        assert_eq!(h.service.pending_invites(), 1);

        let joined = h.service.accept_invite("Cato").unwrap();
        assert_eq!(joined, "Ashfall");
    }

    #[test]
    fn test_accept_consumes_invite_even_when_clan_is_gone() {
        let mut h = TestHarness::with_online(["Bren"]);
        h.service.create_clan("Avia", "Embers").unwrap();
        h.service.invite("Avia", "Bren").unwrap();
        h.service.disband_clan("Avia").unwrap();

        let err = h.service.accept_invite("Bren").unwrap_err();
        assert!(matches!(err, ClanError::ClanNoLongerExists { .. }));

        // Invite was consumed; retrying reports no pending invite.
        assert!(matches!(
            h.service.accept_invite("Bren"),
            Err(ClanError::NoPendingInvite)
        ));
    }

    #[test]
    fn test_accept_rejected_after_joining_elsewhere() {
        let mut h = TestHarness::with_online(["Cato"]);
        h.fund("Cato", 300);
        h.service.create_clan("Avia", "Embers").unwrap();
        h.service.invite("Avia", "Cato").unwrap();

        // Cato founds their own clan while the invite is pending.
        h.service.create_clan("Cato", "Cinder").unwrap();
        h.service.deposit("Cato", 300).unwrap();

        // The stale invite must not clobber Cato's leader record.
        let err = h.service.accept_invite("Cato").unwrap_err();
        assert!(matches!(err, ClanError::AlreadyInClan));

        assert_eq!(h.service.member_record("Cato").unwrap().clan, "Cinder");
        assert_eq!(h.service.member_record("Cato").unwrap().role, Role::Leader);
        assert_eq!(h.service.clan_info("Avia", None).unwrap().member_count, 1);
        assert_single_leader(&h.service, "Cinder");
        assert_single_leader(&h.service, "Embers");
        assert_bank_consistent(&h.service, "Cinder");

        // The invite was still consumed.
        assert!(matches!(
            h.service.accept_invite("Cato"),
            Err(ClanError::NoPendingInvite)
        ));
    }

    #[test]
    fn test_deny_consumes_invite() {
        let mut h = TestHarness::with_online(["Bren"]);
        h.service.create_clan("Avia", "Embers").unwrap();
        h.service.invite("Avia", "Bren").unwrap();

        assert_eq!(h.service.deny_invite("Bren").unwrap(), "Embers");
        assert!(matches!(
            h.service.deny_invite("Bren"),
            Err(ClanError::NoPendingInvite)
        ));
    }

    #[test]
    fn test_leave_clan() {
        let mut h = TestHarness::with_online(["Bren"]);
        h.service.create_clan("Avia", "Embers").unwrap();
        h.recruit("Avia", "Bren");
        h.service.promote("Avia", "Bren").unwrap();

        h.service.leave_clan("Bren").unwrap();
        assert!(matches!(
            h.service.member_record("Bren"),
            Err(ClanError::NotInClan)
        ));
        let roster = h.service.roster("Avia").unwrap();
        assert!(roster.officers.is_empty());
        assert!(roster.members.is_empty());
    }

    #[test]
    fn test_leader_cannot_leave() {
        let mut h = TestHarness::new();
        h.service.create_clan("Avia", "Embers").unwrap();

        assert!(matches!(
            h.service.leave_clan("Avia"),
            Err(ClanError::IsLeader)
        ));
        // No state change.
        assert_eq!(h.service.clan_info("Avia", None).unwrap().member_count, 1);
    }

    #[test]
    fn test_kick_rules() {
        let mut h = TestHarness::with_online(["Bren", "Cato"]);
        h.service.create_clan("Avia", "Embers").unwrap();
        h.recruit("Avia", "Bren");
        h.recruit("Avia", "Cato");
        h.service.promote("Avia", "Bren").unwrap();

        // Plain members cannot kick.
        assert!(matches!(
            h.service.kick("Cato", "Bren"),
            Err(ClanError::InsufficientRole { .. })
        ));
        // Nobody kicks the leader.
        assert!(matches!(
            h.service.kick("Bren", "Avia"),
            Err(ClanError::TargetIsLeader { .. })
        ));

        // Officers kick plain members.
        h.service.kick("Bren", "Cato").unwrap();
        assert!(matches!(
            h.service.member_record("Cato"),
            Err(ClanError::NotInClan)
        ));
    }

    #[test]
    fn test_kick_rejects_members_of_other_clans() {
        let mut h = TestHarness::with_online(["Cato"]);
        h.service.create_clan("Avia", "Embers").unwrap();
        h.service.create_clan("Bren", "Ashfall").unwrap();
        h.recruit("Bren", "Cato");

        // Unknown player and other-clan player both read the same way.
        assert!(matches!(
            h.service.kick("Avia", "Ghost"),
            Err(ClanError::TargetNotInSameClan { .. })
        ));
        assert!(matches!(
            h.service.kick("Avia", "Cato"),
            Err(ClanError::TargetNotInSameClan { .. })
        ));
        // Cato is untouched.
        assert_eq!(h.service.member_record("Cato").unwrap().clan, "Ashfall");
    }

    #[test]
    fn test_promote_and_demote_cycle() {
        let mut h = TestHarness::with_online(["Bren"]);
        h.service.create_clan("Avia", "Embers").unwrap();
        h.recruit("Avia", "Bren");

        h.service.promote("Avia", "Bren").unwrap();
        assert_eq!(h.service.member_record("Bren").unwrap().role, Role::Officer);
        assert!(matches!(
            h.service.promote("Avia", "Bren"),
            Err(ClanError::AlreadyOfficer { .. })
        ));

        h.service.demote("Avia", "Bren").unwrap();
        assert_eq!(h.service.member_record("Bren").unwrap().role, Role::Member);
        assert!(matches!(
            h.service.demote("Avia", "Bren"),
            Err(ClanError::TargetNotOfficer { .. })
        ));

        assert_single_leader(&h.service, "Embers");
    }

    #[test]
    fn test_only_leader_promotes() {
        let mut h = TestHarness::with_online(["Bren", "Cato"]);
        h.service.create_clan("Avia", "Embers").unwrap();
        h.recruit("Avia", "Bren");
        h.recruit("Avia", "Cato");
        h.service.promote("Avia", "Bren").unwrap();

        assert!(matches!(
            h.service.promote("Bren", "Cato"),
            Err(ClanError::InsufficientRole { required: "Leader" })
        ));
    }

    #[test]
    fn test_leader_cannot_be_promoted_into_officer_set() {
        let mut h = TestHarness::new();
        h.service.create_clan("Avia", "Embers").unwrap();

        assert!(matches!(
            h.service.promote("Avia", "Avia"),
            Err(ClanError::TargetIsLeader { .. })
        ));
        assert_single_leader(&h.service, "Embers");
    }
}
