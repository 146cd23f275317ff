//! Clan lifecycle: create, disband, tag changes, and read-only queries.

use crate::clan::{Clan, Member, MEMBER_CAP, NAME_MAX_LEN, NAME_MIN_LEN, TAG_MAX_LEN};
use crate::error::ClanError;
use crate::service::ClanService;
use crate::store::RecordStore;
use tracing::info;

/// Display data for a single clan.
#[derive(Debug, Clone, PartialEq)]
pub struct ClanInfo {
    pub name: String,
    pub tag: String,
    pub leader: String,
    pub member_count: usize,
    /// Displayed capacity; joining is not blocked when it is reached.
    pub member_cap: usize,
    pub bank: i64,
    pub created: u64,
}

/// One row of the top-clans listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ClanSummary {
    pub name: String,
    pub tag: String,
    pub bank: i64,
}

/// A clan's membership grouped by rank.
#[derive(Debug, Clone, PartialEq)]
pub struct ClanRoster {
    pub clan: String,
    pub leader: String,
    pub officers: Vec<String>,
    /// Members who are neither the leader nor officers.
    pub members: Vec<String>,
}

impl<C, M> ClanService<C, M>
where
    C: RecordStore<Clan>,
    M: RecordStore<Member>,
{
    /// Found a new clan led by `requester`.
    ///
    /// The requester must not already belong to a clan, the name must
    /// be unused and within length limits. The tag starts as the first
    /// four characters of the name.
    pub fn create_clan(&mut self, requester: &str, name: &str) -> Result<Clan, ClanError> {
        if self.members.exists(requester) {
            return Err(ClanError::AlreadyInClan);
        }

        let len = name.chars().count();
        if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
            return Err(ClanError::InvalidNameLength { len });
        }

        if self.clans.exists(name) {
            return Err(ClanError::NameTaken {
                name: name.to_string(),
            });
        }

        let now = Self::now();
        let clan = Clan::found(name, requester, now);
        self.clans.set(name, clan.clone());
        self.members.set(requester, Member::founder(name, now));
        self.flush()?;

        info!(clan = name, leader = requester, "clan created");
        Ok(clan)
    }

    /// Disband the requester's clan.
    ///
    /// Leader only. Removes the clan record and every member record of
    /// its current member set as one logical transaction.
    pub fn disband_clan(&mut self, requester: &str) -> Result<Clan, ClanError> {
        let record = self.member_record(requester)?;
        if requester != self.clan_record(&record.clan)?.leader {
            return Err(ClanError::NotLeader);
        }

        let clan = self
            .clans
            .remove(&record.clan)
            .ok_or_else(|| ClanError::ClanNotFound {
                name: record.clan.clone(),
            })?;
        for member in &clan.members {
            self.members.remove(member);
        }
        self.flush()?;

        info!(
            clan = %record.clan,
            members = clan.members.len(),
            "clan disbanded"
        );
        Ok(clan)
    }

    /// Change the clan's display tag. Leader only, at most four
    /// characters. Uniqueness is not checked.
    pub fn set_tag(&mut self, requester: &str, tag: &str) -> Result<(), ClanError> {
        let record = self.member_record(requester)?;
        let mut clan = self.clan_record(&record.clan)?;
        if requester != clan.leader {
            return Err(ClanError::NotLeader);
        }

        let len = tag.chars().count();
        if len > TAG_MAX_LEN {
            return Err(ClanError::TagTooLong { len });
        }

        clan.tag = tag.to_string();
        self.clans.set(&record.clan, clan);
        self.clans.save()?;
        Ok(())
    }

    /// Info for a named clan, or the requester's own clan when `name`
    /// is absent.
    pub fn clan_info(&self, requester: &str, name: Option<&str>) -> Result<ClanInfo, ClanError> {
        let name = match name {
            Some(name) => {
                if !self.clans.exists(name) {
                    return Err(ClanError::ClanNotFound {
                        name: name.to_string(),
                    });
                }
                name.to_string()
            }
            None => self.member_record(requester)?.clan,
        };
        let clan = self.clan_record(&name)?;

        Ok(ClanInfo {
            name,
            tag: clan.tag,
            leader: clan.leader,
            member_count: clan.members.len(),
            member_cap: MEMBER_CAP,
            bank: clan.bank,
            created: clan.created,
        })
    }

    /// All clans ordered by bank total, richest first. Ties break by
    /// name so the ordering is stable.
    pub fn top_clans(&self) -> Vec<ClanSummary> {
        let mut summaries: Vec<ClanSummary> = self
            .clans
            .all()
            .iter()
            .map(|(name, clan)| ClanSummary {
                name: name.clone(),
                tag: clan.tag.clone(),
                bank: clan.bank,
            })
            .collect();
        summaries.sort_by(|a, b| b.bank.cmp(&a.bank).then_with(|| a.name.cmp(&b.name)));
        summaries
    }

    /// The requester's clan membership grouped by rank.
    pub fn roster(&self, requester: &str) -> Result<ClanRoster, ClanError> {
        let record = self.member_record(requester)?;
        let clan = self.clan_record(&record.clan)?;

        let officers: Vec<String> = clan.officers.iter().cloned().collect();
        let members: Vec<String> = clan
            .members
            .iter()
            .filter(|m| **m != clan.leader && !clan.officers.contains(*m))
            .cloned()
            .collect();

        Ok(ClanRoster {
            clan: record.clan,
            leader: clan.leader,
            officers,
            members,
        })
    }
}
