//! Typed command surface consumed by the chat front end.
//!
//! The front end parses `/clan ...` text into a [`Command`], dispatches
//! it here on behalf of a player, and renders the structured [`Reply`]
//! (or [`ClanError`]) however it likes. Each command maps 1:1 onto one
//! engine operation; no formatting or help text lives in the core.

use crate::clan::{Clan, Member};
use crate::error::ClanError;
use crate::ledger::{BankReport, DepositReceipt, MemberBalance, WithdrawReceipt};
use crate::registry::{ClanInfo, ClanRoster, ClanSummary};
use crate::service::ClanService;
use crate::store::RecordStore;

/// Number of clans shown by the top-clans listing.
pub const TOP_CLANS_SHOWN: usize = 10;

/// A parsed clan command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create { name: String },
    Disband,
    Invite { target: String },
    Accept,
    Deny,
    Leave,
    Kick { target: String },
    Promote { target: String },
    Demote { target: String },
    Deposit { amount: i64 },
    Withdraw { amount: i64 },
    Balance,
    Bank,
    Info { clan: Option<String> },
    List,
    Members,
    SetTag { tag: String },
}

/// Structured result of a successful command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    ClanCreated {
        name: String,
        tag: String,
        leader: String,
    },
    /// Includes the final member list so the front end can notify them.
    ClanDisbanded {
        name: String,
        members: Vec<String>,
    },
    InviteSent {
        target: String,
        clan: String,
    },
    InviteAccepted {
        clan: String,
    },
    InviteDenied {
        clan: String,
    },
    LeftClan {
        clan: String,
    },
    Kicked {
        target: String,
        clan: String,
    },
    Promoted {
        target: String,
    },
    Demoted {
        target: String,
    },
    Deposited(DepositReceipt),
    Withdrawn(WithdrawReceipt),
    Balance(MemberBalance),
    Bank(BankReport),
    Info(ClanInfo),
    TopClans(Vec<ClanSummary>),
    Roster(ClanRoster),
    TagSet {
        tag: String,
    },
}

impl<C, M> ClanService<C, M>
where
    C: RecordStore<Clan>,
    M: RecordStore<Member>,
{
    /// Execute one command on behalf of `player`.
    pub fn dispatch(&mut self, player: &str, command: Command) -> Result<Reply, ClanError> {
        match command {
            Command::Create { name } => {
                let clan = self.create_clan(player, &name)?;
                Ok(Reply::ClanCreated {
                    name,
                    tag: clan.tag,
                    leader: clan.leader,
                })
            }
            Command::Disband => {
                let record = self.member_record(player)?;
                let clan = self.disband_clan(player)?;
                Ok(Reply::ClanDisbanded {
                    name: record.clan,
                    members: clan.members.into_iter().collect(),
                })
            }
            Command::Invite { target } => {
                let receipt = self.invite(player, &target)?;
                Ok(Reply::InviteSent {
                    target: receipt.target,
                    clan: receipt.clan,
                })
            }
            Command::Accept => {
                let clan = self.accept_invite(player)?;
                Ok(Reply::InviteAccepted { clan })
            }
            Command::Deny => {
                let clan = self.deny_invite(player)?;
                Ok(Reply::InviteDenied { clan })
            }
            Command::Leave => {
                let clan = self.leave_clan(player)?;
                Ok(Reply::LeftClan { clan })
            }
            Command::Kick { target } => {
                let clan = self.kick(player, &target)?;
                Ok(Reply::Kicked { target, clan })
            }
            Command::Promote { target } => {
                self.promote(player, &target)?;
                Ok(Reply::Promoted { target })
            }
            Command::Demote { target } => {
                self.demote(player, &target)?;
                Ok(Reply::Demoted { target })
            }
            Command::Deposit { amount } => Ok(Reply::Deposited(self.deposit(player, amount)?)),
            Command::Withdraw { amount } => Ok(Reply::Withdrawn(self.withdraw(player, amount)?)),
            Command::Balance => Ok(Reply::Balance(self.member_balance(player)?)),
            Command::Bank => Ok(Reply::Bank(self.clan_bank(player)?)),
            Command::Info { clan } => Ok(Reply::Info(self.clan_info(player, clan.as_deref())?)),
            Command::List => {
                let mut top = self.top_clans();
                top.truncate(TOP_CLANS_SHOWN);
                Ok(Reply::TopClans(top))
            }
            Command::Members => Ok(Reply::Roster(self.roster(player)?)),
            Command::SetTag { tag } => {
                self.set_tag(player, &tag)?;
                Ok(Reply::TagSet { tag })
            }
        }
    }
}
