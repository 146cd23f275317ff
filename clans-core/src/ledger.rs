//! Clan bank ledger: deposits, withdrawals, and interest accrual.
//!
//! The single arithmetic invariant: a clan's bank always equals the
//! sum of its members' deposited principal plus accrued interest.
//! Every operation here validates fully before it mutates, so the
//! invariant holds after every call, success or failure.

use crate::clan::{daily_interest, Clan, Member, DAILY_INTEREST_RATE};
use crate::error::ClanError;
use crate::service::ClanService;
use crate::store::RecordStore;
use tracing::{info, warn};

/// Result of a successful deposit.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositReceipt {
    pub amount: i64,
    /// The player's total deposited principal after this deposit.
    pub total_deposited: i64,
    /// The clan bank total after this deposit.
    pub clan_bank: i64,
}

/// Result of a successful withdrawal.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawReceipt {
    pub amount: i64,
    /// Portion taken from accrued interest.
    pub from_interest: i64,
    /// Portion taken from deposited principal.
    pub from_principal: i64,
    /// The clan bank total after this withdrawal.
    pub clan_bank: i64,
}

/// A member's personal stake in the clan bank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberBalance {
    pub deposited: i64,
    pub interest: i64,
}

impl MemberBalance {
    /// Total the member could withdraw.
    pub fn total(&self) -> i64 {
        self.deposited + self.interest
    }
}

/// A clan's bank total.
#[derive(Debug, Clone, PartialEq)]
pub struct BankReport {
    pub clan: String,
    pub bank: i64,
    pub daily_rate: f64,
}

/// Outcome of one batch interest pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccrualReport {
    /// Members whose interest grew this pass.
    pub members_credited: usize,
    /// Total interest added across all clan banks.
    pub total_interest: i64,
}

impl<C, M> ClanService<C, M>
where
    C: RecordStore<Clan>,
    M: RecordStore<Member>,
{
    /// Move money from the player's wallet into their clan's bank.
    ///
    /// Debits the wallet, grows the player's deposited principal, and
    /// grows the clan bank by the same amount, all together.
    pub fn deposit(&mut self, player: &str, amount: i64) -> Result<DepositReceipt, ClanError> {
        if self.wallet.is_none() {
            return Err(ClanError::NoEconomyBackend);
        }
        let mut record = self.member_record(player)?;
        if amount <= 0 {
            return Err(ClanError::NonPositiveAmount { amount });
        }

        let mut clan = self.clan_record(&record.clan)?;

        let wallet = self.wallet.as_mut().ok_or(ClanError::NoEconomyBackend)?;
        let balance = wallet.balance(player)?;
        if balance < amount {
            return Err(ClanError::InsufficientWalletFunds {
                balance,
                requested: amount,
            });
        }

        wallet.debit(player, amount)?;
        record.deposited += amount;
        clan.bank += amount;

        let receipt = DepositReceipt {
            amount,
            total_deposited: record.deposited,
            clan_bank: clan.bank,
        };

        let clan_name = record.clan.clone();
        self.members.set(player, record);
        self.clans.set(&clan_name, clan);
        self.flush()?;

        info!(clan = %clan_name, player, amount, "deposit");
        Ok(receipt)
    }

    /// Move money from the clan bank back to the player's wallet.
    ///
    /// A player may withdraw up to their own deposited-plus-interest
    /// total, bounded by the clan bank. Interest is consumed first;
    /// any remainder comes out of deposited principal.
    pub fn withdraw(&mut self, player: &str, amount: i64) -> Result<WithdrawReceipt, ClanError> {
        if self.wallet.is_none() {
            return Err(ClanError::NoEconomyBackend);
        }
        let mut record = self.member_record(player)?;
        if amount <= 0 {
            return Err(ClanError::NonPositiveAmount { amount });
        }

        let available = record.available();
        if amount > available {
            return Err(ClanError::ExceedsPersonalBalance {
                available,
                requested: amount,
            });
        }

        let mut clan = self.clan_record(&record.clan)?;
        if amount > clan.bank {
            return Err(ClanError::ExceedsClanBank {
                bank: clan.bank,
                requested: amount,
            });
        }

        let wallet = self.wallet.as_mut().ok_or(ClanError::NoEconomyBackend)?;
        wallet.credit(player, amount)?;

        let from_interest = amount.min(record.interest);
        let from_principal = amount - from_interest;
        record.interest -= from_interest;
        record.deposited -= from_principal;
        clan.bank -= amount;

        let receipt = WithdrawReceipt {
            amount,
            from_interest,
            from_principal,
            clan_bank: clan.bank,
        };

        let clan_name = record.clan.clone();
        self.members.set(player, record);
        self.clans.set(&clan_name, clan);
        self.flush()?;

        info!(clan = %clan_name, player, amount, "withdrawal");
        Ok(receipt)
    }

    /// The player's personal deposited/interest balance.
    pub fn member_balance(&self, player: &str) -> Result<MemberBalance, ClanError> {
        let record = self.member_record(player)?;
        Ok(MemberBalance {
            deposited: record.deposited,
            interest: record.interest,
        })
    }

    /// The bank total of the player's clan.
    pub fn clan_bank(&self, player: &str) -> Result<BankReport, ClanError> {
        let record = self.member_record(player)?;
        let clan = self.clan_record(&record.clan)?;
        Ok(BankReport {
            clan: record.clan,
            bank: clan.bank,
            daily_rate: DAILY_INTEREST_RATE,
        })
    }

    /// Apply one day of interest to every member with deposits.
    ///
    /// Each member with positive principal gains
    /// `floor(deposited * rate)` interest, and their clan's bank grows
    /// by the same amount. One pass over the member store; both stores
    /// are persisted once at the end, so the durable ledger only ever
    /// reflects complete passes.
    pub fn apply_daily_interest(&mut self) -> Result<AccrualReport, ClanError> {
        let mut report = AccrualReport::default();

        let players: Vec<String> = self.members.all().keys().cloned().collect();
        for player in players {
            let Some(record) = self.members.get(&player).cloned() else {
                continue;
            };
            if record.deposited <= 0 {
                continue;
            }

            let delta = daily_interest(record.deposited);
            if delta == 0 {
                continue;
            }

            // A member pointing at a missing clan means the stores are
            // inconsistent; skip rather than abort the whole pass.
            let Some(mut clan) = self.clans.get(&record.clan).cloned() else {
                warn!(player = %player, clan = %record.clan, "member record references missing clan; skipped");
                continue;
            };

            let mut record = record;
            record.interest += delta;
            clan.bank += delta;
            let clan_name = record.clan.clone();
            self.members.set(&player, record);
            self.clans.set(&clan_name, clan);

            report.members_credited += 1;
            report.total_interest += delta;
        }

        self.flush()?;

        info!(
            members = report.members_credited,
            total = report.total_interest,
            "applied daily interest to clan deposits"
        );
        Ok(report)
    }
}
