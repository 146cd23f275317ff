//! Clan membership and shared-bank engine for a multiplayer game server.
//!
//! This crate provides:
//! - Clan lifecycle: create, disband, tags, rosters
//! - Membership state machine: invites, joining, leaving, kicks, ranks
//! - A money-conserving clan bank with daily compounding interest
//! - Pluggable persistence and external economy/presence collaborators
//!
//! # Quick Start
//!
//! ```ignore
//! use clans_core::{
//!     ClanService, JsonFileStore, SchedulerConfig, StaticPresence,
//!     spawn_interest_scheduler,
//! };
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let clans = JsonFileStore::load("data/clans.json")?;
//!     let members = JsonFileStore::load("data/members.json")?;
//!     let presence = StaticPresence::new(["Avia", "Bren"]);
//!
//!     let service = Arc::new(Mutex::new(ClanService::new(clans, members, presence)));
//!     let scheduler = spawn_interest_scheduler(Arc::clone(&service), SchedulerConfig::default());
//!
//!     service.lock().await.create_clan("Avia", "Embers")?;
//!
//!     // On shutdown: stop the scheduler and flush the stores.
//!     scheduler.abort();
//!     service.lock().await.flush()?;
//!     Ok(())
//! }
//! ```

pub mod clan;
pub mod command;
pub mod economy;
pub mod error;
pub mod ledger;
pub mod membership;
pub mod presence;
pub mod registry;
pub mod scheduler;
pub mod service;
pub mod store;
pub mod testing;

// Primary public API
pub use clan::{Clan, ClanHome, Member, Role, DAILY_INTEREST_RATE};
pub use command::{Command, Reply};
pub use economy::{MockWallet, WalletError, WalletGateway};
pub use error::{ClanError, ErrorKind};
pub use ledger::{AccrualReport, BankReport, DepositReceipt, MemberBalance, WithdrawReceipt};
pub use membership::InviteReceipt;
pub use presence::{PresenceDirectory, StaticPresence};
pub use registry::{ClanInfo, ClanRoster, ClanSummary};
pub use scheduler::{spawn_interest_scheduler, SchedulerConfig};
pub use service::ClanService;
pub use store::{JsonFileStore, MemoryStore, RecordStore, StoreError};
pub use testing::TestHarness;
