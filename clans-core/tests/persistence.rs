//! Durable-store lifecycle: state survives a restart, invites do not.

use clans_core::{
    Clan, ClanError, ClanService, JsonFileStore, Member, MockWallet, StaticPresence,
};
use tempfile::TempDir;

fn open_service(
    dir: &TempDir,
    online: &[&str],
) -> ClanService<JsonFileStore<Clan>, JsonFileStore<Member>> {
    let clans = JsonFileStore::load(dir.path().join("clans.json")).unwrap();
    let members = JsonFileStore::load(dir.path().join("members.json")).unwrap();
    let presence = StaticPresence::new(online.iter().copied());
    ClanService::new(clans, members, presence).with_wallet(MockWallet::new().with_balance("Avia", 1_000))
}

#[test]
fn state_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let mut service = open_service(&dir, &[]);
        service.create_clan("Avia", "Embers").unwrap();
        service.deposit("Avia", 600).unwrap();
        service.apply_daily_interest().unwrap();
        service.flush().unwrap();
    }

    // "Restart": reload both stores from disk.
    let service = open_service(&dir, &[]);
    let info = service.clan_info("Avia", None).unwrap();
    assert_eq!(info.name, "Embers");
    assert_eq!(info.bank, 612);

    let balance = service.member_balance("Avia").unwrap();
    assert_eq!(balance.deposited, 600);
    assert_eq!(balance.interest, 12);
}

#[test]
fn invites_are_lost_on_restart() {
    let dir = TempDir::new().unwrap();

    {
        let mut service = open_service(&dir, &["Bren"]);
        service.create_clan("Avia", "Embers").unwrap();
        service.invite("Avia", "Bren").unwrap();
        service.flush().unwrap();
    }

    // The clan is back, the invite is not.
    let mut service = open_service(&dir, &["Bren"]);
    assert!(service.clan_info("Bren", Some("Embers")).is_ok());
    assert!(matches!(
        service.accept_invite("Bren"),
        Err(ClanError::NoPendingInvite)
    ));
}
