//! Save and load of a campaign in the middle of equipment work.

use geoscape_core::aircraft::AircraftSlotId;
use geoscape_core::base::{Base, DefenseKind};
use geoscape_core::campaign::{Campaign, NoticeLog};
use geoscape_core::equip::auto_equip_aircraft;
use geoscape_core::error::GameError;
use geoscape_core::lifecycle::{add_ammo, add_item, begin_removal};
use geoscape_core::persistence::{self, CampaignRecord};
use geoscape_core::slot::SlotPhase;
use geoscape_test_utils::fixtures::{
    Hangar, AVALANCHE, BASE_LAUNCHER, BASE_MISSILES, DROP_TANK, INTERCEPTOR, LASER_TECH,
    LIGHT_ARMOUR, SPARROWHAWK,
};

/// A hangar with work in every phase: operational weapons, one of them
/// being swapped, electronics installing and an armed battery.
fn busy_hangar() -> Hangar {
    let mut hangar = Hangar::new(3);
    hangar.campaign.mark_researched(LASER_TECH);
    auto_equip_aircraft(&mut hangar.campaign, hangar.aircraft, SPARROWHAWK).expect("equips");

    let avalanche = hangar.index(AVALANCHE);
    hangar.with_slot(AircraftSlotId::Weapon(0), |catalog, storage, slot| {
        slot.next_item = Some(avalanche);
        begin_removal(catalog, Some(storage), slot);
    });
    hangar.with_slot(AircraftSlotId::Electronics(0), |catalog, storage, slot| {
        add_item(catalog, Some(storage), slot, DROP_TANK)
    });
    hangar.with_slot(AircraftSlotId::Shield, |catalog, storage, slot| {
        add_item(catalog, Some(storage), slot, LIGHT_ARMOUR)
    });

    let rules = *hangar.campaign.catalog.rules();
    let catalog = hangar.campaign.catalog.clone();
    let base = hangar.campaign.base_mut(hangar.base).expect("base");
    base.has_missile_defense = true;
    let battery = base.add_battery(DefenseKind::Missile, &rules).expect("room");
    base.add_battery(DefenseKind::Missile, &rules).expect("room");
    let Base {
        storage, missiles, ..
    } = base;
    let slot = missiles.get_mut(battery).expect("battery");
    add_item(&catalog, Some(&mut *storage), slot, BASE_LAUNCHER).expect("fits");
    add_ammo(&catalog, Some(storage), slot, BASE_MISSILES).expect("loads");
    slot.ammo_left = 12;

    hangar.run_hours(1);
    hangar
}

fn round_trip(campaign: &Campaign) -> Campaign {
    let bytes = persistence::encode(&CampaignRecord::save(campaign)).expect("encode");
    persistence::decode(&bytes)
        .expect("decode")
        .restore(campaign.catalog.clone())
        .expect("restore")
}

#[test]
fn test_round_trip_reproduces_bases() {
    let hangar = busy_hangar();
    let loaded = round_trip(&hangar.campaign);

    assert_eq!(loaded.hour(), hangar.campaign.hour());
    assert_eq!(loaded.researched, hangar.campaign.researched);
    assert_eq!(loaded.bases, hangar.campaign.bases);

    let (_, aircraft) = loaded.aircraft(hangar.aircraft).expect("aircraft restored");
    let weapon = aircraft.slot(AircraftSlotId::Weapon(0)).expect("weapon");
    assert_eq!(weapon.phase(), SlotPhase::Removing);
    assert_eq!(weapon.next_item, Some(hangar.index(AVALANCHE)));
    assert_eq!(aircraft.stats, hangar.aircraft().stats);
}

#[test]
fn test_loaded_campaign_continues_identically() {
    let mut hangar = busy_hangar();
    let mut loaded = round_trip(&hangar.campaign);
    let mut loaded_log = NoticeLog::default();

    hangar.log.clear();
    for _ in 0..8 {
        hangar.campaign.run_hour(&mut hangar.log);
        loaded.run_hour(&mut loaded_log);
    }

    assert_eq!(loaded.bases, hangar.campaign.bases);
    assert_eq!(loaded_log.notices(), hangar.log.notices());
    assert_eq!(loaded_log.pauses(), hangar.log.pauses());
}

#[test]
fn test_new_purchases_after_load_get_fresh_ids() {
    let hangar = busy_hangar();
    let mut loaded = round_trip(&hangar.campaign);
    let bought = loaded
        .buy_aircraft(hangar.base, INTERCEPTOR)
        .expect("class exists");
    assert_ne!(bought, hangar.aircraft);
}

#[test]
fn test_save_is_stable() {
    let hangar = busy_hangar();
    let first = persistence::encode(&CampaignRecord::save(&hangar.campaign)).expect("encode");
    let loaded = round_trip(&hangar.campaign);
    let second = persistence::encode(&CampaignRecord::save(&loaded)).expect("encode");
    assert_eq!(first, second);
}

#[test]
fn test_tampered_save_is_refused() {
    let hangar = busy_hangar();
    let clean = CampaignRecord::save(&hangar.campaign);

    let mut shield_queued = clean.clone();
    shield_queued.bases[0].aircraft[0].weapons[0].next_item = Some(LIGHT_ARMOUR.to_string());
    let mut overflowing = clean.clone();
    overflowing.bases[0].aircraft[0].weapons[1].installation_time = i32::MIN;
    let mut wrong_rounds = clean;
    wrong_rounds.bases[0].aircraft[0].weapons[1].ammo = Some(BASE_MISSILES.to_string());

    for record in [shield_queued, overflowing, wrong_rounds] {
        let bytes = persistence::encode(&record).expect("encode");
        let decoded = persistence::decode(&bytes).expect("well-formed bytes");
        assert!(matches!(
            decoded.restore(hangar.campaign.catalog.clone()),
            Err(GameError::InvalidState(_))
        ));
    }
}
