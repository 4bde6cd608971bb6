//! End-to-end slot scenarios on the sample hangar.
//!
//! Each test drives one interceptor slot through the public lifecycle
//! functions and the hourly campaign update.

use geoscape_core::aircraft::AircraftSlotId;
use geoscape_core::campaign::Notice;
use geoscape_core::lifecycle::{add_ammo, add_item, begin_removal, remove_item, EquipError};
use geoscape_core::slot::SlotPhase;
use geoscape_core::stats::AircraftStat;
use geoscape_test_utils::fixtures::{
    Hangar, AVALANCHE, AVALANCHE_AMMO, DROP_TANK, SPARROWHAWK, SPARROWHAWK_AMMO,
};

const LIGHT_WEAPON: AircraftSlotId = AircraftSlotId::Weapon(1);
const MEDIUM_WEAPON: AircraftSlotId = AircraftSlotId::Weapon(0);

fn slot_state(hangar: &Hangar, id: AircraftSlotId) -> geoscape_core::slot::Slot {
    hangar.aircraft().slot(id).expect("slot exists").clone()
}

fn make_operational(hangar: &mut Hangar, id: AircraftSlotId) {
    hangar.with_slot(id, |_, _, slot| slot.installation_time = 0);
}

// =============================================================================
// Adding and removing
// =============================================================================

#[test]
fn scenario_a_add_item_takes_stock_and_starts_timer() {
    let mut hangar = Hangar::new(1);
    let installed = hangar
        .with_slot(LIGHT_WEAPON, |catalog, storage, slot| {
            add_item(catalog, Some(storage), slot, SPARROWHAWK)
        })
        .expect("slot exists")
        .expect("item fits");

    let slot = slot_state(&hangar, LIGHT_WEAPON);
    assert_eq!(slot.item, Some(installed));
    assert_eq!(slot.installation_time, 3);
    assert_eq!(slot.phase(), SlotPhase::Installing);
    assert_eq!(hangar.stock(SPARROWHAWK), 0);
}

#[test]
fn scenario_a_second_add_fails_without_stock() {
    let mut hangar = Hangar::new(1);
    hangar.with_slot(LIGHT_WEAPON, |catalog, storage, slot| {
        add_item(catalog, Some(storage), slot, SPARROWHAWK)
    });
    let result = hangar
        .with_slot(MEDIUM_WEAPON, |catalog, storage, slot| {
            add_item(catalog, Some(storage), slot, SPARROWHAWK)
        })
        .expect("slot exists");
    assert_eq!(result, Err(EquipError::OutOfStock));
    assert!(slot_state(&hangar, MEDIUM_WEAPON).is_empty());
}

#[test]
fn scenario_b_remove_operational_item_returns_it() {
    let mut hangar = Hangar::new(1);
    hangar.with_slot(LIGHT_WEAPON, |catalog, storage, slot| {
        add_item(catalog, Some(storage), slot, SPARROWHAWK)
    });
    make_operational(&mut hangar, LIGHT_WEAPON);
    assert_eq!(hangar.stock(SPARROWHAWK), 0);

    hangar.with_slot(LIGHT_WEAPON, |catalog, storage, slot| {
        remove_item(catalog, Some(storage), slot, false);
    });

    let slot = slot_state(&hangar, LIGHT_WEAPON);
    assert!(slot.is_empty());
    assert_eq!(slot.installation_time, 0);
    assert_eq!(hangar.stock(SPARROWHAWK), 1);
}

#[test]
fn remove_then_re_add_restores_full_timer() {
    let mut hangar = Hangar::new(1);
    hangar.with_slot(LIGHT_WEAPON, |catalog, storage, slot| {
        add_item(catalog, Some(storage), slot, SPARROWHAWK)
    });
    make_operational(&mut hangar, LIGHT_WEAPON);
    hangar.with_slot(LIGHT_WEAPON, |catalog, storage, slot| {
        remove_item(catalog, Some(storage), slot, false);
        add_item(catalog, Some(storage), slot, SPARROWHAWK)
    });

    let slot = slot_state(&hangar, LIGHT_WEAPON);
    assert_eq!(slot.installation_time, 3);
    assert_eq!(hangar.stock(SPARROWHAWK), 0);
}

// =============================================================================
// Hourly update
// =============================================================================

#[test]
fn scenario_c_installation_completes_once() {
    let mut hangar = Hangar::new(1);
    hangar.with_slot(LIGHT_WEAPON, |catalog, storage, slot| {
        add_item(catalog, Some(storage), slot, SPARROWHAWK)
    });
    let accuracy_before = hangar.aircraft().stats.get(AircraftStat::Accuracy);

    hangar.run_hours(2);
    assert_eq!(slot_state(&hangar, LIGHT_WEAPON).installation_time, 1);
    assert!(hangar.log.notices().is_empty());
    assert_eq!(
        hangar.aircraft().stats.get(AircraftStat::Accuracy),
        accuracy_before
    );

    hangar.run_hours(1);
    assert_eq!(slot_state(&hangar, LIGHT_WEAPON).installation_time, 0);
    assert_eq!(hangar.log.notices(), &[Notice::AircraftItemInstalled]);
    assert_eq!(hangar.aircraft().stats.get(AircraftStat::Accuracy), 60);

    hangar.run_hours(5);
    assert_eq!(hangar.log.notices().len(), 1);
    assert_eq!(hangar.log.pauses(), 0);
}

#[test]
fn scenario_d_queued_item_replaces_removed_one() {
    let mut hangar = Hangar::new(1);
    hangar.with_slot(MEDIUM_WEAPON, |catalog, storage, slot| {
        add_item(catalog, Some(storage), slot, SPARROWHAWK)
    });
    let avalanche = hangar.index(AVALANCHE);
    hangar.with_slot(MEDIUM_WEAPON, |catalog, storage, slot| {
        slot.installation_time = 0;
        slot.next_item = Some(avalanche);
        begin_removal(catalog, Some(storage), slot);
    });
    assert_eq!(slot_state(&hangar, MEDIUM_WEAPON).installation_time, -3);

    hangar.run_hours(3);

    let slot = slot_state(&hangar, MEDIUM_WEAPON);
    assert_eq!(slot.item, Some(avalanche));
    assert_eq!(slot.installation_time, 5);
    assert_eq!(slot.next_item, None);
    assert!(hangar.log.notices().is_empty());
    assert_eq!(hangar.log.pauses(), 0);
    assert_eq!(hangar.stock(SPARROWHAWK), 1);
    assert_eq!(hangar.stock(AVALANCHE), 0);
}

#[test]
fn removal_without_queue_notifies_and_pauses() {
    let mut hangar = Hangar::new(1);
    hangar.with_slot(LIGHT_WEAPON, |catalog, storage, slot| {
        add_item(catalog, Some(storage), slot, SPARROWHAWK)
    });
    hangar.with_slot(LIGHT_WEAPON, |catalog, storage, slot| {
        slot.installation_time = 0;
        begin_removal(catalog, Some(storage), slot);
    });

    hangar.run_hours(3);

    assert!(slot_state(&hangar, LIGHT_WEAPON).is_empty());
    assert_eq!(hangar.log.notices(), &[Notice::AircraftItemRemoved]);
    assert_eq!(hangar.log.pauses(), 1);
    assert_eq!(hangar.stock(SPARROWHAWK), 1);
}

// =============================================================================
// Stats
// =============================================================================

#[test]
fn scenario_e_fuel_clamped_to_new_tank() {
    let mut hangar = Hangar::new(1);
    assert_eq!(hangar.aircraft().fuel, 2000);

    hangar.with_slot(AircraftSlotId::Electronics(0), |catalog, storage, slot| {
        add_item(catalog, Some(storage), slot, DROP_TANK)
    });

    let aircraft = hangar.aircraft();
    assert_eq!(aircraft.stats.get(AircraftStat::FuelSize), 1000);
    assert_eq!(aircraft.fuel, 1000);
}

#[test]
fn fuel_below_new_tank_is_kept() {
    let mut hangar = Hangar::new(1);
    let id = hangar.aircraft;
    hangar
        .campaign
        .bases
        .iter_mut()
        .flat_map(|base| base.aircraft.iter_mut())
        .filter(|aircraft| aircraft.id == id)
        .for_each(|aircraft| aircraft.fuel = 400);

    hangar.with_slot(AircraftSlotId::Electronics(1), |catalog, storage, slot| {
        add_item(catalog, Some(storage), slot, DROP_TANK)
    });
    assert_eq!(hangar.aircraft().fuel, 400);
}

#[test]
fn weapon_range_is_longest_loaded_weapon() {
    let mut hangar = Hangar::new(2);
    for (slot, weapon, ammo) in [
        (MEDIUM_WEAPON, AVALANCHE, AVALANCHE_AMMO),
        (LIGHT_WEAPON, SPARROWHAWK, SPARROWHAWK_AMMO),
    ] {
        hangar.with_slot(slot, |catalog, storage, slot| {
            add_item(catalog, Some(&mut *storage), slot, weapon).expect("fits");
            add_ammo(catalog, Some(storage), slot, ammo).expect("loads");
            slot.installation_time = 0;
        });
    }
    make_operational(&mut hangar, LIGHT_WEAPON);
    assert_eq!(hangar.aircraft().stats.get(AircraftStat::WeaponRange), 90);

    hangar.with_slot(MEDIUM_WEAPON, |catalog, storage, slot| {
        remove_item(catalog, Some(storage), slot, true);
    });
    assert_eq!(hangar.aircraft().stats.get(AircraftStat::WeaponRange), 60);

    hangar.with_slot(LIGHT_WEAPON, |catalog, storage, slot| {
        remove_item(catalog, Some(storage), slot, true);
    });
    assert_eq!(hangar.aircraft().stats.get(AircraftStat::WeaponRange), 0);
}
