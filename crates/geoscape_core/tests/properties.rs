//! Property tests for the slot lifecycle and stat aggregation.

use geoscape_core::aircraft::AircraftId;
use geoscape_core::catalog::{ItemCatalog, WeightClass};
use geoscape_core::data::CatalogData;
use geoscape_core::lifecycle::{add_item, advance_one_tick, EquipError, TickOutcome};
use geoscape_core::slot::{Owner, Slot};
use geoscape_core::storage::Storage;
use geoscape_test_utils::determinism::{campaign_hash, verify_action_determinism};
use geoscape_test_utils::fixtures::Hangar;
use geoscape_test_utils::proptest::prelude::*;
use geoscape_test_utils::strategies::{
    arb_action_sequence, arb_item_data, arb_mount_type, arb_weight_class,
};

fn single_item_catalog(data: geoscape_core::data::ItemData) -> ItemCatalog {
    ItemCatalog::from_data(CatalogData::new(vec![data], Vec::new()))
        .expect("single item without references is valid")
}

fn empty_slot(kind: geoscape_core::catalog::CraftItemType, capacity: WeightClass) -> Slot {
    Slot::new(Owner::Aircraft(AircraftId::new(0)), kind, capacity)
}

proptest! {
    /// An item of the wrong type never goes in, and nothing changes.
    #[test]
    fn prop_type_mismatch_leaves_slot_unchanged(
        data in arb_item_data(),
        kind in arb_mount_type(),
        capacity in arb_weight_class(),
    ) {
        prop_assume!(data.item_type != kind);
        let catalog = single_item_catalog(data);
        let item = catalog.items().next().expect("one item");
        let mut storage = Storage::new().with_count(item.index, 1);
        let mut slot = empty_slot(kind, capacity);
        let before = (slot.clone(), storage.clone());

        let result = add_item(&catalog, Some(&mut storage), &mut slot, &item.id);

        prop_assert!(matches!(result, Err(EquipError::TypeMismatch { .. })), "expected TypeMismatch, got {:?}", result);
        prop_assert_eq!((slot, storage), before);
    }

    /// An item heavier than the slot never goes in.
    #[test]
    fn prop_too_heavy_refused(
        data in arb_item_data(),
        capacity in arb_weight_class(),
    ) {
        let catalog = single_item_catalog(data);
        let item = catalog.items().next().expect("one item");
        prop_assume!(item.is_installable() && !item.item_type.is_ammo());
        let mut slot = empty_slot(item.item_type, capacity);

        let result = add_item(&catalog, None, &mut slot, &item.id);

        if item.weight > capacity {
            prop_assert!(
                matches!(result, Err(EquipError::TooHeavy { .. })),
                "expected {:?} item to be refused by {:?} slot",
                item.weight,
                capacity
            );
            prop_assert!(slot.is_empty());
        } else {
            prop_assert_eq!(result, Ok(item.index));
            prop_assert_eq!(slot.installation_time, item.installation_time);
        }
    }

    /// The timer moves one hour toward zero per tick and stops there.
    #[test]
    fn prop_timer_moves_toward_zero(
        data in arb_item_data(),
        removing in any::<bool>(),
        extra_ticks in 0u32..4,
    ) {
        let catalog = single_item_catalog(data);
        let item = catalog.items().next().expect("one item");
        prop_assume!(item.installation_time > 0 && !item.item_type.is_ammo());
        let mut slot = empty_slot(item.item_type, WeightClass::Heavy);
        add_item(&catalog, None, &mut slot, &item.id).expect("fits heavy slot");
        if removing {
            slot.installation_time = -item.installation_time;
        }

        let mut completions = 0;
        for _ in 0..item.installation_time.unsigned_abs() + extra_ticks {
            let before = slot.installation_time;
            let outcome = advance_one_tick(&catalog, None, &mut slot);
            if before == 0 || slot.item.is_none() {
                prop_assert!(slot.installation_time == 0);
            } else {
                prop_assert_eq!(slot.installation_time.abs(), before.abs() - 1);
            }
            if outcome.completed() {
                completions += 1;
            }
            if before == 0 {
                prop_assert_eq!(outcome, TickOutcome::Idle);
            }
        }

        prop_assert_eq!(slot.installation_time, 0);
        prop_assert_eq!(completions, 1);
        prop_assert_eq!(slot.item.is_none(), removing);
    }

    /// Replaying the same actions always reaches the same state.
    #[test]
    fn prop_action_replay_is_deterministic(actions in arb_action_sequence(40)) {
        let result = verify_action_determinism(&actions, 2);
        prop_assert!(result.is_deterministic);
    }

    /// Recomputing stats twice on an unchanged hangar changes nothing.
    #[test]
    fn prop_recompute_is_idempotent(actions in arb_action_sequence(30)) {
        let mut hangar = Hangar::new(2);
        for action in &actions {
            action.apply(&mut hangar);
        }
        let before = campaign_hash(&hangar.campaign);
        let stats = hangar.aircraft().stats;
        let catalog = hangar.campaign.catalog.clone();
        for base in &mut hangar.campaign.bases {
            for aircraft in &mut base.aircraft {
                aircraft.recompute_stats(&catalog);
            }
        }
        prop_assert_eq!(hangar.aircraft().stats, stats);
        prop_assert_eq!(campaign_hash(&hangar.campaign), before);
    }

    /// Every slot keeps its structural invariants whatever the player does.
    #[test]
    fn prop_slot_invariants_hold(actions in arb_action_sequence(40)) {
        let mut hangar = Hangar::new(2);
        for action in &actions {
            action.apply(&mut hangar);
        }
        for slot in hangar.aircraft().slots() {
            prop_assert_eq!(slot.check_invariants(&hangar.campaign.catalog), Ok(()));
        }
    }
}
