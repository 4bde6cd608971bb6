//! Proptest strategies for equipment testing.
//!
//! These strategies generate random but reproducible inputs: catalog items
//! of every type and weight, slots of every kind, and sequences of player
//! actions against the sample [`Hangar`].

use geoscape_core::aircraft::AircraftSlotId;
use geoscape_core::catalog::{CraftItemType, WeightClass};
use geoscape_core::data::ItemData;
use geoscape_core::lifecycle;
use proptest::prelude::*;

use crate::fixtures::{
    Hangar, ALIEN_CANNON, AVALANCHE, AVALANCHE_AMMO, DROP_TANK, ECM_POD, HEAVY_ARMOUR,
    LIGHT_ARMOUR, SPARROWHAWK, SPARROWHAWK_AMMO,
};

/// Every craft item type.
pub fn arb_item_type() -> impl Strategy<Value = CraftItemType> {
    prop_oneof![
        Just(CraftItemType::Weapon),
        Just(CraftItemType::Ammo),
        Just(CraftItemType::Shield),
        Just(CraftItemType::Electronics),
        Just(CraftItemType::BaseMissile),
        Just(CraftItemType::BaseLaser),
        Just(CraftItemType::AmmoMissile),
        Just(CraftItemType::AmmoLaser),
    ]
}

/// Types that can be mounted in a slot.
pub fn arb_mount_type() -> impl Strategy<Value = CraftItemType> {
    prop_oneof![
        Just(CraftItemType::Weapon),
        Just(CraftItemType::Shield),
        Just(CraftItemType::Electronics),
        Just(CraftItemType::BaseMissile),
        Just(CraftItemType::BaseLaser),
    ]
}

/// Slot weight capacity.
pub fn arb_weight_class() -> impl Strategy<Value = WeightClass> {
    prop_oneof![
        Just(WeightClass::Light),
        Just(WeightClass::Medium),
        Just(WeightClass::Heavy),
    ]
}

/// Installation time in hours, including the never-installable `-1`.
pub fn arb_installation_time() -> impl Strategy<Value = i32> {
    prop_oneof![Just(-1), Just(0), 1i32..12i32]
}

/// A standalone item with no ammunition references.
pub fn arb_item_data() -> impl Strategy<Value = ItemData> {
    (arb_item_type(), 1u32..150u32, arb_installation_time())
        .prop_map(|(item_type, size, time)| ItemData::new("prop_item", item_type, size, time))
}

/// One of the interceptor's mounts.
pub fn arb_slot_id() -> impl Strategy<Value = AircraftSlotId> {
    prop_oneof![
        (0usize..2).prop_map(AircraftSlotId::Weapon),
        (0usize..2).prop_map(AircraftSlotId::Electronics),
        Just(AircraftSlotId::Shield),
    ]
}

/// An item id from the sample catalog that can go on an aircraft, or fails
/// to for a known reason.
pub fn arb_aircraft_item() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        SPARROWHAWK,
        AVALANCHE,
        LIGHT_ARMOUR,
        HEAVY_ARMOUR,
        DROP_TANK,
        ECM_POD,
        ALIEN_CANNON,
    ])
}

/// An aircraft ammunition id from the sample catalog.
pub fn arb_aircraft_ammo() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![SPARROWHAWK_AMMO, AVALANCHE_AMMO])
}

/// One player or clock action against the sample hangar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipAction {
    /// Put an item into a slot.
    Add(AircraftSlotId, &'static str),
    /// Load ammunition into a slot.
    Load(AircraftSlotId, &'static str),
    /// Take the item or its ammunition out immediately.
    Remove(AircraftSlotId, bool),
    /// Start taking the item out.
    BeginRemoval(AircraftSlotId),
    /// Let one hour pass.
    Hour,
}

impl EquipAction {
    /// Apply the action. Refused actions are ignored.
    pub fn apply(self, hangar: &mut Hangar) {
        match self {
            Self::Add(slot, item) => {
                hangar.with_slot(slot, |catalog, storage, slot| {
                    lifecycle::add_item(catalog, Some(storage), slot, item).ok()
                });
            }
            Self::Load(slot, ammo) => {
                hangar.with_slot(slot, |catalog, storage, slot| {
                    lifecycle::add_ammo(catalog, Some(storage), slot, ammo).ok()
                });
            }
            Self::Remove(slot, ammo_only) => {
                hangar.with_slot(slot, |catalog, storage, slot| {
                    lifecycle::remove_item(catalog, Some(storage), slot, ammo_only);
                });
            }
            Self::BeginRemoval(slot) => {
                hangar.with_slot(slot, |catalog, storage, slot| {
                    lifecycle::begin_removal(catalog, Some(storage), slot);
                });
            }
            Self::Hour => hangar.run_hours(1),
        }
    }
}

/// Any single action.
pub fn arb_equip_action() -> impl Strategy<Value = EquipAction> {
    prop_oneof![
        3 => (arb_slot_id(), arb_aircraft_item()).prop_map(|(slot, item)| EquipAction::Add(slot, item)),
        2 => (arb_slot_id(), arb_aircraft_ammo()).prop_map(|(slot, ammo)| EquipAction::Load(slot, ammo)),
        1 => (arb_slot_id(), any::<bool>()).prop_map(|(slot, ammo_only)| EquipAction::Remove(slot, ammo_only)),
        1 => arb_slot_id().prop_map(EquipAction::BeginRemoval),
        4 => Just(EquipAction::Hour),
    ]
}

/// A sequence of actions.
pub fn arb_action_sequence(max_len: usize) -> impl Strategy<Value = Vec<EquipAction>> {
    proptest::collection::vec(arb_equip_action(), 0..max_len)
}
