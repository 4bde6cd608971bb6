//! Test fixtures and helpers.
//!
//! A small but complete catalog, mirroring `assets/data/catalog.ron`, plus
//! helpers that put a campaign into a known state.

use fixed::types::I32F32;
use geoscape_core::aircraft::{Aircraft, AircraftId, AircraftSlotId};
use geoscape_core::base::{Base, BaseId};
use geoscape_core::campaign::{Campaign, NoticeLog};
use geoscape_core::catalog::{CraftItemType, ItemCatalog, ItemIndex, WeightClass};
use geoscape_core::data::{AircraftData, CatalogData, ItemData, SlotData};
use geoscape_core::slot::Slot;
use geoscape_core::stats::AircraftStat;
use geoscape_core::storage::Storage;

/// Light air-to-air missile launcher, 3 hours to install.
pub const SPARROWHAWK: &str = "craft_weapon_sparrowhawk";
/// Sparrowhawk missiles.
pub const SPARROWHAWK_AMMO: &str = "craft_ammo_sparrowhawk";
/// Medium missile launcher, 5 hours to install.
pub const AVALANCHE: &str = "craft_weapon_avalanche";
/// Avalanche missiles.
pub const AVALANCHE_AMMO: &str = "craft_ammo_avalanche";
/// Light armour plating, 4 hours to install.
pub const LIGHT_ARMOUR: &str = "craft_shield_light";
/// Heavy armour plating, too heavy for the interceptor.
pub const HEAVY_ARMOUR: &str = "craft_shield_heavy";
/// Extra fuel tank that halves the usable fuel in exchange for speed.
pub const DROP_TANK: &str = "craft_electronics_droptank";
/// Electronic countermeasures pod.
pub const ECM_POD: &str = "craft_electronics_ecm";
/// Recovered alien weapon, never installable.
pub const ALIEN_CANNON: &str = "craft_weapon_alien_cannon";
/// Laser cannon that requires research.
pub const LASER_CANNON: &str = "craft_weapon_laser";
/// Laser cannon power cells.
pub const LASER_CELLS: &str = "craft_ammo_laser";
/// Base missile launcher.
pub const BASE_LAUNCHER: &str = "base_launcher_missile";
/// Base missile launcher ammunition.
pub const BASE_MISSILES: &str = "base_ammo_missile";
/// Base laser battery.
pub const BASE_LASER: &str = "base_launcher_laser";
/// Base laser battery power.
pub const BASE_LASER_POWER: &str = "base_ammo_laser";

/// Research topic unlocking the laser cannon.
pub const LASER_TECH: &str = "rs_craft_weapon_laser";
/// Aircraft class used by most tests.
pub const INTERCEPTOR: &str = "craft_interceptor";

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Raw data for the sample catalog.
#[must_use]
pub fn sample_catalog_data() -> CatalogData {
    let items = vec![
        ItemData::new(SPARROWHAWK, CraftItemType::Weapon, 40, 3)
            .with_name("Sparrowhawk Launcher")
            .with_stat(AircraftStat::Accuracy, 1.2)
            .with_ammos([SPARROWHAWK_AMMO]),
        ItemData::new(SPARROWHAWK_AMMO, CraftItemType::Ammo, 10, 0)
            .with_name("Sparrowhawk Missiles")
            .with_stat(AircraftStat::Damage, 25.0)
            .with_stat(AircraftStat::WeaponRange, 60.0)
            .with_weapons([SPARROWHAWK])
            .with_ammo_count(6),
        ItemData::new(AVALANCHE, CraftItemType::Weapon, 80, 5)
            .with_name("Avalanche Launcher")
            .with_ammos([AVALANCHE_AMMO]),
        ItemData::new(AVALANCHE_AMMO, CraftItemType::Ammo, 20, 0)
            .with_name("Avalanche Missiles")
            .with_stat(AircraftStat::Damage, 80.0)
            .with_stat(AircraftStat::WeaponRange, 90.0)
            .with_weapons([AVALANCHE])
            .with_ammo_count(2),
        ItemData::new(LASER_CANNON, CraftItemType::Weapon, 50, 4)
            .with_name("Laser Cannon")
            .with_ammos([LASER_CELLS])
            .with_tech(LASER_TECH),
        ItemData::new(LASER_CELLS, CraftItemType::Ammo, 10, 0)
            .with_name("Laser Cells")
            .with_stat(AircraftStat::Damage, 35.0)
            .with_stat(AircraftStat::WeaponRange, 70.0)
            .with_weapons([LASER_CANNON])
            .with_ammo_count(100)
            .not_on_market()
            .with_tech(LASER_TECH),
        ItemData::new(LIGHT_ARMOUR, CraftItemType::Shield, 40, 4)
            .with_name("Light Armour")
            .with_stat(AircraftStat::Shield, 20.0)
            .with_stat(AircraftStat::Speed, 0.95),
        ItemData::new(HEAVY_ARMOUR, CraftItemType::Shield, 120, 6)
            .with_name("Heavy Armour")
            .with_stat(AircraftStat::Shield, 60.0),
        ItemData::new(DROP_TANK, CraftItemType::Electronics, 20, 2)
            .with_name("Drop Tank")
            .with_stat(AircraftStat::FuelSize, 0.5)
            .with_stat(AircraftStat::Speed, 1.1),
        ItemData::new(ECM_POD, CraftItemType::Electronics, 20, 1)
            .with_name("ECM Pod")
            .with_stat(AircraftStat::Ecm, 15.0),
        ItemData::new(ALIEN_CANNON, CraftItemType::Weapon, 60, -1)
            .with_name("Alien Cannon")
            .not_on_market(),
        ItemData::new(BASE_LAUNCHER, CraftItemType::BaseMissile, 100, 2)
            .with_name("Missile Launcher")
            .with_ammos([BASE_MISSILES]),
        ItemData::new(BASE_MISSILES, CraftItemType::AmmoMissile, 10, 0)
            .with_name("Base Missiles")
            .with_weapons([BASE_LAUNCHER])
            .with_ammo_count(20),
        ItemData::new(BASE_LASER, CraftItemType::BaseLaser, 100, 2)
            .with_name("Laser Battery")
            .with_ammos([BASE_LASER_POWER]),
        ItemData::new(BASE_LASER_POWER, CraftItemType::AmmoLaser, 10, 0)
            .with_name("Laser Battery Power")
            .with_weapons([BASE_LASER])
            .not_on_market(),
    ];

    let aircraft = vec![AircraftData::new(INTERCEPTOR, "Interceptor")
        .with_stat(AircraftStat::Speed, 1000)
        .with_stat(AircraftStat::Shield, 10)
        .with_stat(AircraftStat::Accuracy, 50)
        .with_stat(AircraftStat::FuelSize, 2000)
        .with_weapon_slot(SlotData::new(WeightClass::Medium, 0))
        .with_weapon_slot(SlotData::new(WeightClass::Light, 1))
        .with_electronics_slot(SlotData::new(WeightClass::Light, 0))
        .with_electronics_slot(SlotData::new(WeightClass::Light, 1))
        .with_shield_capacity(WeightClass::Medium)];

    CatalogData::new(items, aircraft)
}

/// The sample catalog.
///
/// # Panics
///
/// Panics if the sample data stops validating.
#[must_use]
pub fn sample_catalog() -> ItemCatalog {
    ItemCatalog::from_data(sample_catalog_data()).expect("sample catalog must validate")
}

/// Catalog index of a sample item.
///
/// # Panics
///
/// Panics if the id is not in the sample catalog.
#[must_use]
pub fn index_of(catalog: &ItemCatalog, id: &str) -> ItemIndex {
    catalog
        .resolve(id)
        .unwrap_or_else(|| panic!("'{id}' is not in the sample catalog"))
        .index
}

/// Storage holding `count` of every item in the catalog.
#[must_use]
pub fn stocked_storage(catalog: &ItemCatalog, count: u32) -> Storage {
    catalog
        .items()
        .fold(Storage::new(), |storage, item| storage.with_count(item.index, count))
}

/// A campaign with one base, one interceptor and a well stocked store.
pub struct Hangar {
    /// The campaign.
    pub campaign: Campaign,
    /// The only base.
    pub base: BaseId,
    /// The interceptor stationed there.
    pub aircraft: AircraftId,
    /// Collected notices.
    pub log: NoticeLog,
}

impl Hangar {
    /// Build the hangar with `stock` of every item in storage.
    ///
    /// # Panics
    ///
    /// Panics if the sample catalog has no interceptor class.
    #[must_use]
    pub fn new(stock: u32) -> Self {
        let catalog = sample_catalog();
        let storage = stocked_storage(&catalog, stock);
        let mut campaign = Campaign::new(catalog);
        let base = campaign.found_base("Home Base");
        if let Ok(home) = campaign.base_mut(base) {
            home.storage = storage;
        }
        let aircraft = campaign
            .buy_aircraft(base, INTERCEPTOR)
            .expect("interceptor class must exist");
        Self {
            campaign,
            base,
            aircraft,
            log: NoticeLog::default(),
        }
    }

    /// Catalog index of an item.
    #[must_use]
    pub fn index(&self, id: &str) -> ItemIndex {
        index_of(&self.campaign.catalog, id)
    }

    /// Stock of an item at the base.
    ///
    /// # Panics
    ///
    /// Panics if the base is gone.
    #[must_use]
    pub fn stock(&self, id: &str) -> u32 {
        let index = self.index(id);
        self.campaign
            .base(self.base)
            .expect("hangar base exists")
            .storage
            .count(index)
    }

    /// Run `f` on one interceptor slot with the base storage, then
    /// recompute the interceptor's stats.
    ///
    /// Returns `None` if the slot does not exist.
    pub fn with_slot<R>(
        &mut self,
        id: AircraftSlotId,
        f: impl FnOnce(&ItemCatalog, &mut Storage, &mut Slot) -> R,
    ) -> Option<R> {
        let Campaign { catalog, bases, .. } = &mut self.campaign;
        let Base {
            storage, aircraft, ..
        } = bases.iter_mut().find(|base| base.id == self.base)?;
        let aircraft = aircraft
            .iter_mut()
            .find(|candidate| candidate.id == self.aircraft)?;
        let result = f(catalog, storage, aircraft.slot_mut(id)?);
        aircraft.recompute_stats(catalog);
        Some(result)
    }

    /// The interceptor.
    ///
    /// # Panics
    ///
    /// Panics if the interceptor is gone.
    #[must_use]
    pub fn aircraft(&self) -> &Aircraft {
        self.campaign
            .aircraft(self.aircraft)
            .map(|(_, aircraft)| aircraft)
            .expect("hangar aircraft exists")
    }

    /// Run the hourly update `hours` times.
    pub fn run_hours(&mut self, hours: u32) {
        for _ in 0..hours {
            self.campaign.run_hour(&mut self.log);
        }
    }
}
