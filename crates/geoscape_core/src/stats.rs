//! Aircraft statistics and the stat aggregator.
//!
//! An aircraft's live stats are never edited piecemeal. They are rebuilt
//! from the class baseline and every installed item each time the slot
//! state changes, see [`recompute_aircraft_stats`].
//!
//! # Combination rules
//!
//! For every stat except [`AircraftStat::WeaponRange`], slots are folded in a
//! fixed order: electronics, then weapons, then the shield. A modifier `m`
//! is applied as:
//!
//! - `|m| > 2.0`: flat bonus, `stat += m` (truncated toward zero)
//! - `m > 1e-5`: multiplier, `stat *= m` (truncated toward zero)
//! - otherwise: ignored
//!
//! Weapon range is the largest range among the ammunition loaded in
//! contributing weapon slots.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::aircraft::{Aircraft, AircraftStatus};
use crate::catalog::ItemCatalog;
use crate::math::{add_flat, scale, Fixed, FIXED_ONE, FIXED_TWO, MODIFIER_EPSILON};
use crate::slot::Slot;

/// Number of aircraft statistics.
pub const STAT_COUNT: usize = 7;

/// One aircraft performance attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AircraftStat {
    /// Cruise speed.
    Speed,
    /// Armour rating.
    Shield,
    /// Electronic counter-measures.
    Ecm,
    /// Damage dealt per hit.
    Damage,
    /// Hit probability.
    Accuracy,
    /// Fuel tank capacity.
    FuelSize,
    /// Engagement range, taken from loaded ammunition.
    WeaponRange,
}

impl AircraftStat {
    /// Every stat, in storage order.
    pub const ALL: [Self; STAT_COUNT] = [
        Self::Speed,
        Self::Shield,
        Self::Ecm,
        Self::Damage,
        Self::Accuracy,
        Self::FuelSize,
        Self::WeaponRange,
    ];

    /// Position of this stat in a stat vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Integer stat vector owned by an aircraft (or its class template).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AircraftStats(pub [i32; STAT_COUNT]);

impl AircraftStats {
    /// All stats zero.
    pub const ZERO: Self = Self([0; STAT_COUNT]);

    /// Read one stat.
    #[must_use]
    pub const fn get(&self, stat: AircraftStat) -> i32 {
        self.0[stat.index()]
    }

    /// Overwrite one stat.
    pub fn set(&mut self, stat: AircraftStat, value: i32) {
        self.0[stat.index()] = value;
    }

    /// Builder-style setter, handy for templates and tests.
    #[must_use]
    pub fn with(mut self, stat: AircraftStat, value: i32) -> Self {
        self.set(stat, value);
        self
    }
}

impl Index<AircraftStat> for AircraftStats {
    type Output = i32;

    fn index(&self, stat: AircraftStat) -> &Self::Output {
        &self.0[stat.index()]
    }
}

impl IndexMut<AircraftStat> for AircraftStats {
    fn index_mut(&mut self, stat: AircraftStat) -> &mut Self::Output {
        &mut self.0[stat.index()]
    }
}

/// Per-stat modifiers carried by a craft item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatModifiers(pub [Fixed; STAT_COUNT]);

impl StatModifiers {
    /// No effect on any stat.
    pub const NONE: Self = Self([Fixed::ZERO; STAT_COUNT]);

    /// Read one modifier.
    #[must_use]
    pub const fn get(&self, stat: AircraftStat) -> Fixed {
        self.0[stat.index()]
    }

    /// Overwrite one modifier.
    pub fn set(&mut self, stat: AircraftStat, value: Fixed) {
        self.0[stat.index()] = value;
    }
}

/// How a modifier value combines with a stat.
///
/// The kind is inferred from magnitude alone. Items with small flat
/// bonuses (`|m| <= 2`) therefore cannot be expressed; an explicit
/// per-stat tag in the item data would lift that restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKind {
    /// Added as flat units.
    Additive,
    /// Multiplied in as a ratio.
    Multiplicative,
    /// No effect.
    Inert,
}

impl ModifierKind {
    /// Classify a modifier value.
    #[must_use]
    pub fn classify(value: Fixed) -> Self {
        if value.saturating_abs() > FIXED_TWO {
            Self::Additive
        } else if value > MODIFIER_EPSILON {
            Self::Multiplicative
        } else {
            Self::Inert
        }
    }

    /// Apply a modifier of this kind to a stat.
    #[must_use]
    pub fn apply(self, stat: i32, value: Fixed) -> i32 {
        match self {
            Self::Additive => add_flat(stat, value),
            Self::Multiplicative => scale(stat, value),
            Self::Inert => stat,
        }
    }
}

/// Whether a modifier value is a benefit (flat bonus or ratio above 1).
#[must_use]
pub fn is_advantage(value: Fixed) -> bool {
    value > FIXED_ONE
}

/// Check whether the item in `slot` currently counts toward `stat`.
///
/// Items being installed or removed still inflict their penalties, but
/// only grant bonuses once fully operational.
#[must_use]
pub fn contributes(slot: &Slot, catalog: &ItemCatalog, stat: AircraftStat) -> bool {
    let Some(item) = slot.item.and_then(|index| catalog.get(index)) else {
        return false;
    };
    slot.installation_time == 0 || !is_advantage(item.modifiers.get(stat))
}

fn apply_slot(value: i32, slot: &Slot, catalog: &ItemCatalog, stat: AircraftStat) -> i32 {
    if !contributes(slot, catalog, stat) {
        return value;
    }
    match slot.item.and_then(|index| catalog.get(index)) {
        Some(item) => {
            let modifier = item.modifiers.get(stat);
            ModifierKind::classify(modifier).apply(value, modifier)
        }
        None => value,
    }
}

/// Compute the stat vector for a set of slots without touching an aircraft.
///
/// Slot order matters: electronics, weapons, shield.
#[must_use]
pub fn aggregate_stats(
    baseline: &AircraftStats,
    electronics: &[Slot],
    weapons: &[Slot],
    shield: &Slot,
    catalog: &ItemCatalog,
) -> AircraftStats {
    let mut stats = *baseline;

    for stat in AircraftStat::ALL {
        if stat == AircraftStat::WeaponRange {
            continue;
        }
        let mut value = baseline.get(stat);
        for slot in electronics.iter().chain(weapons).chain(std::iter::once(shield)) {
            value = apply_slot(value, slot, catalog, stat);
        }
        stats.set(stat, value);
    }

    stats.set(AircraftStat::WeaponRange, weapon_range(weapons, catalog));
    stats
}

/// Largest weapon range among the ammo of contributing weapon slots.
#[must_use]
pub fn weapon_range(weapons: &[Slot], catalog: &ItemCatalog) -> i32 {
    weapons
        .iter()
        .filter(|slot| contributes(slot, catalog, AircraftStat::WeaponRange))
        .filter_map(|slot| slot.ammo.and_then(|index| catalog.get(index)))
        .map(|ammo| crate::math::truncate(ammo.modifiers.get(AircraftStat::WeaponRange)))
        .fold(0, i32::max)
}

/// Rebuild an aircraft's stats from its baseline and installed items.
///
/// Also clamps fuel to the new tank size, floors speed at 1 and moves an
/// aircraft waiting at home into [`AircraftStatus::Refuel`] when its tank
/// is no longer full.
pub fn recompute_aircraft_stats(aircraft: &mut Aircraft, catalog: &ItemCatalog) {
    let mut stats = aggregate_stats(
        &aircraft.baseline,
        &aircraft.electronics,
        &aircraft.weapons,
        &aircraft.shield,
        catalog,
    );

    let fuel_size = stats.get(AircraftStat::FuelSize).max(0);
    if aircraft.fuel > fuel_size {
        aircraft.fuel = fuel_size;
    }
    aircraft.fuel = aircraft.fuel.max(0);

    if stats.get(AircraftStat::Speed) < 1 {
        stats.set(AircraftStat::Speed, 1);
    }

    aircraft.stats = stats;

    if aircraft.status == AircraftStatus::Home && aircraft.fuel < fuel_size {
        aircraft.status = AircraftStatus::Refuel;
    }

    tracing::debug!(aircraft = aircraft.id.0, stats = ?aircraft.stats.0, "Recomputed aircraft stats");
}
