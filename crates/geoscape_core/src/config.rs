//! Tunable equipment rules and design constants.

use serde::{Deserialize, Serialize};

/// Maximum number of weapon or electronics slots on one aircraft.
pub const MAX_AIRCRAFT_SLOT: usize = 4;

/// Maximum number of missile (or laser) batteries in one base.
pub const MAX_BASE_SLOT: usize = 5;

/// Numeric rules for base-defense ammunition.
///
/// Loaded from the optional `rules` block of the catalog RON file; every
/// field falls back to its default when omitted.
///
/// # Example RON
///
/// ```ron
/// EquipRules(
///     base_missile_free_ammo: 20,
///     battery_reload_cap: 20,
///     laser_battery_ammo: 9999,
/// )
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipRules {
    /// Missiles granted the first time a missile battery is armed.
    #[serde(default = "default_free_missiles")]
    pub base_missile_free_ammo: i32,
    /// Missile batteries reload one missile per hour up to this count.
    #[serde(default = "default_free_missiles")]
    pub battery_reload_cap: i32,
    /// Ammo given to a freshly built laser battery.
    #[serde(default = "default_laser_ammo")]
    pub laser_battery_ammo: i32,
}

const fn default_free_missiles() -> i32 {
    20
}

const fn default_laser_ammo() -> i32 {
    9999
}

impl Default for EquipRules {
    fn default() -> Self {
        Self {
            base_missile_free_ammo: default_free_missiles(),
            battery_reload_cap: default_free_missiles(),
            laser_battery_ammo: default_laser_ammo(),
        }
    }
}
