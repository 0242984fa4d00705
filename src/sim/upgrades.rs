//! Upgrade descriptors and the owned-upgrade tally
//!
//! Catalog content belongs to the host. The simulation only applies a
//! descriptor's effect and counts how many times each id was taken.

use std::collections::BTreeMap;

use super::state::Player;
use crate::error::UpgradeError;

/// Upgrades shown per level-up
pub const UPGRADE_CHOICES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeKind {
    /// Counted in the tally and capped at `max_level`
    Standard,
    /// One-shot weapon evolution, never counted
    WeaponEvolution,
}

#[derive(Debug, Clone)]
pub struct Upgrade {
    pub id: String,
    pub kind: UpgradeKind,
    pub max_level: u32,
    pub apply: fn(&mut Player),
}

impl Upgrade {
    pub fn new(id: &str, kind: UpgradeKind, max_level: u32, apply: fn(&mut Player)) -> Self {
        Self {
            id: id.to_string(),
            kind,
            max_level,
            apply,
        }
    }
}

/// An upgrade offered to the player with its current owned level
#[derive(Debug, Clone, Copy)]
pub struct UpgradeOption<'a> {
    pub upgrade: &'a Upgrade,
    pub current_level: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedUpgrades {
    levels: BTreeMap<String, u32>,
}

impl OwnedUpgrades {
    pub fn level(&self, id: &str) -> u32 {
        self.levels.get(id).copied().unwrap_or(0)
    }

    /// Fail if a standard upgrade is already at its max level
    pub fn check(&self, upgrade: &Upgrade) -> Result<(), UpgradeError> {
        if upgrade.kind == UpgradeKind::Standard && self.level(&upgrade.id) >= upgrade.max_level {
            return Err(UpgradeError::MaxLevelReached {
                id: upgrade.id.clone(),
                max_level: upgrade.max_level,
            });
        }
        Ok(())
    }

    /// Count a taken upgrade. Evolutions are not counted.
    pub fn record(&mut self, upgrade: &Upgrade) {
        if upgrade.kind == UpgradeKind::Standard {
            *self.levels.entry(upgrade.id.clone()).or_insert(0) += 1;
        }
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }
}

/// Up to [`UPGRADE_CHOICES`] catalog entries that can still be taken, in
/// catalog order
pub fn upgrade_options<'a>(
    catalog: &'a [Upgrade],
    owned: &OwnedUpgrades,
) -> Vec<UpgradeOption<'a>> {
    catalog
        .iter()
        .map(|upgrade| UpgradeOption {
            upgrade,
            current_level: owned.level(&upgrade.id),
        })
        .filter(|opt| opt.current_level < opt.upgrade.max_level)
        .take(UPGRADE_CHOICES)
        .collect()
}

/// A small general-purpose catalog
pub fn basic_catalog() -> Vec<Upgrade> {
    vec![
        Upgrade::new("vitality", UpgradeKind::Standard, 5, |p| {
            p.max_health += 20.0;
            p.heal(20.0);
        }),
        Upgrade::new("swift_boots", UpgradeKind::Standard, 5, |p| p.speed *= 1.1),
        Upgrade::new("power_core", UpgradeKind::Standard, 5, |p| {
            p.damage_multiplier += 0.1
        }),
        Upgrade::new("rapid_fire", UpgradeKind::Standard, 5, |p| {
            for weapon in &mut p.weapons {
                weapon.cooldown_ms *= 0.9;
            }
        }),
        Upgrade::new("piercing_rounds", UpgradeKind::Standard, 3, |p| {
            for weapon in &mut p.weapons {
                weapon.pierce += 1;
            }
        }),
        Upgrade::new("magnet", UpgradeKind::Standard, 3, |p| p.pickup_radius += 20.0),
        Upgrade::new("pulse_overload", UpgradeKind::WeaponEvolution, 1, |p| {
            for weapon in &mut p.weapons {
                weapon.damage *= 2.0;
                weapon.level += 1;
            }
        }),
    ]
}
