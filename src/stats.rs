//! Rarity scaling and derived creature stats.
//!
//! `stats_for_creature` multiplies the archetype baselines and the kit's
//! `hp_max` by the rarity multiplier. The scaled HP is reported to clients
//! alongside each resolved unit, but the battle resolver itself always runs
//! on the unscaled kit `hp_max` (observed behavior, kept as-is; see
//! DESIGN.md).

use crate::catalog::Catalog;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

/// Per-unit derived combat stats, after rarity scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct CreatureStats {
    pub hp: i64,
    pub atk: i64,
    pub def: i64,
    pub spd: i64,
}

struct BaseStats {
    atk: i64,
    def: i64,
    spd: i64,
}

/// Rarity multiplier. Unrecognized rarities scale like Common.
pub fn rarity_mult(rarity: &str) -> f64 {
    match rarity {
        "Rare" => 1.08,
        "Epic" => 1.16,
        "Legendary" => 1.25,
        _ => 1.0,
    }
}

// Common-rarity baselines per archetype; rarity scales them up.
fn base_stats_for_archetype(archetype: &str) -> BaseStats {
    let (atk, def, spd) = match archetype {
        "Bulwark Golem" => (12, 16, 8),
        "Cannon Critter" => (18, 10, 12),
        "Sprout Medic" => (10, 14, 11),
        "Zoner Wisp" => (12, 12, 14),
        "Pouncer" => (17, 9, 16),
        "Forge Pup" => (16, 12, 11),
        "Hex Scholar" => (12, 12, 12),
        "Storm Skater" => (13, 10, 18),
        _ => (14, 12, 12),
    };
    BaseStats { atk, def, spd }
}

fn scaled(value: i64, mult: f64) -> i64 {
    ((value as f64 * mult).round() as i64).max(1)
}

/// Derive the rarity-scaled stats for one creature.
pub fn stats_for_creature(catalog: &Catalog, archetype: &str, rarity: &str) -> CreatureStats {
    let kit = catalog.kit_for(archetype);
    let m = rarity_mult(rarity);
    let base = base_stats_for_archetype(archetype);
    CreatureStats {
        hp: scaled(kit.hp_max, m),
        atk: scaled(base.atk, m),
        def: scaled(base.def, m),
        spd: scaled(base.spd, m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_rarity_leaves_baselines_untouched() {
        let catalog = Catalog::new();
        let s = stats_for_creature(&catalog, "Bulwark Golem", "Common");
        assert_eq!(s.hp, 160);
        assert_eq!(s.atk, 12);
        assert_eq!(s.def, 16);
        assert_eq!(s.spd, 8);
    }

    #[test]
    fn rare_rarity_rounds_to_nearest() {
        let catalog = Catalog::new();
        // 160 * 1.08 = 172.8 -> 173; 12 * 1.08 = 12.96 -> 13
        let s = stats_for_creature(&catalog, "Bulwark Golem", "Rare");
        assert_eq!(s.hp, 173);
        assert_eq!(s.atk, 13);
    }

    #[test]
    fn legendary_scales_by_quarter() {
        let catalog = Catalog::new();
        let s = stats_for_creature(&catalog, "Bulwark Golem", "Legendary");
        assert_eq!(s.hp, 200);
        assert_eq!(s.atk, 15);
        assert_eq!(s.def, 20);
        assert_eq!(s.spd, 10);
    }

    #[test]
    fn unknown_archetype_and_rarity_use_defaults() {
        let catalog = Catalog::new();
        let s = stats_for_creature(&catalog, "Haunted Toaster", "Mythic");
        assert_eq!(s.hp, 100);
        assert_eq!(s.atk, 14);
        assert_eq!(s.def, 12);
        assert_eq!(s.spd, 12);
    }

    #[test]
    fn epic_scaling_applies_to_default_kit_hp() {
        let catalog = Catalog::new();
        let s = stats_for_creature(&catalog, "Haunted Toaster", "Epic");
        assert_eq!(s.hp, 116);
    }

    #[test]
    fn stats_never_drop_below_one() {
        assert_eq!(scaled(0, 1.0), 1);
        assert_eq!(scaled(1, 0.0), 1);
    }
}
