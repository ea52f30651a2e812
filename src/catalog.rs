//! Static archetype kit catalog.
//!
//! Maps each known archetype to its combat kit: a role, a base maximum HP
//! and exactly two moves. The catalog is built once at startup and shared
//! read-only behind an `Arc`; `kit_for` is total over any archetype string,
//! so unknown archetypes degrade to a generic default kit instead of
//! failing.

use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::State;
use rocket_okapi::{openapi, JsonSchema};
use std::collections::HashMap;
use std::sync::Arc;

/// Combat role of an archetype. Drives the damage multiplier and the
/// default targeting bias in the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum Role {
    Tank,
    Support,
    Dps,
    Control,
}

/// What a move does when it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum MoveKind {
    Damage,
    Heal,
    Shield,
    Control,
}

/// How a move selects its target.
///
/// `EnemyLowestHp` is declared for completeness but no current kit uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "snake_case")]
pub enum Targeting {
    Frontline,
    BacklineRandom,
    EnemyLowestHp,
    AllyLowestHp,
    #[serde(rename = "self")]
    SelfTarget,
}

/// A single move in an archetype kit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct MoveDef {
    pub move_id: String,
    pub name: String,
    /// Cosmetic animation trigger tag consumed by the client.
    pub cue: String,
    pub kind: MoveKind,
    /// Base magnitude (damage, heal or shield amount; 0 for pure-control moves).
    pub base: i64,
    pub targeting: Targeting,
}

/// The fixed combat kit of one archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct ArchetypeKit {
    pub archetype: String,
    pub role: Role,
    pub hp_max: i64,
    pub moves: [MoveDef; 2],
}

fn mv(
    move_id: &str,
    name: &str,
    cue: &str,
    kind: MoveKind,
    base: i64,
    targeting: Targeting,
) -> MoveDef {
    MoveDef {
        move_id: move_id.to_string(),
        name: name.to_string(),
        cue: cue.to_string(),
        kind,
        base,
        targeting,
    }
}

fn kit(archetype: &str, role: Role, hp_max: i64, moves: [MoveDef; 2]) -> ArchetypeKit {
    ArchetypeKit {
        archetype: archetype.to_string(),
        role,
        hp_max,
        moves,
    }
}

/// Read-only kit catalog, keyed by archetype name.
#[derive(Debug, Clone)]
pub struct Catalog {
    kits: HashMap<String, ArchetypeKit>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Build the catalog with the eight launch archetypes.
    pub fn new() -> Self {
        let mut kits = HashMap::new();
        for k in [
            kit(
                "Bulwark Golem",
                Role::Tank,
                160,
                [
                    mv(
                        "stonewall_slam",
                        "Stonewall Slam",
                        "CUE_CHARGE_SHAKE",
                        MoveKind::Damage,
                        14,
                        Targeting::Frontline,
                    ),
                    mv(
                        "guard_up",
                        "Guard Up",
                        "CUE_RING_PULSE",
                        MoveKind::Shield,
                        10,
                        Targeting::SelfTarget,
                    ),
                ],
            ),
            kit(
                "Forge Pup",
                Role::Tank,
                150,
                [
                    mv(
                        "spark_bite",
                        "Spark Bite",
                        "CUE_TWO_BEAT",
                        MoveKind::Damage,
                        15,
                        Targeting::Frontline,
                    ),
                    mv(
                        "heat_guard",
                        "Heat Guard",
                        "CUE_RING_PULSE",
                        MoveKind::Shield,
                        9,
                        Targeting::AllyLowestHp,
                    ),
                ],
            ),
            kit(
                "Sprout Medic",
                Role::Support,
                120,
                [
                    mv(
                        "green_patch",
                        "Green Patch",
                        "CUE_RING_PULSE",
                        MoveKind::Heal,
                        16,
                        Targeting::AllyLowestHp,
                    ),
                    mv(
                        "seed_shield",
                        "Seed Shield",
                        "CUE_TARGET_MARK",
                        MoveKind::Shield,
                        10,
                        Targeting::AllyLowestHp,
                    ),
                ],
            ),
            kit(
                "Hex Scholar",
                Role::Support,
                115,
                [
                    mv(
                        "sigil_mend",
                        "Sigil Mend",
                        "CUE_RING_PULSE",
                        MoveKind::Heal,
                        14,
                        Targeting::AllyLowestHp,
                    ),
                    mv(
                        "ward_rune",
                        "Ward Rune",
                        "CUE_TARGET_MARK",
                        MoveKind::Shield,
                        11,
                        Targeting::AllyLowestHp,
                    ),
                ],
            ),
            kit(
                "Cannon Critter",
                Role::Dps,
                100,
                [
                    mv(
                        "scoop_n_fling",
                        "Scoop 'n Fling",
                        "CUE_TWO_BEAT",
                        MoveKind::Damage,
                        22,
                        Targeting::Frontline,
                    ),
                    mv(
                        "cutlery_clatter",
                        "Cutlery Clatter",
                        "CUE_TARGET_MARK",
                        MoveKind::Damage,
                        18,
                        Targeting::Frontline,
                    ),
                ],
            ),
            kit(
                "Pouncer",
                Role::Dps,
                105,
                [
                    mv(
                        "pounce",
                        "Pounce",
                        "CUE_CHARGE_SHAKE",
                        MoveKind::Damage,
                        21,
                        Targeting::BacklineRandom,
                    ),
                    mv(
                        "backflip_kick",
                        "Backflip Kick",
                        "CUE_TWO_BEAT",
                        MoveKind::Damage,
                        19,
                        Targeting::Frontline,
                    ),
                ],
            ),
            kit(
                "Zoner Wisp",
                Role::Control,
                112,
                [
                    mv(
                        "zone_burst",
                        "Zone Burst",
                        "CUE_TARGET_MARK",
                        MoveKind::Control,
                        16,
                        Targeting::Frontline,
                    ),
                    mv(
                        "slow_field",
                        "Slow Field",
                        "CUE_RING_PULSE",
                        MoveKind::Control,
                        0,
                        Targeting::Frontline,
                    ),
                ],
            ),
            kit(
                "Storm Skater",
                Role::Control,
                110,
                [
                    mv(
                        "static_dash",
                        "Static Dash",
                        "CUE_TWO_BEAT",
                        MoveKind::Damage,
                        17,
                        Targeting::Frontline,
                    ),
                    mv(
                        "arc_jam",
                        "Arc Jam",
                        "CUE_TARGET_MARK",
                        MoveKind::Control,
                        0,
                        Targeting::Frontline,
                    ),
                ],
            ),
        ] {
            kits.insert(k.archetype.clone(), k);
        }
        Catalog { kits }
    }

    /// The kit for an archetype, or the generic default kit for anything
    /// unknown. Never fails.
    pub fn kit_for(&self, archetype: &str) -> ArchetypeKit {
        self.kits
            .get(archetype)
            .cloned()
            .unwrap_or_else(|| Self::default_kit(archetype))
    }

    /// Generic fallback kit for archetypes not present in the catalog.
    fn default_kit(archetype: &str) -> ArchetypeKit {
        kit(
            archetype,
            Role::Dps,
            100,
            [
                mv(
                    "slam",
                    "Slam",
                    "CUE_CHARGE_SHAKE",
                    MoveKind::Damage,
                    18,
                    Targeting::Frontline,
                ),
                mv(
                    "jab",
                    "Jab",
                    "CUE_TWO_BEAT",
                    MoveKind::Damage,
                    16,
                    Targeting::Frontline,
                ),
            ],
        )
    }

    /// All kits, sorted by archetype name for a stable listing.
    pub fn all_kits(&self) -> Vec<ArchetypeKit> {
        let mut kits: Vec<ArchetypeKit> = self.kits.values().cloned().collect();
        kits.sort_by(|a, b| a.archetype.cmp(&b.archetype));
        kits
    }
}

/// Kit catalog endpoint: clients need move names and cues for playback.
#[openapi]
#[get("/v1/kits")]
pub async fn list_kits(catalog: &State<Arc<Catalog>>) -> Json<Vec<ArchetypeKit>> {
    Json(catalog.all_kits())
}
