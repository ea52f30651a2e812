//! Wire and log types for ladder battles.
//!
//! Everything here is pure data: the request roster, the per-action turn
//! records the client replays frame by frame, and the final battle result.

use crate::catalog::{Role, Targeting};
use crate::stats::CreatureStats;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;
use std::collections::BTreeMap;

/// One caller-supplied roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct UnitRef {
    pub local_id: String,
    pub archetype: String,
    pub element: String,
    pub rarity: String,
}

/// Request body for `POST /v1/ladder/battle`.
///
/// `seed` is optional; when absent the server rolls a random 32-bit seed.
/// Supplying it replays a previous fight exactly.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct BattleRequest {
    pub my_team: Vec<UnitRef>,
    pub opponent_team: Vec<UnitRef>,
    pub seed: Option<u32>,
}

/// Which side of the battle a unit (or the winner) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum Side {
    Me,
    Opp,
}

impl Side {
    pub fn prefix(self) -> &'static str {
        match self {
            Side::Me => "me",
            Side::Opp => "opp",
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::Me => Side::Opp,
            Side::Opp => Side::Me,
        }
    }

    /// Stable unit reference for a slot, e.g. `me_1`, `opp_3`. Slots are
    /// 0-based internally but 1-based on the wire.
    pub fn unit_ref(self, slot: usize) -> String {
        format!("{}_{}", self.prefix(), slot + 1)
    }
}

/// Why the battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "snake_case")]
pub enum WinnerReason {
    Wipeout,
    SuddenDeathHardCap,
}

/// One resolved action in the turn log. Append-only; the client replays
/// these in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct TurnRecord {
    pub turn: u32,
    pub actor: String,
    pub target: String,
    /// Original intended target when a tank intercepted the attack.
    pub target_original: Option<String>,
    pub intercepted: bool,
    pub move_id: String,
    pub move_name: String,
    pub cue: String,
    pub targeting: Targeting,
    pub hit: bool,
    pub misfire: bool,
    pub damage: i64,
    pub healing: i64,
    pub shield_delta: i64,
    pub absorbed: i64,
    pub target_hp: i64,
    pub target_shield: i64,
    pub ko: bool,
    pub status_applied: Vec<String>,
    pub status_consumed: Vec<String>,
    /// Jam counters for every unit on both sides after this action.
    /// Ordered map so serialized logs are byte-stable.
    pub jam_remaining_by_ref: BTreeMap<String, u32>,
}

/// A roster entry as resolved by the server: identity plus derived kit data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct ResolvedUnit {
    #[serde(rename = "ref")]
    pub unit_ref: String,
    pub local_id: String,
    pub archetype: String,
    pub element: String,
    pub rarity: String,
    pub role: Role,
    /// Unscaled kit HP; this is what the simulation ran on.
    pub hp_max: i64,
    /// Rarity-scaled stats reported to clients (not consumed by the
    /// simulation).
    pub stats: CreatureStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct SideUnits {
    pub me: Vec<ResolvedUnit>,
    pub opp: Vec<ResolvedUnit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct SideHp {
    pub me: Vec<i64>,
    pub opp: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct RatingDelta {
    pub me: i64,
    pub opp: i64,
}

/// Complete result of one ladder battle, returned whole (no streaming).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct BattleResult {
    pub battle_id: String,
    pub winner: Side,
    pub winner_reason: WinnerReason,
    pub end_turn: u32,
    pub rating_delta: RatingDelta,
    pub essence_reward: i64,
    pub seed: u32,
    pub units: SideUnits,
    pub initial_hp: SideHp,
    pub turn_log: Vec<TurnRecord>,
}

/// Roster sizes accepted by the ladder.
pub const MIN_TEAM_SIZE: usize = 3;
pub const MAX_TEAM_SIZE: usize = 5;

/// Validate both rosters before the resolver runs. Returns a stable error
/// code on failure; the resolver itself never rejects input.
pub fn validate_teams(my_team: &[UnitRef], opponent_team: &[UnitRef]) -> Result<(), String> {
    for team in [my_team, opponent_team] {
        if team.len() < MIN_TEAM_SIZE || team.len() > MAX_TEAM_SIZE {
            return Err("team_size_out_of_range".to_string());
        }
        for unit in team {
            if unit.local_id.is_empty()
                || unit.archetype.is_empty()
                || unit.element.is_empty()
                || unit.rarity.is_empty()
            {
                return Err("missing_unit_fields".to_string());
            }
        }
    }
    if my_team.len() != opponent_team.len() {
        return Err("team_size_mismatch".to_string());
    }
    Ok(())
}
