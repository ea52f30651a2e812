//! Deterministic ladder battle resolution.
//!
//! Pure, synchronous and request-local: two rosters and a seed in, a
//! complete turn log and a winner out. All randomness flows through one
//! [`BattleRng`], so identical inputs replay identical fights. Malformed
//! in-fight situations (no living target, no living actor) are skip or
//! terminal conditions, never errors; roster validation happens at the
//! endpoint before this runs.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::catalog::{ArchetypeKit, Catalog, MoveKind, Role, Targeting};
use crate::stats::stats_for_creature;

use super::rng::BattleRng;
use super::tuning::Tuning;
use super::types::{
    BattleResult, RatingDelta, ResolvedUnit, Side, SideHp, SideUnits, TurnRecord, UnitRef,
    WinnerReason,
};

/// Mutable per-side battle state, indexed by roster slot.
struct SideState {
    kits: Vec<ArchetypeKit>,
    hp: Vec<i64>,
    hp_max: Vec<i64>,
    shield: Vec<i64>,
    jam: Vec<u32>,
}

impl SideState {
    fn new(catalog: &Catalog, team: &[UnitRef]) -> Self {
        let kits: Vec<ArchetypeKit> = team.iter().map(|u| catalog.kit_for(&u.archetype)).collect();
        // Battle HP is the unscaled kit maximum; rarity scaling only shows
        // up in the reported stats (see DESIGN.md).
        let hp_max: Vec<i64> = kits.iter().map(|k| k.hp_max).collect();
        SideState {
            hp: hp_max.clone(),
            shield: vec![0; team.len()],
            jam: vec![0; team.len()],
            kits,
            hp_max,
        }
    }

    fn all_down(&self) -> bool {
        self.hp.iter().all(|&h| h <= 0)
    }

    fn any_alive(&self) -> bool {
        self.hp.iter().any(|&h| h > 0)
    }
}

fn split_mut<'a>(
    me: &'a mut SideState,
    opp: &'a mut SideState,
    acting: Side,
) -> (&'a mut SideState, &'a mut SideState) {
    match acting {
        Side::Me => (me, opp),
        Side::Opp => (opp, me),
    }
}

/// First living slot among `slots`, in order.
fn first_alive_in(hp: &[i64], slots: impl Iterator<Item = usize>) -> Option<usize> {
    for i in slots {
        if hp.get(i).copied().unwrap_or(0) > 0 {
            return Some(i);
        }
    }
    None
}

/// Living slot with the lowest positive HP; earlier slot wins ties.
fn lowest_alive(hp: &[i64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut best_hp = i64::MAX;
    for (i, &h) in hp.iter().enumerate() {
        if h > 0 && h < best_hp {
            best = Some(i);
            best_hp = h;
        }
    }
    best
}

/// Jam counters for every unit on both sides, keyed by unit ref.
fn jam_snapshot(me_jam: &[u32], opp_jam: &[u32]) -> BTreeMap<String, u32> {
    let mut snapshot = BTreeMap::new();
    for (i, &v) in me_jam.iter().enumerate() {
        snapshot.insert(Side::Me.unit_ref(i), v);
    }
    for (i, &v) in opp_jam.iter().enumerate() {
        snapshot.insert(Side::Opp.unit_ref(i), v);
    }
    snapshot
}

fn resolved_units(catalog: &Catalog, side: Side, team: &[UnitRef]) -> Vec<ResolvedUnit> {
    team.iter()
        .enumerate()
        .map(|(i, u)| {
            let kit = catalog.kit_for(&u.archetype);
            ResolvedUnit {
                unit_ref: side.unit_ref(i),
                local_id: u.local_id.clone(),
                archetype: u.archetype.clone(),
                element: u.element.clone(),
                rarity: u.rarity.clone(),
                role: kit.role,
                hp_max: kit.hp_max,
                stats: stats_for_creature(catalog, &u.archetype, &u.rarity),
            }
        })
        .collect()
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Run a full ladder battle to completion.
///
/// Both rosters must already be validated (size 3-5, equal length); the
/// resolver plays through anything it is handed and always terminates
/// within the hard cap.
pub fn resolve_battle(
    catalog: &Catalog,
    tuning: &Tuning,
    my_team: &[UnitRef],
    opponent_team: &[UnitRef],
    seed: u32,
) -> BattleResult {
    let n = my_team.len();
    let mut rng = BattleRng::new(seed);
    let mut me = SideState::new(catalog, my_team);
    let mut opp = SideState::new(catalog, opponent_team);
    let mut turn_log: Vec<TurnRecord> = Vec::new();

    for turn in 1..=tuning.hard_cap {
        if me.all_down() || opp.all_down() {
            break;
        }

        // Odd turns belong to "me", even to "opp".
        let acting = if turn % 2 == 1 { Side::Me } else { Side::Opp };
        let (attacker, defender) = split_mut(&mut me, &mut opp, acting);

        // Round-robin actor slot, advanced to the next living unit.
        let mut actor = ((turn - 1) as usize) % n;
        let mut guard = 0;
        while guard < n && attacker.hp[actor] <= 0 {
            actor = (actor + 1) % n;
            guard += 1;
        }
        if guard >= n {
            // No living actors left on the acting side.
            break;
        }

        // A jammed unit consumes the jam on its attempt and may misfire.
        let mut misfire = false;
        if attacker.jam[actor] > 0 {
            attacker.jam[actor] -= 1;
            if rng.next_f64() < tuning.misfire_chance {
                misfire = true;
            }
        }

        let mv = attacker.kits[actor].moves[(turn as usize + actor) % 2].clone();
        let actor_role = attacker.kits[actor].role;
        let actor_ref = acting.unit_ref(actor);

        if misfire {
            // The action fizzles entirely; log the explicit no-op so the
            // client can play the whiff.
            let target_hp = attacker.hp[actor];
            let target_shield = attacker.shield[actor];
            let snapshot = jam_snapshot(&me.jam, &opp.jam);
            turn_log.push(TurnRecord {
                turn,
                actor: actor_ref.clone(),
                target: actor_ref,
                target_original: None,
                intercepted: false,
                move_id: mv.move_id,
                move_name: mv.name,
                cue: mv.cue,
                targeting: mv.targeting,
                hit: false,
                misfire: true,
                damage: 0,
                healing: 0,
                shield_delta: 0,
                absorbed: 0,
                target_hp,
                target_shield,
                ko: false,
                status_applied: vec![],
                status_consumed: vec!["jam".to_string()],
                jam_remaining_by_ref: snapshot,
            });
            continue;
        }

        match mv.kind {
            MoveKind::Heal => {
                let target = if mv.targeting == Targeting::SelfTarget {
                    Some(actor)
                } else {
                    lowest_alive(&attacker.hp)
                };
                // No valid heal target: skip silently, scheduling advances.
                let Some(ti) = target else { continue };

                let before = attacker.hp[ti];
                let variance = (rng.next_f64() * f64::from(tuning.heal_variance)) as i64;
                let damp = tuning.heal_damp(turn);
                let healing = (((mv.base + variance) as f64) * damp).floor() as i64;
                let healing = healing.max(1);
                attacker.hp[ti] = (before + healing).clamp(0, attacker.hp_max[ti]);
                let after = attacker.hp[ti];
                let target_shield = attacker.shield[ti];

                let snapshot = jam_snapshot(&me.jam, &opp.jam);
                turn_log.push(TurnRecord {
                    turn,
                    actor: actor_ref,
                    target: acting.unit_ref(ti),
                    target_original: None,
                    intercepted: false,
                    move_id: mv.move_id,
                    move_name: mv.name,
                    cue: mv.cue,
                    targeting: mv.targeting,
                    hit: true,
                    misfire: false,
                    damage: 0,
                    healing: after - before,
                    shield_delta: 0,
                    absorbed: 0,
                    target_hp: after,
                    target_shield,
                    ko: false,
                    status_applied: vec![],
                    status_consumed: vec![],
                    jam_remaining_by_ref: snapshot,
                });
            }
            MoveKind::Shield => {
                let target = if mv.targeting == Targeting::SelfTarget {
                    Some(actor)
                } else {
                    lowest_alive(&attacker.hp)
                };
                let Some(ti) = target else { continue };

                let before_shield = attacker.shield[ti];
                let variance = (rng.next_f64() * f64::from(tuning.shield_variance)) as i64;
                let damp = tuning.heal_damp(turn);
                let amount = (((mv.base + variance) as f64) * damp).floor() as i64;
                let amount = amount.max(1);
                let cap = tuning.shield_cap(attacker.hp_max[ti]);
                attacker.shield[ti] = (before_shield + amount).clamp(0, cap);
                let after_shield = attacker.shield[ti];
                let target_hp = attacker.hp[ti];

                let snapshot = jam_snapshot(&me.jam, &opp.jam);
                turn_log.push(TurnRecord {
                    turn,
                    actor: actor_ref,
                    target: acting.unit_ref(ti),
                    target_original: None,
                    intercepted: false,
                    move_id: mv.move_id,
                    move_name: mv.name,
                    cue: mv.cue,
                    targeting: mv.targeting,
                    hit: true,
                    misfire: false,
                    damage: 0,
                    healing: 0,
                    shield_delta: after_shield - before_shield,
                    absorbed: 0,
                    target_hp,
                    target_shield: after_shield,
                    ko: false,
                    status_applied: vec!["shield".to_string()],
                    status_consumed: vec![],
                    jam_remaining_by_ref: snapshot,
                });
            }
            // Control moves share the damage path: they may carry base 0
            // and still chip via variance, crit and role scaling.
            MoveKind::Damage | MoveKind::Control => {
                // Formation: slots 0-1 are frontline, 2+ backline.
                let mut target: Option<usize> = None;
                if mv.targeting == Targeting::BacklineRandom {
                    let alive_back: Vec<usize> =
                        (2..n).filter(|&i| defender.hp[i] > 0).collect();
                    if !alive_back.is_empty() {
                        target = Some(alive_back[rng.pick_index(alive_back.len())]);
                    }
                }
                let target = target
                    .or_else(|| first_alive_in(&defender.hp, 0..n.min(2)))
                    .or_else(|| first_alive_in(&defender.hp, 2..n));
                // Nobody left to hit: skip silently.
                let Some(mut target_i) = target else { continue };

                // A living frontline tank may intercept attacks aimed past it.
                let mut intercepted = false;
                let mut original: Option<usize> = None;
                if target_i >= 2 {
                    let tank = (0..n.min(2))
                        .find(|&i| defender.hp[i] > 0 && defender.kits[i].role == Role::Tank);
                    if let Some(tank_i) = tank {
                        if rng.next_f64() < tuning.intercept_chance {
                            intercepted = true;
                            original = Some(target_i);
                            target_i = tank_i;
                        }
                    }
                }

                let before = defender.hp[target_i];
                let variance = (rng.next_f64() * f64::from(tuning.damage_variance)) as i64;
                let crit = if rng.next_f64() < tuning.crit_chance {
                    tuning.crit_mult
                } else {
                    1.0
                };
                let ramp = tuning.ramp(turn);
                let role_mult = tuning.role_multiplier(actor_role);
                let damage = (((mv.base + variance) as f64) * role_mult * crit * ramp).floor() as i64;
                let damage = damage.max(1);

                // Shield soaks damage before HP.
                let before_shield = defender.shield[target_i];
                let absorbed = before_shield.min(damage);
                defender.shield[target_i] = before_shield - absorbed;
                defender.hp[target_i] = (before - (damage - absorbed)).max(0);
                let after = defender.hp[target_i];
                let ko = before > 0 && after == 0;

                let mut status_applied: Vec<String> = vec![];
                if actor_role == Role::Control && rng.next_f64() < tuning.jam_apply_chance {
                    status_applied.push("jam".to_string());
                    // One-action status; overwrites, never stacks.
                    defender.jam[target_i] = 1;
                }
                let target_shield = defender.shield[target_i];

                let defending = acting.other();
                let snapshot = jam_snapshot(&me.jam, &opp.jam);
                turn_log.push(TurnRecord {
                    turn,
                    actor: actor_ref,
                    target: defending.unit_ref(target_i),
                    target_original: original.map(|i| defending.unit_ref(i)),
                    intercepted,
                    move_id: mv.move_id,
                    move_name: mv.name,
                    cue: mv.cue,
                    targeting: mv.targeting,
                    hit: true,
                    misfire: false,
                    damage,
                    healing: 0,
                    shield_delta: -absorbed,
                    absorbed,
                    target_hp: after,
                    target_shield,
                    ko,
                    status_applied,
                    status_consumed: vec![],
                    jam_remaining_by_ref: snapshot,
                });
            }
        }
    }

    let me_alive = me.any_alive();
    let opp_alive = opp.any_alive();
    let winner = match (me_alive, opp_alive) {
        (true, false) => Side::Me,
        (false, true) => Side::Opp,
        // Hard-cap stalemate: the initiating side takes it. Kept as shipped;
        // flagged as an open fairness question in DESIGN.md.
        (true, true) => Side::Me,
        (false, false) => Side::Opp,
    };

    let end_turn = turn_log.last().map(|r| r.turn).unwrap_or(0);
    let winner_reason = if end_turn >= tuning.hard_cap {
        WinnerReason::SuddenDeathHardCap
    } else {
        WinnerReason::Wipeout
    };

    let rating = tuning.rating_delta;
    let (rating_delta, essence_reward) = match winner {
        Side::Me => (
            RatingDelta {
                me: rating,
                opp: -rating,
            },
            tuning.essence_reward_win,
        ),
        Side::Opp => (
            RatingDelta {
                me: -rating,
                opp: rating,
            },
            tuning.essence_reward_loss,
        ),
    };

    BattleResult {
        battle_id: format!("b_{}_{}", seed, unix_millis()),
        winner,
        winner_reason,
        end_turn,
        rating_delta,
        essence_reward,
        seed,
        units: SideUnits {
            me: resolved_units(catalog, Side::Me, my_team),
            opp: resolved_units(catalog, Side::Opp, opponent_team),
        },
        initial_hp: SideHp {
            me: me.hp_max.clone(),
            opp: opp.hp_max.clone(),
        },
        turn_log,
    }
}
