//! Battle balance constants.
//!
//! Every numeric knob of the resolver lives here so balancing passes touch
//! a single table instead of the state machine. `Default` carries the
//! current live values.

use crate::catalog::Role;

#[derive(Debug, Clone)]
pub struct Tuning {
    /// Turn after which damage ramps up and heals decay.
    pub soft_cap: u32,
    /// Absolute turn limit; the fight ends here no matter what.
    pub hard_cap: u32,

    pub role_mult_tank: f64,
    pub role_mult_support: f64,
    pub role_mult_control: f64,
    pub role_mult_dps: f64,

    pub crit_chance: f64,
    pub crit_mult: f64,
    pub intercept_chance: f64,
    pub jam_apply_chance: f64,
    pub misfire_chance: f64,

    /// Damage gain per turn past the soft cap.
    pub ramp_per_turn: f64,
    /// Heal/shield loss per turn past the soft cap.
    pub damp_per_turn: f64,

    /// Exclusive upper bounds for the uniform variance draws.
    pub damage_variance: u32,
    pub heal_variance: u32,
    pub shield_variance: u32,

    pub shield_cap_floor: i64,
    pub shield_cap_ratio: f64,

    pub rating_delta: i64,
    pub essence_reward_win: i64,
    pub essence_reward_loss: i64,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            soft_cap: 20,
            hard_cap: 60,
            role_mult_tank: 0.75,
            role_mult_support: 0.60,
            role_mult_control: 0.80,
            role_mult_dps: 1.0,
            crit_chance: 0.10,
            crit_mult: 1.5,
            intercept_chance: 0.45,
            jam_apply_chance: 0.35,
            misfire_chance: 0.20,
            ramp_per_turn: 0.12,
            damp_per_turn: 0.08,
            damage_variance: 7,
            heal_variance: 5,
            shield_variance: 4,
            shield_cap_floor: 40,
            shield_cap_ratio: 0.3,
            rating_delta: 12,
            essence_reward_win: 20,
            essence_reward_loss: 10,
        }
    }
}

impl Tuning {
    pub fn role_multiplier(&self, role: Role) -> f64 {
        match role {
            Role::Tank => self.role_mult_tank,
            Role::Support => self.role_mult_support,
            Role::Control => self.role_mult_control,
            Role::Dps => self.role_mult_dps,
        }
    }

    /// Damage multiplier for a turn; grows past the soft cap.
    pub fn ramp(&self, turn: u32) -> f64 {
        if turn > self.soft_cap {
            1.0 + self.ramp_per_turn * f64::from(turn - self.soft_cap)
        } else {
            1.0
        }
    }

    /// Heal/shield multiplier for a turn; shrinks past the soft cap, floored at 0.
    pub fn heal_damp(&self, turn: u32) -> f64 {
        if turn > self.soft_cap {
            (1.0 - self.damp_per_turn * f64::from(turn - self.soft_cap)).max(0.0)
        } else {
            1.0
        }
    }

    /// Shield ceiling for a unit: a flat floor or a fraction of its max HP,
    /// whichever is higher.
    pub fn shield_cap(&self, hp_max: i64) -> i64 {
        self.shield_cap_floor
            .max((hp_max as f64 * self.shield_cap_ratio).floor() as i64)
    }
}
