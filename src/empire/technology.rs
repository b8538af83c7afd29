use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::map::PlanetType;

/// Best planetary bomb a faction can mount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BombWeapon {
    pub damage_low: f32,
    pub damage_high: f32,
    pub cost: f32,
    /// Cost reduction factor from miniaturization (1.0 = none).
    pub miniaturization: f32,
}

impl Default for BombWeapon {
    fn default() -> Self {
        Self {
            damage_low: 3.0,
            damage_high: 12.0,
            cost: 5.0,
            miniaturization: 1.0,
        }
    }
}

impl BombWeapon {
    /// Average damage per BC invested after the defender's planetary shield.
    pub fn damage_per_bc(&self, shield: f32) -> f32 {
        let low = (self.damage_low - shield).max(0.0);
        let high = (self.damage_high - shield).max(0.0);
        let per_weapon = (low + high) / 2.0;
        let cost = self.cost * self.miniaturization * 4.0;
        if cost <= 0.0 {
            return 0.0;
        }
        per_weapon / cost
    }
}

/// The subset of a faction's technology the General reasons about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechProfile {
    pub avg_tech_level: f32,
    /// Speed of transports and new ships, in light years per turn.
    pub top_speed: f32,
    pub top_engine_warp: u32,
    pub ship_range: f32,
    pub scan_range: f32,
    pub unlimited_range: bool,
    /// Ground combat bonus when attacking.
    pub troop_attack_adj: f32,
    pub population_cost: f32,
    pub base_factory_cost: f32,
    pub new_missile_base_cost: f32,
    /// Hit points of a single troop transport.
    pub transport_hp: f32,
    pub max_planetary_shield: f32,
    /// Fraction of transports expected to get through orbital defenses.
    pub combat_transport_pct: f32,
    pub subspace_interdiction: bool,
    /// Highest environment-control tech known, or [`None`] when never researched.
    pub control_environment_level: Option<u8>,
    pub construction_level: f32,
    pub top_bomb: BombWeapon,
    /// Known technologies and their research costs.
    pub known_techs: BTreeMap<u32, f32>,
}

impl Default for TechProfile {
    fn default() -> Self {
        Self {
            avg_tech_level: 1.0,
            top_speed: 1.0,
            top_engine_warp: 1,
            ship_range: 4.0,
            scan_range: 3.0,
            unlimited_range: false,
            troop_attack_adj: 0.0,
            population_cost: 20.0,
            base_factory_cost: 10.0,
            new_missile_base_cost: 100.0,
            transport_hp: 1.0,
            max_planetary_shield: 0.0,
            combat_transport_pct: 0.0,
            subspace_interdiction: false,
            control_environment_level: None,
            construction_level: 1.0,
            top_bomb: BombWeapon::default(),
            known_techs: BTreeMap::new(),
        }
    }
}

impl TechProfile {
    pub fn knows(&self, tech: u32) -> bool {
        self.known_techs.contains_key(&tech)
    }

    /// Research costs of technologies this profile knows and `other` does not.
    pub fn techs_unknown_to<'a>(&'a self, other: &'a TechProfile) -> impl Iterator<Item = f32> + 'a {
        self.known_techs
            .iter()
            .filter(|(id, _)| !other.knows(**id))
            .map(|(_, cost)| *cost)
    }

    /// Whether environment tech allows settling the given planet type.
    pub fn can_colonize(&self, kind: PlanetType, ignores_environment: bool) -> bool {
        let Some(required) = kind.environment_level() else {
            return false;
        };
        if ignores_environment {
            return true;
        }
        required <= self.control_environment_level.unwrap_or(0)
    }
}
