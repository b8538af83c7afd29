//! Tunable settings for the computer generals.
//!
//! Balance numbers live in [`crate::constants`]; this only holds what a host
//! game may reasonably want to change per match.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::{General, PassiveGeneral, StrategicAdvisor};
use crate::constants::*;
use crate::empire::Empire;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("priority band {lower} ({lower_value}) must be below {upper} ({upper_value})")]
    BandsOutOfOrder {
        lower: &'static str,
        lower_value: f32,
        upper: &'static str,
        upper_value: f32,
    },
    #[error("tie-break cap {cap} must be positive and narrower than the smallest band gap {gap}")]
    TieBreakTooWide { cap: f32, gap: f32 },
}

/// Base priorities of each kind of fleet plan. Higher is more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityBands {
    pub repel: f32,
    pub scout_repel: f32,
    pub scout_repel_border_bonus: f32,
    pub bomb_encroachment: f32,
    pub bomb_enemy: f32,
    pub bomb_final_war: f32,
    pub bomb_undefended: f32,
}

impl Default for PriorityBands {
    fn default() -> Self {
        Self {
            repel: PRIORITY_REPEL,
            scout_repel: PRIORITY_SCOUT_REPEL,
            scout_repel_border_bonus: PRIORITY_SCOUT_REPEL_BORDER_BONUS,
            bomb_encroachment: PRIORITY_BOMB_ENCROACHMENT,
            bomb_enemy: PRIORITY_BOMB_ENEMY,
            bomb_final_war: PRIORITY_BOMB_FINAL_WAR,
            bomb_undefended: PRIORITY_BOMB_UNDEFENDED,
        }
    }
}

impl PriorityBands {
    fn ordered(&self) -> [(&'static str, f32); 5] {
        [
            ("repel", self.repel),
            ("bomb_encroachment", self.bomb_encroachment),
            ("bomb_enemy", self.bomb_enemy),
            ("bomb_final_war", self.bomb_final_war),
            ("bomb_undefended", self.bomb_undefended),
        ]
    }

    /// Smallest distance between two consecutive bands.
    pub fn min_gap(&self) -> f32 {
        self.ordered()
            .windows(2)
            .map(|pair| pair[1].1 - pair[0].1)
            .fold(f32::MAX, f32::min)
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub bands: PriorityBands,
    /// Upper bound (exclusive) of the invasion-priority tie-break folded into a band.
    pub tie_break_cap: f32,
    /// Human factions get a [`PassiveGeneral`].
    pub passive_for_humans: bool,
    /// Every faction gets a [`PassiveGeneral`], e.g. on the simplest difficulty.
    pub passive_all: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            bands: PriorityBands::default(),
            tie_break_cap: TIE_BREAK_CAP,
            passive_for_humans: true,
            passive_all: false,
        }
    }
}

impl GeneralConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bands = &self.bands;
        let mut fields = bands.ordered().to_vec();
        fields.push(("scout_repel", bands.scout_repel));
        fields.push(("scout_repel_border_bonus", bands.scout_repel_border_bonus));
        fields.push(("tie_break_cap", self.tie_break_cap));
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }

        for pair in bands.ordered().windows(2) {
            let (lower, lower_value) = pair[0];
            let (upper, upper_value) = pair[1];
            if lower_value >= upper_value {
                return Err(ConfigError::BandsOutOfOrder {
                    lower,
                    lower_value,
                    upper,
                    upper_value,
                });
            }
        }

        let scout_top = bands.scout_repel + bands.scout_repel_border_bonus.max(0.0);
        if scout_top >= bands.bomb_encroachment {
            return Err(ConfigError::BandsOutOfOrder {
                lower: "scout_repel",
                lower_value: scout_top,
                upper: "bomb_encroachment",
                upper_value: bands.bomb_encroachment,
            });
        }

        let gap = bands.min_gap();
        if self.tie_break_cap <= 0.0 || self.tie_break_cap >= gap {
            return Err(ConfigError::TieBreakTooWide {
                cap: self.tie_break_cap,
                gap,
            });
        }
        Ok(())
    }

    /// Tie-break term for a plan, always in `[0, tie_break_cap)`.
    pub fn tie_break(&self, invasion_priority: f32) -> f32 {
        let ceiling = self.tie_break_cap * (1.0 - f32::EPSILON);
        (invasion_priority / TIE_BREAK_DIVISOR).max(0.0).min(ceiling)
    }

    /// Picks the General implementation a faction should run.
    pub fn general_for(&self, empire: &Empire) -> Box<dyn General> {
        if self.passive_all || (self.passive_for_humans && !empire.ai_controlled) {
            Box::new(PassiveGeneral::new(empire.id))
        } else {
            Box::new(StrategicAdvisor::with_config(empire.id, self.clone()))
        }
    }
}
