use crate::empire::EmpireId;
use crate::map::Location;

/// Figures a General computes at most once per turn.
///
/// `None` means not computed yet. Everything is dropped together by
/// [`TurnCache::reset`] at the start of a turn; within the turn a cached value
/// is returned even if the world changed underneath.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnCache {
    /// Outer `None` until searched; inner `None` when nobody qualified.
    pub best_victim: Option<Option<EmpireId>>,
    pub uncolonized_center: Option<Location>,
    pub defense_ratio: Option<f32>,
    pub armed_fleet_cost: Option<f32>,
    pub additional_colonizers: Option<u32>,
    pub population_capacity: Option<f32>,
    pub war_roi: Option<f32>,
    pub visible_enemy_fighter_cost: Option<f32>,
    pub visible_enemy_transport_cost: Option<f32>,
    pub my_fighter_cost: Option<f32>,
    pub smart_power: Option<f32>,
    pub highest_prod_score: Option<f32>,
}

impl TurnCache {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
