use bevy_ecs::prelude::*;
use tracing::info;


/// Turn counter the generals react to.
///
/// The host advances it once every faction has moved; generals only plan on
/// the update where it changed.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct TurnClock {
    pub current_turn: u32,
}

impl Default for TurnClock {
    fn default() -> Self {
        Self { current_turn: 1 }
    }
}

impl TurnClock {
    pub fn advance_turn(&mut self) {
        self.current_turn += 1;
        info!("Starting turn {}", self.current_turn);
    }
}

/// Run condition: the turn clock moved since the last run.
pub fn turn_started(clock: Res<TurnClock>) -> bool {
    clock.is_changed()
}
