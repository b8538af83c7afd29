//! Strategic planning for computer-controlled factions.

use std::collections::BTreeMap;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use tracing::debug;

use crate::config::GeneralConfig;
use crate::empire::EmpireId;
use crate::galaxy::Galaxy;
use crate::orders::StrategicOrders;
use crate::turn_system::{TurnClock, turn_started};

pub mod advisor;
pub mod cache;
pub mod colonization;
pub mod fleet_plan;
pub mod general;
pub mod invasion;
pub mod metrics;
pub mod oracles;
pub mod planner;
pub mod threat;


pub use advisor::{IncomingShip, StrategicAdvisor};
pub use cache::TurnCache;
pub use fleet_plan::{FleetPlan, FleetPlanRegistry, FleetPlanTable};
pub use general::{General, PassiveGeneral, TurnContext};
pub use invasion::{ground_kill_ratio, transport_gauntlet_rounds};
pub use oracles::{OracleSet, Oracles, StandardOracles};
pub use planner::SystemPlan;

/// The General of every faction, created on first use from [`GeneralConfig`].
#[derive(Resource, Default)]
pub struct Generals {
    generals: BTreeMap<EmpireId, Box<dyn General>>,
}

impl Generals {
    pub fn insert(&mut self, general: Box<dyn General>) {
        self.generals.insert(general.empire(), general);
    }

    pub fn get(&self, empire: EmpireId) -> Option<&dyn General> {
        self.generals.get(&empire).map(|general| general.as_ref())
    }

    pub fn get_mut(&mut self, empire: EmpireId) -> Option<&mut Box<dyn General>> {
        self.generals.get_mut(&empire)
    }

    pub fn len(&self) -> usize {
        self.generals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generals.is_empty()
    }
}

/// Runs every active faction's General once per turn.
pub fn run_generals(
    galaxy: Res<Galaxy>,
    oracles: Res<OracleSet>,
    config: Res<GeneralConfig>,
    mut generals: ResMut<Generals>,
    mut registry: ResMut<FleetPlanRegistry>,
    mut orders: ResMut<StrategicOrders>,
) {
    let ctx = TurnContext::new(&galaxy, oracles.0.as_ref());
    registry.clear();
    orders.clear();
    for empire in galaxy.active_empires() {
        let general = generals
            .generals
            .entry(empire.id)
            .or_insert_with(|| config.general_for(empire));
        let turn_orders = general.next_turn(ctx);
        registry.publish(empire.id, general.fleet_plans());
        debug!(
            "General of {} planned turn {}: {} shipyard and {} transport orders",
            empire.name,
            galaxy.turn,
            turn_orders.shipyard().len(),
            turn_orders.transports().len()
        );
        orders.insert(empire.id, turn_orders);
    }
}

/// Registers the generals and the resources they plan against.
pub struct GeneralPlugin;

impl Plugin for GeneralPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TurnClock>()
            .init_resource::<Galaxy>()
            .init_resource::<OracleSet>()
            .init_resource::<GeneralConfig>()
            .init_resource::<Generals>()
            .init_resource::<FleetPlanRegistry>()
            .init_resource::<StrategicOrders>()
            .add_systems(Update, run_generals.run_if(turn_started));
    }
}
