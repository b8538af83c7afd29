use std::collections::BTreeMap;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::empire::EmpireId;
use crate::map::SystemId;
use crate::ships::DesignId;

/// Put a design on a colony's shipyard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipyardOrder {
    pub colony: SystemId,
    pub design: DesignId,
    pub queued_bc: f32,
    pub desired_ships: u32,
}

/// Load troops at one colony and send them to another system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportOrder {
    pub from: SystemId,
    pub to: SystemId,
    pub troops: u32,
    /// Turn all transports of the wave should land together.
    pub arrive_by: Option<u32>,
}

/// Orders one General issued during a turn.
///
/// The host applies them after every faction has planned, so planning always
/// sees the same galaxy snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnOrders {
    shipyard: Vec<ShipyardOrder>,
    transports: Vec<TransportOrder>,
}

impl TurnOrders {
    pub fn queue_shipyard(&mut self, order: ShipyardOrder) {
        self.shipyard.push(order);
    }

    pub fn queue_transport(&mut self, order: TransportOrder) {
        self.transports.push(order);
    }

    pub fn shipyard(&self) -> &[ShipyardOrder] {
        &self.shipyard
    }

    pub fn transports(&self) -> &[TransportOrder] {
        &self.transports
    }

    /// Troops already ordered toward a system this turn.
    pub fn troops_sent_to(&self, target: SystemId) -> u32 {
        self.transports
            .iter()
            .filter(|order| order.to == target)
            .map(|order| order.troops)
            .sum()
    }

    /// Troops already ordered out of a colony this turn.
    pub fn troops_sent_from(&self, source: SystemId) -> u32 {
        self.transports
            .iter()
            .filter(|order| order.from == source)
            .map(|order| order.troops)
            .sum()
    }

    pub fn is_building_at(&self, colony: SystemId) -> bool {
        self.shipyard.iter().any(|order| order.colony == colony)
    }

    pub fn take_shipyard(&mut self) -> Vec<ShipyardOrder> {
        std::mem::take(&mut self.shipyard)
    }

    pub fn take_transports(&mut self) -> Vec<TransportOrder> {
        std::mem::take(&mut self.transports)
    }

    pub fn is_empty(&self) -> bool {
        self.shipyard.is_empty() && self.transports.is_empty()
    }

    pub fn clear(&mut self) {
        self.shipyard.clear();
        self.transports.clear();
    }
}

/// Orders of every faction for the current turn.
#[derive(Resource, Debug, Default)]
pub struct StrategicOrders {
    by_empire: BTreeMap<EmpireId, TurnOrders>,
}

impl StrategicOrders {
    pub fn insert(&mut self, empire: EmpireId, orders: TurnOrders) {
        self.by_empire.insert(empire, orders);
    }

    pub fn get(&self, empire: EmpireId) -> Option<&TurnOrders> {
        self.by_empire.get(&empire)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EmpireId, &TurnOrders)> {
        self.by_empire.iter().map(|(id, orders)| (*id, orders))
    }

    pub fn take(&mut self, empire: EmpireId) -> TurnOrders {
        self.by_empire.remove(&empire).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.by_empire.clear();
    }
}
