//! Shared world snapshot read by every faction's General.
//!
//! The host simulation rebuilds this once per turn. Everything here is
//! read-only from the General's point of view; derived figures (production,
//! fleet values, ranges) are computed on demand and degrade to zero when the
//! underlying data is missing.

use std::collections::BTreeMap;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::empire::{Empire, EmpireId, ScoutReport, SystemIntel};
use crate::map::{Location, StarSystem, SystemId};
use crate::ships::{DesignId, FleetId, ShipDesign, ShipFleet, Transport, TransportId};

#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Galaxy {
    pub turn: u32,
    pub systems: Vec<StarSystem>,
    pub empires: Vec<Empire>,
    pub fleets: Vec<ShipFleet>,
    pub transports: Vec<Transport>,
}

impl Galaxy {
    pub fn system(&self, id: SystemId) -> Option<&StarSystem> {
        self.systems.get(id.index())
    }

    pub fn empire(&self, id: EmpireId) -> Option<&Empire> {
        self.empires.iter().find(|empire| empire.id == id)
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn active_empires(&self) -> impl Iterator<Item = &Empire> {
        self.empires.iter().filter(|empire| empire.active)
    }

    pub fn design(&self, owner: EmpireId, design: DesignId) -> Option<&ShipDesign> {
        self.empire(owner).and_then(|empire| empire.lab.design(design))
    }

    pub fn colonies_of(&self, owner: EmpireId) -> impl Iterator<Item = &StarSystem> {
        self.systems
            .iter()
            .filter(move |system| system.owner() == Some(owner))
    }

    pub fn num_colonies(&self, owner: EmpireId) -> usize {
        self.colonies_of(owner).count()
    }

    pub fn production_of(&self, owner: EmpireId) -> f32 {
        self.colonies_of(owner)
            .filter_map(|system| system.colony.as_ref())
            .map(|colony| colony.production)
            .sum()
    }

    pub fn income_of(&self, owner: EmpireId) -> f32 {
        self.colonies_of(owner)
            .filter_map(|system| system.colony.as_ref())
            .map(|colony| colony.total_income)
            .sum()
    }

    pub fn population_of(&self, owner: EmpireId) -> f32 {
        self.colonies_of(owner)
            .filter_map(|system| system.colony.as_ref())
            .map(|colony| colony.population)
            .sum()
    }

    pub fn fleet(&self, id: FleetId) -> Option<&ShipFleet> {
        self.fleets.iter().find(|fleet| fleet.id == id)
    }

    pub fn transport(&self, id: TransportId) -> Option<&Transport> {
        self.transports.iter().find(|transport| transport.id == id)
    }

    pub fn fleets_of(&self, owner: EmpireId) -> impl Iterator<Item = &ShipFleet> {
        self.fleets.iter().filter(move |fleet| fleet.owner == owner)
    }

    /// Fleets parked at the system.
    pub fn orbiting_fleets(&self, system: SystemId) -> impl Iterator<Item = &ShipFleet> {
        self.fleets
            .iter()
            .filter(move |fleet| fleet.orbiting == Some(system))
    }

    /// Fleets underway toward the system.
    pub fn incoming_fleets(&self, system: SystemId) -> impl Iterator<Item = &ShipFleet> {
        self.fleets
            .iter()
            .filter(move |fleet| fleet.in_transit() && fleet.destination == Some(system))
    }

    fn stack_designs<'a>(
        &'a self,
        fleet: &'a ShipFleet,
    ) -> impl Iterator<Item = (&'a ShipDesign, f32)> + 'a {
        fleet.stacks.iter().filter_map(move |stack| {
            self.design(fleet.owner, stack.design)
                .map(|design| (design, stack.count as f32))
        })
    }

    /// Build cost of every ship in the fleet.
    pub fn fleet_bc_value(&self, fleet: &ShipFleet) -> f32 {
        self.stack_designs(fleet)
            .map(|(design, count)| design.cost * count)
            .sum()
    }

    /// Ship-combat firepower against a target with the given shield.
    pub fn fleet_firepower(&self, fleet: &ShipFleet, shield: f32) -> f32 {
        self.stack_designs(fleet)
            .map(|(design, count)| (design.firepower - shield).max(0.0) * count)
            .sum()
    }

    /// Bombardment damage per round against a planetary shield.
    pub fn fleet_bombard_damage(&self, fleet: &ShipFleet, shield: f32) -> f32 {
        self.stack_designs(fleet)
            .map(|(design, count)| (design.bomb_damage - shield).max(0.0) * count)
            .sum()
    }

    pub fn fleet_is_armed(&self, fleet: &ShipFleet) -> bool {
        self.stack_designs(fleet)
            .any(|(design, count)| count > 0.0 && design.is_armed())
    }

    pub fn fleet_has_colony_ship(&self, fleet: &ShipFleet) -> bool {
        self.stack_designs(fleet)
            .any(|(design, count)| count > 0.0 && design.has_colony_special())
    }

    /// Speed of the slowest stack, never below warp 1.
    pub fn fleet_slowest_speed(&self, fleet: &ShipFleet) -> f32 {
        self.stack_designs(fleet)
            .map(|(design, _)| design.warp as f32)
            .fold(None, |slowest: Option<f32>, warp| {
                Some(slowest.map_or(warp, |current| current.min(warp)))
            })
            .unwrap_or(1.0)
            .max(1.0)
    }

    pub fn total_fleet_cost(&self, owner: EmpireId) -> f32 {
        self.fleets_of(owner)
            .map(|fleet| self.fleet_bc_value(fleet))
            .sum()
    }

    /// Ships in service per design.
    pub fn design_counts(&self, owner: EmpireId) -> BTreeMap<DesignId, u32> {
        let mut counts = BTreeMap::new();
        for fleet in self.fleets_of(owner) {
            for stack in &fleet.stacks {
                *counts.entry(stack.design).or_insert(0) += stack.count;
            }
        }
        counts
    }

    /// Troops the owner already has underway toward the system.
    pub fn transports_in_transit(&self, owner: EmpireId, system: SystemId) -> f32 {
        self.transports
            .iter()
            .filter(|transport| transport.owner == owner && transport.destination == system)
            .map(|transport| transport.size as f32)
            .sum()
    }

    /// Whether the viewer's ships can reach any colony of `other`.
    pub fn in_ship_range_of(&self, viewer: &Empire, other: EmpireId) -> bool {
        self.colonies_of(other)
            .any(|system| viewer.intel(system.id).in_ship_range)
    }

    /// Whether a location is close enough to one of the viewer's colonies to be seen.
    pub fn is_visible_to(&self, viewer: &Empire, location: Location) -> bool {
        self.colonies_of(viewer.id)
            .any(|system| system.location.distance_to(location) <= viewer.tech.scan_range)
    }

    pub fn can_send_transports_to(&self, sender: &Empire, target: SystemId) -> bool {
        let Some(system) = self.system(target) else {
            return false;
        };
        if system.monster || !sender.intel(target).in_ship_range {
            return false;
        }
        self.colonies_of(sender.id)
            .filter_map(|system| system.colony.as_ref())
            .any(|colony| colony.can_transport)
    }

    /// Systems within `range` of a location, in id order.
    pub fn systems_in_range(&self, center: Location, range: f32) -> impl Iterator<Item = &StarSystem> {
        self.systems
            .iter()
            .filter(move |system| system.location.distance_to(center) <= range)
    }

    /// Whole turns a ship at `speed` needs between two systems.
    pub fn travel_time(&self, from: SystemId, to: SystemId, speed: f32) -> f32 {
        let (Some(from), Some(to)) = (self.system(from), self.system(to)) else {
            return f32::MAX;
        };
        let speed = if to.in_nebula { 1.0 } else { speed.max(1.0) };
        (from.distance_to(to) / speed).ceil().max(1.0)
    }

    /// Rebuilds every faction's intel as perfect knowledge of what its ships can reach.
    ///
    /// Hosts with fog of war maintain [`SystemIntel`] themselves; generated and
    /// test galaxies use this instead.
    pub fn refresh_intel(&mut self) {
        let colonies: Vec<(EmpireId, SystemId, Location)> = self
            .systems
            .iter()
            .filter_map(|system| system.owner().map(|owner| (owner, system.id, system.location)))
            .collect();

        for empire in &mut self.empires {
            let range = empire.tech.ship_range;
            empire.intel = self
                .systems
                .iter()
                .map(|system| {
                    let distance = colonies
                        .iter()
                        .filter(|(owner, _, _)| *owner == empire.id)
                        .map(|(_, _, location)| location.distance_to(system.location))
                        .fold(f32::MAX, f32::min);
                    let in_ship_range = empire.tech.unlimited_range || distance <= range;
                    let border = in_ship_range
                        && colonies.iter().any(|(owner, id, location)| {
                            *owner != empire.id
                                && *id != system.id
                                && location.distance_to(system.location) <= range
                        });
                    let report = in_ship_range.then(|| ScoutReport::of(system));
                    SystemIntel {
                        scouted: in_ship_range,
                        explored: in_ship_range,
                        in_ship_range,
                        distance,
                        border,
                        hostility: 0.0,
                        report,
                    }
                })
                .collect();
        }
    }
}
