//! Per-system ship requests produced by a General each turn.

use std::collections::BTreeMap;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::empire::EmpireId;
use crate::map::SystemId;
use crate::ships::DesignId;

/// What one faction wants sent to, or built for, one system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetPlan {
    pub priority: f32,
    pub staging_point: Option<SystemId>,
    ships: BTreeMap<DesignId, u32>,
}

impl FleetPlan {
    /// Requests more ships of a design. Requests accumulate.
    pub fn add_ships(&mut self, design: DesignId, count: u32) {
        if count == 0 {
            return;
        }
        *self.ships.entry(design).or_insert(0) += count;
    }

    pub fn set_priority(&mut self, priority: f32) {
        self.priority = priority;
    }

    pub fn set_staging_point(&mut self, staging_point: Option<SystemId>) {
        self.staging_point = staging_point;
    }

    pub fn ships(&self) -> impl Iterator<Item = (DesignId, u32)> + '_ {
        self.ships.iter().map(|(design, count)| (*design, *count))
    }

    pub fn ship_count(&self, design: DesignId) -> u32 {
        self.ships.get(&design).copied().unwrap_or(0)
    }

    pub fn total_ships(&self) -> u32 {
        self.ships.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.priority == 0.0 && self.ships.is_empty()
    }

    /// Folds another plan for the same system into this one.
    ///
    /// Ship requests add up and the higher priority wins, so the result does
    /// not depend on which plan was written first.
    pub fn merge(&mut self, other: &FleetPlan) {
        for (design, count) in other.ships() {
            self.add_ships(design, count);
        }
        if other.priority > self.priority {
            self.priority = other.priority;
            if other.staging_point.is_some() {
                self.staging_point = other.staging_point;
            }
        }
        if self.staging_point.is_none() {
            self.staging_point = other.staging_point;
        }
    }
}

/// One [`FleetPlan`] per star system, rebuilt every turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetPlanTable {
    plans: Vec<FleetPlan>,
}

impl FleetPlanTable {
    pub fn new(system_count: usize) -> Self {
        Self {
            plans: vec![FleetPlan::default(); system_count],
        }
    }

    /// Drops every plan and resizes the table for the current galaxy.
    pub fn reset(&mut self, system_count: usize) {
        self.plans.clear();
        self.plans.resize(system_count, FleetPlan::default());
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn plan(&self, system: SystemId) -> Option<&FleetPlan> {
        self.plans.get(system.index())
    }

    /// Plan for a system, growing the table when the galaxy gained systems.
    pub fn plan_mut(&mut self, system: SystemId) -> &mut FleetPlan {
        let index = system.index();
        if index >= self.plans.len() {
            self.plans.resize(index + 1, FleetPlan::default());
        }
        &mut self.plans[index]
    }

    /// Systems that received any request this turn.
    pub fn active(&self) -> impl Iterator<Item = (SystemId, &FleetPlan)> {
        self.plans
            .iter()
            .enumerate()
            .filter(|(_, plan)| !plan.is_empty())
            .map(|(index, plan)| (SystemId(index as u32), plan))
    }

    /// Active systems, most urgent first. Equal priorities keep id order.
    pub fn by_priority(&self) -> Vec<SystemId> {
        let mut systems: Vec<(SystemId, f32)> = self
            .active()
            .map(|(system, plan)| (system, plan.priority))
            .collect();
        systems.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        systems.into_iter().map(|(system, _)| system).collect()
    }

    pub fn merge(&mut self, other: &FleetPlanTable) {
        for (system, plan) in other.active() {
            self.plan_mut(system).merge(plan);
        }
    }
}

/// Plans published by every faction for the current turn.
#[derive(Resource, Debug, Default)]
pub struct FleetPlanRegistry {
    tables: BTreeMap<EmpireId, FleetPlanTable>,
}

impl FleetPlanRegistry {
    /// Publishes a faction's table, merging with anything already published for it.
    pub fn publish(&mut self, empire: EmpireId, table: &FleetPlanTable) {
        self.tables
            .entry(empire)
            .or_insert_with(|| FleetPlanTable::new(table.len()))
            .merge(table);
    }

    pub fn table(&self, empire: EmpireId) -> Option<&FleetPlanTable> {
        self.tables.get(&empire)
    }

    pub fn plan(&self, empire: EmpireId, system: SystemId) -> Option<&FleetPlan> {
        self.table(empire).and_then(|table| table.plan(system))
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_requests_accumulate() {
        let mut plan = FleetPlan::default();
        plan.add_ships(DesignId(1), 2);
        plan.add_ships(DesignId(1), 3);
        plan.add_ships(DesignId(2), 0);
        assert_eq!(plan.ship_count(DesignId(1)), 5);
        assert_eq!(plan.ship_count(DesignId(2)), 0);
        assert_eq!(plan.total_ships(), 5);
    }

    #[test]
    fn merge_keeps_the_higher_priority() {
        let mut repel = FleetPlan::default();
        repel.set_priority(1000.0);
        repel.set_staging_point(Some(SystemId(1)));
        repel.add_ships(DesignId(0), 4);

        let mut bomb = FleetPlan::default();
        bomb.set_priority(3000.0);
        bomb.set_staging_point(Some(SystemId(7)));
        bomb.add_ships(DesignId(0), 1);
        bomb.add_ships(DesignId(3), 2);

        let mut merged = repel.clone();
        merged.merge(&bomb);
        let mut reversed = bomb.clone();
        reversed.merge(&repel);

        assert_eq!(merged.priority, 3000.0);
        assert_eq!(merged.staging_point, Some(SystemId(7)));
        assert_eq!(merged.ship_count(DesignId(0)), 5);
        assert_eq!(merged, reversed);
    }

    #[test]
    fn table_orders_by_priority() {
        let mut table = FleetPlanTable::new(4);
        table.plan_mut(SystemId(0)).set_priority(1000.0);
        table.plan_mut(SystemId(2)).set_priority(5000.0);
        table.plan_mut(SystemId(3)).set_priority(1000.0);
        table.plan_mut(SystemId(6)).add_ships(DesignId(0), 1);

        assert_eq!(table.len(), 7);
        assert_eq!(
            table.by_priority(),
            vec![SystemId(2), SystemId(0), SystemId(3), SystemId(6)]
        );

        table.reset(4);
        assert_eq!(table.active().count(), 0);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn registry_merges_repeated_publishes() {
        let mut first = FleetPlanTable::new(3);
        first.plan_mut(SystemId(1)).add_ships(DesignId(0), 2);
        let mut second = FleetPlanTable::new(3);
        second.plan_mut(SystemId(1)).add_ships(DesignId(0), 1);
        second.plan_mut(SystemId(1)).set_priority(2000.0);

        let mut registry = FleetPlanRegistry::default();
        registry.publish(EmpireId(0), &first);
        registry.publish(EmpireId(0), &second);

        let plan = registry.plan(EmpireId(0), SystemId(1)).unwrap();
        assert_eq!(plan.ship_count(DesignId(0)), 3);
        assert_eq!(plan.priority, 2000.0);
        assert!(registry.plan(EmpireId(1), SystemId(1)).is_none());
    }
}
