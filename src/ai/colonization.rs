//! How many colony ships a faction still needs, and which shipyards build them.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::ai::advisor::StrategicAdvisor;
use crate::ai::general::TurnContext;
use crate::constants::*;
use crate::empire::{Empire, EmpireId};
use crate::map::{Location, StarSystem, SystemId};
use crate::orders::ShipyardOrder;
use crate::ships::DesignRole;

impl StrategicAdvisor {
    /// Scouted worlds our environment tech can settle within `range`.
    ///
    /// Includes foreign colonies; callers decide whether those still count.
    fn settleable_systems<'a>(
        &self,
        ctx: TurnContext<'a>,
        me: &'a Empire,
        range: f32,
    ) -> impl Iterator<Item = &'a StarSystem> + 'a {
        let empire = self.empire;
        ctx.galaxy.systems.iter().filter(move |system| {
            let intel = me.intel(system.id);
            intel.scouted
                && intel.planet_type().is_some_and(|kind| me.can_colonize(kind))
                && intel.distance <= range
                && intel.owner() != Some(empire)
        })
    }

    /// Share of a world we expect to win against every rival able to settle it.
    pub fn colonization_probability(&self, ctx: TurnContext<'_>, system: SystemId) -> f32 {
        let galaxy = ctx.galaxy;
        let (Some(me), Some(star)) = (self.me(ctx), galaxy.system(system)) else {
            return 0.0;
        };

        let mut orbiting = galaxy.orbiting_fleets(system);
        if let (Some(fleet), None) = (orbiting.next(), orbiting.next())
            && fleet.owner == self.empire
            && galaxy.fleet_is_armed(fleet)
        {
            return 1.0;
        }

        let claim = |empire: EmpireId| {
            let distance = self
                .colony_center(ctx, empire)
                .distance_to(star.location)
                .max(1.0);
            galaxy.production_of(empire) / distance
        };
        let mine = claim(self.empire);
        let known_kind = me.intel(system).planet_type();
        let mut total = mine;
        for other in me.contacted().filter_map(|id| galaxy.empire(id)) {
            if let Some(kind) = known_kind
                && !other.can_colonize(kind)
            {
                continue;
            }
            total += claim(other.id);
        }
        if total <= 0.0 {
            return 0.0;
        }
        mine / total
    }

    /// Colony ships still worth building this turn.
    ///
    /// With `potential` set, returns the raw number of open opportunities:
    /// no wartime floor, no credit for colony ships already in service, and
    /// nothing cached.
    pub fn additional_colonizers_to_build(&mut self, ctx: TurnContext<'_>, potential: bool) -> u32 {
        if !potential && let Some(cached) = self.cache.additional_colonizers {
            return cached;
        }
        let Some(me) = self.me(ctx) else {
            return 0;
        };
        let galaxy = ctx.galaxy;
        let colonizer = self.role_design(ctx, DesignRole::Colonizer);
        let range = colonizer.map_or(0.0, |design| design.range);

        let mut additional = 0.0;
        let mut counted = BTreeSet::new();
        for system in self.settleable_systems(ctx, me, range) {
            if me.intel(system.id).is_colonized() && !self.am_sieging(ctx, system.id) {
                continue;
            }
            if !system.monster {
                additional += self.colonization_probability(ctx, system.id);
                counted.insert(system.id);
            }
        }

        for system in &galaxy.systems {
            let intel = me.intel(system.id);
            if intel.explored || intel.is_colonized() || intel.distance > range || system.monster {
                continue;
            }
            if counted.insert(system.id) {
                additional += self.colonization_probability(ctx, system.id);
            }
        }

        // Huge colony ships are not spammed to follow up on new frontiers
        if colonizer.is_some_and(|design| design.size < 3) {
            let destinations = galaxy
                .fleets_of(self.empire)
                .filter(|fleet| galaxy.fleet_has_colony_ship(fleet))
                .filter_map(|fleet| fleet.destination)
                .filter_map(|destination| galaxy.system(destination));
            for destination in destinations {
                for system in galaxy.systems_in_range(destination.location, me.tech.ship_range) {
                    if counted.contains(&system.id) {
                        break;
                    }
                    if system.is_colonized() {
                        continue;
                    }
                    let intel = me.intel(system.id);
                    let settleable = intel.planet_type().is_some_and(|kind| me.can_colonize(kind));
                    if !intel.in_ship_range && (settleable || !intel.explored) {
                        additional += self.colonization_probability(ctx, system.id);
                        counted.insert(system.id);
                    }
                }
            }
        }

        if potential {
            return additional.ceil() as u32;
        }

        let rival_at_war = me
            .contacted()
            .filter(|id| galaxy.in_ship_range_of(me, *id))
            .filter_map(|id| galaxy.empire(id))
            .any(Empire::at_war);
        if rival_at_war {
            let floor = (galaxy.num_colonies(self.empire) / WARTIME_COLONIZER_DIVISOR) as f32;
            additional = additional.ceil().max(floor);
        }

        for (design, count) in galaxy.design_counts(self.empire) {
            let Some(design) = me.lab.design(design) else {
                continue;
            };
            if !design.has_colony_special() || design.range < range {
                continue;
            }
            let suitable = match me.tech.control_environment_level {
                None => true,
                Some(level) => {
                    design.colony_environment_level == Some(level)
                        || me.race.ignores_planet_environment
                }
            };
            if suitable {
                additional -= count as f32;
            }
        }

        let needed = additional.max(0.0).ceil() as u32;
        self.cache.additional_colonizers = Some(needed);
        needed
    }

    /// Size-weighted center of the worlds still open for settling.
    pub fn uncolonized_center(&mut self, ctx: TurnContext<'_>) -> Location {
        if let Some(center) = self.cache.uncolonized_center {
            return center;
        }
        let Some(me) = self.me(ctx) else {
            return Location::ORIGIN;
        };
        let range = self
            .role_design(ctx, DesignRole::Colonizer)
            .map_or(0.0, |design| design.range);

        let (mut x, mut y, mut total) = (0.0, 0.0, 0.0);
        for system in self.settleable_systems(ctx, me, range) {
            if me.intel(system.id).is_colonized() {
                continue;
            }
            let size = system.planet.current_size;
            x += system.location.x * size;
            y += system.location.y * size;
            total += size;
        }
        let mut center = if total > 0.0 {
            Location::new(x / total, y / total)
        } else {
            Location::ORIGIN
        };
        if center.is_origin() {
            center = self.colony_center(ctx, self.empire);
        }
        self.cache.uncolonized_center = Some(center);
        center
    }

    /// Trims colony ship demand in wartime, then spreads it over the best shipyards.
    pub fn plan_colonizers(&mut self, ctx: TurnContext<'_>) {
        let Some(me) = self.me(ctx) else {
            return;
        };
        let galaxy = ctx.galaxy;
        let mut need = self.additional_colonizers_to_build(ctx, false);
        let Some(colonizer) = self.role_design(ctx, DesignRole::Colonizer) else {
            return;
        };

        if me.at_war() || self.sense_potential_attack(ctx) {
            let mut fighter_cost = 0.0;
            let mut colonizer_cost = 0.0;
            for (id, count) in galaxy.design_counts(self.empire) {
                let Some(design) = me.lab.design(id) else {
                    continue;
                };
                let bc = design.cost * count as f32;
                if design.has_colony_special() {
                    colonizer_cost += bc;
                } else {
                    fighter_cost += bc * ctx.oracles.fighting_adapted(galaxy, self.empire, id);
                }
            }
            colonizer_cost += need as f32 * colonizer.cost;
            while colonizer_cost > fighter_cost && need > 0 {
                need -= 1;
                colonizer_cost -= colonizer.cost;
            }
            let military_rank = ctx.oracles.military_rank(galaxy, self.empire);
            if military_rank > ctx.oracles.population_capacity_rank(galaxy, self.empire) {
                need = 0;
            }
            debug!("{}: wartime colony ship need {}", me.name, need);
        }

        let center = self.uncolonized_center(ctx);
        let warp = colonizer.warp.max(1) as f32;
        while need > 0 {
            let mut best = None;
            let mut best_score = 0.0;
            for system in galaxy.colonies_of(self.empire) {
                let Some(colony) = &system.colony else {
                    continue;
                };
                if colony.production_capacity <= IDLE_SHIPYARD_CAPACITY
                    && colony.production < colonizer.cost
                    && colony.shipyard.desired_ships > 0
                {
                    continue;
                }
                if colony.shipyard.building || self.orders.is_building_at(system.id) {
                    continue;
                }
                let turns_to_build = colony.turns_to_build(colonizer.cost).max(1.0);
                let turns_to_move = (system.location.distance_to(center).max(1.0) / warp)
                    .ceil()
                    .max(1.0);
                let score = 1.0 / (turns_to_build + turns_to_move);
                if score > best_score {
                    best_score = score;
                    best = Some((system, colony));
                }
            }
            let Some((system, colony)) = best else {
                break;
            };

            let budget = colony.ship_budget(system.planet.production_adj);
            let desired = ((budget / colonizer.cost).floor() as u32).min(need).max(1);
            self.orders.queue_shipyard(ShipyardOrder {
                colony: system.id,
                design: colonizer.id,
                queued_bc: colonizer.cost,
                desired_ships: desired,
            });
            info!(
                "{} orders {} {} at {}",
                me.name, desired, colonizer.name, system.name
            );
            need = need.saturating_sub(desired);
        }
        self.cache.additional_colonizers = Some(need);
    }
}
