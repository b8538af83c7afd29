//! Calibrated balance constants used by the General.
//!
//! These numbers encode game balance. Changing any of them changes how the
//! computer factions play, so they are kept in one place and never folded into
//! the formulas that use them.

// ============================================================================
// FLEET PLAN PRIORITY BANDS
// ============================================================================

/// Defend an owned system against incoming hostile ships.
pub const PRIORITY_REPEL: f32 = 1000.0;

/// Chase enemy scouts away from owned or empty systems.
pub const PRIORITY_SCOUT_REPEL: f32 = 1100.0;

/// Extra urgency for scout repellers on border systems.
pub const PRIORITY_SCOUT_REPEL_BORDER_BONUS: f32 = 50.0;

/// Bomb a foreign colony that has crept into our space.
pub const PRIORITY_BOMB_ENCROACHMENT: f32 = 2000.0;

/// Bomb a colony of a faction we are at war with.
pub const PRIORITY_BOMB_ENEMY: f32 = 3000.0;

/// Bomb a colony during the final war.
pub const PRIORITY_BOMB_FINAL_WAR: f32 = 4000.0;

/// Surprise bombardment of an undefended colony.
pub const PRIORITY_BOMB_UNDEFENDED: f32 = 5000.0;

/// Invasion priority is divided by this before being folded into a band.
pub const TIE_BREAK_DIVISOR: f32 = 100.0;

/// Tie-break terms never reach this value, keeping bands disjoint.
pub const TIE_BREAK_CAP: f32 = 500.0;

// ============================================================================
// PLANET VALUATION
// ============================================================================

/// `take_planet_value` of a size-100, 200-factory, normal world.
pub const PLANET_VALUE_NORMALIZER: f32 = 115.0;

/// Exponent applied to planet size in `take_planet_value`.
pub const PLANET_SIZE_EXPONENT: f32 = 0.7;

/// Cap on the factory term of `take_planet_value`.
pub const PLANET_FACTORY_VALUE_CAP: f32 = 20.0;

/// Factories are worth this fraction of planet size in invasion priority.
pub const INVASION_FACTORY_DIVISOR: f32 = 20.0;

/// Final divisor of invasion priority.
pub const INVASION_PRIORITY_DIVISOR: f32 = 10.0;

/// Killer instinct kicks in for invasion priority at this many colonies or fewer.
pub const KILLER_INSTINCT_PRIORITY_COLONIES: usize = 3;

/// Killer instinct kicks in for planet value at this many colonies or fewer.
pub const KILLER_INSTINCT_VALUE_COLONIES: usize = 4;

// ============================================================================
// GROUND COMBAT
// ============================================================================

/// Scale of the casualty exchange model.
pub const GROUND_COMBAT_SCALE: f32 = 100.0;

/// Source colonies never drop below this share of their planet size.
pub const TROOP_POPULATION_FLOOR: f32 = 0.6;

/// Extra troops requested per unit of target planet size.
pub const TROOP_SIZE_MARGIN: f32 = 0.25;

/// Rebels are outnumbered this many times before troops are sent.
pub const REBELLION_TROOP_MULTIPLIER: f32 = 2.0;

/// Transports travel at most this many extra turns on the fastest engines.
pub const TROOP_MAX_EXTRA_TURNS: f32 = 7.0;

/// Numerator of the speed-based transport travel budget.
pub const TROOP_TRAVEL_BUDGET: f32 = 22.0;

/// Factory salvage value is reduced by this many BC per factory.
pub const FACTORY_SALVAGE_DISCOUNT: f32 = 2.0;

/// Most technologies expected from a captured planet.
pub const MAX_CAPTURED_TECHS: f32 = 6.0;

/// Captured technologies per factory.
pub const CAPTURED_TECHS_PER_FACTORY: f32 = 0.02;

// ============================================================================
// BOMBARDMENT
// ============================================================================

/// Safety margin on the BC needed to beat missile bases.
pub const BOMB_BASE_MARGIN: f32 = 1.5;

/// Fighter escort BC per BC of defending fleet.
pub const BOMB_FLEET_MARGIN: f32 = 2.0;

/// Share of a bombardment fleet spent on destroyers.
pub const BOMB_DESTROYER_SHARE: f32 = 0.2;

/// Offset that flattens tech ratios at low tech levels.
pub const TECH_RATIO_OFFSET: f32 = 10.0;

/// Escort BC requested per BC of incoming hostile ships.
pub const REPEL_FLEET_MARGIN: f32 = 3.0;

/// Population damage needed to wipe out one unit of population.
pub const POPULATION_KILL_SCALE: f32 = 200.0;

// ============================================================================
// SNEAK ATTACK
// ============================================================================

/// Chance plus bonus must exceed this for a surprise attack.
pub const SNEAK_ATTACK_THRESHOLD: f32 = 0.5;

/// Starting chance of a surprise attack while at peace with everyone.
pub const SNEAK_ATTACK_BASE_CHANCE: f32 = 0.3;

/// Chance lost for every war already being fought.
pub const SNEAK_ATTACK_CHANCE_PER_WAR: f32 = 0.3;

pub const SNEAK_ATTACK_AGGRESSIVE_BONUS: f32 = 0.6;
pub const SNEAK_ATTACK_RUTHLESS_BONUS: f32 = 0.3;
pub const SNEAK_ATTACK_DIPLOMAT_PENALTY: f32 = 0.2;

/// Chance lost when the target planet could not be settled after capture.
pub const SNEAK_ATTACK_UNCAPTURABLE_PENALTY: f32 = 0.3;

/// Chance gained per war the target fights beyond our own.
pub const SNEAK_ATTACK_WAR_COUNT_FACTOR: f32 = 0.2;

/// Never start a new war while fighting more than this many.
pub const SNEAK_ATTACK_MAX_ENEMIES: usize = 2;

/// BC value assigned to each factory of a sneak attack target.
pub const SNEAK_ATTACK_FACTORY_VALUE: f32 = 10.0;

/// Below this average tech level a faction hesitates to start wars.
pub const SNEAK_ATTACK_TECH_RAMP: f32 = 10.0;

// ============================================================================
// METRICS
// ============================================================================

/// Share of all systems a faction must own to be projected the winner, as a multiplier
/// on its current share.
pub const VICTORY_SHARE_MULTIPLIER: f32 = 1.5;

/// BC by which the armed fleet must outweigh a turn of production before attacking.
pub const ATTACK_THRESHOLD_MARGIN: f32 = 1.0;

/// The defense ratio never drops below this.
pub const MIN_DEFENSE_RATIO: f32 = 0.5;

/// Baseline share of production kept for defense.
pub const BASE_DEFENSE_RATIO: f32 = 0.25;

/// Numerator of the war return on investment.
pub const WAR_ROI_SCALE: f32 = 3.0;

/// Colony count divisor for the wartime colonizer floor.
pub const WARTIME_COLONIZER_DIVISOR: usize = 5;

/// Below this production capacity a busy shipyard is left alone.
pub const IDLE_SHIPYARD_CAPACITY: f32 = 0.5;
