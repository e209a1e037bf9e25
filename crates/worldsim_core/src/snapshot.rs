//! Read-only per-tick view of the world used by the parallel decide phase.

use crate::registry::{EntityCategory, EntityRegistry};
use crate::spatial_hash::SpatialHash;
use hecs::Entity;
use uuid::Uuid;
use worldsim_data::{
    AgentKind, Allegiance, Behavior, Fertility, FoodItem, Genes, Identity, Kinetics, Position,
    Progression, Vitals,
};

/// The component tuple every agent carries.
pub type AgentComponents<'a> = (
    &'a Identity,
    &'a Position,
    &'a Kinetics,
    &'a Vitals,
    &'a Fertility,
    &'a Genes,
    &'a Behavior,
    &'a Progression,
    &'a Allegiance,
);

#[derive(Debug, Clone)]
pub struct AgentSnapshot {
    pub handle: Entity,
    pub id: Uuid,
    pub kind: AgentKind,
    pub generation: u32,
    pub position: Position,
    pub kinetics: Kinetics,
    pub vitals: Vitals,
    pub fertility: Fertility,
    pub genes: Genes,
    pub behavior: Behavior,
    pub progression: Progression,
    pub settled: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct FoodSnapshot {
    pub handle: Entity,
    pub id: Uuid,
    pub position: Position,
    pub uses_remaining: u32,
}

/// Result of a nearest-entity lookup. `index` points into the matching
/// snapshot slice of the index that answered the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRef {
    pub category: EntityCategory,
    pub index: usize,
    pub handle: Entity,
}

/// Nearest-neighbour lookup by category.
///
/// `accept` receives candidate indices and can veto them; the closest
/// accepted candidate within `max_radius` wins. Zero candidates is `None`.
pub trait SpatialQuery {
    fn find_nearest(
        &self,
        category: EntityCategory,
        from: Position,
        max_radius: f64,
        accept: &mut dyn FnMut(usize) -> bool,
    ) -> Option<EntityRef>;
}

/// Agents and food of one tick, sorted by id, with a spatial hash over each.
#[derive(Debug, Clone)]
pub struct TickIndex {
    agents: Vec<AgentSnapshot>,
    food: Vec<FoodSnapshot>,
    agent_positions: Vec<(f64, f64)>,
    food_positions: Vec<(f64, f64)>,
    agent_hash: SpatialHash,
    food_hash: SpatialHash,
}

impl TickIndex {
    pub fn build(
        ecs: &hecs::World,
        registry: &EntityRegistry,
        width: u16,
        height: u16,
        cell_size: f64,
    ) -> Self {
        let mut agents: Vec<AgentSnapshot> = registry
            .agents()
            .filter_map(|handle| {
                let mut query = ecs.query_one::<AgentComponents>(handle).ok()?;
                let (
                    identity,
                    position,
                    kinetics,
                    vitals,
                    fertility,
                    genes,
                    behavior,
                    progression,
                    allegiance,
                ) = query.get()?;
                Some(AgentSnapshot {
                    handle,
                    id: identity.id,
                    kind: identity.kind,
                    generation: identity.generation,
                    position: *position,
                    kinetics: *kinetics,
                    vitals: *vitals,
                    fertility: *fertility,
                    genes: *genes,
                    behavior: *behavior,
                    progression: *progression,
                    settled: allegiance.settlement.is_some(),
                })
            })
            .collect();
        agents.sort_by_key(|a| a.id);

        let mut food: Vec<FoodSnapshot> = registry
            .iter(EntityCategory::Food)
            .filter_map(|handle| {
                let mut query = ecs.query_one::<(&Position, &FoodItem)>(handle).ok()?;
                let (position, item) = query.get()?;
                Some(FoodSnapshot {
                    handle,
                    id: item.id,
                    position: *position,
                    uses_remaining: item.uses_remaining,
                })
            })
            .collect();
        food.sort_by_key(|f| f.id);

        let agent_positions: Vec<(f64, f64)> =
            agents.iter().map(|a| (a.position.x, a.position.y)).collect();
        let food_positions: Vec<(f64, f64)> =
            food.iter().map(|f| (f.position.x, f.position.y)).collect();

        let mut agent_hash = SpatialHash::new(cell_size, width, height);
        agent_hash.build_parallel(&agent_positions, width, height);
        let mut food_hash = SpatialHash::new(cell_size, width, height);
        food_hash.build_parallel(&food_positions, width, height);

        Self {
            agents,
            food,
            agent_positions,
            food_positions,
            agent_hash,
            food_hash,
        }
    }

    pub fn agents(&self) -> &[AgentSnapshot] {
        &self.agents
    }

    pub fn food(&self) -> &[FoodSnapshot] {
        &self.food
    }
}

impl SpatialQuery for TickIndex {
    fn find_nearest(
        &self,
        category: EntityCategory,
        from: Position,
        max_radius: f64,
        accept: &mut dyn FnMut(usize) -> bool,
    ) -> Option<EntityRef> {
        let (index, handle) = match category {
            EntityCategory::Food => {
                let (idx, _) = self.food_hash.nearest(
                    from.x,
                    from.y,
                    max_radius,
                    &self.food_positions,
                    |i| self.food[i].uses_remaining > 0 && accept(i),
                )?;
                (idx, self.food[idx].handle)
            }
            EntityCategory::Agent(kind) => {
                let (idx, _) = self.agent_hash.nearest(
                    from.x,
                    from.y,
                    max_radius,
                    &self.agent_positions,
                    |i| self.agents[i].kind == kind && accept(i),
                )?;
                (idx, self.agents[idx].handle)
            }
        };
        Some(EntityRef {
            category,
            index,
            handle,
        })
    }
}
