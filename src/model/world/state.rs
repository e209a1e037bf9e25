use crate::model::food::make_food;
use crate::model::lifecycle::{self, AgentBundle};
use crate::model::registry::EntityCategory;
use crate::model::systems::reproduction::{self, ParentTraits};
use crate::model::world::World;
use hecs::{Component, Entity};
use serde::Serialize;
use std::collections::BTreeMap;
use worldsim_core::error::{Result, SimError};
use worldsim_data::{AgentKind, BiomeType, FoodItem, Genes, Identity, Position, Vitals};

/// Aggregate view of the world, printed by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct WorldStats {
    pub tick: u64,
    pub clock: f64,
    pub seed: u64,
    pub humans: usize,
    pub slimes: usize,
    pub food: usize,
    pub settlements: usize,
    pub counters: BTreeMap<String, u64>,
    pub biomes: BTreeMap<BiomeType, usize>,
    pub config_fingerprint: String,
}

impl World {
    /// A fresh agent of `kind` at `position`, not yet spawned.
    pub fn new_agent(&mut self, kind: AgentKind, position: Position) -> AgentBundle {
        lifecycle::create_agent_with_rng(
            kind,
            position.x,
            position.y,
            self.config.profile(kind),
            &self.config.leveling,
            &mut self.rng,
        )
    }

    /// Spawns a fresh agent, optionally with explicit genes.
    pub fn spawn_agent(&mut self, kind: AgentKind, position: Position, genes: Option<Genes>) -> Entity {
        let mut bundle = self.new_agent(kind, position);
        if let Some(genes) = genes {
            bundle.genes = genes;
        }
        self.spawn_bundle(bundle)
    }

    /// Spawns a fully specified agent and registers it.
    pub fn spawn_bundle(&mut self, bundle: AgentBundle) -> Entity {
        let kind = bundle.identity.kind;
        let handle = self.ecs.spawn(bundle.into_components());
        self.registry.insert(EntityCategory::Agent(kind), handle);
        handle
    }

    /// Builds the child of two agents at `parent_a`'s position without
    /// spawning it. Parents must be of the same kind.
    pub fn child_of(&mut self, parent_a: Entity, parent_b: Entity) -> Result<AgentBundle> {
        let (id_a, kind, gen_a, pos, traits_a) = self.parent_traits(parent_a)?;
        let (id_b, kind_b, gen_b, _, traits_b) = self.parent_traits(parent_b)?;
        if kind != kind_b {
            return Err(SimError::unknown_entity(format!(
                "{parent_b:?} is not a {kind:?}"
            )));
        }
        let profile = self.config.profile(kind);
        let child = reproduction::inherit(&traits_a, &traits_b, profile, &mut self.rng);
        Ok(lifecycle::create_child_with_rng(
            kind,
            pos.x,
            pos.y,
            child.genes,
            child.max_age,
            (id_a, id_b),
            gen_a.max(gen_b) + 1,
            profile,
            &self.config.leveling,
            &mut self.rng,
        ))
    }

    /// Spawns the child of two agents immediately.
    pub fn spawn_child(&mut self, parent_a: Entity, parent_b: Entity) -> Result<Entity> {
        let bundle = self.child_of(parent_a, parent_b)?;
        Ok(self.spawn_bundle(bundle))
    }

    fn parent_traits(
        &self,
        handle: Entity,
    ) -> Result<(uuid::Uuid, AgentKind, u32, Position, ParentTraits)> {
        let mut query = self
            .ecs
            .query_one::<(&Identity, &Position, &Genes, &Vitals)>(handle)
            .map_err(|_| SimError::unknown_entity(format!("{handle:?}")))?;
        let (identity, position, genes, vitals) = query
            .get()
            .ok_or_else(|| SimError::unknown_entity(format!("{handle:?}")))?;
        Ok((
            identity.id,
            identity.kind,
            identity.generation,
            *position,
            ParentTraits {
                genes: *genes,
                max_age: vitals.max_age,
            },
        ))
    }

    pub fn destroy_agent(&mut self, handle: Entity) -> Result<()> {
        match self.registry.category(handle) {
            Some(EntityCategory::Agent(_)) => {
                self.registry.remove(handle);
                self.ecs
                    .despawn(handle)
                    .map_err(|_| SimError::unknown_entity(format!("{handle:?}")))
            }
            _ => Err(SimError::unknown_entity(format!("agent {handle:?}"))),
        }
    }

    pub fn spawn_food(&mut self, position: Position) -> Entity {
        let item = make_food(&self.config.food, &mut self.rng);
        let handle = self.ecs.spawn((position, item));
        self.registry.insert(EntityCategory::Food, handle);
        handle
    }

    pub fn destroy_food(&mut self, handle: Entity) -> Result<()> {
        match self.registry.category(handle) {
            Some(EntityCategory::Food) => {
                self.registry.remove(handle);
                self.ecs
                    .despawn(handle)
                    .map_err(|_| SimError::unknown_entity(format!("{handle:?}")))
            }
            _ => Err(SimError::unknown_entity(format!("food {handle:?}"))),
        }
    }

    /// Copy of one component of a live entity.
    pub fn component<T: Component + Clone>(&self, handle: Entity) -> Option<T> {
        self.ecs.get::<&T>(handle).ok().map(|c| (*c).clone())
    }

    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.registry.agent_count()
    }

    #[must_use]
    pub fn count_of(&self, kind: AgentKind) -> usize {
        self.registry.len(EntityCategory::Agent(kind))
    }

    #[must_use]
    pub fn food_count(&self) -> usize {
        self.registry.len(EntityCategory::Food)
    }

    /// Live agent handles ordered by agent id.
    pub fn agent_handles(&self) -> Vec<Entity> {
        let mut handles: Vec<(uuid::Uuid, Entity)> = self
            .registry
            .agents()
            .filter_map(|h| self.ecs.get::<&Identity>(h).ok().map(|i| (i.id, h)))
            .collect();
        handles.sort_by_key(|(id, _)| *id);
        handles.into_iter().map(|(_, h)| h).collect()
    }

    pub fn food_items(&self) -> Vec<(Position, FoodItem)> {
        let mut items: Vec<(Position, FoodItem)> = self
            .ecs
            .query::<(&Position, &FoodItem)>()
            .iter()
            .map(|(_, (p, f))| (*p, *f))
            .collect();
        items.sort_by_key(|(_, f)| f.id);
        items
    }

    #[must_use]
    pub fn stats(&self) -> WorldStats {
        WorldStats {
            tick: self.tick,
            clock: self.clock,
            seed: self.world_seed,
            humans: self.count_of(AgentKind::Human),
            slimes: self.count_of(AgentKind::Slime),
            food: self.food_count(),
            settlements: self.settlements.len(),
            counters: self.metrics.counters(),
            biomes: self.terrain.histogram(),
            config_fingerprint: self.config.fingerprint(),
        }
    }
}
