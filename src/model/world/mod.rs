use crate::model::config::AppConfig;
use crate::model::food::FoodSpawner;
use crate::model::registry::EntityRegistry;
use crate::model::systems::behavior::AgentDecision;
use crate::model::terrain::{ChunkedGenerator, TerrainMap};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use worldsim_core::Metrics;

pub mod finalize;
pub mod init;
pub mod state;
pub mod update;

pub use state::WorldStats;

/// A settlement founded by an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub name: String,
    pub founder: Uuid,
    pub x: f64,
    pub y: f64,
    pub founded_tick: u64,
}

/// The simulation: terrain, every live agent and food item, and the clock.
///
/// Terrain is injected or generated at construction; agents and food live in
/// `ecs` and are tracked by category in `registry`, which must be updated on
/// every spawn and despawn.
pub struct World {
    pub width: u16,
    pub height: u16,
    pub tick: u64,
    /// Simulation seconds elapsed, after time scaling.
    pub clock: f64,
    pub ecs: hecs::World,
    pub terrain: TerrainMap,
    pub chunked: Option<ChunkedGenerator>,
    pub registry: EntityRegistry,
    pub config: AppConfig,
    pub rng: ChaCha8Rng,
    pub world_seed: u64,
    pub food_spawner: FoodSpawner,
    pub settlements: Vec<Settlement>,
    pub metrics: Metrics,
    time_scale: f64,
    pending_population: bool,
    decision_buffer: Vec<AgentDecision>,
}

impl World {
    #[must_use]
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Sets the simulation speed multiplier, clamped to `[0, 10]`.
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = if scale.is_finite() {
            scale.clamp(0.0, 10.0)
        } else {
            1.0
        };
    }

    /// True until chunked terrain finishes and the first agents are placed.
    #[must_use]
    pub fn is_populating(&self) -> bool {
        self.pending_population
    }
}
