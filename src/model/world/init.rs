use crate::model::config::AppConfig;
use crate::model::food::FoodSpawner;
use crate::model::registry::EntityRegistry;
use crate::model::terrain::{ChunkedGenerator, TerrainGenerator, TerrainMap};
use crate::model::world::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use worldsim_core::error::SimError;
use worldsim_core::Metrics;
use worldsim_data::{AgentKind, Position};

impl World {
    /// Builds a world and generates its terrain from `config`.
    ///
    /// With `terrain.chunked` the map starts empty and fills a few chunks per
    /// `update`; the initial population is placed once it is complete.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let world_seed = config.world.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(world_seed);
        let (width, height) = (config.world.width, config.world.height);
        let generator = TerrainGenerator::from_config(width, height, &config.terrain, &mut rng)?;

        if config.terrain.chunked {
            let terrain = TerrainMap::new(width, height, config.walkability.clone())?;
            let chunked = ChunkedGenerator::new(generator, config.terrain.chunk_size);
            let mut world = Self::assemble(config, terrain, rng, world_seed);
            world.chunked = Some(chunked);
            world.pending_population = true;
            tracing::info!(
                width,
                height,
                chunks = world.chunked.as_ref().map_or(0, |c| c.total_chunks()),
                "World created, terrain generating in chunks"
            );
            Ok(world)
        } else {
            let terrain = generator.generate_map(config.walkability.clone())?;
            let mut world = Self::assemble(config, terrain, rng, world_seed);
            world.populate();
            Ok(world)
        }
    }

    /// Builds a world around an already generated map and places the initial
    /// population on it. The map's walkability table is used as is.
    pub fn with_terrain(config: AppConfig, terrain: TerrainMap) -> anyhow::Result<Self> {
        config.validate()?;
        if !terrain.is_complete() {
            return Err(SimError::InvalidGrid {
                width: terrain.width,
                height: terrain.height,
            }
            .into());
        }
        let world_seed = config.world.seed.unwrap_or_else(rand::random);
        let rng = ChaCha8Rng::seed_from_u64(world_seed);
        let mut world = Self::assemble(config, terrain, rng, world_seed);
        world.populate();
        Ok(world)
    }

    fn assemble(config: AppConfig, terrain: TerrainMap, rng: ChaCha8Rng, world_seed: u64) -> Self {
        let time_scale = config.world.time_scale;
        Self {
            width: terrain.width,
            height: terrain.height,
            tick: 0,
            clock: 0.0,
            ecs: hecs::World::new(),
            terrain,
            chunked: None,
            registry: EntityRegistry::new(),
            config,
            rng,
            world_seed,
            food_spawner: FoodSpawner::new(),
            settlements: Vec::new(),
            metrics: Metrics::new(),
            time_scale,
            pending_population: false,
            decision_buffer: Vec::new(),
        }
    }

    /// Places the configured humans, slimes and food on walkable cells.
    pub(crate) fn populate(&mut self) {
        self.pending_population = false;
        let attempts = self.config.world.placement_attempts;
        let plan = [
            (AgentKind::Human, self.config.world.initial_humans),
            (AgentKind::Slime, self.config.world.initial_slimes),
        ];
        for (kind, count) in plan {
            let mut placed = 0;
            for _ in 0..count {
                let Some((x, y)) = self.terrain.random_walkable_point(&mut self.rng, attempts)
                else {
                    break;
                };
                self.spawn_agent(kind, Position::new(x, y), None);
                placed += 1;
            }
            if placed < count {
                tracing::warn!(?kind, placed, requested = count, "No walkable cell for agent");
            }
        }

        for _ in 0..self.config.food.initial_food {
            let attempts = self.config.food.placement_attempts;
            if let Some((x, y)) = self.terrain.random_walkable_point(&mut self.rng, attempts) {
                self.spawn_food(Position::new(x, y));
            }
        }

        tracing::info!(
            width = self.width,
            height = self.height,
            agents = self.registry.agent_count(),
            food = self.food_count(),
            seed = self.world_seed,
            "World populated"
        );
    }
}
