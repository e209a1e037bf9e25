pub mod macros;

use hecs::Entity;
use worldsim_data::{AgentKind, BehaviorState, BiomeType, CellCoord, Genes, Position};
use worldsim_lib::model::config::AppConfig;
use worldsim_lib::model::lifecycle::AgentBundle;
use worldsim_lib::model::terrain::TerrainMap;
use worldsim_lib::model::world::World;

/// Builds a small, empty, all-grass world and fills it with hand-placed
/// agents and food. Random pauses are off so behaviour is predictable.
#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    width: u16,
    height: u16,
    ground: BiomeType,
    cells: Vec<(u16, u16, BiomeType)>,
    agents: Vec<AgentBuilder>,
    food: Vec<(f64, f64)>,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.seed = Some(42);
        config.world.initial_humans = 0;
        config.world.initial_slimes = 0;
        config.food.initial_food = 0;
        config.food.spawn_per_interval = 0;
        config.human.pause_chance = 0.0;
        config.slime.pause_chance = 0.0;
        Self {
            config,
            width: 30,
            height: 30,
            ground: BiomeType::Grass,
            cells: Vec::new(),
            agents: Vec::new(),
            food: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_ground(mut self, biome: BiomeType) -> Self {
        self.ground = biome;
        self
    }

    pub fn with_terrain(mut self, x: u16, y: u16, biome: BiomeType) -> Self {
        self.cells.push((x, y, biome));
        self
    }

    pub fn with_agent(mut self, agent: AgentBuilder) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn with_food(mut self, x: f64, y: f64) -> Self {
        self.food.push((x, y));
        self
    }

    /// Returns the world and the agent handles in the order they were added.
    pub fn build(self) -> (World, Vec<Entity>) {
        let mut terrain = TerrainMap::filled(
            self.width,
            self.height,
            self.ground,
            self.config.walkability.clone(),
        )
        .expect("Failed to create terrain in test builder");
        for (x, y, biome) in self.cells {
            terrain.set_biome(CellCoord::new(i32::from(x), i32::from(y)), biome);
        }
        let mut world = World::with_terrain(self.config, terrain)
            .expect("Failed to create world in test builder");

        let handles = self
            .agents
            .into_iter()
            .map(|a| {
                let bundle = a.bundle(&mut world);
                world.spawn_bundle(bundle)
            })
            .collect();
        for (x, y) in self.food {
            world.spawn_food(Position::new(x, y));
        }
        (world, handles)
    }
}

#[allow(dead_code)]
pub struct AgentBuilder {
    kind: AgentKind,
    x: f64,
    y: f64,
    hunger: Option<f64>,
    hp: Option<f64>,
    age: f64,
    max_age: Option<f64>,
    children: u32,
    genes: Option<Genes>,
    heading: Option<(f64, f64)>,
    level: Option<u32>,
    state: Option<BehaviorState>,
}

#[allow(dead_code)]
impl AgentBuilder {
    pub fn new(kind: AgentKind) -> Self {
        Self {
            kind,
            x: 10.0,
            y: 10.0,
            hunger: None,
            hp: None,
            age: 0.0,
            max_age: None,
            children: 0,
            genes: None,
            heading: None,
            level: None,
            state: None,
        }
    }

    pub fn human() -> Self {
        Self::new(AgentKind::Human)
    }

    pub fn slime() -> Self {
        Self::new(AgentKind::Slime)
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn hunger(mut self, hunger: f64) -> Self {
        self.hunger = Some(hunger);
        self
    }

    pub fn hp(mut self, hp: f64) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn age(mut self, age: f64) -> Self {
        self.age = age;
        self
    }

    pub fn max_age(mut self, max_age: f64) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn children(mut self, children: u32) -> Self {
        self.children = children;
        self
    }

    pub fn genes(mut self, move_speed: f64, vision_range: f64) -> Self {
        self.genes = Some(Genes {
            move_speed,
            vision_range,
        });
        self
    }

    pub fn heading(mut self, dx: f64, dy: f64) -> Self {
        self.heading = Some((dx, dy));
        self
    }

    pub fn level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn state(mut self, state: BehaviorState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn bundle(self, world: &mut World) -> AgentBundle {
        let mut bundle = world.new_agent(self.kind, Position::new(self.x, self.y));
        if let Some(hunger) = self.hunger {
            bundle.vitals.hunger = hunger;
        }
        if let Some(hp) = self.hp {
            bundle.vitals.hp = hp;
        }
        if let Some(max_age) = self.max_age {
            bundle.vitals.max_age = max_age;
        }
        bundle.vitals.age = self.age;
        bundle.fertility.children = self.children;
        if let Some(genes) = self.genes {
            bundle.genes = genes;
        }
        if let Some(heading) = self.heading {
            bundle.kinetics.movement_dir = heading;
            bundle.kinetics.target_dir = heading;
            bundle.kinetics.next_direction_change = f64::MAX;
        }
        if let Some(level) = self.level {
            bundle.progression.level = level;
        }
        if let Some(state) = self.state {
            bundle.behavior.state = state;
        }
        bundle
    }
}
