//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration structures that map to `config.toml`. Every
//! section has a `Default` carrying the stock tuning. `AppConfig::from_toml`
//! layers the file over those defaults key by key, so a file only needs the
//! keys it overrides (including partial `[human]`/`[slime]` profiles).
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 100
//! height = 100
//! seed = 42
//!
//! [terrain]
//! land_count = 3
//! island_count = 5
//! mountain_bias = 0.2
//!
//! [walkability]
//! walkable = ["Sand", "Grass"]
//! slow = ["WaterUndeep", "ForestGrass", "MountainLow"]
//!
//! [human.role.Predator]
//! prey = "Slime"
//! damage = 10.0
//! attack_cooldown = 1.0
//! ```

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use worldsim_data::{AgentKind, BiomeType, Walkability};

/// World-level parameters: grid size, seeding and initial population.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u16,
    pub height: u16,
    pub seed: Option<u64>,
    pub initial_humans: usize,
    pub initial_slimes: usize,
    /// Distance under which an agent can eat, mate with or hit a target.
    pub interaction_radius: f64,
    pub time_scale: f64,
    pub spatial_cell_size: f64,
    /// Attempts per agent when looking for a walkable spawn cell.
    pub placement_attempts: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            seed: None,
            initial_humans: 20,
            initial_slimes: 10,
            interaction_radius: 0.5,
            time_scale: 1.0,
            spatial_cell_size: 5.0,
            placement_attempts: 200,
        }
    }
}

/// Heightmap synthesis parameters.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TerrainConfig {
    pub land_count: usize,
    pub island_count: usize,
    pub land_size_factor: f64,
    pub island_size_factor: f64,
    /// Stretch the size factors by `3 / count` so fewer centers cover more ground.
    pub scale_size_by_count: bool,
    pub noise_scale: f64,
    pub mountain_bias: f64,
    /// Exclusive upper bounds of the first seven biomes, ascending.
    pub bands: [f64; 7],
    /// Generate incrementally, `chunks_per_tick` chunks per world update.
    pub chunked: bool,
    pub chunk_size: u16,
    pub chunks_per_tick: usize,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            land_count: 3,
            island_count: 5,
            land_size_factor: 30.0,
            island_size_factor: 10.0,
            scale_size_by_count: true,
            noise_scale: 0.1,
            mountain_bias: 0.2,
            bands: [0.2, 0.4, 0.5, 0.56, 0.725, 0.85, 0.925],
            chunked: false,
            chunk_size: 10,
            chunks_per_tick: 4,
        }
    }
}

impl TerrainConfig {
    /// Land size factor after count scaling.
    #[must_use]
    pub fn effective_land_size(&self) -> f64 {
        scaled_size(self.land_size_factor, self.land_count, self.scale_size_by_count)
    }

    /// Island size factor after count scaling.
    #[must_use]
    pub fn effective_island_size(&self) -> f64 {
        scaled_size(
            self.island_size_factor,
            self.island_count,
            self.scale_size_by_count,
        )
    }
}

fn scaled_size(base: f64, count: usize, scale: bool) -> f64 {
    if scale && count > 0 {
        base * (3.0 / count as f64)
    } else {
        base
    }
}

/// Biome to walkability mapping. Anything not listed is unwalkable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WalkabilityConfig {
    pub walkable: Vec<BiomeType>,
    pub slow: Vec<BiomeType>,
}

impl Default for WalkabilityConfig {
    fn default() -> Self {
        Self {
            walkable: vec![BiomeType::Sand, BiomeType::Grass],
            slow: vec![
                BiomeType::WaterUndeep,
                BiomeType::ForestGrass,
                BiomeType::MountainLow,
            ],
        }
    }
}

impl WalkabilityConfig {
    #[must_use]
    pub fn classify(&self, biome: BiomeType) -> Walkability {
        if self.slow.contains(&biome) {
            Walkability::Slow
        } else if self.walkable.contains(&biome) {
            Walkability::Walkable
        } else {
            Walkability::Unwalkable
        }
    }
}

/// Food placement and nourishment.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct FoodConfig {
    pub initial_food: usize,
    pub max_food: usize,
    /// Seconds between spawn waves.
    pub spawn_interval: f64,
    pub spawn_per_interval: usize,
    pub food_amount: f64,
    pub max_uses: u32,
    pub placement_attempts: usize,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            initial_food: 40,
            max_food: 150,
            spawn_interval: 5.0,
            spawn_per_interval: 5,
            food_amount: 20.0,
            max_uses: 1,
            placement_attempts: 20,
        }
    }
}

/// Experience curve and per-level stat gains.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LevelingConfig {
    pub xp_per_meal: u32,
    pub xp_per_child: u32,
    pub base_xp_to_level: u32,
    pub xp_step_per_level: u32,
    pub hp_per_level: f64,
    pub speed_per_level: f64,
    pub vision_per_level: f64,
    pub damage_per_level: f64,
}

impl Default for LevelingConfig {
    fn default() -> Self {
        Self {
            xp_per_meal: 5,
            xp_per_child: 10,
            base_xp_to_level: 10,
            xp_step_per_level: 5,
            hp_per_level: 10.0,
            speed_per_level: 0.2,
            vision_per_level: 0.5,
            damage_per_level: 5.0,
        }
    }
}

/// Forager agents only eat and mate; predators also hunt one prey kind.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub enum Role {
    #[default]
    Forager,
    Predator {
        prey: AgentKind,
        damage: f64,
        attack_cooldown: f64,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub enum ReproductionMode {
    /// Two eligible agents produce one blended child.
    #[default]
    Sexual,
    /// The agent splits into fresh offspring once it reaches `age`.
    Fission {
        age: f64,
        offspring: u32,
        offset: f64,
    },
}

/// When an agent founds a settlement of its own.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SettlementRule {
    pub min_age: f64,
    pub min_hunger: f64,
}

/// Per-kind tuning. Humans and slimes share one behaviour loop and differ
/// only in these numbers and capabilities.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AgentProfile {
    pub max_hunger: f64,
    pub hunger_decrease_rate: f64,
    pub max_hp: f64,
    pub age_increment_rate: f64,
    pub max_age: f64,

    pub move_speed: f64,
    pub vision_range: f64,
    pub slow_factor: f64,
    pub change_direction_interval: f64,
    pub direction_smoothness: f64,
    pub edge_avoidance_range: f64,

    /// Hunger at or below `food_seek_fraction * max_hunger` triggers foraging.
    pub food_seek_fraction: f64,
    pub eat_cooldown: f64,
    pub pause_chance: f64,
    pub pause_duration: (f64, f64),

    pub min_reproductive_age: f64,
    pub max_reproductive_age: f64,
    pub max_children: u32,
    pub child_cooldown: f64,
    pub separation_duration: f64,
    pub vision_variability: f64,
    pub speed_variability: f64,
    pub max_age_variability: f64,

    pub knockback_distance: f64,
    pub knockback_duration: f64,

    pub role: Role,
    pub reproduction: ReproductionMode,
    pub settlement: Option<SettlementRule>,
    pub leveling: bool,
}

impl AgentProfile {
    #[must_use]
    pub fn human() -> Self {
        Self {
            max_hunger: 100.0,
            hunger_decrease_rate: 1.0,
            max_hp: 100.0,
            age_increment_rate: 1.0 / 60.0,
            max_age: 100.0,
            move_speed: 2.0,
            vision_range: 5.0,
            slow_factor: 0.5,
            change_direction_interval: 2.0,
            direction_smoothness: 5.0,
            edge_avoidance_range: 0.5,
            food_seek_fraction: 0.75,
            eat_cooldown: 2.0,
            pause_chance: 0.0005,
            pause_duration: (0.5, 3.0),
            min_reproductive_age: 1.0,
            max_reproductive_age: 50.0,
            max_children: 5,
            child_cooldown: 10.0,
            separation_duration: 1.0,
            vision_variability: 0.2,
            speed_variability: 0.6,
            max_age_variability: 0.2,
            knockback_distance: 2.0,
            knockback_duration: 0.5,
            role: Role::Forager,
            reproduction: ReproductionMode::Sexual,
            settlement: Some(SettlementRule {
                min_age: 16.0,
                min_hunger: 50.0,
            }),
            leveling: true,
        }
    }

    #[must_use]
    pub fn slime() -> Self {
        Self {
            max_hunger: 80.0,
            hunger_decrease_rate: 0.5,
            max_hp: 80.0,
            age_increment_rate: 1.0 / 60.0,
            max_age: 50.0,
            move_speed: 1.5,
            vision_range: 3.0,
            slow_factor: 0.6,
            change_direction_interval: 3.0,
            direction_smoothness: 3.0,
            edge_avoidance_range: 0.3,
            food_seek_fraction: 0.1,
            eat_cooldown: 1.5,
            pause_chance: 0.001,
            pause_duration: (0.5, 2.0),
            min_reproductive_age: 1.0,
            max_reproductive_age: 40.0,
            max_children: 3,
            child_cooldown: 15.0,
            separation_duration: 1.0,
            vision_variability: 0.2,
            speed_variability: 0.6,
            max_age_variability: 0.2,
            knockback_distance: 2.0,
            knockback_duration: 0.5,
            role: Role::Forager,
            reproduction: ReproductionMode::Fission {
                age: 5.0,
                offspring: 2,
                offset: 0.5,
            },
            settlement: None,
            leveling: false,
        }
    }

    /// Hunger level at or below which the agent forages.
    #[must_use]
    pub fn food_seek_threshold(&self) -> f64 {
        self.max_hunger * self.food_seek_fraction
    }

    fn validate(&self, label: &str) -> anyhow::Result<()> {
        anyhow::ensure!(self.max_hunger > 0.0, "{label}: max_hunger must be positive");
        anyhow::ensure!(self.max_hp > 0.0, "{label}: max_hp must be positive");
        anyhow::ensure!(self.max_age > 0.0, "{label}: max_age must be positive");
        anyhow::ensure!(
            self.hunger_decrease_rate >= 0.0 && self.age_increment_rate >= 0.0,
            "{label}: drain rates must be non-negative"
        );
        anyhow::ensure!(
            self.move_speed >= 0.0 && self.vision_range >= 0.0,
            "{label}: speed and vision must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.slow_factor),
            "{label}: slow_factor must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.change_direction_interval > 0.0,
            "{label}: change_direction_interval must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.food_seek_fraction),
            "{label}: food_seek_fraction must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.pause_chance),
            "{label}: pause_chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.pause_duration.0 >= 0.0 && self.pause_duration.0 <= self.pause_duration.1,
            "{label}: pause_duration must be an ordered non-negative range"
        );
        anyhow::ensure!(
            self.child_cooldown >= 0.0 && self.separation_duration >= 0.0,
            "{label}: child_cooldown and separation_duration must be non-negative"
        );
        anyhow::ensure!(
            self.min_reproductive_age <= self.max_reproductive_age,
            "{label}: reproductive age band is inverted"
        );
        for (name, v) in [
            ("vision_variability", self.vision_variability),
            ("speed_variability", self.speed_variability),
            ("max_age_variability", self.max_age_variability),
        ] {
            anyhow::ensure!((0.0..=1.0).contains(&v), "{label}: {name} must be in [0.0, 1.0]");
        }
        anyhow::ensure!(
            self.knockback_duration > 0.0,
            "{label}: knockback_duration must be positive"
        );
        if let Role::Predator {
            damage,
            attack_cooldown,
            ..
        } = self.role
        {
            anyhow::ensure!(damage >= 0.0, "{label}: damage must be non-negative");
            anyhow::ensure!(
                attack_cooldown >= 0.0,
                "{label}: attack_cooldown must be non-negative"
            );
        }
        if let ReproductionMode::Fission { age, offspring, .. } = self.reproduction {
            anyhow::ensure!(age >= 0.0, "{label}: fission age must be non-negative");
            anyhow::ensure!(offspring > 0, "{label}: fission needs at least one offspring");
        }
        Ok(())
    }
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self::human()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub terrain: TerrainConfig,
    pub walkability: WalkabilityConfig,
    pub food: FoodConfig,
    pub leveling: LevelingConfig,
    pub human: AgentProfile,
    pub slime: AgentProfile,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            terrain: TerrainConfig::default(),
            walkability: WalkabilityConfig::default(),
            food: FoodConfig::default(),
            leveling: LevelingConfig::default(),
            human: AgentProfile::human(),
            slime: AgentProfile::slime(),
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn profile(&self, kind: AgentKind) -> &AgentProfile {
        match kind {
            AgentKind::Human => &self.human,
            AgentKind::Slime => &self.slime,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        // World validation
        if self.world.width == 0
            || self.world.height == 0
            || self.world.width > 1000
            || self.world.height > 1000
        {
            return Err(SimError::InvalidGrid {
                width: self.world.width,
                height: self.world.height,
            }
            .into());
        }
        anyhow::ensure!(
            self.world.interaction_radius > 0.0,
            "Interaction radius must be positive"
        );
        anyhow::ensure!(
            (0.0..=10.0).contains(&self.world.time_scale),
            "Time scale must be in [0.0, 10.0]"
        );
        anyhow::ensure!(
            self.world.spatial_cell_size > 0.0,
            "Spatial cell size must be positive"
        );
        anyhow::ensure!(
            self.world.initial_humans + self.world.initial_slimes <= 10000,
            "Initial population too large (max 10000)"
        );

        // Terrain validation
        anyhow::ensure!(
            self.terrain.land_size_factor > 0.0 && self.terrain.island_size_factor > 0.0,
            "Size factors must be positive"
        );
        anyhow::ensure!(self.terrain.noise_scale > 0.0, "Noise scale must be positive");
        anyhow::ensure!(self.terrain.chunk_size > 0, "Chunk size must be positive");
        anyhow::ensure!(
            self.terrain.chunks_per_tick > 0,
            "Chunks per tick must be positive"
        );
        crate::terrain::BiomeBands::new(self.terrain.bands)?;

        if self.walkability.walkable.is_empty() && self.walkability.slow.is_empty() {
            return Err(SimError::MissingWalkability.into());
        }

        // Food validation
        anyhow::ensure!(self.food.max_uses > 0, "Food max_uses must be positive");
        anyhow::ensure!(self.food.food_amount >= 0.0, "Food amount must be non-negative");
        anyhow::ensure!(
            self.food.spawn_interval > 0.0,
            "Food spawn interval must be positive"
        );
        anyhow::ensure!(
            self.food.max_food <= 10000,
            "Max food too large (max 10000)"
        );

        self.human.validate("human")?;
        self.slime.validate("slime")?;
        Ok(())
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let overrides: toml::Value = toml::from_str(content).map_err(SimError::from)?;
        let mut merged = toml::Value::try_from(Self::default())?;
        merge_toml(&mut merged, overrides);
        let config: Self = merged.try_into().map_err(SimError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Stable digest of everything that changes simulation outcomes.
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.terrain).as_bytes());
        hasher.update(format!("{:?}", self.walkability).as_bytes());
        hasher.update(format!("{:?}", self.food).as_bytes());
        hasher.update(format!("{:?}", self.leveling).as_bytes());
        hasher.update(format!("{:?}", self.human).as_bytes());
        hasher.update(format!("{:?}", self.slime).as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
