use serde::{Deserialize, Serialize};

/// Biome classification of a single grid cell, ordered by ascending height.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum BiomeType {
    #[default]
    WaterDeep,
    Water,
    WaterUndeep,
    Sand,
    Grass,
    ForestGrass,
    MountainLow,
    MountainHigh,
}

impl BiomeType {
    /// Every biome in ascending height order.
    pub const ALL: [BiomeType; 8] = [
        BiomeType::WaterDeep,
        BiomeType::Water,
        BiomeType::WaterUndeep,
        BiomeType::Sand,
        BiomeType::Grass,
        BiomeType::ForestGrass,
        BiomeType::MountainLow,
        BiomeType::MountainHigh,
    ];

    /// Position of the biome in the height ordering.
    #[must_use]
    pub fn rank(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn is_water(self) -> bool {
        matches!(
            self,
            BiomeType::WaterDeep | BiomeType::Water | BiomeType::WaterUndeep
        )
    }
}

/// How an agent may traverse a biome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Walkability {
    Walkable,
    Slow,
    Unwalkable,
}

/// Integer grid coordinate of a terrain cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell containing a continuous world position.
    #[must_use]
    pub fn from_world(x: f64, y: f64) -> Self {
        Self {
            x: x.floor() as i32,
            y: y.floor() as i32,
        }
    }
}

/// Coordinate of a generation chunk (in chunk units, not cells).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

/// A landmass or island seed point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub x: f64,
    pub y: f64,
}

/// Landmass and island centers sampled once per world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandCenters {
    pub land: Vec<Center>,
    pub islands: Vec<Center>,
}

impl LandCenters {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.land.is_empty() && self.islands.is_empty()
    }
}
