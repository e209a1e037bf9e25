//! Biome grid and walkability queries.
//!
//! The map starts empty; generation (single pass or chunked) fills every cell
//! exactly once. Cells that are out of bounds or not generated yet report no
//! data and are treated as unwalkable.

use crate::config::WalkabilityConfig;
use crate::error::{Result, SimError};
use rand::Rng;
use std::collections::BTreeMap;
use worldsim_data::{BiomeType, CellCoord, Walkability};

pub mod chunked;
pub mod generation;

pub use chunked::{ChunkObserver, ChunkedGenerator, GenerationProgress};
pub use generation::{generate_centers, height_at, BiomeBands, HeightParams, TerrainGenerator};

pub trait BiomeLogic {
    fn symbol(&self) -> char;
}

impl BiomeLogic for BiomeType {
    fn symbol(&self) -> char {
        match self {
            BiomeType::WaterDeep => '~',
            BiomeType::Water => '≈',
            BiomeType::WaterUndeep => '-',
            BiomeType::Sand => '.',
            BiomeType::Grass => ',',
            BiomeType::ForestGrass => '♣',
            BiomeType::MountainLow => '^',
            BiomeType::MountainHigh => '▲',
        }
    }
}

#[derive(Debug, Clone)]
pub struct TerrainMap {
    pub width: u16,
    pub height: u16,
    cells: Vec<Option<BiomeType>>,
    walkability: WalkabilityConfig,
}

impl TerrainMap {
    /// Empty map. Fails fast on a zero-sized grid or a table with nowhere to stand.
    pub fn new(width: u16, height: u16, walkability: WalkabilityConfig) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidGrid { width, height });
        }
        if walkability.walkable.is_empty() && walkability.slow.is_empty() {
            return Err(SimError::MissingWalkability);
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
            walkability,
        })
    }

    /// Fully generated map where every cell is `biome`.
    pub fn filled(
        width: u16,
        height: u16,
        biome: BiomeType,
        walkability: WalkabilityConfig,
    ) -> Result<Self> {
        let mut map = Self::new(width, height, walkability)?;
        map.cells.fill(Some(biome));
        Ok(map)
    }

    #[inline]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.width as i32 || cell.y >= self.height as i32
        {
            None
        } else {
            Some(cell.y as usize * self.width as usize + cell.x as usize)
        }
    }

    #[inline]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Biome of a cell, or `None` when there is no data for it.
    #[inline]
    pub fn biome(&self, cell: CellCoord) -> Option<BiomeType> {
        self.index(cell).and_then(|idx| self.cells[idx])
    }

    pub fn set_biome(&mut self, cell: CellCoord, biome: BiomeType) {
        if let Some(idx) = self.index(cell) {
            self.cells[idx] = Some(biome);
        }
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Option<BiomeType>] {
        &mut self.cells
    }

    #[inline]
    pub fn walkability(&self, cell: CellCoord) -> Walkability {
        self.biome(cell)
            .map_or(Walkability::Unwalkable, |b| self.walkability.classify(b))
    }

    #[inline]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.walkability(cell) != Walkability::Unwalkable
    }

    #[inline]
    pub fn is_slow(&self, cell: CellCoord) -> bool {
        self.walkability(cell) == Walkability::Slow
    }

    #[inline]
    pub fn is_walkable_at(&self, x: f64, y: f64) -> bool {
        x.is_finite() && y.is_finite() && self.is_walkable(CellCoord::from_world(x, y))
    }

    /// Movement multiplier for standing on `cell`.
    #[inline]
    pub fn speed_factor(&self, cell: CellCoord, slow_factor: f64) -> f64 {
        match self.walkability(cell) {
            Walkability::Walkable => 1.0,
            Walkability::Slow => slow_factor,
            Walkability::Unwalkable => 0.0,
        }
    }

    pub fn walkability_table(&self) -> &WalkabilityConfig {
        &self.walkability
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    #[must_use]
    pub fn generated_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Biomes of every cell in row-major order; `None` where not generated.
    pub fn biomes(&self) -> &[Option<BiomeType>] {
        &self.cells
    }

    #[must_use]
    pub fn histogram(&self) -> BTreeMap<BiomeType, usize> {
        let mut counts = BTreeMap::new();
        for biome in self.cells.iter().flatten() {
            *counts.entry(*biome).or_insert(0) += 1;
        }
        counts
    }

    /// Random walkable cell center, trying at most `attempts` samples.
    pub fn random_walkable_point<R: Rng>(&self, rng: &mut R, attempts: usize) -> Option<(f64, f64)> {
        for _ in 0..attempts {
            let x = rng.gen_range(0..self.width as i32);
            let y = rng.gen_range(0..self.height as i32);
            if self.is_walkable(CellCoord::new(x, y)) {
                return Some((x as f64 + 0.5, y as f64 + 0.5));
            }
        }
        None
    }

    /// One character per cell, top row first (highest `y`).
    #[must_use]
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in (0..self.height as i32).rev() {
            for x in 0..self.width as i32 {
                out.push(self.biome(CellCoord::new(x, y)).map_or(' ', |b| b.symbol()));
            }
            out.push('\n');
        }
        out
    }
}
