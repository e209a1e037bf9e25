use super::TerrainMap;
use crate::config::{TerrainConfig, WalkabilityConfig};
use crate::error::{Result, SimError};
use crate::noise::PerlinNoise;
use rand::Rng;
use rayon::prelude::*;
use worldsim_data::{BiomeType, CellCoord, Center, LandCenters};

/// Samples landmass and island centers uniformly inside the grid.
///
/// Centers may coincide; zero of either kind is fine.
pub fn generate_centers<R: Rng>(
    land_count: usize,
    island_count: usize,
    width: u16,
    height: u16,
    rng: &mut R,
) -> LandCenters {
    let sample = |rng: &mut R| Center {
        x: rng.gen_range(0.0..f64::from(width)),
        y: rng.gen_range(0.0..f64::from(height)),
    };
    let land = (0..land_count).map(|_| sample(rng)).collect();
    let islands = (0..island_count).map(|_| sample(rng)).collect();
    LandCenters { land, islands }
}

/// Everything `height_at` needs besides the centers and the noise field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightParams {
    pub land_size: f64,
    pub island_size: f64,
    pub noise_scale: f64,
    pub mountain_bias: f64,
}

impl HeightParams {
    #[must_use]
    pub fn from_config(config: &TerrainConfig) -> Self {
        Self {
            land_size: config.effective_land_size(),
            island_size: config.effective_island_size(),
            noise_scale: config.noise_scale,
            mountain_bias: config.mountain_bias,
        }
    }
}

/// Height of a cell: the strongest center contribution plus `mountain_bias`.
///
/// Each center contributes `max(0, 1 - d / size) * noise((cell + center) * scale)`.
pub fn height_at(
    cell: CellCoord,
    centers: &LandCenters,
    noise: &PerlinNoise,
    params: &HeightParams,
) -> f64 {
    let cx = f64::from(cell.x);
    let cy = f64::from(cell.y);
    let contribution = |center: &Center, size: f64| {
        let distance = ((cx - center.x).powi(2) + (cy - center.y).powi(2)).sqrt();
        let falloff = (1.0 - distance / size).max(0.0);
        if falloff == 0.0 {
            return 0.0;
        }
        falloff
            * noise.sample(
                (cx + center.x) * params.noise_scale,
                (cy + center.y) * params.noise_scale,
            )
    };

    let land = centers
        .land
        .iter()
        .map(|c| contribution(c, params.land_size));
    let islands = centers
        .islands
        .iter()
        .map(|c| contribution(c, params.island_size));
    let peak = land.chain(islands).fold(0.0, f64::max);
    peak + params.mountain_bias
}

/// Height thresholds splitting `[0, inf)` into the eight biomes.
///
/// `upper[i]` is the exclusive upper bound of `BiomeType::ALL[i]`; anything
/// at or above the last bound is `MountainHigh`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeBands {
    upper: [f64; 7],
}

impl Default for BiomeBands {
    fn default() -> Self {
        Self {
            upper: [0.2, 0.4, 0.5, 0.56, 0.725, 0.85, 0.925],
        }
    }
}

impl BiomeBands {
    pub fn new(upper: [f64; 7]) -> Result<Self> {
        if !upper.iter().all(|b| b.is_finite()) || upper[0] < 0.0 {
            return Err(SimError::bands(format!(
                "bounds must be finite and >= 0, got {upper:?}"
            )));
        }
        if let Some(w) = upper.windows(2).find(|w| w[0] >= w[1]) {
            return Err(SimError::bands(format!("{} >= {}", w[0], w[1])));
        }
        Ok(Self { upper })
    }

    #[must_use]
    pub fn upper_bounds(&self) -> &[f64; 7] {
        &self.upper
    }

    /// Biome whose band contains `height`.
    #[must_use]
    pub fn classify(&self, height: f64) -> BiomeType {
        debug_assert!(!height.is_nan(), "height must not be NaN");
        debug_assert!(
            self.upper.windows(2).all(|w| w[0] < w[1]),
            "biome bands must be strictly increasing"
        );
        self.upper
            .iter()
            .position(|&bound| height < bound)
            .map_or(BiomeType::MountainHigh, |i| BiomeType::ALL[i])
    }
}

/// Deterministic biome synthesis from fixed centers and a seeded noise field.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    pub width: u16,
    pub height: u16,
    pub centers: LandCenters,
    pub params: HeightParams,
    pub bands: BiomeBands,
    noise: PerlinNoise,
}

impl TerrainGenerator {
    pub fn new(
        width: u16,
        height: u16,
        centers: LandCenters,
        noise: PerlinNoise,
        params: HeightParams,
        bands: BiomeBands,
    ) -> Self {
        Self {
            width,
            height,
            centers,
            params,
            bands,
            noise,
        }
    }

    /// Draws centers and the noise seed from `rng`.
    pub fn from_config<R: Rng>(
        width: u16,
        height: u16,
        config: &TerrainConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let bands = BiomeBands::new(config.bands)?;
        let centers = generate_centers(
            config.land_count,
            config.island_count,
            width,
            height,
            rng,
        );
        let noise = PerlinNoise::new(rng.gen());
        Ok(Self::new(
            width,
            height,
            centers,
            noise,
            HeightParams::from_config(config),
            bands,
        ))
    }

    #[inline]
    pub fn height_at(&self, cell: CellCoord) -> f64 {
        height_at(cell, &self.centers, &self.noise, &self.params)
    }

    #[inline]
    pub fn classify(&self, cell: CellCoord) -> BiomeType {
        self.bands.classify(self.height_at(cell))
    }

    /// Generates the whole map in one pass.
    pub fn generate_map(&self, walkability: WalkabilityConfig) -> Result<TerrainMap> {
        let mut map = TerrainMap::new(self.width, self.height, walkability)?;
        let w = self.width as usize;
        map.cells_mut()
            .par_iter_mut()
            .enumerate()
            .for_each(|(idx, slot)| {
                let cell = CellCoord::new((idx % w) as i32, (idx / w) as i32);
                *slot = Some(self.classify(cell));
            });
        tracing::debug!(
            width = self.width,
            height = self.height,
            land = self.centers.land.len(),
            islands = self.centers.islands.len(),
            "Terrain generated"
        );
        Ok(map)
    }
}
