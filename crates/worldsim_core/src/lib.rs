//! # WorldSim Core
//!
//! Deterministic simulation logic for a procedurally generated world of
//! wandering, foraging and breeding agents:
//! - Heightmap terrain from land/island centers and coherent noise, in one
//!   pass or chunk by chunk
//! - A per-agent behaviour state machine with hunger, ageing, mating,
//!   predation and knockback
//! - Spatial hashing and a typed entity registry for nearest-target lookups
//! - Configuration, metrics and structured logging
//!
//! Decisions are made in parallel against a read-only [`snapshot::TickIndex`]
//! and applied serially as [`interaction::InteractionCommand`]s.
//!
//! ## Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use worldsim_core::config::{TerrainConfig, WalkabilityConfig};
//! use worldsim_core::terrain::TerrainGenerator;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let generator = TerrainGenerator::from_config(64, 48, &TerrainConfig::default(), &mut rng)
//!     .expect("default bands are valid");
//! let map = generator
//!     .generate_map(WalkabilityConfig::default())
//!     .expect("non-empty grid");
//! assert!(map.is_complete());
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Error types
pub mod error;
/// Food items and periodic spawning
pub mod food;
/// Commands produced by the decide phase
pub mod interaction;
/// Experience and level-ups
pub mod leveling;
/// Agent construction and naming
pub mod lifecycle;
/// Performance metrics collection and logging
pub mod metrics;
/// Seeded gradient noise
pub mod noise;
/// Typed registry of live entities
pub mod registry;
/// Per-tick snapshots and nearest-target queries
pub mod snapshot;
/// Spatial hashing for proximity queries
pub mod spatial_hash;
/// Agent behaviour systems
pub mod systems;
/// Terrain generation and walkability
pub mod terrain;

pub use metrics::{init_logging, Metrics};
pub use terrain::BiomeLogic;
