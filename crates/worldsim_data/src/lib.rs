//! # Worldsim Data
//!
//! Plain data types shared by the simulation core and the world orchestrator:
//! biome classification, grid coordinates, ECS components and the events a
//! tick emits. Nothing in this crate holds behaviour beyond small accessors.

pub mod data;

pub use data::entity::*;
pub use data::environment::*;
pub use data::terrain::*;
