//! Core data structures for the worldsim simulation.

pub mod entity;
pub mod environment;
pub mod terrain;
