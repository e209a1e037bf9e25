//! Per-agent systems run during the parallel decide phase.

pub mod behavior;
pub mod reproduction;
pub mod steering;
pub mod vitals;
