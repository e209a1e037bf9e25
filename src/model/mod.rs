pub use worldsim_core::BiomeLogic;
pub mod config {
    pub use worldsim_core::config::*;
}
pub mod food {
    pub use worldsim_core::food::*;
}
pub mod interaction {
    pub use worldsim_core::interaction::*;
}
pub mod leveling {
    pub use worldsim_core::leveling::*;
}
pub mod lifecycle {
    pub use worldsim_core::lifecycle::*;
}
pub mod registry {
    pub use worldsim_core::registry::*;
}
pub mod snapshot {
    pub use worldsim_core::snapshot::*;
}
pub mod spatial_hash {
    pub use worldsim_core::spatial_hash::*;
}
pub mod systems {
    pub use worldsim_core::systems::*;
}
pub mod terrain {
    pub use worldsim_core::terrain::*;
}

pub mod state {
    pub use worldsim_data::*;
}
pub mod world;
