// Gameplay tuning, kept apart from runtime/server configuration.

pub mod arena;
pub mod hero;
pub mod tower;

pub use arena::{ArenaTuning, TowerPlacement};
pub use hero::HeroTuning;
pub use tower::TowerTuning;
