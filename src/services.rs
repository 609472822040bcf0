pub mod chests;

pub use chests::{ChestRegistry, ChestSelector};
