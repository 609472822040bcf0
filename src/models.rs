pub mod block;
pub mod chest;
pub mod inventory;
pub mod types;
