pub mod config;
pub mod events;
pub mod refresh;
pub mod regions;
pub mod snapshot;
