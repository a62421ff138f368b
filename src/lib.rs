pub mod config;
pub mod edit;
pub mod error;
pub mod fixtures;
pub mod league;
pub mod predict;
pub mod simulation;
pub mod standings;
pub mod store;
pub mod strength;
pub mod team;
