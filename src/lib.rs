//! Aid Match - supply matching and need heatmaps for relief coordination
//!
//! This library scores NGOs against crisis areas, greedily assigns scarce
//! supply to the most urgent areas and renders need intensity as a heatmap.
//! All computations run on an in-memory snapshot supplied by the caller.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use crate::core::{HeatmapGenerator, MatchingEngine, MatchResult, synthesize_donations, distance::haversine_distance};
pub use models::{CrisisArea, Donation, HeatmapData, HeatmapPoint, Location, Ngo, Supply, SupplyCategory};
