// Core algorithm exports
pub mod distance;
pub mod heatmap;
pub mod matcher;
pub mod scoring;

pub use distance::{haversine_distance, is_within_bounding_box, pad_bounding_box, DistanceCache};
pub use heatmap::{HeatmapGenerator, PointScore, markers};
pub use matcher::{MatchingEngine, MatchResult, synthesize_donations};
pub use scoring::score_supplies;
