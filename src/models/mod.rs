// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BoundingBox, CrisisArea, CrisisMarker, Donation, DonationStatus, HeatmapData, HeatmapParams,
    HeatmapPoint, Inventory, Location, MarkerPosition, MatchingWeights, Ngo, Reachability,
    SecurityLevel, Supply, SupplyCategory,
};
pub use requests::{HeatmapRequest, MarkersRequest, MatchRequest};
pub use responses::{ErrorResponse, HealthResponse, MarkersResponse, MatchResponse, MatchSummary};
