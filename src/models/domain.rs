use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use validator::{Validate, ValidationError};

/// Units accepted for inventory lots (compared case-insensitively)
pub const VALID_UNITS: &[&str] = &["kg", "liters", "pieces", "boxes", "packets", "units"];

/// Unit used for proposed supplies when the source lots carry none
pub const DEFAULT_UNIT: &str = "units";

/// Lot-split inventory, keyed by category
pub type Inventory = BTreeMap<SupplyCategory, Vec<Supply>>;

/// Geographic point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Supply categories an NGO can provide and a crisis area can need
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplyCategory {
    Food,
    Water,
    Medical,
    Shelter,
    Clothing,
    Hygiene,
}

impl SupplyCategory {
    pub const ALL: [SupplyCategory; 6] = [
        SupplyCategory::Food,
        SupplyCategory::Water,
        SupplyCategory::Medical,
        SupplyCategory::Shelter,
        SupplyCategory::Clothing,
        SupplyCategory::Hygiene,
    ];
}

/// How hard a crisis area is to physically reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reachability {
    Easy,
    Moderate,
    Difficult,
    Extreme,
}

impl Reachability {
    /// 0 = easy .. 3 = extreme
    pub fn ordinal(self) -> u8 {
        match self {
            Reachability::Easy => 0,
            Reachability::Moderate => 1,
            Reachability::Difficult => 2,
            Reachability::Extreme => 3,
        }
    }
}

/// Safety of a crisis area for aid workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    #[default]
    Safe,
    Caution,
    Dangerous,
    Extreme,
}

/// A single inventory lot or a proposed transfer of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supply {
    pub category: SupplyCategory,
    pub quantity: u32,
    pub unit: String,
    #[serde(default)]
    pub expiry_date: Option<chrono::DateTime<chrono::Utc>>,
}

/// Relief organization with stock to hand out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Ngo {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[validate(nested)]
    pub location: Location,
    #[validate(range(exclusive_min = 0.0))]
    pub reach_radius_km: f64,
    #[serde(default)]
    #[validate(custom(function = "validate_inventory"))]
    pub inventory: Inventory,
    #[serde(default)]
    pub specializations: BTreeSet<SupplyCategory>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub credibility_score: f64,
    #[serde(default)]
    pub is_busy: bool,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub response_time_hours: Option<f64>,
}

impl Ngo {
    /// Total quantity across all lots of a category
    pub fn available_quantity(&self, category: SupplyCategory) -> u64 {
        total_quantity(&self.inventory, category)
    }

    /// Unit of the first lot held for a category
    pub fn unit_for(&self, category: SupplyCategory) -> &str {
        self.inventory
            .get(&category)
            .and_then(|lots| lots.first())
            .map(|lot| lot.unit.as_str())
            .unwrap_or(DEFAULT_UNIT)
    }
}

/// Area in need of aid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CrisisArea {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[validate(nested)]
    pub location: Location,
    #[serde(default)]
    pub current_needs: BTreeMap<SupplyCategory, u32>,
    #[serde(default)]
    #[validate(custom(function = "validate_urgency_levels"))]
    pub urgency_levels: BTreeMap<SupplyCategory, u8>,
    pub reachability: Reachability,
    #[serde(default)]
    #[validate(custom(function = "validate_inventory"))]
    pub current_inventory: Inventory,
    #[serde(default)]
    pub population: u32,
    #[serde(default)]
    pub weather_conditions: String,
    #[serde(default)]
    pub security_level: SecurityLevel,
}

impl CrisisArea {
    /// Amount still needed, zero when the category is absent
    pub fn need(&self, category: SupplyCategory) -> u32 {
        self.current_needs.get(&category).copied().unwrap_or(0)
    }

    /// Urgency of a category, 1 when unspecified
    pub fn urgency(&self, category: SupplyCategory) -> u8 {
        self.urgency_levels.get(&category).copied().unwrap_or(1)
    }

    /// Highest urgency over all categories, 0 when none are rated
    pub fn max_urgency(&self) -> u8 {
        self.urgency_levels.values().copied().max().unwrap_or(0)
    }

    /// Quantity already on site for a category
    pub fn on_hand(&self, category: SupplyCategory) -> u64 {
        total_quantity(&self.current_inventory, category)
    }
}

fn total_quantity(inventory: &Inventory, category: SupplyCategory) -> u64 {
    inventory
        .get(&category)
        .map(|lots| lots.iter().map(|lot| u64::from(lot.quantity)).sum())
        .unwrap_or(0)
}

fn validate_inventory(inventory: &Inventory) -> Result<(), ValidationError> {
    for (category, lots) in inventory {
        for lot in lots {
            if lot.category != *category {
                return Err(ValidationError::new("lot_category_mismatch"));
            }
            let unit = lot.unit.to_lowercase();
            if !VALID_UNITS.contains(&unit.as_str()) {
                return Err(ValidationError::new("invalid_unit"));
            }
        }
    }
    Ok(())
}

fn validate_urgency_levels(levels: &BTreeMap<SupplyCategory, u8>) -> Result<(), ValidationError> {
    if levels.values().all(|level| (1..=5).contains(level)) {
        Ok(())
    } else {
        Err(ValidationError::new("urgency_out_of_range"))
    }
}

/// Lifecycle of a donation record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    #[default]
    Pending,
    InTransit,
    Delivered,
}

/// Durable record of a proposed transfer, persisted by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: String,
    pub ngo_id: String,
    pub crisis_area_id: String,
    pub supplies: Vec<Supply>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub status: DonationStatus,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Box spanned by south-west and north-east corners
    pub fn from_corners(sw: Location, ne: Location) -> Self {
        Self {
            min_lat: sw.latitude,
            max_lat: ne.latitude,
            min_lon: sw.longitude,
            max_lon: ne.longitude,
        }
    }
}

/// Single rendered heatmap cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPoint {
    pub lat: f64,
    pub lng: f64,
    pub intensity: f64,
    pub satisfaction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerPosition {
    pub lat: f64,
    pub lng: f64,
}

/// Map marker summarizing one crisis area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisMarker {
    pub id: String,
    pub name: String,
    pub position: MarkerPosition,
    pub satisfaction: f64,
    pub urgency: u8,
    pub reachability: Reachability,
    pub needs: BTreeMap<SupplyCategory, u32>,
    pub population: u32,
    pub weather: String,
    pub security: SecurityLevel,
    pub current_inventory: Inventory,
}

/// Heatmap output for one bounding box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapData {
    pub points: Vec<HeatmapPoint>,
    pub markers: Vec<CrisisMarker>,
    pub opacity: f64,
    /// Influence radius in meters
    pub radius: f64,
    pub category: Option<SupplyCategory>,
}

/// Weights of the overall NGO/area match score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingWeights {
    pub urgency: f64,
    pub distance: f64,
    pub reachability: f64,
}

impl Default for MatchingWeights {
    fn default() -> Self {
        Self {
            urgency: 0.5,
            distance: 0.3,
            reachability: 0.2,
        }
    }
}

/// Heatmap grid and falloff parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapParams {
    pub radius_km: f64,
    pub resolution_km: f64,
    pub min_grid_steps: usize,
    pub opacity: f64,
}

impl Default for HeatmapParams {
    fn default() -> Self {
        Self {
            radius_km: 50.0,
            resolution_km: 1.0,
            min_grid_steps: 2,
            opacity: 0.6,
        }
    }
}
