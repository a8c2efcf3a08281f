use crate::models::{BoundingBox, CrisisArea, Location, Ngo};
use std::collections::HashMap;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate kilometers per degree of latitude
pub const KM_PER_DEGREE: f64 = 111.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance between two locations in kilometers
#[inline]
pub fn distance_between(a: &Location, b: &Location) -> f64 {
    haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Grow a box by `radius_km` on every side
///
/// Longitude padding uses the box edge closest to a pole, so every point within
/// `radius_km` of the original box lands inside the result.
pub fn pad_bounding_box(bbox: &BoundingBox, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE;
    let min_lat = bbox.min_lat - lat_delta;
    let max_lat = bbox.max_lat + lat_delta;

    let widest = min_lat.abs().max(max_lat.abs()).min(90.0);
    let cos = widest.to_radians().cos();
    let (min_lon, max_lon) = if cos > 1e-6 {
        let lon_delta = radius_km / (KM_PER_DEGREE * cos);
        (bbox.min_lon - lon_delta, bbox.max_lon + lon_delta)
    } else {
        (-180.0, 180.0)
    };

    BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}

/// Check if a point is within a bounding box
///
/// Longitude wraps at the antimeridian, so a box padded past ±180° still
/// contains points on the other side.
#[inline]
pub fn is_within_bounding_box(lat: f64, lon: f64, bbox: &BoundingBox) -> bool {
    if lat < bbox.min_lat || lat > bbox.max_lat {
        return false;
    }
    let unwrapped = bbox.min_lon + (lon - bbox.min_lon).rem_euclid(360.0);
    unwrapped <= bbox.max_lon
}

/// Kind of entity a cached distance endpoint belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Ngo,
    CrisisArea,
}

/// Identity of one endpoint of a cached distance
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityKey {
    pub fn ngo(ngo: &Ngo) -> Self {
        Self {
            kind: EntityKind::Ngo,
            id: ngo.id.clone(),
        }
    }

    pub fn crisis_area(area: &CrisisArea) -> Self {
        Self {
            kind: EntityKind::CrisisArea,
            id: area.id.clone(),
        }
    }
}

/// Unordered pair of entity identities
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityPair(EntityKey, EntityKey);

impl EntityPair {
    pub fn new(a: EntityKey, b: EntityKey) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

/// Memoized distances for the lifetime of one engine instance
///
/// Not synchronized; concurrent runs need their own cache.
#[derive(Debug, Clone, Default)]
pub struct DistanceCache {
    entries: HashMap<EntityPair, f64>,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance between two entities, computed once per pair
    pub fn distance(&mut self, a: (EntityKey, &Location), b: (EntityKey, &Location)) -> f64 {
        let (a_key, a_loc) = a;
        let (b_key, b_loc) = b;
        let pair = EntityPair::new(a_key, b_key);

        if let Some(distance) = self.entries.get(&pair) {
            tracing::trace!("Distance cache hit: {:?}", pair);
            return *distance;
        }

        let distance = distance_between(a_loc, b_loc);
        self.entries.insert(pair, distance);
        distance
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Distance from London to Paris (approximately 344 km)
        let london_lat = 51.5074;
        let london_lon = -0.1278;
        let paris_lat = 48.8566;
        let paris_lon = 2.3522;

        let distance = haversine_distance(london_lat, london_lon, paris_lat, paris_lon);
        assert!((distance - 344.0).abs() < 10.0, "Distance should be ~344km, got {}", distance);
    }

    #[test]
    fn test_haversine_symmetric() {
        let la = Location::new(34.0522, -118.2437);
        let ny = Location::new(40.7128, -74.0060);

        let forward = distance_between(&la, &ny);
        let backward = distance_between(&ny, &la);

        assert_eq!(forward, backward);
        assert!((forward - 3936.0).abs() < 5.0, "Expected ~3936km, got {}", forward);
    }

    #[test]
    fn test_padded_box_contains_nearby_points() {
        let bbox = BoundingBox {
            min_lat: 10.0,
            max_lat: 11.0,
            min_lon: 20.0,
            max_lon: 21.0,
        };
        let padded = pad_bounding_box(&bbox, 50.0);

        // ~40km north of the top edge
        assert!(is_within_bounding_box(11.36, 20.5, &padded));
        // ~40km east of the east edge
        assert!(is_within_bounding_box(10.5, 21.36, &padded));
        assert!(!is_within_bounding_box(13.0, 20.5, &padded));
    }

    #[test]
    fn test_padded_box_wraps_across_antimeridian() {
        let bbox = BoundingBox {
            min_lat: -0.05,
            max_lat: 0.05,
            min_lon: 179.85,
            max_lon: 179.95,
        };
        let padded = pad_bounding_box(&bbox, 50.0);

        // ~11km east of the east edge, past the antimeridian
        assert!(is_within_bounding_box(0.0, -179.95, &padded));
        assert!(is_within_bounding_box(0.0, 180.0, &padded));
        assert!(!is_within_bounding_box(0.0, -178.0, &padded));
        assert!(!is_within_bounding_box(0.0, 0.0, &padded));
    }

    #[test]
    fn test_plain_box_check() {
        let bbox = BoundingBox {
            min_lat: 40.6,
            max_lat: 40.8,
            min_lon: -74.1,
            max_lon: -73.9,
        };

        assert!(is_within_bounding_box(40.7128, -74.0060, &bbox));
        assert!(!is_within_bounding_box(40.7, -73.8, &bbox));
        // Same meridian as -74.0 once wrapped
        assert!(is_within_bounding_box(40.7, 286.0, &bbox));
    }

    #[test]
    fn test_padded_box_near_pole_spans_all_longitudes() {
        let bbox = BoundingBox {
            min_lat: 89.5,
            max_lat: 89.9,
            min_lon: 0.0,
            max_lon: 1.0,
        };
        let padded = pad_bounding_box(&bbox, 50.0);

        assert_eq!(padded.min_lon, -180.0);
        assert_eq!(padded.max_lon, 180.0);
    }

    #[test]
    fn test_entity_pair_unordered() {
        let ngo = EntityKey { kind: EntityKind::Ngo, id: "x".to_string() };
        let area = EntityKey { kind: EntityKind::CrisisArea, id: "y".to_string() };

        assert_eq!(
            EntityPair::new(ngo.clone(), area.clone()),
            EntityPair::new(area, ngo)
        );
    }

    #[test]
    fn test_cache_keys_do_not_collide_across_kinds() {
        let mut cache = DistanceCache::new();
        let origin = Location::new(0.0, 0.0);
        let east = Location::new(0.0, 1.0);
        let north = Location::new(1.0, 0.0);

        let ngo = || EntityKey { kind: EntityKind::Ngo, id: "same".to_string() };
        let area = || EntityKey { kind: EntityKind::CrisisArea, id: "same".to_string() };
        let other = || EntityKey { kind: EntityKind::CrisisArea, id: "other".to_string() };

        let d1 = cache.distance((ngo(), &origin), (other(), &east));
        let d2 = cache.distance((area(), &origin), (other(), &north));

        assert_eq!(cache.len(), 2);
        assert!((d1 - d2).abs() < 1e-9);
        // Reversed lookup is served from the cache, not recomputed
        let d3 = cache.distance((other(), &Location::new(50.0, 50.0)), (ngo(), &origin));
        assert_eq!(d3, d1);
        assert_eq!(cache.len(), 2);
    }
}
