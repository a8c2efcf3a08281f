use crate::core::distance::{distance_between, is_within_bounding_box, pad_bounding_box, KM_PER_DEGREE};
use crate::core::scoring::MAX_URGENCY;
use crate::models::{
    BoundingBox, CrisisArea, CrisisMarker, HeatmapData, HeatmapParams, HeatmapPoint, Location,
    MarkerPosition, SupplyCategory,
};

/// Exponent of the distance falloff around a crisis area.
/// Tunable policy; 2 keeps influence concentrated near the center.
pub const FALLOFF_EXPONENT: i32 = 2;

/// Intensity and satisfaction at a single location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointScore {
    pub intensity: f64,
    pub satisfaction: f64,
}

/// Interpolates crisis-area need over a lat/lon grid
#[derive(Debug, Clone, Default)]
pub struct HeatmapGenerator {
    params: HeatmapParams,
}

impl HeatmapGenerator {
    pub fn new(params: HeatmapParams) -> Self {
        Self { params }
    }

    /// Generate heatmap points and markers for a south-west / north-east box
    ///
    /// Cells with zero intensity are left out. A zero-area box still yields a
    /// grid of `min_grid_steps` per axis.
    pub fn generate(
        &self,
        crisis_areas: &[CrisisArea],
        sw: Location,
        ne: Location,
        category: Option<SupplyCategory>,
    ) -> HeatmapData {
        let (lat_steps, lon_steps) = self.grid_steps(&sw, &ne);

        // Areas beyond radius_km of the box cannot touch any cell
        let reach = pad_bounding_box(&BoundingBox::from_corners(sw, ne), self.params.radius_km);
        let nearby: Vec<&CrisisArea> = crisis_areas
            .iter()
            .filter(|area| {
                is_within_bounding_box(area.location.latitude, area.location.longitude, &reach)
            })
            .collect();

        tracing::debug!(
            "Heatmap grid {}x{} over {} of {} crisis areas",
            lat_steps,
            lon_steps,
            nearby.len(),
            crisis_areas.len()
        );

        let lat_vals = linspace(sw.latitude, ne.latitude, lat_steps);
        let lon_vals = linspace(sw.longitude, ne.longitude, lon_steps);

        let mut points = Vec::new();
        for &lat in &lat_vals {
            for &lng in &lon_vals {
                let score = self.score_point(&Location::new(lat, lng), nearby.iter().copied(), category);
                if score.intensity > 0.0 {
                    points.push(HeatmapPoint {
                        lat,
                        lng,
                        intensity: score.intensity,
                        satisfaction: score.satisfaction,
                    });
                }
            }
        }

        HeatmapData {
            points,
            markers: markers(crisis_areas),
            opacity: self.params.opacity,
            radius: self.params.radius_km * 1000.0,
            category,
        }
    }

    /// Number of grid points per axis, each at least `min_grid_steps`
    pub fn grid_steps(&self, sw: &Location, ne: &Location) -> (usize, usize) {
        let resolution = self.params.resolution_km;
        let lat_km = (ne.latitude - sw.latitude) * KM_PER_DEGREE;
        let lon_km = (ne.longitude - sw.longitude) * KM_PER_DEGREE * sw.latitude.to_radians().cos();

        // Negative or NaN spans saturate to 0 and fall back to the floor
        let lat_steps = (lat_km / resolution).floor() as usize;
        let lon_steps = (lon_km / resolution).floor() as usize;

        (
            lat_steps.max(self.params.min_grid_steps),
            lon_steps.max(self.params.min_grid_steps),
        )
    }

    /// Intensity and satisfaction at one location
    ///
    /// Satisfaction is 1.0 when no crisis area is in range.
    pub fn point_score(
        &self,
        point: &Location,
        crisis_areas: &[CrisisArea],
        category: Option<SupplyCategory>,
    ) -> PointScore {
        self.score_point(point, crisis_areas.iter(), category)
    }

    fn score_point<'a>(
        &self,
        point: &Location,
        crisis_areas: impl Iterator<Item = &'a CrisisArea>,
        category: Option<SupplyCategory>,
    ) -> PointScore {
        let radius = self.params.radius_km;
        let mut intensity: f64 = 0.0;
        let mut weighted_satisfaction = 0.0;
        let mut total_weight = 0.0;

        for area in crisis_areas {
            let distance = distance_between(point, &area.location);
            if distance > radius {
                continue;
            }

            let weight = (1.0 - distance / radius).powi(FALLOFF_EXPONENT);
            weighted_satisfaction += weight * area_satisfaction(area, category);
            total_weight += weight;
            intensity = intensity.max(area_urgency(area, category) * weight);
        }

        let satisfaction = if total_weight > 0.0 {
            weighted_satisfaction / total_weight
        } else {
            1.0
        };

        PointScore {
            intensity,
            satisfaction,
        }
    }
}

/// One marker per crisis area, independent of any grid
pub fn markers(crisis_areas: &[CrisisArea]) -> Vec<CrisisMarker> {
    crisis_areas
        .iter()
        .map(|area| CrisisMarker {
            id: area.id.clone(),
            name: area.name.clone(),
            position: MarkerPosition {
                lat: area.location.latitude,
                lng: area.location.longitude,
            },
            satisfaction: area_satisfaction(area, None),
            urgency: area.max_urgency(),
            reachability: area.reachability,
            needs: area.current_needs.clone(),
            population: area.population,
            weather: area.weather_conditions.clone(),
            security: area.security_level,
            current_inventory: area.current_inventory.clone(),
        })
        .collect()
}

/// Share of need already covered by on-site inventory
///
/// Without a category this is the urgency-weighted average over every needed
/// category. Nothing needed, or no urgency at all, reads as fully satisfied.
pub fn area_satisfaction(area: &CrisisArea, category: Option<SupplyCategory>) -> f64 {
    if let Some(category) = category {
        return category_satisfaction(area, category);
    }

    let (weighted, total_urgency) = area.current_needs.keys().fold((0.0, 0.0), |(sum, total), &c| {
        let urgency = f64::from(area.urgency(c));
        (sum + urgency * category_satisfaction(area, c), total + urgency)
    });

    if total_urgency > 0.0 {
        weighted / total_urgency
    } else {
        1.0
    }
}

fn category_satisfaction(area: &CrisisArea, category: SupplyCategory) -> f64 {
    let needed = area.need(category);
    if needed == 0 {
        return 1.0;
    }
    (area.on_hand(category) as f64 / f64::from(needed)).min(1.0)
}

/// Normalized urgency of outstanding needs, 0 when nothing is needed
fn area_urgency(area: &CrisisArea, category: Option<SupplyCategory>) -> f64 {
    let urgency = match category {
        Some(c) if area.need(c) > 0 => area.urgency(c),
        Some(_) => 0,
        None => area
            .current_needs
            .iter()
            .filter(|&(_, &needed)| needed > 0)
            .map(|(&c, _)| area.urgency(c))
            .max()
            .unwrap_or(0),
    };
    (f64::from(urgency) / MAX_URGENCY).min(1.0)
}

/// `count` evenly spaced values from `start` to `end` inclusive
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Reachability, SecurityLevel, Supply};
    use std::collections::BTreeMap;

    fn create_area(
        id: &str,
        lat: f64,
        lon: f64,
        needs: &[(SupplyCategory, u32, u8)],
        on_hand: &[(SupplyCategory, u32)],
    ) -> CrisisArea {
        CrisisArea {
            id: id.to_string(),
            name: format!("Area {}", id),
            location: Location::new(lat, lon),
            current_needs: needs.iter().map(|&(c, n, _)| (c, n)).collect(),
            urgency_levels: needs.iter().map(|&(c, _, u)| (c, u)).collect(),
            reachability: Reachability::Difficult,
            current_inventory: on_hand
                .iter()
                .map(|&(category, quantity)| {
                    (category, vec![Supply { category, quantity, unit: "boxes".to_string(), expiry_date: None }])
                })
                .collect(),
            population: 2500,
            weather_conditions: "rain".to_string(),
            security_level: SecurityLevel::Dangerous,
        }
    }

    #[test]
    fn test_linspace_inclusive() {
        let vals = linspace(0.0, 1.0, 5);
        assert_eq!(vals, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(3.0, 3.0, 1), vec![3.0]);
    }

    #[test]
    fn test_grid_steps_from_resolution() {
        let generator = HeatmapGenerator::default();
        let (lat_steps, lon_steps) =
            generator.grid_steps(&Location::new(0.0, 0.0), &Location::new(0.1, 0.1));

        // 0.1 degrees ~ 11.1 km at 1 km resolution
        assert_eq!(lat_steps, 11);
        assert_eq!(lon_steps, 11);
    }

    #[test]
    fn test_degenerate_box_uses_minimum_grid() {
        let generator = HeatmapGenerator::default();
        let corner = Location::new(12.0, 30.0);

        assert_eq!(generator.grid_steps(&corner, &corner), (2, 2));

        let areas = vec![create_area("a", 12.0, 30.0, &[(SupplyCategory::Food, 100, 5)], &[])];
        let data = generator.generate(&areas, corner, corner, None);
        assert_eq!(data.points.len(), 4);
    }

    #[test]
    fn test_intensity_at_center_is_normalized_urgency() {
        let generator = HeatmapGenerator::default();
        let areas = vec![create_area("a", 5.0, 5.0, &[(SupplyCategory::Water, 100, 4)], &[])];

        let score = generator.point_score(&Location::new(5.0, 5.0), &areas, None);
        assert!((score.intensity - 0.8).abs() < 1e-9);
        assert_eq!(score.satisfaction, 0.0);
    }

    #[test]
    fn test_quadratic_falloff() {
        let generator = HeatmapGenerator::default();
        let areas = vec![create_area("a", 0.0, 0.0, &[(SupplyCategory::Water, 100, 5)], &[])];
        let point = Location::new(0.0, 0.0);
        let distance = 25.0;
        // Move due east by `distance` km along the equator
        let east = Location::new(0.0, distance / (6371.0 * std::f64::consts::PI / 180.0));

        let score = generator.point_score(&east, &areas, None);
        assert!((score.intensity - 0.25).abs() < 1e-6, "got {}", score.intensity);
        assert!(generator.point_score(&point, &areas, None).intensity > score.intensity);
    }

    #[test]
    fn test_intensity_is_max_not_sum() {
        let generator = HeatmapGenerator::default();
        let point = Location::new(0.0, 0.0);
        let strong = create_area("strong", 0.0, 0.0, &[(SupplyCategory::Food, 10, 5)], &[]);
        let weak = create_area("weak", 0.0, 0.0, &[(SupplyCategory::Food, 10, 2)], &[]);

        let alone = generator.point_score(&point, &[strong.clone()], None);
        let both = generator.point_score(&point, &[strong, weak.clone(), weak], None);

        assert_eq!(alone.intensity, both.intensity);
        assert!(both.intensity <= 1.0);
    }

    #[test]
    fn test_empty_neighborhood() {
        let generator = HeatmapGenerator::default();
        let areas = vec![create_area("a", 40.0, 40.0, &[(SupplyCategory::Food, 100, 5)], &[])];

        let score = generator.point_score(&Location::new(0.0, 0.0), &areas, None);
        assert_eq!(score.intensity, 0.0);
        assert_eq!(score.satisfaction, 1.0);

        let data = generator.generate(&areas, Location::new(0.0, 0.0), Location::new(0.05, 0.05), None);
        assert!(data.points.is_empty());
        assert_eq!(data.markers.len(), 1);
    }

    #[test]
    fn test_zero_need_area_is_invisible() {
        let generator = HeatmapGenerator::default();
        let areas = vec![create_area(
            "calm",
            1.0,
            1.0,
            &[(SupplyCategory::Food, 0, 5), (SupplyCategory::Water, 0, 4)],
            &[],
        )];

        let data = generator.generate(&areas, Location::new(0.9, 0.9), Location::new(1.1, 1.1), None);
        assert!(data.points.is_empty());

        let filtered = generator.generate(
            &areas,
            Location::new(0.9, 0.9),
            Location::new(1.1, 1.1),
            Some(SupplyCategory::Food),
        );
        assert!(filtered.points.is_empty());
    }

    #[test]
    fn test_category_filter() {
        let generator = HeatmapGenerator::default();
        let areas = vec![create_area(
            "a",
            0.0,
            0.0,
            &[(SupplyCategory::Food, 100, 2), (SupplyCategory::Medical, 40, 5)],
            &[(SupplyCategory::Food, 50)],
        )];
        let point = Location::new(0.0, 0.0);

        let food = generator.point_score(&point, &areas, Some(SupplyCategory::Food));
        assert!((food.intensity - 0.4).abs() < 1e-9);
        assert!((food.satisfaction - 0.5).abs() < 1e-9);

        let shelter = generator.point_score(&point, &areas, Some(SupplyCategory::Shelter));
        assert_eq!(shelter.intensity, 0.0);
        assert_eq!(shelter.satisfaction, 1.0);
    }

    #[test]
    fn test_area_satisfaction_urgency_weighted() {
        let area = create_area(
            "a",
            0.0,
            0.0,
            &[(SupplyCategory::Food, 100, 1), (SupplyCategory::Water, 100, 3)],
            &[(SupplyCategory::Food, 100)],
        );

        // (1 * 1.0 + 3 * 0.0) / 4
        assert!((area_satisfaction(&area, None) - 0.25).abs() < 1e-9);
        assert_eq!(area_satisfaction(&area, Some(SupplyCategory::Food)), 1.0);
    }

    #[test]
    fn test_area_satisfaction_without_needs() {
        let area = create_area("a", 0.0, 0.0, &[], &[]);
        assert_eq!(area_satisfaction(&area, None), 1.0);
    }

    #[test]
    fn test_far_areas_prefiltered_but_marked() {
        let generator = HeatmapGenerator::default();
        let areas = vec![
            create_area("near", 0.02, 0.02, &[(SupplyCategory::Food, 10, 3)], &[]),
            create_area("far", 60.0, 60.0, &[(SupplyCategory::Food, 10, 5)], &[]),
        ];

        let data = generator.generate(&areas, Location::new(0.0, 0.0), Location::new(0.05, 0.05), None);

        assert!(!data.points.is_empty());
        assert!(data.points.iter().all(|p| p.intensity <= 0.6 + 1e-9));
        assert_eq!(data.markers.len(), 2);
        assert_eq!(data.radius, 50_000.0);
    }

    #[test]
    fn test_area_across_antimeridian_contributes() {
        let generator = HeatmapGenerator::default();
        let areas = vec![create_area("dateline", 0.0, -179.95, &[(SupplyCategory::Water, 40, 5)], &[])];
        let sw = Location::new(-0.05, 179.85);
        let ne = Location::new(0.05, 179.95);

        let corner = generator.point_score(&ne, &areas, None);
        assert!(corner.intensity > 0.5);

        let data = generator.generate(&areas, sw, ne, None);
        assert!(!data.points.is_empty());
        let peak = data.points.iter().map(|p| p.intensity).fold(0.0, f64::max);
        assert!(peak > 0.5, "peak intensity {}", peak);
    }

    #[test]
    fn test_markers() {
        let area = create_area(
            "m",
            3.0,
            4.0,
            &[(SupplyCategory::Food, 100, 2), (SupplyCategory::Shelter, 10, 4)],
            &[],
        );

        let result = markers(&[area]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "m");
        assert_eq!(result[0].urgency, 4);
        assert_eq!(result[0].position, MarkerPosition { lat: 3.0, lng: 4.0 });
        assert_eq!(result[0].needs.get(&SupplyCategory::Food), Some(&100));
        assert_eq!(result[0].current_inventory, BTreeMap::new());
    }
}
