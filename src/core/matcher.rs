use crate::core::{
    distance::{DistanceCache, EntityKey},
    scoring::score_supplies,
};
use crate::models::{CrisisArea, Donation, DonationStatus, MatchingWeights, Ngo, Supply, SupplyCategory};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Highest reachability ordinal (extreme)
const MAX_REACHABILITY_ORDINAL: f64 = 4.0;

/// Proposed transfer from one NGO to one crisis area, not yet committed
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    pub ngo: &'a Ngo,
    pub crisis_area: &'a CrisisArea,
    pub supplies: Vec<Supply>,
}

/// Best candidate seen so far for one crisis area
struct Candidate {
    slot: usize,
    score: f64,
    supply_scores: BTreeMap<SupplyCategory, f64>,
}

/// Greedy NGO to crisis area assignment
///
/// # Pipeline Stages
/// 1. Drop busy NGOs
/// 2. Rank crisis areas by maximum urgency
/// 3. Per area: reach cutoff, supply scoring, overall score
/// 4. Assign the best NGO and withdraw it from the pool
///
/// Holds a distance cache for its lifetime, so runs need `&mut self`.
#[derive(Debug, Clone, Default)]
pub struct MatchingEngine {
    weights: MatchingWeights,
    distances: DistanceCache,
}

impl MatchingEngine {
    pub fn new(weights: MatchingWeights) -> Self {
        Self {
            weights,
            distances: DistanceCache::new(),
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(MatchingWeights::default())
    }

    /// Number of NGO/area distances memoized so far
    pub fn cached_distances(&self) -> usize {
        self.distances.len()
    }

    pub fn clear_cache(&mut self) {
        self.distances.clear();
    }

    /// Great-circle distance between an NGO and a crisis area, memoized per pair
    pub fn distance(&mut self, ngo: &Ngo, area: &CrisisArea) -> f64 {
        self.distances.distance(
            (EntityKey::ngo(ngo), &ngo.location),
            (EntityKey::crisis_area(area), &area.location),
        )
    }

    /// Find one NGO per crisis area, most urgent areas first
    ///
    /// Each NGO serves at most one area per call. Areas with no eligible NGO
    /// are skipped and produce no entry.
    ///
    /// # Returns
    /// Matches in area-processing order
    pub fn find_optimal_matches<'a>(
        &mut self,
        ngos: &'a [Ngo],
        crisis_areas: &'a [CrisisArea],
    ) -> Vec<MatchResult<'a>> {
        let mut pool: Vec<Option<&'a Ngo>> = ngos
            .iter()
            .filter(|ngo| !ngo.is_busy)
            .map(Some)
            .collect();

        // Stable sort keeps input order between equally urgent areas
        let mut areas: Vec<&'a CrisisArea> = crisis_areas.iter().collect();
        areas.sort_by_key(|area| Reverse(area.max_urgency()));

        let mut matches = Vec::new();

        for area in areas {
            let Some(best) = self.best_candidate(&pool, area) else {
                tracing::debug!("No eligible NGO for crisis area {}", area.id);
                continue;
            };

            let Some(ngo) = pool[best.slot] else {
                continue;
            };

            let supplies = supplies_to_send(ngo, area, &best.supply_scores);
            if supplies.is_empty() {
                tracing::debug!("NGO {} has nothing to send to crisis area {}", ngo.id, area.id);
                continue;
            }

            tracing::debug!(
                "Matched NGO {} to crisis area {} (score {:.3}, {} supplies)",
                ngo.id,
                area.id,
                best.score,
                supplies.len()
            );

            pool[best.slot] = None;
            matches.push(MatchResult {
                ngo,
                crisis_area: area,
                supplies,
            });
        }

        tracing::info!(
            "Matching run produced {} matches for {} crisis areas ({} NGOs available)",
            matches.len(),
            crisis_areas.len(),
            ngos.iter().filter(|ngo| !ngo.is_busy).count()
        );

        matches
    }

    /// Highest scoring NGO still in the pool; first wins on ties
    fn best_candidate(&mut self, pool: &[Option<&Ngo>], area: &CrisisArea) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for (slot, ngo) in pool.iter().enumerate() {
            let Some(ngo) = ngo else { continue };

            let distance = self.distance(ngo, area);
            if distance > ngo.reach_radius_km {
                continue;
            }

            let supply_scores = score_supplies(ngo, area);
            let score = self.overall_score(ngo, area, distance, &supply_scores);
            if score.is_nan() || score <= 0.0 {
                continue;
            }

            if best.as_ref().map_or(true, |current| score > current.score) {
                best = Some(Candidate {
                    slot,
                    score,
                    supply_scores,
                });
            }
        }

        best
    }

    /// Weighted combination of supply fit, proximity and accessibility,
    /// scaled by the NGO's credibility
    pub fn overall_score(
        &self,
        ngo: &Ngo,
        area: &CrisisArea,
        distance_km: f64,
        supply_scores: &BTreeMap<SupplyCategory, f64>,
    ) -> f64 {
        let supply_total: f64 = supply_scores.values().sum();
        let distance_factor = 1.0 - distance_km / ngo.reach_radius_km;
        let reachability_factor =
            1.0 - f64::from(area.reachability.ordinal()) / MAX_REACHABILITY_ORDINAL;

        (supply_total * self.weights.urgency
            + distance_factor * self.weights.distance
            + reachability_factor * self.weights.reachability)
            * ngo.credibility_score
    }
}

/// Quantities the winning NGO sends, capped by both need and stock
fn supplies_to_send(
    ngo: &Ngo,
    area: &CrisisArea,
    supply_scores: &BTreeMap<SupplyCategory, f64>,
) -> Vec<Supply> {
    supply_scores
        .iter()
        .filter(|&(_, &score)| score > 0.0)
        .filter_map(|(&category, _)| {
            let needed = u64::from(area.need(category));
            let quantity = needed.min(ngo.available_quantity(category));
            // quantity <= needed, which came from a u32
            let quantity = u32::try_from(quantity).ok()?;

            (quantity > 0).then(|| Supply {
                category,
                quantity,
                unit: ngo.unit_for(category).to_string(),
                expiry_date: None,
            })
        })
        .collect()
}

/// Build one pending donation record per match
pub fn synthesize_donations(matches: &[MatchResult<'_>]) -> Vec<Donation> {
    matches
        .iter()
        .map(|m| Donation {
            id: uuid::Uuid::new_v4().to_string(),
            ngo_id: m.ngo.id.clone(),
            crisis_area_id: m.crisis_area.id.clone(),
            supplies: m.supplies.clone(),
            timestamp: chrono::Utc::now(),
            status: DonationStatus::Pending,
        })
        .collect()
}
