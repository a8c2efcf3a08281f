use crate::models::{CrisisArea, Ngo, SupplyCategory};
use std::collections::BTreeMap;

/// Multiplier applied when an NGO specializes in the needed category.
/// Tunable policy, kept at 1.2 for compatibility with existing rankings.
pub const SPECIALIZATION_BONUS: f64 = 1.2;

/// Highest urgency rating a category can carry
pub const MAX_URGENCY: f64 = 5.0;

/// Score how well an NGO's stock covers each need of a crisis area
///
/// Every category present in `area.current_needs` gets an entry:
/// score = fulfillment * urgency * specialization_bonus
///
/// The bonus can push a score above 1.0; it is a ranking bias, not a probability.
pub fn score_supplies(ngo: &Ngo, area: &CrisisArea) -> BTreeMap<SupplyCategory, f64> {
    area.current_needs
        .iter()
        .map(|(&category, &needed)| (category, category_score(ngo, area, category, needed)))
        .collect()
}

#[inline]
fn category_score(ngo: &Ngo, area: &CrisisArea, category: SupplyCategory, needed: u32) -> f64 {
    if needed == 0 {
        return 0.0;
    }

    let available = ngo.available_quantity(category) as f64;
    let fulfillment = (available / f64::from(needed)).min(1.0);
    let urgency = f64::from(area.urgency(category)) / MAX_URGENCY;
    let bonus = if ngo.specializations.contains(&category) {
        SPECIALIZATION_BONUS
    } else {
        1.0
    };

    fulfillment * urgency * bonus
}
