//! Crop recommendation: filter, price join, profit ranking.

use serde::Serialize;

use crate::data::CropCatalog;
use crate::models::{ClimateZone, Recommendation, Season, WaterNeed};

// ---

/// Maximum number of crops returned by [`recommend`].
pub const RECOMMENDATION_LIMIT: usize = 3;

/// Growing conditions supplied by the farmer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Conditions {
    pub ph: f64,
    pub water: WaterNeed,
    pub zone: ClimateZone,
    pub season: Season,
}

/// Rank the crops suited to `conditions` by profit index, best first.
///
/// A crop qualifies when the pH falls inside its inclusive range and its
/// water, zone, and season categories match exactly. Qualifying crops without
/// a market price are dropped. At most [`RECOMMENDATION_LIMIT`] rows are
/// returned; equal scores keep table order. No match yields an empty list.
pub fn recommend(catalog: &CropCatalog, conditions: &Conditions) -> Vec<Recommendation> {
    // ---
    let mut ranked: Vec<Recommendation> = catalog
        .profiles
        .iter()
        .filter(|p| p.accepts_ph(conditions.ph))
        .filter(|p| p.water_need == conditions.water)
        .filter(|p| p.climate_zone == conditions.zone)
        .filter(|p| p.season == conditions.season)
        .filter_map(|p| {
            catalog.price_for(p).map(|price| Recommendation {
                profile: p.clone(),
                base_price: price.base_price,
                profit_index: p.base_yield * price.base_price,
            })
        })
        .collect();

    // Stable sort, so ties stay in table order
    ranked.sort_by(|a, b| b.profit_index.total_cmp(&a.profit_index));
    ranked.truncate(RECOMMENDATION_LIMIT);

    tracing::debug!(
        "Recommendation for {:?}: {} crops",
        conditions,
        ranked.len()
    );
    ranked
}

#[cfg(test)]
mod tests {
    // ---
    use std::path::Path;

    use super::*;

    const CROPS: &str = "\
crop,ph_min,ph_max,water_need,climate_zone,season,base_yield,carbon_footprint
Rice,5.5,7.0,Medium,Tropical,Rainy,40,High
Maize,5.8,7.5,Medium,Tropical,Rainy,30,Medium
Groundnut,6.0,7.0,Medium,Tropical,Rainy,12,Low
Banana,5.5,7.0,Medium,Tropical,Rainy,20,Medium
Turmeric,4.5,7.5,Medium,Tropical,Rainy,10,Low
Ragi,4.5,7.5,Medium,Tropical,Rainy,100,Low
Wheat,6.0,7.5,Medium,Temperate,Winter,35,Medium
Cotton,5.8,8.0,High,Tropical,Rainy,18,High
";

    // Ragi has no price and must never be recommended
    const PRICES: &str = "\
crop,base_price
Rice,20
Maize,18
Groundnut,50
Banana,40
Turmeric,60
Wheat,22
Cotton,60
";

    fn catalog() -> CropCatalog {
        CropCatalog::from_readers(
            CROPS.as_bytes(),
            Path::new("crops.csv"),
            PRICES.as_bytes(),
            Path::new("prices.csv"),
        )
        .unwrap()
    }

    fn tropical_rainy(ph: f64, water: WaterNeed) -> Conditions {
        Conditions {
            ph,
            water,
            zone: ClimateZone::Tropical,
            season: Season::Rainy,
        }
    }

    #[test]
    fn test_rice_scores_yield_times_price() {
        // ---
        let recs = recommend(&catalog(), &tropical_rainy(6.5, WaterNeed::Medium));
        let rice = recs.iter().find(|r| r.profile.crop == "Rice").unwrap();
        assert_eq!(rice.profit_index, 800.0);
    }

    #[test]
    fn test_top_three_sorted_descending() {
        // ---
        // Candidates: Rice 800, Maize 540, Groundnut 600, Banana 800, Turmeric 600
        let recs = recommend(&catalog(), &tropical_rainy(6.5, WaterNeed::Medium));
        let names: Vec<&str> = recs.iter().map(|r| r.profile.crop.as_str()).collect();
        assert_eq!(names, vec!["Rice", "Banana", "Groundnut"]);
        assert!(recs.windows(2).all(|w| w[0].profit_index >= w[1].profit_index));
    }

    #[test]
    fn test_every_result_satisfies_filter() {
        // ---
        let catalog = catalog();
        for ph in [4.5, 5.6, 6.0, 7.0, 7.5, 8.0] {
            for water in WaterNeed::ALL {
                let cond = tropical_rainy(ph, water);
                let recs = recommend(&catalog, &cond);
                assert!(recs.len() <= RECOMMENDATION_LIMIT);
                for r in &recs {
                    let p = &r.profile;
                    assert!(p.ph_min <= ph && ph <= p.ph_max);
                    assert_eq!(p.water_need, water);
                    assert_eq!(p.climate_zone, ClimateZone::Tropical);
                    assert_eq!(p.season, Season::Rainy);
                    assert_eq!(r.profit_index, p.base_yield * r.base_price);
                }
            }
        }
    }

    #[test]
    fn test_unpriced_crops_are_excluded() {
        // ---
        let recs = recommend(&catalog(), &tropical_rainy(4.6, WaterNeed::Medium));
        let names: Vec<&str> = recs.iter().map(|r| r.profile.crop.as_str()).collect();
        assert_eq!(names, vec!["Turmeric"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        // ---
        let recs = recommend(&catalog(), &tropical_rainy(9.0, WaterNeed::Medium));
        assert!(recs.is_empty());

        let dry = Conditions {
            zone: ClimateZone::Dry,
            ..tropical_rainy(6.5, WaterNeed::Low)
        };
        assert!(recommend(&catalog(), &dry).is_empty());
    }

    #[test]
    fn test_nan_ph_matches_nothing() {
        // ---
        assert!(recommend(&catalog(), &tropical_rainy(f64::NAN, WaterNeed::Medium)).is_empty());
    }

    #[test]
    fn test_season_must_match() {
        // ---
        let winter = Conditions {
            zone: ClimateZone::Temperate,
            season: Season::Winter,
            ..tropical_rainy(6.5, WaterNeed::Medium)
        };
        let recs = recommend(&catalog(), &winter);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].profile.crop, "Wheat");
        assert_eq!(recs[0].profit_index, 770.0);
    }
}
