//! "Most popular" selection over rolled-up ratings.
//!
//! Ranking rule: highest average wins; on an exactly equal average the
//! candidate with more ratings wins; if both are equal the first candidate
//! seen keeps the spot. Candidates with no ratings are never selected.

use std::collections::BTreeMap;

use crate::types::{
    BrandShadeKey, BrandShadeStats, BrandStats, PopularitySelection, RatingRollup,
    ShadePopularitySelection,
};

/// Pick the winning candidate from `(key, rollup)` pairs in the order given.
///
/// Returns `None` when no candidate has at least one rating.
#[allow(clippy::float_cmp)]
pub fn resolve_popular<'a, K, I>(candidates: I) -> Option<(K, &'a RatingRollup)>
where
    I: IntoIterator<Item = (K, &'a RatingRollup)>,
{
    let mut best: Option<(K, &'a RatingRollup)> = None;
    let mut best_average = 0.0_f64;
    let mut best_count = 0_u64;

    for (key, rollup) in candidates {
        if rollup.count == 0 {
            continue;
        }

        let replace = if rollup.average > best_average {
            true
        } else if rollup.average == best_average {
            rollup.count > best_count
        } else {
            false
        };

        if replace {
            best_average = rollup.average;
            best_count = rollup.count;
            best = Some((key, rollup));
        }
    }

    best
}

/// Most popular brand, visiting brands in the caller's order.
pub fn pick_popular_in_order<'a, I>(brands: I) -> PopularitySelection
where
    I: IntoIterator<Item = &'a BrandStats>,
{
    let winner = resolve_popular(
        brands
            .into_iter()
            .map(|stats| (stats.brand.as_str(), &stats.rollup)),
    );

    match winner {
        Some((brand, rollup)) => {
            tracing::debug!(brand, average = rollup.average, count = rollup.count, "popular brand");
            PopularitySelection {
                brand: Some(brand.to_string()),
                average: rollup.average,
                count: rollup.count,
            }
        }
        None => PopularitySelection::default(),
    }
}

/// Most popular brand. Brands are visited in ascending name order, so ties
/// on both average and count go to the alphabetically first brand.
#[must_use]
pub fn pick_popular(brands: &BTreeMap<String, BrandStats>) -> PopularitySelection {
    pick_popular_in_order(brands.values())
}

/// Most popular brand/shade pair, ranked exactly like brands.
#[must_use]
pub fn pick_popular_shade(
    shades: &BTreeMap<BrandShadeKey, BrandShadeStats>,
) -> ShadePopularitySelection {
    let winner = resolve_popular(shades.values().map(|stats| (stats, &stats.rollup)));

    match winner {
        Some((stats, rollup)) => ShadePopularitySelection {
            brand: Some(stats.brand.clone()),
            shade_name: Some(stats.shade_name.clone()),
            average: rollup.average,
            count: rollup.count,
        },
        None => ShadePopularitySelection::default(),
    }
}
