use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use treon_core::{MAX_SCORE, MIN_SCORE};

/// Sum, count, mean and per-score histogram for a set of ratings sharing a key.
///
/// Invariant: the distribution values sum to `count`, and `average` is
/// `total / count` (or `0.0` with no ratings, which is not a real rating).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingRollup {
    pub total: u64,
    pub count: u64,
    pub average: f64,
    /// Score (1..=5) to number of ratings with that score.
    pub distribution: BTreeMap<u8, u64>,
}

impl Default for RatingRollup {
    fn default() -> Self {
        Self {
            total: 0,
            count: 0,
            average: 0.0,
            distribution: (MIN_SCORE..=MAX_SCORE).map(|s| (s, 0)).collect(),
        }
    }
}

impl RatingRollup {
    /// Fold one already-validated score into the rollup.
    pub(crate) fn record(&mut self, score: u8) {
        self.total += u64::from(score);
        self.count += 1;
        *self.distribution.entry(score).or_insert(0) += 1;
        self.average = mean(self.total, self.count);
    }

    #[must_use]
    pub fn has_ratings(&self) -> bool {
        self.count > 0
    }

    /// Number of ratings recorded in the histogram.
    #[must_use]
    pub fn distribution_total(&self) -> u64 {
        self.distribution.values().sum()
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(total: u64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total as f64 / count as f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandStats {
    pub brand: String,
    #[serde(flatten)]
    pub rollup: RatingRollup,
}

/// Composite identity of a shade within a brand. Shade names, not catalog
/// ids, because ids get reassigned when the catalog is edited.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BrandShadeKey {
    pub brand: String,
    pub shade_name: String,
}

impl BrandShadeKey {
    pub fn new(brand: impl Into<String>, shade_name: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            shade_name: shade_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandShadeStats {
    pub brand: String,
    pub shade_name: String,
    #[serde(flatten)]
    pub rollup: RatingRollup,
}

/// Output of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationResult {
    pub brands: BTreeMap<String, BrandStats>,
    /// Serialized as a list; JSON object keys cannot be composite.
    #[serde(serialize_with = "serialize_values")]
    pub brand_shades: BTreeMap<BrandShadeKey, BrandShadeStats>,
    /// True mean over every valid rating, not a mean of brand means.
    pub overall_average: f64,
    pub overall_count: u64,
    /// Records skipped as invalid.
    pub rejected: u64,
}

impl AggregationResult {
    #[must_use]
    pub fn brand(&self, brand: &str) -> Option<&BrandStats> {
        self.brands.get(brand.trim())
    }

    #[must_use]
    pub fn shade(&self, brand: &str, shade_name: &str) -> Option<&BrandShadeStats> {
        self.brand_shades
            .get(&BrandShadeKey::new(brand.trim(), shade_name.trim()))
    }

    /// All shades rated for one brand, in shade-name order.
    pub fn shades_for<'a>(&'a self, brand: &'a str) -> impl Iterator<Item = &'a BrandShadeStats> {
        let brand = brand.trim();
        self.brand_shades
            .values()
            .filter(move |stats| stats.brand == brand)
    }
}

fn serialize_values<S, K, V>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_seq(map.values())
}

/// Winner of a brand-level popularity pass. `brand` is `None` when nothing
/// has been rated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PopularitySelection {
    pub brand: Option<String>,
    pub average: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShadePopularitySelection {
    pub brand: Option<String>,
    pub shade_name: Option<String>,
    pub average: f64,
    pub count: u64,
}
