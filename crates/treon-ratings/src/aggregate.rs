//! Brand and brand/shade rollups over a rating collection.

use treon_core::{is_placeholder_label, Rating};

use crate::types::{
    mean, AggregationResult, BrandShadeKey, BrandShadeStats, BrandStats, RatingRollup,
};

/// Why a rating record was left out of the aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Brand is empty or the `"undefined"` placeholder.
    MissingBrand,
    /// Shade name is empty or the `"undefined"` placeholder.
    MissingShadeName,
    /// Score is missing, non-numeric, or outside 1..=5.
    InvalidScore,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::MissingBrand => write!(f, "missing brand"),
            RejectReason::MissingShadeName => write!(f, "missing shade name"),
            RejectReason::InvalidScore => write!(f, "score must be an integer from 1 to 5"),
        }
    }
}

/// A rating that passed validation, borrowing trimmed labels from the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidRating<'a> {
    pub brand: &'a str,
    pub shade_name: &'a str,
    pub score: u8,
}

/// The single validation step every rating goes through before it may touch
/// a sum.
///
/// # Errors
///
/// Returns the first [`RejectReason`] that applies, checking brand, then
/// shade name, then score.
pub fn validate_rating(rating: &Rating) -> Result<ValidRating<'_>, RejectReason> {
    if is_placeholder_label(&rating.brand) {
        return Err(RejectReason::MissingBrand);
    }
    if is_placeholder_label(&rating.shade_name) {
        return Err(RejectReason::MissingShadeName);
    }
    let score = rating
        .score
        .as_ref()
        .and_then(treon_core::RawScore::coerce)
        .ok_or(RejectReason::InvalidScore)?;

    Ok(ValidRating {
        brand: rating.brand.trim(),
        shade_name: rating.shade_name.trim(),
        score,
    })
}

/// Build brand and brand/shade rollups from scratch.
///
/// Invalid records are skipped and counted in `rejected`; they never reach a
/// sum. The overall average is computed once at the end from the brand
/// totals, so it weights every rating equally regardless of brand size.
/// Input order does not affect the result.
pub fn aggregate<'a, I>(ratings: I) -> AggregationResult
where
    I: IntoIterator<Item = &'a Rating>,
{
    let mut result = AggregationResult::default();

    for rating in ratings {
        let valid = match validate_rating(rating) {
            Ok(valid) => valid,
            Err(reason) => {
                tracing::debug!(
                    brand = %rating.brand,
                    shade = %rating.shade_name,
                    reason = %reason,
                    "skipping rating"
                );
                result.rejected += 1;
                continue;
            }
        };

        result
            .brands
            .entry(valid.brand.to_string())
            .or_insert_with(|| BrandStats {
                brand: valid.brand.to_string(),
                rollup: RatingRollup::default(),
            })
            .rollup
            .record(valid.score);

        result
            .brand_shades
            .entry(BrandShadeKey::new(valid.brand, valid.shade_name))
            .or_insert_with(|| BrandShadeStats {
                brand: valid.brand.to_string(),
                shade_name: valid.shade_name.to_string(),
                rollup: RatingRollup::default(),
            })
            .rollup
            .record(valid.score);
    }

    let (total, count) = result
        .brands
        .values()
        .fold((0_u64, 0_u64), |(total, count), stats| {
            (total + stats.rollup.total, count + stats.rollup.count)
        });
    result.overall_average = mean(total, count);
    result.overall_count = count;

    tracing::debug!(
        valid = count,
        rejected = result.rejected,
        brands = result.brands.len(),
        shades = result.brand_shades.len(),
        "aggregated ratings"
    );

    result
}
