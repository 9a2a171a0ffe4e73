//! End-to-end behavior of the aggregation pipeline over small rating sets.

use treon_core::{Rating, Session};
use treon_ratings::{
    aggregate, average_duration, pick_popular, pick_popular_in_order, pick_popular_shade,
    AggregationResult, BrandStats, RatingRollup,
};

fn sample_ratings() -> Vec<Rating> {
    vec![
        Rating::new("MAC", "Ruby Woo", 5),
        Rating::new("MAC", "Ruby Woo", 3),
        Rating::new("MAC", "Chili", 2),
        Rating::new("NARS", "Cruella", 4),
        Rating::new("NARS", "Dolce Vita", 5),
        Rating::new("Fenty Beauty", "Uncensored", 1),
        Rating::new("undefined", "Ghost", 4),
        Rating::new("NARS", "Cruella", 9),
    ]
}

fn assert_consistent(result: &AggregationResult) {
    let rollups = result
        .brands
        .values()
        .map(|s| &s.rollup)
        .chain(result.brand_shades.values().map(|s| &s.rollup));
    for rollup in rollups {
        assert_eq!(rollup.distribution_total(), rollup.count);
        if rollup.count > 0 {
            #[allow(clippy::cast_precision_loss)]
            let expected = rollup.total as f64 / rollup.count as f64;
            assert!((rollup.average - expected).abs() < 1e-9);
        }
    }
}

#[test]
fn permutations_produce_identical_rollups() {
    let ratings = sample_ratings();
    let baseline = aggregate(&ratings);

    let mut reversed = ratings.clone();
    reversed.reverse();
    assert_eq!(aggregate(&reversed), baseline);

    for shift in 1..ratings.len() {
        let mut rotated = ratings.clone();
        rotated.rotate_left(shift);
        let result = aggregate(&rotated);
        assert_eq!(result.brands, baseline.brands, "rotation {shift}");
        assert_eq!(result.brand_shades, baseline.brand_shades, "rotation {shift}");
    }
}

#[test]
fn every_rollup_satisfies_histogram_and_mean_invariants() {
    assert_consistent(&aggregate(&sample_ratings()));
}

#[test]
fn invalid_records_are_excluded_everywhere() {
    let ratings = vec![
        Rating::new("MAC", "Ruby Woo", 5),
        Rating::new("undefined", "X", 3),
        Rating::new("", "Ruby Woo", 4),
        Rating::new("MAC", "undefined", 4),
        Rating::new("MAC", "Ruby Woo", 0),
        Rating::new("MAC", "Ruby Woo", 6),
    ];
    let result = aggregate(&ratings);

    assert_eq!(result.brands.len(), 1);
    let mac = result.brand("MAC").expect("MAC rollup");
    assert_eq!(mac.rollup.count, 1);
    assert_eq!(mac.rollup.total, 5);
    assert_eq!(mac.rollup.average, 5.0);
    assert_eq!(result.brand_shades.len(), 1);
    assert_eq!(result.overall_count, 1);
    assert_eq!(result.rejected, 5);
}

#[test]
fn overall_average_weights_every_rating() {
    let mut ratings: Vec<Rating> = (0..10).map(|_| Rating::new("A", "Shade", 5)).collect();
    ratings.push(Rating::new("B", "Shade", 1));

    let result = aggregate(&ratings);
    assert_eq!(result.overall_count, 11);
    assert!((result.overall_average - 51.0 / 11.0).abs() < 1e-9);
    assert!((result.overall_average - 3.0).abs() > 1.0);
}

#[test]
fn popularity_tie_breaks() {
    let stats = |brand: &str, total: u64, count: u64| {
        #[allow(clippy::cast_precision_loss)]
        let average = total as f64 / count as f64;
        BrandStats {
            brand: brand.to_string(),
            rollup: RatingRollup {
                total,
                count,
                average,
                ..RatingRollup::default()
            },
        }
    };

    let tie = [stats("A", 12, 3), stats("B", 20, 5)];
    assert_eq!(pick_popular_in_order(&tie).brand.as_deref(), Some("B"));

    let dominated = [stats("A", 9, 2), stats("B", 400, 100)];
    let pick = pick_popular_in_order(&dominated);
    assert_eq!(pick.brand.as_deref(), Some("A"));
    assert_eq!(pick.average, 4.5);
}

#[test]
fn empty_input_yields_zero_defaults() {
    let result = aggregate(&Vec::<Rating>::new());
    assert!(result.brands.is_empty());
    assert!(result.brand_shades.is_empty());
    assert_eq!(result.overall_average, 0.0);
    assert_eq!(result.overall_count, 0);

    let pick = pick_popular(&result.brands);
    assert!(pick.brand.is_none());
    assert_eq!(pick.average, 0.0);
    assert_eq!(pick.count, 0);

    let shade_pick = pick_popular_shade(&result.brand_shades);
    assert!(shade_pick.shade_name.is_none());
}

#[test]
fn session_average_skips_zero_durations() {
    let session = |seconds: f64| Session {
        duration_seconds: Some(seconds),
        ..Session::default()
    };
    let sessions = [session(120.0), session(0.0), session(60.0)];
    assert_eq!(average_duration(&sessions), 90.0);
}

#[test]
fn dashboard_scenario() {
    let ratings = vec![
        Rating::new("MAC", "Ruby Woo", 5),
        Rating::new("MAC", "Ruby Woo", 3),
        Rating::new("NARS", "Cruella", 4),
    ];
    let result = aggregate(&ratings);

    let mac = &result.brands["MAC"].rollup;
    assert_eq!((mac.count, mac.total), (2, 8));
    assert_eq!(mac.average, 4.0);

    let nars = &result.brands["NARS"].rollup;
    assert_eq!((nars.count, nars.total), (1, 4));
    assert_eq!(nars.average, 4.0);

    let pick = pick_popular(&result.brands);
    assert_eq!(pick.brand.as_deref(), Some("MAC"));
    assert_eq!(pick.count, 2);

    let shade_pick = pick_popular_shade(&result.brand_shades);
    assert_eq!(shade_pick.brand.as_deref(), Some("MAC"));
    assert_eq!(shade_pick.shade_name.as_deref(), Some("Ruby Woo"));
}
