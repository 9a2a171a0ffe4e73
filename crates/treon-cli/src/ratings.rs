//! `ratings` command handlers.

use clap::Subcommand;
use treon_core::{RawScore, ShadeId};
use treon_ratings::{
    aggregate, format_popular, format_popular_shade, format_rating, pick_popular,
    pick_popular_shade, AggregationResult, RatingRollup,
};
use treon_store::{FileStore, NewRating};

/// Sub-commands available under `ratings`.
#[derive(Debug, Subcommand)]
pub enum RatingsCommands {
    /// Per-brand averages, counts, and the overall average
    Summary {
        /// Also list the shades of one brand
        #[arg(long)]
        brand: Option<String>,

        /// Print the full aggregation as JSON
        #[arg(long)]
        json: bool,
    },
    /// The most popular brand
    Popular {
        /// Also show the most popular brand/shade pair
        #[arg(long)]
        shades: bool,
    },
    /// Rating distribution for one shade
    Shade {
        #[arg(long)]
        brand: String,

        #[arg(long)]
        shade: String,
    },
    /// Append a rating to the ratings file
    Add {
        #[arg(long)]
        brand: String,

        #[arg(long)]
        shade: String,

        /// Score from 1 to 5
        #[arg(long)]
        score: String,

        /// Catalog id of the shade
        #[arg(long)]
        shade_id: Option<String>,

        #[arg(long)]
        user: Option<String>,
    },
    /// Delete every stored rating
    Clear {
        /// Confirm the deletion; without it nothing is removed
        #[arg(long)]
        yes: bool,
    },
}

/// # Errors
///
/// Returns an error if the ratings file cannot be read or written, or if
/// the requested brand or shade has no ratings.
pub(crate) fn run(store: &FileStore, command: RatingsCommands) -> anyhow::Result<()> {
    match command {
        RatingsCommands::Summary { brand, json } => {
            let result = aggregate(&store.ratings()?);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }
            print_summary(&result, brand.as_deref())
        }
        RatingsCommands::Popular { shades } => {
            let result = aggregate(&store.ratings()?);
            println!("Most popular brand: {}", format_popular(&pick_popular(&result.brands)));
            if shades {
                let shade = pick_popular_shade(&result.brand_shades);
                println!("Most popular shade: {}", format_popular_shade(&shade));
            }
            Ok(())
        }
        RatingsCommands::Shade { brand, shade } => {
            let result = aggregate(&store.ratings()?);
            let stats = result
                .shade(&brand, &shade)
                .ok_or_else(|| anyhow::anyhow!("no ratings for '{shade}' by '{brand}'"))?;
            println!("{} - {}: {}", stats.brand, stats.shade_name, format_rating(&stats.rollup));
            print_distribution(&stats.rollup);
            Ok(())
        }
        RatingsCommands::Add {
            brand,
            shade,
            score,
            shade_id,
            user,
        } => {
            let new = NewRating {
                brand,
                shade_id: shade_id.as_deref().map(parse_shade_id),
                shade_name: Some(shade),
                score: RawScore::Text(score),
                user_id: user,
            };
            let stored = store.submit_rating(new)?;
            println!(
                "recorded {} for {} - {} in {}",
                stored.score.as_ref().and_then(RawScore::coerce).unwrap_or_default(),
                stored.brand,
                stored.shade_name,
                store.ratings_path().display()
            );
            Ok(())
        }
        RatingsCommands::Clear { yes } => {
            if !yes {
                println!(
                    "refusing to clear {} without --yes",
                    store.ratings_path().display()
                );
                return Ok(());
            }
            let removed = store.clear_ratings()?;
            println!(
                "removed {removed} ratings from {}",
                store.ratings_path().display()
            );
            Ok(())
        }
    }
}

fn parse_shade_id(raw: &str) -> ShadeId {
    raw.trim()
        .parse::<i64>()
        .map_or_else(|_| ShadeId::Text(raw.trim().to_string()), ShadeId::Numeric)
}

fn print_summary(result: &AggregationResult, brand: Option<&str>) -> anyhow::Result<()> {
    if result.overall_count == 0 {
        println!("no valid ratings found");
        return Ok(());
    }

    println!(
        "Overall: {:.1} ⭐ across {} ratings ({} skipped)",
        result.overall_average, result.overall_count, result.rejected
    );
    println!();
    println!("{:<25}{:<10}COUNT", "BRAND", "AVERAGE");
    for stats in result.brands.values() {
        println!(
            "{:<25}{:<10.2}{}",
            stats.brand, stats.rollup.average, stats.rollup.count
        );
    }

    if let Some(brand) = brand {
        let stats = result
            .brand(brand)
            .ok_or_else(|| anyhow::anyhow!("brand '{brand}' has no ratings"))?;
        println!();
        println!("{}: {}", stats.brand, format_rating(&stats.rollup));
        println!("{:<25}{:<10}COUNT", "SHADE", "AVERAGE");
        for shade in result.shades_for(brand) {
            println!(
                "{:<25}{:<10.2}{}",
                shade.shade_name, shade.rollup.average, shade.rollup.count
            );
        }
    }

    Ok(())
}

fn print_distribution(rollup: &RatingRollup) {
    for (score, count) in rollup.distribution.iter().rev() {
        println!("{score} ⭐  {count}");
    }
}
