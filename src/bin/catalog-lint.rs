//! Integrity check over the on-disk catalog: duplicate ids and slugs,
//! season/episode ordering, and seasons left without episodes. Exits
//! non-zero when anything is off so it can gate deploys.

use std::collections::HashSet;

use anyhow::Result;
use dotenvy::dotenv;
use tracing::{error, info, warn};

use streavmin_store::config::settings::AppConfig;
use streavmin_store::modules::catalog::repository::CatalogRepository;
use streavmin_store::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    match run().await {
        Ok(0) => info!("Catalog looks good."),
        Ok(problems) => {
            error!("catalog lint found {problems} problem(s)");
            std::process::exit(1);
        }
        Err(err) => {
            error!("catalog lint failed: {err:#}");
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<usize> {
    let state = AppState::from_config(AppConfig::from_env());

    let categories = CatalogRepository::list_categories(&state).await?;
    let movies = CatalogRepository::list_movies(&state).await?;
    let series = CatalogRepository::list_series(&state).await?;

    let mut problems = 0;
    problems += report_duplicates("movie id", movies.iter().map(|m| m.id.as_str()));
    problems += report_duplicates("category id", categories.iter().map(|c| c.id.as_str()));
    problems += report_duplicates("category slug", categories.iter().map(|c| c.slug.as_str()));

    for entry in &series {
        if entry.slug.is_empty() {
            warn!(series = %entry.series_name, "series has an empty slug");
            problems += 1;
        }
        problems += report_unsorted(&entry.slug, "season", entry.seasons.iter().map(|s| s.season));
        for season in &entry.seasons {
            if season.episodes.is_empty() {
                warn!(series = %entry.slug, season = season.season, "season has no episodes");
                problems += 1;
            }
            problems += report_unsorted(
                &entry.slug,
                "episode",
                season.episodes.iter().map(|e| e.ep),
            );
        }
    }

    info!(
        categories = categories.len(),
        movies = movies.len(),
        series = series.len(),
        "catalog scanned"
    );
    Ok(problems)
}

fn report_duplicates<'a>(what: &str, values: impl Iterator<Item = &'a str>) -> usize {
    let mut seen = HashSet::new();
    let mut problems = 0;
    for value in values {
        if !seen.insert(value) {
            warn!("duplicate {what}: {value}");
            problems += 1;
        }
    }
    problems
}

fn report_unsorted(slug: &str, what: &str, numbers: impl Iterator<Item = u32>) -> usize {
    let mut problems = 0;
    let mut prev: Option<u32> = None;
    for number in numbers {
        if let Some(prev) = prev {
            if number <= prev {
                warn!(series = %slug, "{what} numbers out of order: {number} after {prev}");
                problems += 1;
            }
        }
        prev = Some(number);
    }
    problems
}
