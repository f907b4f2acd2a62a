use futures_util::future::join_all;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use super::dto::{CategoryPayload, EpisodePayload, MoviePayload};
use super::model::{Category, Episode, Movie, Season, Series};
use crate::common::slug::slugify;
use crate::error::{Result, StoreError};
use crate::state::AppState;

const MOVIES_FILE: &str = "catalog/movies.json";
const CATEGORIES_FILE: &str = "catalog/categories.json";
const SERIES_DIR: &str = "catalog/series";

pub struct CatalogRepository;

impl CatalogRepository {
    // --- MOVIES ---

    pub async fn list_movies(state: &AppState) -> Result<Vec<Movie>> {
        state.store.read(MOVIES_FILE, Vec::new()).await
    }

    pub async fn upsert_movie(state: &AppState, actor: &str, payload: MoviePayload) -> Result<Movie> {
        payload
            .validate()
            .map_err(|errors| StoreError::validation(&errors))?;
        let movie = payload.into_movie();

        let stored = movie.clone();
        let mut created = false;
        state
            .store
            .update(MOVIES_FILE, Some(Vec::new()), |current: Option<Vec<Movie>>| {
                let mut movies = current.unwrap_or_default();
                match movies.iter().position(|m| m.id == stored.id) {
                    Some(idx) => movies[idx] = stored,
                    None => {
                        created = true;
                        movies.push(stored);
                    }
                }
                Ok(movies)
            })
            .await?;

        let action = if created { "created" } else { "updated" };
        state
            .audit
            .append(actor, &format!("{action} movie {}", movie.title))
            .await?;
        Ok(movie)
    }

    pub async fn delete_movie(state: &AppState, actor: &str, id: &str) -> Result<Movie> {
        let mut removed = None;
        state
            .store
            .update(MOVIES_FILE, Some(Vec::new()), |current: Option<Vec<Movie>>| {
                let mut movies = current.unwrap_or_default();
                let idx = movies
                    .iter()
                    .position(|m| m.id == id)
                    .ok_or(StoreError::NotFound("movie"))?;
                removed = Some(movies.remove(idx));
                Ok(movies)
            })
            .await?;

        let removed = removed.ok_or(StoreError::NotFound("movie"))?;
        state
            .audit
            .append(actor, &format!("deleted movie {}", removed.title))
            .await?;
        Ok(removed)
    }

    // --- CATEGORIES ---

    pub async fn list_categories(state: &AppState) -> Result<Vec<Category>> {
        state.store.read(CATEGORIES_FILE, Vec::new()).await
    }

    pub async fn upsert_category(
        state: &AppState,
        actor: &str,
        payload: CategoryPayload,
    ) -> Result<Category> {
        payload
            .validate()
            .map_err(|errors| StoreError::validation(&errors))?;
        let category = payload.into_category();

        let stored = category.clone();
        let mut created = false;
        state
            .store
            .update(
                CATEGORIES_FILE,
                Some(Vec::new()),
                |current: Option<Vec<Category>>| {
                    let mut categories = current.unwrap_or_default();
                    // An id match wins; the slug match is the documented fallback.
                    let idx = categories
                        .iter()
                        .position(|c| c.id == stored.id)
                        .or_else(|| categories.iter().position(|c| c.slug == stored.slug));
                    match idx {
                        Some(idx) => categories[idx] = stored,
                        None => {
                            created = true;
                            categories.push(stored);
                        }
                    }
                    // Stable sort: equal orders keep their insertion order.
                    categories.sort_by_key(|c| c.order);
                    Ok(categories)
                },
            )
            .await?;

        let action = if created { "created" } else { "updated" };
        state
            .audit
            .append(actor, &format!("{action} category {}", category.name))
            .await?;
        Ok(category)
    }

    pub async fn delete_category(state: &AppState, actor: &str, id: &str) -> Result<Category> {
        let mut removed = None;
        state
            .store
            .update(
                CATEGORIES_FILE,
                Some(Vec::new()),
                |current: Option<Vec<Category>>| {
                    let mut categories = current.unwrap_or_default();
                    let idx = categories
                        .iter()
                        .position(|c| c.id == id)
                        .ok_or(StoreError::NotFound("category"))?;
                    removed = Some(categories.remove(idx));
                    Ok(categories)
                },
            )
            .await?;

        let removed = removed.ok_or(StoreError::NotFound("category"))?;
        state
            .audit
            .append(actor, &format!("deleted category {}", removed.name))
            .await?;
        Ok(removed)
    }

    // --- SERIES ---

    /// Scan the series directory, one document per `.json` file. A malformed
    /// file is skipped with a warning; the rest of the listing still loads.
    pub async fn list_series(state: &AppState) -> Result<Vec<Series>> {
        let dir = state.store.root().join(SERIES_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.ends_with(".json") {
                names.push(format!("{SERIES_DIR}/{name}"));
            }
        }
        names.sort();

        let reads = names.iter().map(|rel| state.store.read_opt::<Series>(rel));
        let mut series = Vec::new();
        for result in join_all(reads).await {
            match result {
                Ok(Some(doc)) => series.push(doc),
                Ok(None) => {}
                Err(StoreError::CorruptDocument { path, source }) => {
                    warn!(path = %path.display(), error = %source, "skipping malformed series file");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(series)
    }

    /// Single guarded cycle on the series document: create the series when
    /// absent, find-or-create the season and episode, merge the submitted
    /// fields, and keep both levels sorted ascending.
    pub async fn upsert_episode(
        state: &AppState,
        actor: &str,
        payload: EpisodePayload,
    ) -> Result<Series> {
        payload
            .validate()
            .map_err(|errors| StoreError::validation(&errors))?;
        let slug = slugify(&payload.series_name);
        if slug.is_empty() {
            return Err(StoreError::Validation(vec![
                "seriesName: must contain at least one alphanumeric character".to_string(),
            ]));
        }

        let relative = format!("{SERIES_DIR}/{slug}.json");
        let updated = state
            .store
            .update(&relative, None, |current: Option<Series>| {
                let mut series = current.unwrap_or_else(|| Series {
                    id: Uuid::new_v4().to_string(),
                    series_name: payload.series_name.clone(),
                    slug,
                    synopsis: payload.synopsis.clone().unwrap_or_default(),
                    seasons: Vec::new(),
                });
                series.series_name = payload.series_name.clone();
                if let Some(synopsis) = payload.synopsis.as_deref().filter(|s| !s.is_empty()) {
                    series.synopsis = synopsis.to_string();
                }

                let season_idx = match series.seasons.iter().position(|s| s.season == payload.season)
                {
                    Some(idx) => idx,
                    None => {
                        series.seasons.push(Season {
                            season: payload.season,
                            episodes: Vec::new(),
                        });
                        series.seasons.len() - 1
                    }
                };
                let season = &mut series.seasons[season_idx];
                let episode_idx = match season.episodes.iter().position(|e| e.ep == payload.ep) {
                    Some(idx) => idx,
                    None => {
                        season.episodes.push(Episode {
                            ep: payload.ep,
                            ..Episode::default()
                        });
                        season.episodes.len() - 1
                    }
                };
                payload.apply_to(&mut season.episodes[episode_idx]);

                season.episodes.sort_by_key(|e| e.ep);
                series.seasons.sort_by_key(|s| s.season);
                Ok(series)
            })
            .await?;

        state
            .audit
            .append(
                actor,
                &format!(
                    "upserted episode {} S{}E{}",
                    payload.series_name, payload.season, payload.ep
                ),
            )
            .await?;
        Ok(updated)
    }

    pub async fn delete_episode(
        state: &AppState,
        actor: &str,
        series_slug: &str,
        season: u32,
        ep: u32,
    ) -> Result<Series> {
        let relative = format!("{SERIES_DIR}/{series_slug}.json");
        let updated = state
            .store
            .update(&relative, None, |current: Option<Series>| {
                let mut series = current.ok_or(StoreError::NotFound("series"))?;
                let season_idx = series
                    .seasons
                    .iter()
                    .position(|s| s.season == season)
                    .ok_or(StoreError::NotFound("season"))?;
                let episodes = &mut series.seasons[season_idx].episodes;
                let episode_idx = episodes
                    .iter()
                    .position(|e| e.ep == ep)
                    .ok_or(StoreError::NotFound("episode"))?;
                episodes.remove(episode_idx);
                if episodes.is_empty() {
                    series.seasons.remove(season_idx);
                }
                Ok(series)
            })
            .await?;

        state
            .audit
            .append(
                actor,
                &format!("deleted episode {series_slug} S{season}E{ep}"),
            )
            .await?;
        Ok(updated)
    }
}
