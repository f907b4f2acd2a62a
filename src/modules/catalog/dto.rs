use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::model::{Category, Episode, Movie, Subtitle, absolute_url, optional_url};
use crate::common::slug::slugify;

// --- MOVIE PAYLOAD ---

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MoviePayload {
    #[validate(length(min = 1, message = "id must not be empty"))]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub synopsis: String,
    #[validate(range(min = 1900, max = 2100, message = "year must be between 1900 and 2100"))]
    pub year: i32,
    #[validate(range(min = 1, message = "duration must be a positive integer"))]
    pub duration: u32,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(custom(function = optional_url))]
    pub poster: Option<String>,
    #[validate(custom(function = optional_url))]
    pub hero_image: Option<String>,
    #[validate(custom(function = optional_url))]
    pub trailer_url: Option<String>,
    #[validate(custom(function = absolute_url))]
    pub stream_url: String,
    #[serde(default)]
    #[validate(nested)]
    pub subtitles: Vec<Subtitle>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
}

impl MoviePayload {
    pub(crate) fn into_movie(self) -> Movie {
        Movie {
            id: self.id.unwrap_or_else(generate_id),
            title: self.title,
            synopsis: self.synopsis,
            year: self.year,
            duration: self.duration,
            genres: self.genres,
            tags: self.tags,
            poster: self.poster,
            hero_image: self.hero_image,
            trailer_url: self.trailer_url,
            stream_url: self.stream_url,
            subtitles: self.subtitles,
            published: self.published,
            featured: self.featured,
        }
    }
}

// --- CATEGORY PAYLOAD ---

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryPayload {
    #[validate(length(min = 1, message = "id must not be empty"))]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub order: u32,
}

impl CategoryPayload {
    pub(crate) fn into_category(self) -> Category {
        let slug = self
            .slug
            .filter(|slug| !slug.is_empty())
            .unwrap_or_else(|| slugify(&self.name));
        Category {
            id: self.id.unwrap_or_else(generate_id),
            name: self.name,
            slug,
            order: self.order,
        }
    }
}

// --- EPISODE PAYLOAD ---

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EpisodePayload {
    #[validate(length(min = 1, message = "series name is required"))]
    pub series_name: String,
    #[validate(range(min = 1, message = "season must be 1 or greater"))]
    pub season: u32,
    #[validate(range(min = 1, message = "episode number must be 1 or greater"))]
    pub ep: u32,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub synopsis: Option<String>,
    #[validate(custom(function = optional_url))]
    pub poster: Option<String>,
    #[validate(custom(function = absolute_url))]
    pub stream_url: String,
    #[serde(default)]
    #[validate(nested)]
    pub subtitles: Vec<Subtitle>,
    #[serde(default)]
    pub published: bool,
    #[validate(range(min = 1, message = "duration must be a positive integer"))]
    pub duration: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl EpisodePayload {
    /// Overwrite the submitted fields on a stored episode. Optional fields
    /// that were not submitted keep whatever the episode already had.
    pub(crate) fn apply_to(&self, episode: &mut Episode) {
        episode.title = self.title.clone();
        episode.stream_url = self.stream_url.clone();
        if let Some(synopsis) = &self.synopsis {
            episode.synopsis = synopsis.clone();
        }
        if let Some(poster) = &self.poster {
            episode.poster = Some(poster.clone());
        }
        if let Some(duration) = self.duration {
            episode.duration = Some(duration);
        }
        episode.subtitles = self.subtitles.clone();
        episode.published = self.published;
        episode.tags = self.tags.clone();
    }
}

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
