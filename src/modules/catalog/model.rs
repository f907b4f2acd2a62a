use serde::{Deserialize, Serialize};
use url::Url;
use validator::{Validate, ValidationError};

// Field names below are the persisted contract; the JSON documents on disk
// use camelCase keys.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Subtitle {
    #[validate(length(min = 1, message = "subtitle language is required"))]
    pub lang: String,
    #[serde(default)]
    pub label: String,
    #[validate(custom(function = absolute_url))]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub synopsis: String,
    pub year: i32,
    pub duration: u32,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer_url: Option<String>,
    pub stream_url: String,
    #[serde(default)]
    pub subtitles: Vec<Subtitle>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
}

/// One document per series, keyed on disk by `slug`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: String,
    pub series_name: String,
    pub slug: String,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub season: u32,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub ep: u32,
    pub title: String,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub stream_url: String,
    #[serde(default)]
    pub subtitles: Vec<Subtitle>,
    #[serde(default)]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Absolute http(s) URL check shared by every URL-bearing field.
pub(crate) fn absolute_url(value: &str) -> Result<(), ValidationError> {
    if Url::parse(value).is_ok_and(|url| matches!(url.scheme(), "http" | "https")) {
        Ok(())
    } else {
        Err(url_violation())
    }
}

/// Optional URL fields accept the empty string, which some stored records
/// carry instead of omitting the key.
pub(crate) fn optional_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    absolute_url(value)
}

fn url_violation() -> ValidationError {
    let mut err = ValidationError::new("url");
    err.message = Some("must be an absolute http(s) url".into());
    err
}
