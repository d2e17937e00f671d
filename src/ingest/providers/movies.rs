// src/ingest/providers/movies.rs
//! TMDB adapter with fallback to bundled movies.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Datelike;
use serde::Deserialize;

use super::demo::DEMO_MOVIES;
use super::{contains_ci, http_client, record_fallback, UpstreamError};
use crate::config::{CredentialCheck, MovieConfig};
use crate::ingest::types::{
    normalize_date, parse_timestamp, ContentItem, ContentSource, SourceData, SourceKind, TmdbMovie,
};
use crate::ingest::text_or;

pub const MOVIE_PLACEHOLDER_IMAGE: &str =
    "https://images.pexels.com/photos/7991579/pexels-photo-7991579.jpeg?auto=compress&cs=tinysrgb&w=800";

const MAX_TAGS: usize = 4;

#[derive(Debug, Deserialize)]
struct TmdbResponse {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

/// TMDB genre ids for the genre names users pick as topics.
pub fn genre_id(name: &str) -> Option<u32> {
    let id = match name.trim().to_ascii_lowercase().as_str() {
        "action" => 28,
        "adventure" => 12,
        "animation" => 16,
        "comedy" => 35,
        "crime" => 80,
        "documentary" => 99,
        "drama" => 18,
        "family" => 10751,
        "fantasy" => 14,
        "history" => 36,
        "horror" => 27,
        "music" => 10402,
        "mystery" => 9648,
        "romance" => 10749,
        "science fiction" | "sci-fi" | "scifi" => 878,
        "thriller" => 53,
        "war" => 10752,
        "western" => 37,
        _ => return None,
    };
    Some(id)
}

pub struct TmdbProvider {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    image_base_url: String,
    new_release_year: i32,
    credential_ok: CredentialCheck,
}

impl TmdbProvider {
    pub fn from_config(cfg: &MovieConfig) -> Self {
        Self {
            http: http_client(cfg.timeout_secs),
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            image_base_url: cfg.image_base_url.trim_end_matches('/').to_string(),
            new_release_year: cfg
                .new_release_year
                .unwrap_or_else(|| chrono::Utc::now().year()),
            credential_ok: cfg.credential.predicate(),
        }
    }

    pub fn with_credential_check(mut self, check: CredentialCheck) -> Self {
        self.credential_ok = check;
        self
    }

    fn valid_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|k| (self.credential_ok)(k))
    }

    /// Popular movies, or genre discovery when `genre` names a known genre.
    pub async fn fetch_movies(&self, genre: &str) -> Vec<TmdbMovie> {
        let Some(key) = self.valid_key() else {
            tracing::info!(target: "provider", provider = "movies", "no valid TMDB_API_KEY, serving demo movies");
            record_fallback("movies", "no_credential");
            return fallback_movies().to_vec();
        };

        let res = match genre_id(genre) {
            Some(id) => {
                self.get_results(
                    "discover/movie",
                    key,
                    &[
                        ("with_genres", id.to_string()),
                        ("sort_by", "popularity.desc".into()),
                        ("page", "1".into()),
                    ],
                )
                .await
            }
            None => {
                self.get_results("movie/popular", key, &[("page", "1".into())])
                    .await
            }
        };
        self.or_fallback(res, "popular movies")
    }

    pub async fn fetch_trending(&self) -> Vec<TmdbMovie> {
        let Some(key) = self.valid_key() else {
            record_fallback("movies", "no_credential");
            return fallback_movies().to_vec();
        };
        let res = self.get_results("trending/movie/week", key, &[]).await;
        self.or_fallback(res, "trending movies")
    }

    pub async fn search_movies(&self, query: &str) -> Vec<TmdbMovie> {
        let Some(key) = self.valid_key() else {
            record_fallback("movies", "no_credential");
            return filter_movies(fallback_movies(), query);
        };
        let res = self
            .get_results(
                "search/movie",
                key,
                &[("query", query.to_string()), ("page", "1".into())],
            )
            .await;
        match res {
            Ok(movies) => movies,
            Err(e) => {
                tracing::warn!(target: "provider", provider = "movies", error = %e, "search failed, filtering demo movies");
                record_fallback("movies", "error");
                filter_movies(fallback_movies(), query)
            }
        }
    }

    fn or_fallback(&self, res: Result<Vec<TmdbMovie>, UpstreamError>, what: &str) -> Vec<TmdbMovie> {
        match res {
            Ok(movies) => movies,
            Err(e) => {
                tracing::warn!(target: "provider", provider = "movies", error = %e, "{what} failed, serving demo movies");
                record_fallback("movies", "error");
                fallback_movies().to_vec()
            }
        }
    }

    async fn get_results(
        &self,
        path: &str,
        key: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<TmdbMovie>, UpstreamError> {
        let resp = self
            .http
            .get(format!("{}/{}", self.base_url, path))
            .query(&[("api_key", key)])
            .query(params)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::from_status(status));
        }
        let body: TmdbResponse = resp.json().await?;
        Ok(body.results)
    }

    pub fn image_url(&self, path: Option<&str>) -> String {
        image_url(&self.image_base_url, path)
    }

    pub fn normalize(&self, movies: &[TmdbMovie]) -> Vec<ContentItem> {
        normalize_movies(movies, &self.image_base_url, self.new_release_year)
    }
}

pub fn fallback_movies() -> &'static [TmdbMovie] {
    DEMO_MOVIES.as_slice()
}

/// Case-insensitive match over title and overview.
pub fn filter_movies(movies: &[TmdbMovie], query: &str) -> Vec<TmdbMovie> {
    let q = query.to_lowercase();
    movies
        .iter()
        .filter(|m| contains_ci(&m.title, &q) || contains_ci(&m.overview, &q))
        .cloned()
        .collect()
}

pub fn image_url(image_base: &str, path: Option<&str>) -> String {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => format!("{image_base}{p}"),
        None => MOVIE_PLACEHOLDER_IMAGE.to_string(),
    }
}

/// Rating turned into a "watch time": floor(rating * 10) + 90.
pub fn watch_time(vote_average: f64) -> u32 {
    (vote_average.max(0.0) * 10.0).floor() as u32 + 90
}

pub fn movie_tags(movie: &TmdbMovie, new_release_year: i32) -> Vec<String> {
    let mut tags = vec!["Movies".to_string(), "Entertainment".to_string()];
    if movie.vote_average >= 8.0 {
        tags.push("Highly Rated".into());
    }
    if movie.popularity > 50.0 {
        tags.push("Popular".into());
    }
    if parse_timestamp(&movie.release_date).is_some_and(|d| d.year() == new_release_year) {
        tags.push("New Release".into());
    }
    tags.truncate(MAX_TAGS);
    tags
}

pub fn normalize_movies(
    movies: &[TmdbMovie],
    image_base: &str,
    new_release_year: i32,
) -> Vec<ContentItem> {
    movies
        .iter()
        .map(|m| ContentItem {
            id: format!("movie-{}", m.id),
            title: text_or(Some(&m.title), "Untitled"),
            description: text_or(Some(&m.overview), "No description available"),
            category: "Entertainment".into(),
            author: "TMDB".into(),
            date: normalize_date(&m.release_date),
            read_time: watch_time(m.vote_average),
            tags: movie_tags(m, new_release_year),
            image_url: image_url(image_base, m.poster_path.as_deref()),
            is_favorite: false,
            is_read: false,
            source: SourceKind::Movies,
            source_data: Some(SourceData::Movie(m.clone())),
            url: None,
            rating: Some(m.vote_average),
        })
        .collect()
}

#[async_trait]
impl ContentSource for TmdbProvider {
    fn kind(&self) -> SourceKind {
        SourceKind::Movies
    }

    fn name(&self) -> &'static str {
        "movies"
    }

    async fn fetch_by_topic(&self, topic: &str, limit: usize) -> Result<Vec<ContentItem>> {
        let movies = self.fetch_movies(topic).await;
        let take = movies.len().min(limit);
        Ok(self.normalize(&movies[..take]))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ContentItem>> {
        let movies = self.search_movies(query).await;
        let take = movies.len().min(limit);
        Ok(self.normalize(&movies[..take]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_time_heuristic() {
        assert_eq!(watch_time(8.5), 175);
        assert_eq!(watch_time(7.8), 168);
        assert_eq!(watch_time(0.0), 90);
        assert_eq!(watch_time(-1.0), 90);
    }

    #[test]
    fn tags_follow_rating_popularity_and_year() {
        let m = TmdbMovie {
            vote_average: 8.1,
            popularity: 60.0,
            release_date: "2026-05-01".into(),
            ..Default::default()
        };
        assert_eq!(
            movie_tags(&m, 2026),
            vec!["Movies", "Entertainment", "Highly Rated", "Popular"]
        );
        let quiet = TmdbMovie {
            vote_average: 5.0,
            popularity: 10.0,
            release_date: "2026-05-01".into(),
            ..Default::default()
        };
        assert_eq!(
            movie_tags(&quiet, 2026),
            vec!["Movies", "Entertainment", "New Release"]
        );
    }

    #[tokio::test]
    async fn failed_request_error_does_not_reveal_the_key() {
        let provider = TmdbProvider::from_config(&MovieConfig {
            base_url: "http://127.0.0.1:1".into(),
            ..Default::default()
        });
        let err = provider
            .get_results("movie/popular", "SECRET-TMDB-KEY-123", &[])
            .await
            .expect_err("nothing listens on port 1");
        assert!(matches!(err, UpstreamError::Transport(_)));
        assert!(!err.to_string().contains("SECRET-TMDB-KEY-123"), "{err}");
    }

    #[test]
    fn genre_names_map_to_ids() {
        assert_eq!(genre_id("Action"), Some(28));
        assert_eq!(genre_id(" sci-fi "), Some(878));
        assert_eq!(genre_id("popular"), None);
    }

    #[test]
    fn poster_path_or_placeholder() {
        assert_eq!(image_url("https://img/w500", Some("/a.jpg")), "https://img/w500/a.jpg");
        assert_eq!(image_url("https://img/w500", None), MOVIE_PLACEHOLDER_IMAGE);
        assert_eq!(image_url("https://img/w500", Some("")), MOVIE_PLACEHOLDER_IMAGE);
    }

    #[test]
    fn empty_movie_fields_are_filled() {
        let items = normalize_movies(&[TmdbMovie::default()], "https://img", 2026);
        let it = &items[0];
        assert_eq!(it.title, "Untitled");
        assert_eq!(it.description, "No description available");
        assert_eq!(it.date, crate::ingest::types::EPOCH_RFC3339);
        assert_eq!(it.image_url, MOVIE_PLACEHOLDER_IMAGE);
        assert_eq!(it.rating, Some(0.0));
    }
}
