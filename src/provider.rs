use std::{num::NonZeroU32, sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use jiff::civil::Date;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

use crate::models::{CastMember, NewActor, NewFilm};

pub const DEFAULT_CAST_LIMIT: usize = 5;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("external API request error, status code: {status_code}")]
    Status { status_code: u16 },

    #[error("external API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected external API payload: {0}")]
    Decode(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Source of canonical film and actor metadata, keyed by external id.
///
/// `Ok(None)` means the provider answered but does not know the id; transport
/// failures and non-2xx statuses are errors.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch_film(&self, external_id: &str) -> ProviderResult<Option<NewFilm>>;

    async fn fetch_actor(&self, external_id: &str) -> ProviderResult<Option<NewActor>>;

    /// Top-billed cast in billing order, each with its character label.
    async fn fetch_cast(&self, external_id: &str) -> ProviderResult<Vec<CastMember>>;
}

pub struct MyApiFilmsClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
    language: String,
    cast_limit: usize,
    max_concurrent: usize,
    timeout: Duration,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl MyApiFilmsClient {
    pub fn new(client: reqwest::Client, token: String, base_url: String, rps: u32) -> Self {
        let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rps)));
        Self {
            client,
            token,
            base_url,
            language: "en-us".to_string(),
            cast_limit: DEFAULT_CAST_LIMIT,
            max_concurrent: 4,
            timeout: DEFAULT_TIMEOUT,
            limiter,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_cast_limit(mut self, cast_limit: usize) -> Self {
        self.cast_limit = cast_limit;
        self
    }

    /// Per-request timeout, applied on top of whatever the client was built with.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> ProviderResult<Option<T>> {
        self.limiter.until_ready().await;

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .query(&[
                ("token", self.token.as_str()),
                ("format", "json"),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status { status_code: status.as_u16() });
        }

        let body = resp.text().await?;
        decode_envelope(&body)
    }
}

#[async_trait]
impl MetadataProvider for MyApiFilmsClient {
    async fn fetch_film(&self, external_id: &str) -> ProviderResult<Option<NewFilm>> {
        debug!(external_id = %external_id, "fetching film metadata");
        let Some(data) = self.get_data::<FilmData>("idIMDB", &[("idIMDB", external_id)]).await?
        else {
            debug!(external_id = %external_id, "provider does not know film");
            return Ok(None);
        };
        map_film(external_id, data)
    }

    async fn fetch_actor(&self, external_id: &str) -> ProviderResult<Option<NewActor>> {
        debug!(external_id = %external_id, "fetching actor metadata");
        let Some(data) = self
            .get_data::<NameData>("idName", &[("idName", external_id), ("bornDied", "1")])
            .await?
        else {
            return Ok(None);
        };
        map_actor(external_id, data)
    }

    async fn fetch_cast(&self, external_id: &str) -> ProviderResult<Vec<CastMember>> {
        let Some(data) = self
            .get_data::<FilmData>("idIMDB", &[("idIMDB", external_id), ("actors", "1")])
            .await?
        else {
            return Ok(Vec::new());
        };

        let credits = top_billed(data, self.cast_limit);
        debug!(external_id = %external_id, cast = credits.len(), "fetching cast members");

        let members: Vec<Option<CastMember>> = stream::iter(credits)
            .map(|credit| async move {
                let actor = self.fetch_actor(&credit.external_id).await?;
                if actor.is_none() {
                    debug!(actor_id = %credit.external_id, "provider does not know cast member");
                }
                Ok::<_, ProviderError>(
                    actor.map(|actor| CastMember { actor, character: non_empty(credit.character) }),
                )
            })
            .buffered(self.max_concurrent)
            .try_collect()
            .await?;

        Ok(members.into_iter().flatten().collect())
    }
}

fn decode_envelope<T: DeserializeOwned>(body: &str) -> ProviderResult<Option<T>> {
    let mut value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;
    if value.get("error").is_some() {
        return Ok(None);
    }
    let data = value
        .get_mut("data")
        .map(serde_json::Value::take)
        .ok_or_else(|| ProviderError::Decode("missing `data` block".to_string()))?;
    serde_json::from_value(data).map(Some).map_err(|e| ProviderError::Decode(e.to_string()))
}

fn map_film(external_id: &str, data: FilmData) -> ProviderResult<Option<NewFilm>> {
    let Some(movie) = data.movies.into_iter().next() else {
        return Ok(None);
    };
    let title = non_empty(movie.title)
        .ok_or_else(|| ProviderError::Decode(format!("film {external_id} has no title")))?;

    Ok(Some(NewFilm {
        external_id: external_id.to_string(),
        title,
        rating: movie.rating,
        year: movie.year,
        poster_url: non_empty(movie.url_poster),
        country: movie.countries.into_iter().find(|c| !c.trim().is_empty()),
    }))
}

fn map_actor(external_id: &str, data: NameData) -> ProviderResult<Option<NewActor>> {
    let Some(name) = data.names.into_iter().next() else {
        return Ok(None);
    };
    let full_name = non_empty(name.name)
        .ok_or_else(|| ProviderError::Decode(format!("actor {external_id} has no name")))?;

    let (birth_date, place_of_birth) = match name.born_death {
        Some(born) => (
            born.birthdate.as_deref().and_then(parse_birth_date),
            non_empty(born.place_of_birth),
        ),
        None => (None, None),
    };

    Ok(Some(NewActor {
        external_id: external_id.to_string(),
        full_name,
        height: non_empty(name.height),
        birth_date,
        place_of_birth,
        photo_url: non_empty(name.url_photo),
    }))
}

// Credits without an actor id are dropped before the cap.
fn top_billed(data: FilmData, limit: usize) -> Vec<BilledActor> {
    data.movies
        .into_iter()
        .next()
        .map(|m| m.actors)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|credit| {
            let external_id = non_empty(credit.id_imdb)?;
            Some(BilledActor { external_id, character: credit.character })
        })
        .take(limit)
        .collect()
}

/// Parses the provider's `YYYYMMDD` birth date code.
pub fn parse_birth_date(code: &str) -> Option<Date> {
    let code = code.trim();
    if code.len() != 8 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = code[0..4].parse().ok()?;
    let month = code[4..6].parse().ok()?;
    let day = code[6..8].parse().ok()?;
    Date::new(year, month, day).ok()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    })
}

#[derive(Debug, Deserialize)]
struct FilmData {
    #[serde(default)]
    movies: Vec<MovieEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieEntry {
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i32")]
    year: Option<i32>,
    url_poster: Option<String>,
    #[serde(default)]
    countries: Vec<String>,
    #[serde(default)]
    actors: Vec<ActorCredit>,
}

#[derive(Debug, Deserialize)]
struct ActorCredit {
    #[serde(rename = "idIMDB", default)]
    id_imdb: Option<String>,
    character: Option<String>,
}

#[derive(Debug)]
struct BilledActor {
    external_id: String,
    character: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NameData {
    #[serde(default)]
    names: Vec<NameEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NameEntry {
    name: Option<String>,
    height: Option<String>,
    url_photo: Option<String>,
    born_death: Option<BornDeath>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BornDeath {
    birthdate: Option<String>,
    place_of_birth: Option<String>,
}

// The provider sends numbers either as JSON numbers or as strings ("8.8", "1999").
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Number(n)) => Some(n),
        Some(Lenient::Text(s)) => s.trim().replace(',', ".").parse().ok(),
        Some(Lenient::Other(_)) | None => None,
    };
    Ok(value.filter(|n: &f64| n.is_finite()))
}

fn lenient_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Number(n)) if n.fract() == 0.0 && n.abs() <= f64::from(i32::MAX) => {
            Some(n as i32)
        },
        Some(Lenient::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn birth_date_code_parses() {
        assert_eq!(parse_birth_date("19631218"), Some(jiff::civil::date(1963, 12, 18)));
        assert_eq!(parse_birth_date(""), None);
        assert_eq!(parse_birth_date("1963"), None);
        assert_eq!(parse_birth_date("19631340"), None);
        assert_eq!(parse_birth_date("1963-12-1"), None);
    }

    #[test]
    fn error_envelope_is_not_found() {
        let res: Option<FilmData> =
            decode_envelope(r#"{"error": {"code": 110, "message": "Movie not found"}}"#).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn missing_data_block_is_decode_error() {
        let res = decode_envelope::<FilmData>(r#"{"about": {}}"#);
        assert!(matches!(res, Err(ProviderError::Decode(_))));
    }

    #[test]
    fn film_payload_maps_to_fields() {
        let data: FilmData = decode_envelope(
            r#"{"data": {"movies": [{
                "title": "Fight Club",
                "rating": "8.8",
                "year": "1999",
                "urlPoster": "",
                "countries": ["Germany", "USA"]
            }]}}"#,
        )
        .unwrap()
        .unwrap();

        let film = map_film("tt0137523", data).unwrap().unwrap();
        assert_eq!(film.external_id, "tt0137523");
        assert_eq!(film.title, "Fight Club");
        assert_eq!(film.rating, Some(8.8));
        assert_eq!(film.year, Some(1999));
        assert_eq!(film.poster_url, None);
        assert_eq!(film.country.as_deref(), Some("Germany"));
    }

    #[test]
    fn numeric_fields_accept_numbers_and_garbage() {
        let data: FilmData = decode_envelope(
            r#"{"data": {"movies": [{"title": "X", "rating": 7, "year": "unknown"}]}}"#,
        )
        .unwrap()
        .unwrap();
        let film = map_film("tt1", data).unwrap().unwrap();
        assert_eq!(film.rating, Some(7.0));
        assert_eq!(film.year, None);
        assert_eq!(film.country, None);
    }

    #[test]
    fn empty_movie_list_is_not_found() {
        let film = map_film("tt1", FilmData { movies: Vec::new() }).unwrap();
        assert!(film.is_none());
    }

    #[test]
    fn actor_without_born_death_has_no_birth_fields() {
        let data: NameData = decode_envelope(
            r#"{"data": {"names": [{"name": "Zach Grenier", "height": "", "urlPhoto": "p.jpg"}]}}"#,
        )
        .unwrap()
        .unwrap();
        let actor = map_actor("nm0340260", data).unwrap().unwrap();
        assert_eq!(actor.full_name, "Zach Grenier");
        assert_eq!(actor.height, None);
        assert_eq!(actor.birth_date, None);
        assert_eq!(actor.place_of_birth, None);
        assert_eq!(actor.photo_url.as_deref(), Some("p.jpg"));
    }

    #[test]
    fn actor_born_death_block_is_parsed() {
        let data: NameData = decode_envelope(
            r#"{"data": {"names": [{
                "name": "Brad Pitt",
                "bornDeath": {"birthdate": "19631218", "placeOfBirth": "Shawnee, Oklahoma, USA"}
            }]}}"#,
        )
        .unwrap()
        .unwrap();
        let actor = map_actor("nm0000093", data).unwrap().unwrap();
        assert_eq!(actor.birth_date, Some(jiff::civil::date(1963, 12, 18)));
        assert_eq!(actor.place_of_birth.as_deref(), Some("Shawnee, Oklahoma, USA"));
    }

    #[test]
    fn cast_is_capped() {
        let actors = (0..8)
            .map(|i| ActorCredit { id_imdb: Some(format!("nm{i}")), character: None })
            .collect();
        let data = FilmData {
            movies: vec![MovieEntry {
                title: Some("X".into()),
                rating: None,
                year: None,
                url_poster: None,
                countries: Vec::new(),
                actors,
            }],
        };
        let credits = top_billed(data, DEFAULT_CAST_LIMIT);
        assert_eq!(credits.len(), 5);
        assert_eq!(credits[0].external_id, "nm0");
        assert_eq!(credits[4].external_id, "nm4");
    }

    #[test]
    fn credits_without_an_id_are_skipped() {
        let data: FilmData = decode_envelope(
            r#"{"data": {"movies": [{
                "title": "X",
                "actors": [
                    {"idIMDB": "nm1", "character": "Lead"},
                    {"character": "Uncredited"},
                    {"idIMDB": null},
                    {"idIMDB": "  "},
                    {"idIMDB": "nm2"},
                    {"idIMDB": "nm3"}
                ]
            }]}}"#,
        )
        .unwrap()
        .unwrap();

        let credits = top_billed(data, 2);
        let ids: Vec<_> = credits.iter().map(|c| c.external_id.as_str()).collect();
        assert_eq!(ids, ["nm1", "nm2"]);
        assert_eq!(credits[0].character.as_deref(), Some("Lead"));
    }
}
