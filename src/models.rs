use jiff::civil::Date;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::entities::{actor, film};

pub const POSTER_PLACEHOLDER: &str =
    "https://eloutput.com/wp-content/uploads/2022/03/imagen-geometria-proyector.png";
pub const PHOTO_PLACEHOLDER: &str =
    "https://static10.tgstat.ru/channels/_0/1a/1affec596ab6b9a4dc2003870012508a.jpg";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NewFilm {
    pub external_id: String,
    pub title: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Partial film update. `None` leaves a field alone; for nullable columns
/// `Some(None)` clears it.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FilmChanges {
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub rating: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub year: Option<Option<i32>>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub country: Option<Option<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewActor {
    pub external_id: String,
    pub full_name: String,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub birth_date: Option<Date>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ActorChanges {
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub height: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub birth_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "present")]
    pub place_of_birth: Option<Option<String>>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewFilmToActor {
    pub film_id: Uuid,
    pub actor_id: Uuid,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FilmToActorChanges {
    #[serde(default)]
    pub film_id: Option<Uuid>,
    #[serde(default)]
    pub actor_id: Option<Uuid>,
    #[serde(default, deserialize_with = "present")]
    pub character: Option<Option<String>>,
    #[serde(default)]
    pub position: Option<i32>,
}

/// One billed cast member as reported by the metadata provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastMember {
    pub actor: NewActor,
    pub character: Option<String>,
}

/// An actor joined through `film_to_actor` for a given film.
#[derive(Clone, Debug, Serialize)]
pub struct CastEntry {
    pub actor: actor::Model,
    pub character: Option<String>,
}

/// A film joined through `film_to_actor` for a given actor.
#[derive(Clone, Debug, Serialize)]
pub struct FilmRole {
    pub film: film::Model,
    pub character: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddFilmRequest {
    pub external_id: String,
}

#[derive(Debug, Deserialize)]
pub struct IdRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest<C> {
    pub id: Uuid,
    #[serde(flatten)]
    pub changes: C,
}

// Distinguishes an explicit `null` from a missing key.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_tell_null_from_missing() {
        let changes: FilmChanges =
            serde_json::from_str(r#"{"rating": null, "title": "Heat"}"#).unwrap();
        assert_eq!(changes.rating, Some(None));
        assert_eq!(changes.year, None);
        assert_eq!(changes.title.as_deref(), Some("Heat"));
    }

    #[test]
    fn update_request_flattens_changes() {
        let id = Uuid::new_v4();
        let body = format!(r#"{{"id": "{id}", "birth_date": "1963-12-18", "height": null}}"#);
        let req: UpdateRequest<ActorChanges> = serde_json::from_str(&body).unwrap();
        assert_eq!(req.id, id);
        assert_eq!(req.changes.birth_date, Some(Some(jiff::civil::date(1963, 12, 18))));
        assert_eq!(req.changes.height, Some(None));
        assert!(req.changes.full_name.is_none());
    }

    #[test]
    fn new_film_requires_title() {
        let res: Result<NewFilm, _> = serde_json::from_str(r#"{"external_id": "tt1"}"#);
        assert!(res.is_err());
    }
}
