use std::marker::PhantomData;

use jiff::civil::Date;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PrimaryKeyTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;
use uuid::Uuid;

use crate::{
    entities::{actor, film, film_to_actor},
    error::{CatalogError, CatalogResult},
    models::{
        ActorChanges, CastEntry, FilmChanges, FilmRole, FilmToActorChanges, NewActor, NewFilm,
        NewFilmToActor, PHOTO_PLACEHOLDER, POSTER_PLACEHOLDER,
    },
};

pub const MAX_NAME_LEN: usize = 200;
pub const EARLIEST_FILM_YEAR: i32 = 1895;

/// An entity the generic repository can manage.
pub trait CatalogKind: EntityTrait {
    /// Singular name used in routes and errors.
    const NAME: &'static str;
    /// Key of the JSON listing.
    const PLURAL: &'static str;

    type New: DeserializeOwned + Send + 'static;
    type Changes: DeserializeOwned + Send + 'static;

    fn build(id: Uuid, new: Self::New) -> Self::Model;
    fn merge(model: Self::Model, changes: Self::Changes) -> Self::Model;
    fn validate(model: &Self::Model) -> CatalogResult<()>;
    fn to_active(model: Self::Model) -> Self::ActiveModel;
    fn id_of(model: &Self::Model) -> Uuid;
    fn listing_order() -> Self::Column;
}

pub struct Repository<K> {
    db: DatabaseConnection,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for Repository<K> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone(), _kind: PhantomData }
    }
}

impl<K> Repository<K> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, _kind: PhantomData }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl<K> Repository<K>
where
    K: CatalogKind,
    K::Model: IntoActiveModel<K::ActiveModel> + Serialize,
    <K::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    pub async fn create(&self, new: K::New) -> CatalogResult<Uuid> {
        let model = K::build(Uuid::new_v4(), new);
        K::validate(&model)?;
        let id = K::id_of(&model);

        let txn = self.db.begin().await?;
        K::insert(K::to_active(model)).exec_without_returning(&txn).await?;
        txn.commit().await?;

        debug!(kind = K::NAME, id = %id, "created");
        Ok(id)
    }

    pub async fn get(&self, id: Uuid) -> CatalogResult<Option<K::Model>> {
        Ok(K::find_by_id(id).one(&self.db).await?)
    }

    pub async fn get_all(&self) -> CatalogResult<Vec<K::Model>> {
        Ok(K::find().order_by_asc(K::listing_order()).all(&self.db).await?)
    }

    /// Merges `changes` into the stored row; fields left out keep their value.
    pub async fn update(&self, id: Uuid, changes: K::Changes) -> CatalogResult<K::Model> {
        let txn = self.db.begin().await?;

        let Some(current) = K::find_by_id(id).one(&txn).await? else {
            return Err(CatalogError::NotFound { kind: K::NAME, id });
        };
        let merged = K::merge(current, changes);
        K::validate(&merged)?;
        let updated = K::update(K::to_active(merged)).exec(&txn).await?;
        txn.commit().await?;

        debug!(kind = K::NAME, id = %id, "updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> CatalogResult<()> {
        let txn = self.db.begin().await?;
        let res = K::delete_by_id(id).exec(&txn).await?;
        if res.rows_affected == 0 {
            return Err(CatalogError::NotFound { kind: K::NAME, id });
        }
        txn.commit().await?;

        debug!(kind = K::NAME, id = %id, "deleted");
        Ok(())
    }
}

impl Repository<film::Entity> {
    pub async fn find_by_external_id(&self, external_id: &str) -> CatalogResult<Option<film::Model>> {
        Ok(film::Entity::find()
            .filter(film::Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await?)
    }
}

impl Repository<film_to_actor::Entity> {
    /// Actors linked to `film_id`, in billing order.
    pub async fn cast_of(&self, film_id: Uuid) -> CatalogResult<Vec<CastEntry>> {
        let rows = film_to_actor::Entity::find()
            .filter(film_to_actor::Column::FilmId.eq(film_id))
            .order_by_asc(film_to_actor::Column::Position)
            .find_also_related(actor::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(link, actor)| {
                actor.map(|actor| CastEntry { actor, character: link.character })
            })
            .collect())
    }

    pub async fn filmography_of(&self, actor_id: Uuid) -> CatalogResult<Vec<FilmRole>> {
        let rows = film_to_actor::Entity::find()
            .filter(film_to_actor::Column::ActorId.eq(actor_id))
            .find_also_related(film::Entity)
            .order_by_desc(film::Column::Year)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(link, film)| film.map(|film| FilmRole { film, character: link.character }))
            .collect())
    }
}

fn check_name(field: &str, value: &str) -> CatalogResult<()> {
    if value.chars().count() > MAX_NAME_LEN {
        return Err(CatalogError::Validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn check_external_id(value: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::Validation("external_id must not be empty".to_string()));
    }
    Ok(())
}

impl CatalogKind for film::Entity {
    const NAME: &'static str = "film";
    const PLURAL: &'static str = "films";

    type New = NewFilm;
    type Changes = FilmChanges;

    fn build(id: Uuid, new: NewFilm) -> film::Model {
        film::Model {
            id,
            external_id: new.external_id.trim().to_string(),
            title: new.title,
            rating: new.rating,
            year: new.year,
            poster_url: new.poster_url.unwrap_or_else(|| POSTER_PLACEHOLDER.to_string()),
            country: new.country,
        }
    }

    fn merge(mut model: film::Model, changes: FilmChanges) -> film::Model {
        if let Some(external_id) = changes.external_id {
            model.external_id = external_id.trim().to_string();
        }
        if let Some(title) = changes.title {
            model.title = title;
        }
        if let Some(rating) = changes.rating {
            model.rating = rating;
        }
        if let Some(year) = changes.year {
            model.year = year;
        }
        if let Some(poster_url) = changes.poster_url {
            model.poster_url = poster_url;
        }
        if let Some(country) = changes.country {
            model.country = country;
        }
        model
    }

    fn validate(model: &film::Model) -> CatalogResult<()> {
        check_external_id(&model.external_id)?;
        check_name("title", &model.title)?;
        if let Some(rating) = model.rating {
            if !(0.0..=10.0).contains(&rating) {
                return Err(CatalogError::Validation(format!(
                    "rating {rating} is outside 0..=10"
                )));
            }
        }
        if let Some(year) = model.year {
            if year < EARLIEST_FILM_YEAR {
                return Err(CatalogError::Validation(format!(
                    "year {year} is before {EARLIEST_FILM_YEAR}"
                )));
            }
        }
        Ok(())
    }

    fn to_active(model: film::Model) -> film::ActiveModel {
        film::ActiveModel {
            id: Set(model.id),
            external_id: Set(model.external_id),
            title: Set(model.title),
            rating: Set(model.rating),
            year: Set(model.year),
            poster_url: Set(model.poster_url),
            country: Set(model.country),
        }
    }

    fn id_of(model: &film::Model) -> Uuid {
        model.id
    }

    fn listing_order() -> film::Column {
        film::Column::Title
    }
}

impl CatalogKind for actor::Entity {
    const NAME: &'static str = "actor";
    const PLURAL: &'static str = "actors";

    type New = NewActor;
    type Changes = ActorChanges;

    fn build(id: Uuid, new: NewActor) -> actor::Model {
        actor::Model {
            id,
            external_id: new.external_id.trim().to_string(),
            full_name: new.full_name,
            height: new.height,
            birth_date: new.birth_date.map(|d| d.to_string()),
            place_of_birth: new.place_of_birth,
            photo_url: new.photo_url.unwrap_or_else(|| PHOTO_PLACEHOLDER.to_string()),
        }
    }

    fn merge(mut model: actor::Model, changes: ActorChanges) -> actor::Model {
        if let Some(external_id) = changes.external_id {
            model.external_id = external_id.trim().to_string();
        }
        if let Some(full_name) = changes.full_name {
            model.full_name = full_name;
        }
        if let Some(height) = changes.height {
            model.height = height;
        }
        if let Some(birth_date) = changes.birth_date {
            model.birth_date = birth_date.map(|d| d.to_string());
        }
        if let Some(place_of_birth) = changes.place_of_birth {
            model.place_of_birth = place_of_birth;
        }
        if let Some(photo_url) = changes.photo_url {
            model.photo_url = photo_url;
        }
        model
    }

    fn validate(model: &actor::Model) -> CatalogResult<()> {
        check_external_id(&model.external_id)?;
        check_name("full_name", &model.full_name)?;
        if let Some(raw) = &model.birth_date {
            let birth_date: Date = raw.parse().map_err(|_| {
                CatalogError::Validation(format!("birth_date {raw} is not a calendar date"))
            })?;
            let today = jiff::Zoned::now().date();
            if birth_date > today {
                return Err(CatalogError::Validation(format!(
                    "birth_date {birth_date} is in the future"
                )));
            }
        }
        Ok(())
    }

    fn to_active(model: actor::Model) -> actor::ActiveModel {
        actor::ActiveModel {
            id: Set(model.id),
            external_id: Set(model.external_id),
            full_name: Set(model.full_name),
            height: Set(model.height),
            birth_date: Set(model.birth_date),
            place_of_birth: Set(model.place_of_birth),
            photo_url: Set(model.photo_url),
        }
    }

    fn id_of(model: &actor::Model) -> Uuid {
        model.id
    }

    fn listing_order() -> actor::Column {
        actor::Column::FullName
    }
}

impl CatalogKind for film_to_actor::Entity {
    const NAME: &'static str = "film_to_actor";
    const PLURAL: &'static str = "film_to_actor";

    type New = NewFilmToActor;
    type Changes = FilmToActorChanges;

    fn build(id: Uuid, new: NewFilmToActor) -> film_to_actor::Model {
        film_to_actor::Model {
            id,
            film_id: new.film_id,
            actor_id: new.actor_id,
            character: new.character,
            position: new.position.unwrap_or(0),
        }
    }

    fn merge(mut model: film_to_actor::Model, changes: FilmToActorChanges) -> film_to_actor::Model {
        if let Some(film_id) = changes.film_id {
            model.film_id = film_id;
        }
        if let Some(actor_id) = changes.actor_id {
            model.actor_id = actor_id;
        }
        if let Some(character) = changes.character {
            model.character = character;
        }
        if let Some(position) = changes.position {
            model.position = position;
        }
        model
    }

    fn validate(model: &film_to_actor::Model) -> CatalogResult<()> {
        if model.position < 0 {
            return Err(CatalogError::Validation("position must not be negative".to_string()));
        }
        Ok(())
    }

    fn to_active(model: film_to_actor::Model) -> film_to_actor::ActiveModel {
        film_to_actor::ActiveModel {
            id: Set(model.id),
            film_id: Set(model.film_id),
            actor_id: Set(model.actor_id),
            character: Set(model.character),
            position: Set(model.position),
        }
    }

    fn id_of(model: &film_to_actor::Model) -> Uuid {
        model.id
    }

    fn listing_order() -> film_to_actor::Column {
        film_to_actor::Column::Position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_film() -> film::Model {
        film::Entity::build(
            Uuid::new_v4(),
            NewFilm {
                external_id: " X1 ".to_string(),
                title: "Sample".to_string(),
                rating: Some(7.5),
                year: Some(2000),
                poster_url: None,
                country: Some("France".to_string()),
            },
        )
    }

    #[test]
    fn build_fills_placeholders() {
        let film = sample_film();
        assert_eq!(film.external_id, "X1");
        assert_eq!(film.poster_url, POSTER_PLACEHOLDER);

        let actor = actor::Entity::build(
            Uuid::new_v4(),
            NewActor {
                external_id: "nm1".to_string(),
                full_name: "Someone".to_string(),
                height: None,
                birth_date: Some(jiff::civil::date(1970, 1, 2)),
                place_of_birth: None,
                photo_url: None,
            },
        );
        assert_eq!(actor.photo_url, PHOTO_PLACEHOLDER);
        assert_eq!(actor.birth_date.as_deref(), Some("1970-01-02"));
    }

    #[test]
    fn merge_only_touches_supplied_fields() {
        let film = sample_film();
        let changes = FilmChanges {
            title: Some("Renamed".to_string()),
            country: Some(None),
            ..Default::default()
        };
        let merged = film::Entity::merge(film.clone(), changes);
        assert_eq!(merged.title, "Renamed");
        assert_eq!(merged.country, None);
        assert_eq!(merged.rating, film.rating);
        assert_eq!(merged.year, film.year);
        assert_eq!(merged.id, film.id);
    }

    #[test]
    fn film_ranges_are_enforced() {
        let mut film = sample_film();
        assert!(film::Entity::validate(&film).is_ok());

        film.rating = Some(11.0);
        assert!(matches!(film::Entity::validate(&film), Err(CatalogError::Validation(_))));

        film.rating = Some(10.0);
        film.year = Some(1894);
        assert!(film::Entity::validate(&film).is_err());

        film.year = Some(1895);
        film.title = "x".repeat(201);
        assert!(film::Entity::validate(&film).is_err());

        film.title = "é".repeat(200);
        assert!(film::Entity::validate(&film).is_ok());
    }

    #[test]
    fn future_birth_date_is_rejected() {
        let today = jiff::Zoned::now().date();
        let tomorrow = today.tomorrow().unwrap();
        let actor = actor::Model {
            id: Uuid::new_v4(),
            external_id: "nm1".to_string(),
            full_name: "Someone".to_string(),
            height: None,
            birth_date: Some(tomorrow.to_string()),
            place_of_birth: None,
            photo_url: PHOTO_PLACEHOLDER.to_string(),
        };
        assert!(actor::Entity::validate(&actor).is_err());

        let actor = actor::Model { birth_date: Some(today.to_string()), ..actor };
        assert!(actor::Entity::validate(&actor).is_ok());
    }

    #[test]
    fn empty_external_id_is_rejected() {
        let mut film = sample_film();
        film.external_id = "   ".to_string();
        assert!(film::Entity::validate(&film).is_err());
    }
}
