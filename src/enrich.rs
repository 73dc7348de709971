use std::{collections::HashSet, sync::Arc};

use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter,
    TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    entities::{actor, film, film_to_actor},
    error::CatalogResult,
    models::{CastMember, NewFilm, NewFilmToActor},
    provider::MetadataProvider,
    repository::{CatalogKind, Repository},
};

/// Resolves films by external id, pulling unknown ones (and their cast) from
/// the metadata provider.
#[derive(Clone)]
pub struct Enricher {
    films: Repository<film::Entity>,
    provider: Arc<dyn MetadataProvider>,
}

impl Enricher {
    pub fn new(db: DatabaseConnection, provider: Arc<dyn MetadataProvider>) -> Self {
        Self { films: Repository::new(db), provider }
    }

    /// Returns the local id of the film, creating it from provider metadata on
    /// first reference. `Ok(None)` when the provider does not know the id.
    ///
    /// The film, any new cast actors and their links are written in one
    /// transaction: either all of them land or none do.
    pub async fn resolve_or_enrich_film(&self, external_id: &str) -> CatalogResult<Option<Uuid>> {
        let external_id = external_id.trim();

        if let Some(existing) = self.films.find_by_external_id(external_id).await? {
            debug!(external_id = %external_id, id = %existing.id, "film already stored");
            return Ok(Some(existing.id));
        }

        let Some(metadata) = self.provider.fetch_film(external_id).await? else {
            debug!(external_id = %external_id, "film unknown to provider");
            return Ok(None);
        };
        let cast = self.provider.fetch_cast(external_id).await?;

        let txn = self.films.db().begin().await?;
        let film_id = insert_film(&txn, metadata).await?;
        let linked = link_cast(&txn, film_id, cast).await?;
        txn.commit().await?;

        info!(external_id = %external_id, id = %film_id, cast = linked, "film enriched");
        Ok(Some(film_id))
    }
}

async fn insert_film(txn: &DatabaseTransaction, metadata: NewFilm) -> CatalogResult<Uuid> {
    let model = film::Entity::build(Uuid::new_v4(), metadata);
    film::Entity::validate(&model)?;
    let id = model.id;
    film::Entity::insert(film::Entity::to_active(model)).exec_without_returning(txn).await?;
    Ok(id)
}

async fn link_cast(
    txn: &DatabaseTransaction,
    film_id: Uuid,
    cast: Vec<CastMember>,
) -> CatalogResult<usize> {
    let mut linked = HashSet::new();

    for (position, member) in cast.into_iter().enumerate() {
        let existing = actor::Entity::find()
            .filter(actor::Column::ExternalId.eq(member.actor.external_id.trim()))
            .one(txn)
            .await?;
        let actor_id = match existing {
            Some(existing) => existing.id,
            None => {
                let model = actor::Entity::build(Uuid::new_v4(), member.actor);
                actor::Entity::validate(&model)?;
                let id = model.id;
                actor::Entity::insert(actor::Entity::to_active(model))
                    .exec_without_returning(txn)
                    .await?;
                id
            },
        };

        if !linked.insert(actor_id) {
            continue;
        }

        let link = film_to_actor::Entity::build(
            Uuid::new_v4(),
            NewFilmToActor {
                film_id,
                actor_id,
                character: member.character,
                position: i32::try_from(position).ok(),
            },
        );
        film_to_actor::Entity::validate(&link)?;
        film_to_actor::Entity::insert(film_to_actor::Entity::to_active(link))
            .exec_without_returning(txn)
            .await?;
    }

    Ok(linked.len())
}
