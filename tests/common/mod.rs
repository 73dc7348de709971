#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use filmcast::{
    db,
    models::{CastMember, NewActor, NewFilm},
    provider::{MetadataProvider, ProviderError, ProviderResult},
};
use sea_orm::DatabaseConnection;

pub async fn memory_db() -> DatabaseConnection {
    db::connect_and_migrate("sqlite::memory:").await.expect("in-memory database")
}

pub fn new_film(external_id: &str, title: &str) -> NewFilm {
    NewFilm {
        external_id: external_id.to_string(),
        title: title.to_string(),
        rating: None,
        year: None,
        poster_url: None,
        country: None,
    }
}

pub fn new_actor(external_id: &str, full_name: &str) -> NewActor {
    NewActor {
        external_id: external_id.to_string(),
        full_name: full_name.to_string(),
        height: None,
        birth_date: None,
        place_of_birth: None,
        photo_url: None,
    }
}

pub fn cast_member(external_id: &str, full_name: &str, character: &str) -> CastMember {
    CastMember { actor: new_actor(external_id, full_name), character: Some(character.to_string()) }
}

/// Serves one canned film and counts how often it is asked.
pub struct ScriptedProvider {
    film: Option<NewFilm>,
    cast: Vec<CastMember>,
    cast_status: Option<u16>,
    film_calls: AtomicUsize,
    cast_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(film: Option<NewFilm>, cast: Vec<CastMember>) -> Self {
        Self {
            film,
            cast,
            cast_status: None,
            film_calls: AtomicUsize::new(0),
            cast_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_cast(film: NewFilm, status_code: u16) -> Self {
        Self { cast_status: Some(status_code), ..Self::new(Some(film), Vec::new()) }
    }

    pub fn film_calls(&self) -> usize {
        self.film_calls.load(Ordering::SeqCst)
    }

    pub fn cast_calls(&self) -> usize {
        self.cast_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProvider for ScriptedProvider {
    async fn fetch_film(&self, external_id: &str) -> ProviderResult<Option<NewFilm>> {
        self.film_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.film.clone().filter(|f| f.external_id == external_id))
    }

    async fn fetch_actor(&self, external_id: &str) -> ProviderResult<Option<NewActor>> {
        Ok(self.cast.iter().find(|m| m.actor.external_id == external_id).map(|m| m.actor.clone()))
    }

    async fn fetch_cast(&self, _external_id: &str) -> ProviderResult<Vec<CastMember>> {
        self.cast_calls.fetch_add(1, Ordering::SeqCst);
        match self.cast_status {
            Some(status_code) => Err(ProviderError::Status { status_code }),
            None => Ok(self.cast.clone()),
        }
    }
}
