//! Built-in metadata used when no provider API key is configured.

use async_trait::async_trait;
use jiff::civil::Date;

use crate::{
    models::{CastMember, NewActor, NewFilm},
    provider::{DEFAULT_CAST_LIMIT, MetadataProvider, ProviderResult},
};

struct FilmFixture {
    external_id: &'static str,
    title: &'static str,
    rating: f64,
    year: i32,
    country: &'static str,
    cast: &'static [(&'static str, &'static str)],
}

struct ActorFixture {
    external_id: &'static str,
    full_name: &'static str,
    height: Option<&'static str>,
    birth_date: Option<(i16, i8, i8)>,
    place_of_birth: Option<&'static str>,
}

const FILMS: &[FilmFixture] = &[
    FilmFixture {
        external_id: "tt0137523",
        title: "Fight Club",
        rating: 8.8,
        year: 1999,
        country: "Germany",
        cast: &[
            ("nm0000093", "Tyler Durden"),
            ("nm0001570", "Narrator"),
            ("nm0001533", "Robert 'Bob' Paulson"),
            ("nm0340260", "Richard Chesler"),
            ("nm0037118", "Intern"),
        ],
    },
    FilmFixture {
        external_id: "tt0068646",
        title: "The Godfather",
        rating: 9.2,
        year: 1972,
        country: "United States",
        cast: &[
            ("nm0000008", "Don Vito Corleone"),
            ("nm0000199", "Michael Corleone"),
            ("nm0001001", "Sonny Corleone"),
            ("nm0000473", "Kay Adams"),
            ("nm0144710", "Clemenza"),
        ],
    },
    FilmFixture {
        external_id: "tt0109830",
        title: "Forrest Gump",
        rating: 8.8,
        year: 1994,
        country: "United States",
        cast: &[
            ("nm0000158", "Forrest Gump"),
            ("nm0000705", "Jenny Curran"),
            ("nm0000641", "Lieutenant Dan Taylor"),
            ("nm0000398", "Mrs. Gump"),
            ("nm0931508", "Nurse at Park Bench"),
        ],
    },
];

const ACTORS: &[ActorFixture] = &[
    ActorFixture {
        external_id: "nm0000093",
        full_name: "Brad Pitt",
        height: Some("5' 11″ (1.80 m)"),
        birth_date: Some((1963, 12, 18)),
        place_of_birth: Some("Shawnee, Oklahoma, USA"),
    },
    ActorFixture {
        external_id: "nm0001570",
        full_name: "Edward Norton",
        height: Some("6' (1.83 m)"),
        birth_date: Some((1969, 8, 18)),
        place_of_birth: Some("Boston, Massachusetts, USA"),
    },
    ActorFixture {
        external_id: "nm0001533",
        full_name: "Meat Loaf",
        height: Some("6' (1.83 m)"),
        birth_date: Some((1947, 9, 27)),
        place_of_birth: Some("Dallas, Texas, USA"),
    },
    ActorFixture {
        external_id: "nm0340260",
        full_name: "Zach Grenier",
        height: Some("5' 9″ (1.75 m)"),
        birth_date: None,
        place_of_birth: Some("Englewood, New Jersey, USA"),
    },
    ActorFixture {
        external_id: "nm0037118",
        full_name: "Richmond Arquette",
        height: Some("5' 10″ (1.78 m)"),
        birth_date: Some((1963, 8, 21)),
        place_of_birth: Some("New York City, New York, USA"),
    },
    ActorFixture {
        external_id: "nm0000008",
        full_name: "Marlon Brando",
        height: Some("5' 8¾″ (1.75 m)"),
        birth_date: Some((1924, 4, 3)),
        place_of_birth: Some("Omaha, Nebraska, USA"),
    },
    ActorFixture {
        external_id: "nm0000199",
        full_name: "Al Pacino",
        height: Some("5' 6″ (1.68 m)"),
        birth_date: Some((1940, 4, 25)),
        place_of_birth: Some("Manhattan, New York City, New York, USA"),
    },
    ActorFixture {
        external_id: "nm0001001",
        full_name: "James Caan",
        height: Some("5' 9¼″ (1.76 m)"),
        birth_date: Some((1940, 3, 26)),
        place_of_birth: Some("The Bronx, New York, USA"),
    },
    ActorFixture {
        external_id: "nm0000473",
        full_name: "Diane Keaton",
        height: Some("5' 6½″ (1.69 m)"),
        birth_date: Some((1946, 1, 5)),
        place_of_birth: Some("Los Angeles, California, USA"),
    },
    ActorFixture {
        external_id: "nm0144710",
        full_name: "Richard S. Castellano",
        height: Some("5' 9″ (1.75 m)"),
        birth_date: Some((1933, 9, 4)),
        place_of_birth: Some("The Bronx, New York City, New York, USA"),
    },
    ActorFixture {
        external_id: "nm0000158",
        full_name: "Tom Hanks",
        height: Some("6' (1.83 m)"),
        birth_date: Some((1956, 7, 9)),
        place_of_birth: Some("Concord, California, USA"),
    },
    ActorFixture {
        external_id: "nm0000705",
        full_name: "Robin Wright",
        height: Some("5' 5″ (1.65 m)"),
        birth_date: Some((1966, 4, 8)),
        place_of_birth: Some("Dallas, Texas, USA"),
    },
    ActorFixture {
        external_id: "nm0000641",
        full_name: "Gary Sinise",
        height: Some("5' 8″ (1.73 m)"),
        birth_date: Some((1955, 3, 17)),
        place_of_birth: Some("Blue Island, Illinois, USA"),
    },
    ActorFixture {
        external_id: "nm0000398",
        full_name: "Sally Field",
        height: Some("5' 2″ (1.57 m)"),
        birth_date: Some((1946, 11, 6)),
        place_of_birth: Some("Pasadena, California, USA"),
    },
    ActorFixture {
        external_id: "nm0931508",
        full_name: "Rebecca Williams",
        height: None,
        birth_date: None,
        place_of_birth: None,
    },
];

pub struct OfflineProvider {
    cast_limit: usize,
}

impl OfflineProvider {
    pub fn new() -> Self {
        Self { cast_limit: DEFAULT_CAST_LIMIT }
    }

    pub fn with_cast_limit(mut self, cast_limit: usize) -> Self {
        self.cast_limit = cast_limit;
        self
    }
}

impl Default for OfflineProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn find_film(external_id: &str) -> Option<&'static FilmFixture> {
    FILMS.iter().find(|f| f.external_id == external_id)
}

fn actor_record(external_id: &str) -> Option<NewActor> {
    let fixture = ACTORS.iter().find(|a| a.external_id == external_id)?;
    Some(NewActor {
        external_id: fixture.external_id.to_string(),
        full_name: fixture.full_name.to_string(),
        height: fixture.height.map(str::to_string),
        birth_date: fixture.birth_date.and_then(|(y, m, d)| Date::new(y, m, d).ok()),
        place_of_birth: fixture.place_of_birth.map(str::to_string),
        photo_url: None,
    })
}

#[async_trait]
impl MetadataProvider for OfflineProvider {
    async fn fetch_film(&self, external_id: &str) -> ProviderResult<Option<NewFilm>> {
        Ok(find_film(external_id).map(|f| NewFilm {
            external_id: f.external_id.to_string(),
            title: f.title.to_string(),
            rating: Some(f.rating),
            year: Some(f.year),
            poster_url: None,
            country: Some(f.country.to_string()),
        }))
    }

    async fn fetch_actor(&self, external_id: &str) -> ProviderResult<Option<NewActor>> {
        Ok(actor_record(external_id))
    }

    async fn fetch_cast(&self, external_id: &str) -> ProviderResult<Vec<CastMember>> {
        let Some(film) = find_film(external_id) else {
            return Ok(Vec::new());
        };
        Ok(film
            .cast
            .iter()
            .take(self.cast_limit)
            .filter_map(|(actor_id, character)| {
                actor_record(actor_id)
                    .map(|actor| CastMember { actor, character: Some(character.to_string()) })
            })
            .collect())
    }
}
