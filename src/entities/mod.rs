pub mod actor;
pub mod film;
pub mod film_to_actor;
