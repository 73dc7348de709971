use maud::{DOCTYPE, Markup, html};

use crate::{
    entities::{actor, film},
    models::{CastEntry, FilmRole},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn index_page(films: &[film::Model]) -> String {
    page(
        "Films",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-5xl mx-auto px-6 py-12" {
                    div class="flex items-center justify-between" {
                        h1 class="text-3xl font-bold text-gray-900" { "Films" }
                        a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/add_film" { "Add film" }
                    }

                    @if films.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "The catalog is empty." }
                        }
                    } @else {
                        div class="mt-10 grid gap-6 sm:grid-cols-2 lg:grid-cols-3" {
                            @for film in films {
                                (film_card(film))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn film_page(film: &film::Model, cast: &[CastEntry]) -> String {
    page(
        &film.title,
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-12" {
                    a class="text-sm text-blue-600 hover:text-blue-800" href="/" { "All films" }
                    div class="mt-4 bg-white shadow rounded-lg p-8 flex gap-8" {
                        img class="w-48 rounded-md object-cover" src=(film.poster_url) alt=(film.title);
                        div {
                            h1 class="text-3xl font-bold text-gray-900" {
                                (film.title)
                                @if let Some(year) = film.year {
                                    span class="ml-2 font-normal text-gray-500" { "(" (year) ")" }
                                }
                            }
                            dl class="mt-4 space-y-1 text-sm text-gray-700" {
                                @if let Some(rating) = film.rating {
                                    div { dt class="inline font-medium" { "Rating: " } dd class="inline" { (format!("{rating:.1}")) } }
                                }
                                @if let Some(country) = &film.country {
                                    div { dt class="inline font-medium" { "Country: " } dd class="inline" { (country) } }
                                }
                                div { dt class="inline font-medium" { "IMDb: " } dd class="inline" { (film.external_id) } }
                            }
                        }
                    }

                    h2 class="mt-10 text-xl font-semibold text-gray-900" { "Cast" }
                    @if cast.is_empty() {
                        p class="mt-2 text-sm text-gray-500" { "No cast recorded." }
                    } @else {
                        ul class="mt-4 grid gap-4 sm:grid-cols-2" {
                            @for entry in cast {
                                li class="bg-white shadow rounded-lg p-4 flex items-center gap-4" {
                                    img class="h-16 w-12 rounded object-cover" src=(entry.actor.photo_url) alt=(entry.actor.full_name);
                                    div {
                                        a class="font-medium text-blue-600 hover:text-blue-800" href=(format!("/actor/{}", entry.actor.id)) { (entry.actor.full_name) }
                                        @if let Some(character) = &entry.character {
                                            p class="text-sm text-gray-500" { "as " (character) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn actor_page(actor: &actor::Model, films: &[FilmRole]) -> String {
    page(
        &actor.full_name,
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-12" {
                    a class="text-sm text-blue-600 hover:text-blue-800" href="/" { "All films" }
                    div class="mt-4 bg-white shadow rounded-lg p-8 flex gap-8" {
                        img class="w-40 rounded-md object-cover" src=(actor.photo_url) alt=(actor.full_name);
                        div {
                            h1 class="text-3xl font-bold text-gray-900" { (actor.full_name) }
                            dl class="mt-4 space-y-1 text-sm text-gray-700" {
                                @if let Some(birth_date) = &actor.birth_date {
                                    div { dt class="inline font-medium" { "Born: " } dd class="inline" { (birth_date) } }
                                }
                                @if let Some(place) = &actor.place_of_birth {
                                    div { dt class="inline font-medium" { "Place of birth: " } dd class="inline" { (place) } }
                                }
                                @if let Some(height) = &actor.height {
                                    div { dt class="inline font-medium" { "Height: " } dd class="inline" { (height) } }
                                }
                            }
                        }
                    }

                    @if !films.is_empty() {
                        h2 class="mt-10 text-xl font-semibold text-gray-900" { "Films" }
                        ul class="mt-4 space-y-2" {
                            @for role in films {
                                li class="text-gray-700" {
                                    a class="text-blue-600 hover:text-blue-800" href=(format!("/film/{}", role.film.id)) { (role.film.title) }
                                    @if let Some(character) = &role.character {
                                        span class="text-gray-500" { " · " (character) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn add_film_page(message: Option<&str>) -> String {
    page(
        "Add film",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" { "Add film" }
                        p class="mt-2 text-gray-600" { "Films are looked up by their IMDb id and stored with their top-billed cast." }

                        form class="mt-8 space-y-6" method="post" action="/add_film" {
                            div {
                                label class="block text-sm font-medium text-gray-700" for="external_id" { "IMDb id" }
                                input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500" name="external_id" id="external_id" placeholder="tt0137523" required;
                            }
                            @if let Some(message) = message {
                                p class="text-sm text-red-600" { (message) }
                            }
                            button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Submit" }
                        }
                    }
                }
            }
        },
    )
}

pub fn error_page(message: &str) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn film_card(film: &film::Model) -> Markup {
    html! {
        a class="block bg-white shadow rounded-lg overflow-hidden hover:shadow-md" href=(format!("/film/{}", film.id)) {
            img class="h-64 w-full object-cover" src=(film.poster_url) alt=(film.title);
            div class="p-4" {
                h2 class="text-lg font-semibold text-gray-900" { (film.title) }
                p class="text-sm text-gray-500" {
                    @if let Some(year) = film.year { (year) }
                    @if let Some(rating) = film.rating { " · ★ " (format!("{rating:.1}")) }
                }
            }
        }
    }
}
