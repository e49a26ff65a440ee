use dioxus::prelude::*;
use storymap_shared::cities;
use storymap_shared::models::{ChapterLocation, City, Playlist, Track};
use tracing::{info, warn};

use crate::api;

/// Lowercase ASCII slug for ids derived from titles.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Parse the location fields of the add-city form.
pub fn parse_location(lat: &str, lng: &str, zoom: &str) -> Result<ChapterLocation, String> {
    let num = |name: &str, v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|_| format!("{name} must be a number"))
    };
    let location = ChapterLocation::new(num("Latitude", lat)?, num("Longitude", lng)?, num("Zoom", zoom)?);
    location.validate().map_err(|e| e.to_string())?;
    Ok(location)
}

/// Add a track to a playlist, numbering its id so repeated titles stay unique.
pub fn append_track(playlist: &mut Playlist, title: &str, url: &str) -> Result<(), String> {
    let title = title.trim();
    let url = url.trim();
    if title.is_empty() || url.is_empty() {
        return Err("Track needs a title and a URL".to_string());
    }
    let id = format!("{}-{}", playlist.tracks.len() + 1, slugify(title));
    playlist.tracks.push(Track {
        id,
        title: title.to_string(),
        url: url.to_string(),
    });
    Ok(())
}

#[component]
pub fn Admin() -> Element {
    let cities_resource = use_resource(|| api::fetch_cities());
    let playlists_resource = use_resource(|| api::fetch_playlists());

    let mut city_list = use_signal(Vec::<City>::new);
    let mut playlists = use_signal(Vec::<Playlist>::new);
    let mut dirty = use_signal(|| false);
    let mut status = use_signal(|| None::<String>);

    // Copy loaded data into editable state once.
    use_effect(move || {
        if let Some(Ok(loaded)) = &*cities_resource.read() {
            let mut sorted = loaded.clone();
            cities::renumber(&mut sorted);
            city_list.set(sorted);
        }
    });
    use_effect(move || {
        if let Some(Ok(loaded)) = &*playlists_resource.read() {
            playlists.set(loaded.clone());
        }
    });

    let mut new_title = use_signal(String::new);
    let mut new_lat = use_signal(String::new);
    let mut new_lng = use_signal(String::new);
    let mut new_zoom = use_signal(|| "12".to_string());

    let mut track_playlist = use_signal(|| 0usize);
    let mut track_title = use_signal(String::new);
    let mut track_url = use_signal(String::new);

    let rows = city_list.read().clone();
    let lists = playlists.read().clone();

    rsx! {
        div { class: "admin",
            h1 { "Trip admin" }
            if let Some(msg) = status.read().as_ref() {
                p { class: "status", "{msg}" }
            }

            div { class: "panel",
                h3 { "Cities" }
                ol { class: "city-list",
                    for city in rows {
                        li { key: "{city.id}",
                            span { class: "city-title", "{city.title}" }
                            span { class: "muted", " ({city.location.lat}, {city.location.lng}) z{city.location.zoom}" }
                            button {
                                onclick: {
                                    let id = city.id.clone();
                                    move |_| {
                                        if cities::move_up(&mut city_list.write(), &id) {
                                            dirty.set(true);
                                        }
                                    }
                                },
                                "↑"
                            }
                            button {
                                onclick: {
                                    let id = city.id.clone();
                                    move |_| {
                                        if cities::move_down(&mut city_list.write(), &id) {
                                            dirty.set(true);
                                        }
                                    }
                                },
                                "↓"
                            }
                            button {
                                class: "danger",
                                onclick: {
                                    let id = city.id.clone();
                                    move |_| {
                                        let id = id.clone();
                                        spawn(async move {
                                            match api::delete_city(&id).await {
                                                Ok(()) => {
                                                    cities::remove(&mut city_list.write(), &id);
                                                    dirty.set(true);
                                                    info!(city = %id, "City removed");
                                                }
                                                Err(e) => {
                                                    warn!(city = %id, error = %e, "Failed to remove city");
                                                    status.set(Some(format!("Could not remove {id}: {e}")));
                                                }
                                            }
                                        });
                                    }
                                },
                                "Remove"
                            }
                        }
                    }
                }
                button {
                    disabled: !*dirty.read(),
                    onclick: move |_| {
                        let snapshot = city_list.read().clone();
                        spawn(async move {
                            match api::save_city_order(&snapshot).await {
                                Ok(()) => {
                                    dirty.set(false);
                                    status.set(Some("Order saved".to_string()));
                                }
                                Err(e) => {
                                    warn!(error = %e, "Failed to save city order");
                                    status.set(Some(format!("Could not save order: {e}")));
                                }
                            }
                        });
                    },
                    "Save order"
                }

                h4 { "Add a city" }
                div { class: "city-form",
                    input { placeholder: "Title", value: "{new_title}", oninput: move |e: Event<FormData>| new_title.set(e.value()) }
                    input { placeholder: "Latitude", value: "{new_lat}", oninput: move |e: Event<FormData>| new_lat.set(e.value()) }
                    input { placeholder: "Longitude", value: "{new_lng}", oninput: move |e: Event<FormData>| new_lng.set(e.value()) }
                    input { placeholder: "Zoom", value: "{new_zoom}", oninput: move |e: Event<FormData>| new_zoom.set(e.value()) }
                    button {
                        onclick: move |_| {
                            let title = new_title.read().trim().to_string();
                            let id = slugify(&title);
                            if let Err(e) = cities::check_new_id(&city_list.read(), &id) {
                                status.set(Some(e.to_string()));
                                return;
                            }
                            let location = match parse_location(&new_lat.read(), &new_lng.read(), &new_zoom.read()) {
                                Ok(l) => l,
                                Err(e) => {
                                    status.set(Some(e));
                                    return;
                                }
                            };
                            let city = City { id, title, location, order: 0 };
                            cities::insert(&mut city_list.write(), city.clone(), None);
                            let placed = city_list
                                .read()
                                .iter()
                                .find(|c| c.id == city.id)
                                .cloned()
                                .unwrap_or(city);
                            new_title.set(String::new());
                            new_lat.set(String::new());
                            new_lng.set(String::new());
                            spawn(async move {
                                match api::save_city(&placed).await {
                                    Ok(()) => status.set(Some(format!("Added {}", placed.title))),
                                    Err(e) => {
                                        warn!(error = %e, "Failed to save city");
                                        status.set(Some(format!("Could not save {}: {e}", placed.title)));
                                    }
                                }
                            });
                        },
                        "Add"
                    }
                }
            }

            div { class: "panel",
                h3 { "Playlists" }
                for p in lists.iter() {
                    div { key: "{p.id}", class: "playlist",
                        strong { "{p.name}" }
                        ol {
                            for t in p.tracks.iter() {
                                li { key: "{t.id}", "{t.title}" }
                            }
                        }
                    }
                }
                if !lists.is_empty() {
                    div { class: "track-form",
                        select {
                            onchange: move |e: Event<FormData>| {
                                if let Ok(i) = e.value().parse::<usize>() {
                                    track_playlist.set(i);
                                }
                            },
                            for (i, p) in lists.iter().enumerate() {
                                option { value: "{i}", selected: i == *track_playlist.read(), "{p.name}" }
                            }
                        }
                        input { placeholder: "Track title", value: "{track_title}", oninput: move |e: Event<FormData>| track_title.set(e.value()) }
                        input { placeholder: "Audio URL", value: "{track_url}", oninput: move |e: Event<FormData>| track_url.set(e.value()) }
                        button {
                            onclick: move |_| {
                                let idx = *track_playlist.read();
                                let Some(mut playlist) = playlists.read().get(idx).cloned() else {
                                    return;
                                };
                                if let Err(e) = append_track(&mut playlist, &track_title.read(), &track_url.read()) {
                                    status.set(Some(e));
                                    return;
                                }
                                spawn(async move {
                                    match api::save_playlist(&playlist).await {
                                        Ok(()) => {
                                            if let Some(slot) = playlists.write().get_mut(idx) {
                                                *slot = playlist;
                                            }
                                            track_title.set(String::new());
                                            track_url.set(String::new());
                                        }
                                        Err(e) => {
                                            warn!(error = %e, "Failed to save playlist");
                                            status.set(Some(format!("Could not save playlist: {e}")));
                                        }
                                    }
                                });
                            },
                            "Add track"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Brugge"), "brugge");
        assert_eq!(slugify("  Den Haag  "), "den-haag");
        assert_eq!(slugify("Saint-Malo!"), "saint-malo");
        assert_eq!(slugify("Köln"), "k-ln");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_title_slugs_checked_against_reserved_and_taken_ids() {
        let existing = vec![City {
            id: slugify("Paris"),
            title: "Paris".to_string(),
            location: ChapterLocation::new(48.8566, 2.3522, 12.0),
            order: 0,
        }];
        assert!(cities::check_new_id(&existing, &slugify("Intro")).is_err());
        assert!(cities::check_new_id(&existing, &slugify(" PARIS ")).is_err());
        assert!(cities::check_new_id(&existing, &slugify("!!")).is_err());
        assert!(cities::check_new_id(&existing, &slugify("Lille")).is_ok());
    }

    #[test]
    fn test_parse_location_ok() {
        let loc = parse_location("50.6292", " 3.0573 ", "12").unwrap();
        assert!((loc.lat - 50.6292).abs() < 1e-9);
        assert!((loc.zoom - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_location_not_a_number() {
        assert_eq!(
            parse_location("north", "3.0", "12"),
            Err("Latitude must be a number".to_string())
        );
    }

    #[test]
    fn test_parse_location_out_of_range() {
        assert!(parse_location("95", "3.0", "12").is_err());
        assert!(parse_location("50", "3.0", "0").is_err());
    }

    #[test]
    fn test_append_track_numbers_ids() {
        let mut playlist = Playlist {
            id: "road".to_string(),
            name: "Road trip".to_string(),
            tracks: vec![],
        };
        append_track(&mut playlist, "La Mer", "/audio/la-mer.mp3").unwrap();
        append_track(&mut playlist, "La Mer", "/audio/la-mer-live.mp3").unwrap();
        let ids: Vec<_> = playlist.tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1-la-mer", "2-la-mer"]);
    }

    #[test]
    fn test_append_track_requires_fields() {
        let mut playlist = Playlist {
            id: "p".to_string(),
            name: "P".to_string(),
            tracks: vec![],
        };
        assert!(append_track(&mut playlist, " ", "/a.mp3").is_err());
        assert!(playlist.tracks.is_empty());
    }
}
