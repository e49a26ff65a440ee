use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use storymap_shared::config::CrossfadeConfig;
use storymap_shared::crossfade::Crossfade;
use storymap_shared::models::{Playlist, Track};
use tracing::{debug, warn};
use web_sys::HtmlAudioElement;

use crate::api;

fn start_track(track: &Track) -> Option<HtmlAudioElement> {
    let audio = HtmlAudioElement::new_with_src(&track.url).ok()?;
    audio.set_volume(0.0);
    if let Err(e) = audio.play() {
        warn!(track = %track.id, ?e, "Browser refused to start playback");
    }
    Some(audio)
}

/// Track to switch to, or `None` while a crossfade is still running so two
/// fades never drive the same element.
fn track_to_start(playlist: &Playlist, current: Option<&str>, fading: bool) -> Option<Track> {
    if fading {
        return None;
    }
    playlist.next_track(current).cloned()
}

/// Ramp `outgoing` down and `incoming` up, then stop `outgoing`.
async fn run_crossfade(
    outgoing: Option<HtmlAudioElement>,
    incoming: HtmlAudioElement,
    config: CrossfadeConfig,
) {
    let mut fade = Crossfade::from_config(&config);
    let step_ms = fade.step_ms().max(1.0) as u32;
    while let Some(step) = fade.step() {
        TimeoutFuture::new(step_ms).await;
        if let Some(old) = &outgoing {
            old.set_volume(step.outgoing);
        }
        incoming.set_volume(step.incoming);
    }
    if let Some(old) = outgoing {
        let _ = old.pause();
    }
}

#[component]
pub fn MusicPlayer(crossfade: CrossfadeConfig) -> Element {
    let playlists = use_resource(|| async {
        api::fetch_playlists().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load playlists");
            vec![]
        })
    });
    let mut selected = use_signal(|| 0usize);
    let mut current = use_signal(|| None::<Track>);
    let mut audio = use_signal(|| None::<HtmlAudioElement>);
    let mut fading = use_signal(|| false);

    let lists: Vec<Playlist> = playlists.read().clone().unwrap_or_default();
    if lists.is_empty() {
        return rsx! {};
    }

    let idx = (*selected.read()).min(lists.len() - 1);
    let playlist = lists[idx].clone();
    let now_playing = current.read().as_ref().map(|t| t.title.clone());

    let mut play_next = move |playlist: &Playlist| {
        let current_id = current.read().as_ref().map(|t| t.id.clone());
        let Some(track) = track_to_start(playlist, current_id.as_deref(), *fading.peek()) else {
            return;
        };
        let Some(incoming) = start_track(&track) else {
            return;
        };
        debug!(track = %track.id, "Crossfading to next track");
        let outgoing = audio.write().replace(incoming.clone());
        current.set(Some(track));
        let config = crossfade.clone();
        fading.set(true);
        spawn(async move {
            run_crossfade(outgoing, incoming, config).await;
            fading.set(false);
        });
    };

    let mut stop = move || {
        if let Some(a) = audio.write().take() {
            let _ = a.pause();
        }
        current.set(None);
    };

    let next_list = playlist.clone();

    rsx! {
        div { class: "music-player",
            if lists.len() > 1 {
                select {
                    onchange: move |evt: Event<FormData>| {
                        if let Ok(i) = evt.value().parse::<usize>() {
                            selected.set(i);
                        }
                    },
                    for (i, p) in lists.iter().enumerate() {
                        option { value: "{i}", selected: i == idx, "{p.name}" }
                    }
                }
            }
            if let Some(title) = now_playing {
                span { class: "now-playing", "♪ {title}" }
                button { disabled: *fading.read(), onclick: move |_| play_next(&next_list), "Next" }
                button { onclick: move |_| stop(), "Stop" }
            } else {
                button { onclick: move |_| play_next(&playlist), "Play {playlist.name}" }
            }
        }
    }
}
