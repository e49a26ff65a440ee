use dioxus::prelude::*;
use storymap_shared::cities;
use storymap_shared::config::StoryConfig;
use storymap_shared::flight::FlightAnimator;
use storymap_shared::models::Chapter;
use storymap_shared::reactor::{ChapterReactor, Reaction};
use storymap_shared::story::{active_section, section_ids};
use storymap_shared::viewport::{GestureSettings, ViewportModeController};
use tracing::{debug, warn};

use crate::api;
use crate::components::chapter_list::{measure_sections, ChapterList};
use crate::components::explore_toggle::ExploreToggle;
use crate::components::map_view::MapView;
use crate::components::music_player::MusicPlayer;
use crate::coords;
use crate::frame::{self, FrameLoop, FrameRequest};

const STORY_COLUMN_ID: &str = "story-column";

/// Loads the story config, then hands over to the story view.
#[component]
pub fn Story() -> Element {
    let config_resource =
        use_resource(|| async { api::config_or_default(api::fetch_story_config().await) });

    let config = config_resource.read();
    match &*config {
        Some(config) => rsx! { StoryView { config: config.clone() } },
        None => rsx! { div { class: "loading", "Loading…" } },
    }
}

/// Tick the animator once per display frame until it stops asking for frames.
fn spawn_frame_loop(mut animator: Signal<FlightAnimator>, mut frame_loop: Signal<FrameLoop>) {
    if !frame_loop.write().start() {
        return;
    }
    spawn(async move {
        loop {
            let ts = frame::next_frame().await;
            let mut request = FrameRequest::default();
            animator.write().tick(ts, &mut request);
            if !request.requested() {
                break;
            }
        }
        frame_loop.write().stop();
    });
}

#[component]
fn StoryView(config: StoryConfig) -> Element {
    let cities_resource = use_resource(|| api::fetch_cities());

    let flight_config = config.flight.clone();
    let intro = config.intro_view;
    let mut animator = use_signal(move || FlightAnimator::new(flight_config, intro.into()));
    let mut reactor = use_signal(move || ChapterReactor::new(intro));
    let mut viewport = use_signal(ViewportModeController::new);
    let mut gestures = use_signal(GestureSettings::default);
    let explore = use_signal(|| false);
    let mut active_chapter = use_signal(|| None::<String>);
    let frame_loop = use_signal(FrameLoop::default);

    let chapters = use_memo(move || match &*cities_resource.read() {
        Some(Ok(list)) => cities::to_chapters(list),
        Some(Err(e)) => {
            warn!(error = %e, "Failed to load cities");
            vec![]
        }
        None => vec![],
    });

    // Explore mode only changes gestures; it never moves the camera.
    use_effect(move || {
        let on = *explore.read();
        reactor.write().set_explore_mode(on);
        let settings = viewport.write().apply(on);
        gestures.set(settings);
    });

    // Chapter changes drive the camera.
    use_effect(move || {
        let active = active_chapter.read().clone();
        let list: Vec<Chapter> = chapters.read().clone();
        let mut request = FrameRequest::default();
        let reaction = reactor.write().on_chapter_change(
            active.as_deref(),
            &list,
            &mut animator.write(),
            &mut request,
            frame::now_ms(),
        );
        if let Reaction::MissingChapter(id) = &reaction {
            debug!(chapter = %id, "Waiting for chapter to load");
        }
        if request.requested() {
            spawn_frame_loop(animator, frame_loop);
        }
    });

    let (pose, path) = {
        let anim = animator.read();
        (anim.pose(), anim.revealed_path().to_vec())
    };
    let chapter_list = chapters.read().clone();
    let active = active_chapter.read().clone();
    let exploring = *explore.read();
    let ids = section_ids(&chapter_list);

    rsx! {
        div { class: if exploring { "story exploring" } else { "story" },
            div { class: "story-map",
                MapView {
                    pose: pose,
                    path: path,
                    chapters: chapter_list.clone(),
                    active_chapter: active.clone(),
                    gestures: *gestures.read(),
                    on_user_pose: move |p| {
                        animator.write().set_user_pose(p);
                    },
                }
                div { class: "story-toolbar",
                    ExploreToggle { explore: explore }
                    MusicPlayer { crossfade: config.crossfade.clone() }
                }
            }
            div {
                id: STORY_COLUMN_ID,
                class: "story-column",
                onscroll: move |_| {
                    let Some(rect) = coords::element_rect(STORY_COLUMN_ID) else {
                        return;
                    };
                    let probe = rect.top() + rect.height() / 2.0;
                    let sections = measure_sections(&ids);
                    let next = active_section(&sections, probe).map(str::to_string);
                    if *active_chapter.peek() != next {
                        active_chapter.set(next);
                    }
                },
                ChapterList { chapters: chapter_list, active_chapter: active }
            }
        }
    }
}
