use dioxus::prelude::*;
use storymap_shared::models::{Chapter, INTRO_ID};
use storymap_shared::story::SectionBox;

use crate::components::memory_panel::MemoryPanel;
use crate::coords;

pub fn section_dom_id(chapter_id: &str) -> String {
    format!("section-{chapter_id}")
}

/// Measure every section relative to the viewport. Sections not yet in the
/// DOM are left out.
pub fn measure_sections(ids: &[String]) -> Vec<SectionBox> {
    ids.iter()
        .filter_map(|id| {
            let rect = coords::element_rect(&section_dom_id(id))?;
            Some(SectionBox::new(id, rect.top(), rect.bottom()))
        })
        .collect()
}

/// The scrolling narrative: an intro section followed by one section per chapter.
#[component]
pub fn ChapterList(chapters: Vec<Chapter>, active_chapter: Option<String>) -> Element {
    let active = active_chapter.unwrap_or_else(|| INTRO_ID.to_string());

    rsx! {
        div { class: "chapters",
            section {
                id: section_dom_id(INTRO_ID),
                class: if active == INTRO_ID { "chapter intro active" } else { "chapter intro" },
                h1 { "Our Journey" }
                p { "Scroll to follow the route, city by city." }
            }
            for (i, chapter) in chapters.into_iter().enumerate() {
                section {
                    key: "{chapter.id}",
                    id: section_dom_id(&chapter.id),
                    class: if active == chapter.id { "chapter active" } else { "chapter" },
                    span { class: "chapter-number", "{i + 1}" }
                    h2 { "{chapter.title}" }
                    MemoryPanel { chapter_id: chapter.id.clone() }
                }
            }
        }
    }
}
