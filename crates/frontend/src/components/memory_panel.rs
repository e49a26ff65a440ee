use dioxus::prelude::*;
use storymap_shared::models::{Memory, Mood};
use tracing::warn;

use crate::api;

/// The two people keeping the journal.
pub const AUTHORS: [&str; 2] = ["Alex", "Sam"];

/// Validate the add-memory form. Returns the trimmed text.
fn validate_memory_text(text: &str) -> Result<&str, &'static str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("Write something first");
    }
    if trimmed.chars().count() > 2000 {
        return Err("Keep it under 2000 characters");
    }
    Ok(trimmed)
}

fn mood_label(mood: Option<Mood>) -> String {
    mood.map(|m| m.to_string()).unwrap_or_default()
}

/// Date part of an RFC 3339 timestamp.
fn display_date(created_at: &str) -> &str {
    created_at.split('T').next().unwrap_or(created_at)
}

#[component]
pub fn MemoryPanel(chapter_id: String) -> Element {
    let mut reload = use_signal(|| 0u32);
    let id_for_fetch = chapter_id.clone();
    let memories = use_resource(move || {
        let id = id_for_fetch.clone();
        let _ = reload();
        async move { api::fetch_memories(&id).await }
    });

    let mut author = use_signal(|| AUTHORS[0].to_string());
    let mut text = use_signal(String::new);
    let mut mood = use_signal(|| None::<Mood>);
    let mut form_error = use_signal(|| None::<String>);
    let mut saving = use_signal(|| false);

    let list: Vec<Memory> = match &*memories.read() {
        Some(Ok(m)) => m.clone(),
        Some(Err(e)) => {
            warn!(chapter = %chapter_id, error = %e, "Failed to load memories");
            vec![]
        }
        None => vec![],
    };

    rsx! {
        div { class: "memory-panel",
            h4 { "Memories" }
            if list.is_empty() {
                p { class: "muted", "Nothing here yet." }
            }
            ul { class: "memory-list",
                for m in list {
                    li { key: "{m.id}", class: "memory",
                        div { class: "memory-meta",
                            span { class: "author", "{m.author}" }
                            span { class: "date", "{display_date(&m.created_at)}" }
                            if m.mood.is_some() {
                                span { class: "mood", "{mood_label(m.mood)}" }
                            }
                        }
                        p { "{m.text}" }
                        for url in m.photo_urls.iter() {
                            img { class: "memory-photo", src: "{url}", alt: "" }
                        }
                    }
                }
            }

            div { class: "memory-form",
                select {
                    value: "{author}",
                    onchange: move |evt: Event<FormData>| author.set(evt.value()),
                    for a in AUTHORS {
                        option { value: "{a}", selected: *author.read() == a, "{a}" }
                    }
                }
                select {
                    onchange: move |evt: Event<FormData>| mood.set(Mood::from_slug(&evt.value())),
                    option { value: "", "No mood" }
                    for m in Mood::ALL {
                        option { value: "{m.slug()}", selected: *mood.read() == Some(m), "{m}" }
                    }
                }
                textarea {
                    placeholder: "What do you remember?",
                    value: "{text}",
                    oninput: move |evt: Event<FormData>| text.set(evt.value()),
                }
                if let Some(err) = form_error.read().as_ref() {
                    p { class: "form-error", "{err}" }
                }
                button {
                    disabled: *saving.read(),
                    onclick: move |_| {
                        let body = text.read().clone();
                        let trimmed = match validate_memory_text(&body) {
                            Ok(t) => t.to_string(),
                            Err(e) => {
                                form_error.set(Some(e.to_string()));
                                return;
                            }
                        };
                        let memory = Memory::new(
                            &chapter_id,
                            &author.read(),
                            &trimmed,
                            *mood.read(),
                            &api::iso_now(),
                        );
                        form_error.set(None);
                        saving.set(true);
                        spawn(async move {
                            match api::add_memory(&memory).await {
                                Ok(()) => {
                                    text.set(String::new());
                                    mood.set(None);
                                    reload += 1;
                                }
                                Err(e) => {
                                    warn!(error = %e, "Failed to save memory");
                                    form_error.set(Some(format!("Could not save: {e}")));
                                }
                            }
                            saving.set(false);
                        });
                    },
                    "Add memory"
                }
            }
        }
    }
}
