use dioxus::prelude::*;

#[component]
pub fn ExploreToggle(explore: Signal<bool>) -> Element {
    let on = *explore.read();

    rsx! {
        button {
            class: if on { "explore-toggle active" } else { "explore-toggle" },
            "aria-pressed": "{on}",
            onclick: move |_| {
                let next = !*explore.read();
                explore.set(next);
            },
            if on { "Back to the story" } else { "Explore the map" }
        }
    }
}
