mod api;
mod components;
mod coords;
mod frame;
mod pages;

use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/admin")]
    AdminView {},
}

#[component]
fn Home() -> Element {
    rsx! {
        pages::story::Story {}
    }
}

#[component]
fn AdminView() -> Element {
    rsx! {
        pages::admin::Admin {}
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    launch(App);
}
