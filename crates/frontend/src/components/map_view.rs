use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use storymap_shared::models::{CameraPose, Chapter, LatLng};
use storymap_shared::projection::{format_distance, scale_bar, ScreenView};
use storymap_shared::viewport::GestureSettings;

use crate::coords;

const MAP_CONTAINER_ID: &str = "story-map-container";
const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Wheel pixels per zoom level.
const WHEEL_PX_PER_ZOOM: f64 = 400.0;
const KEY_PAN_PX: f64 = 80.0;
const SCALE_BAR_MAX_PX: f64 = 120.0;

const ROUTE_STROKE: &str = "#e4572e";
const MARKER_FILL: &str = "#2e4057";
const ACTIVE_MARKER_FILL: &str = "#e4572e";

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Position shown in the explore readout: under the cursor, or the map center.
fn readout_position(pose: CameraPose, size: (f64, f64), cursor: Option<(f64, f64)>) -> LatLng {
    match cursor {
        Some((sx, sy)) => coords::screen_to_lat_lng(pose, size, sx, sy),
        None => pose.center,
    }
}

/// Zoom change for a wheel movement. Scrolling up zooms in; one event never
/// moves more than a full level.
fn wheel_zoom_delta(delta_y: f64) -> f64 {
    (-delta_y / WHEEL_PX_PER_ZOOM).clamp(-1.0, 1.0)
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn build_route_line(svg: &mut String, view: &ScreenView, path: &[LatLng]) {
    if path.len() < 2 {
        return;
    }
    let points: Vec<String> = path
        .iter()
        .map(|p| {
            let (x, y) = view.project_to_screen(*p);
            format!("{x:.1},{y:.1}")
        })
        .collect();
    svg.push_str(&format!(
        r#"<polyline points="{}" fill="none" stroke="{ROUTE_STROKE}" stroke-width="3" stroke-dasharray="8 6" stroke-linecap="round"/>"#,
        points.join(" ")
    ));
}

fn build_chapter_markers(
    svg: &mut String,
    view: &ScreenView,
    chapters: &[Chapter],
    active: Option<&str>,
) {
    for chapter in chapters {
        let (x, y) = view.project_to_screen(chapter.location.center());
        let is_active = active == Some(chapter.id.as_str());
        let (fill, r) = if is_active {
            (ACTIVE_MARKER_FILL, 9.0)
        } else {
            (MARKER_FILL, 6.0)
        };
        let title = escape_xml(&chapter.title);
        svg.push_str(&format!(r##"<g role="img"><title>{title}</title>"##));
        svg.push_str(&format!(
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="{r}" fill="{fill}" stroke="white" stroke-width="2"/>"#
        ));
        if is_active {
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" class="marker-label">{title}</text>"#,
                x + 12.0,
                y + 4.0
            ));
        }
        svg.push_str("</g>");
    }
}

/// Full SVG overlay: the revealed route first, markers on top.
fn build_svg_content(
    view: &ScreenView,
    chapters: &[Chapter],
    active: Option<&str>,
    path: &[LatLng],
) -> String {
    let mut svg = String::with_capacity(4096);
    build_route_line(&mut svg, view, path);
    build_chapter_markers(&mut svg, view, chapters, active);
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" style="position:absolute;top:0;left:0;pointer-events:none;z-index:5;">{svg}</svg>"#,
        w = view.width,
        h = view.height,
    )
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// The map: raster tiles, route and markers for the current camera pose.
///
/// User gestures only produce poses through `on_user_pose`; whether they are
/// applied is up to the owner of the camera.
#[component]
pub fn MapView(
    pose: CameraPose,
    path: Vec<LatLng>,
    chapters: Vec<Chapter>,
    active_chapter: Option<String>,
    gestures: GestureSettings,
    on_user_pose: EventHandler<CameraPose>,
) -> Element {
    let mut drag_start = use_signal(|| None::<((f64, f64), CameraPose)>);
    let mut touch_start = use_signal(|| None::<((f64, f64), CameraPose)>);
    let mut hover = use_signal(|| None::<(f64, f64)>);

    let size = coords::container_size(MAP_CONTAINER_ID);
    let view = ScreenView::new(pose, size.0, size.1);
    let tiles = view.visible_tiles();
    let svg_html = build_svg_content(&view, &chapters, active_chapter.as_deref(), &path);

    let (bar_m, bar_px) = scale_bar(pose.center.lat, pose.zoom, SCALE_BAR_MAX_PX);
    let bar_label = format_distance(bar_m);
    let readout = coords::format_lat_lng(readout_position(pose, size, *hover.read()));

    let container_class = match (gestures.drag_pan, drag_start.read().is_some()) {
        (true, true) => "map-container explore dragging",
        (true, false) => "map-container explore",
        _ => "map-container locked",
    };

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",
            tabindex: if gestures.keyboard { "0" } else { "-1" },

            onwheel: move |evt: Event<WheelData>| {
                if !gestures.scroll_zoom {
                    return;
                }
                evt.prevent_default();
                let delta = wheel_zoom_delta(wheel_delta_y(evt.data().delta()));
                let client = evt.data().client_coordinates();
                let Some((sx, sy)) = coords::client_to_screen(client.x, client.y, MAP_CONTAINER_ID) else {
                    return;
                };
                on_user_pose.call(view.zoom_around(delta, sx, sy));
            },

            onmousedown: move |evt: Event<MouseData>| {
                if !gestures.drag_pan || evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                drag_start.set(Some(((client.x, client.y), pose)));
            },

            onmousemove: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                if gestures.scale_control {
                    hover.set(coords::client_to_screen(client.x, client.y, MAP_CONTAINER_ID));
                }
                let Some(((x0, y0), start_pose)) = *drag_start.read() else {
                    return;
                };
                let start_view = ScreenView::new(start_pose, size.0, size.1);
                on_user_pose.call(start_view.pan_by_pixels(client.x - x0, client.y - y0));
            },

            onmouseup: move |_| drag_start.set(None),
            onmouseleave: move |_| {
                drag_start.set(None);
                hover.set(None);
            },

            ondoubleclick: move |evt: Event<MouseData>| {
                if !gestures.double_click_zoom {
                    return;
                }
                let client = evt.client_coordinates();
                if let Some((sx, sy)) = coords::client_to_screen(client.x, client.y, MAP_CONTAINER_ID) {
                    on_user_pose.call(view.zoom_around(1.0, sx, sy));
                }
            },

            ontouchstart: move |evt: Event<TouchData>| {
                let touches = evt.data().touches();
                if touches.len() == 1 && gestures.drag_pan {
                    let c = touches[0].client_coordinates();
                    touch_start.set(Some(((c.x, c.y), pose)));
                } else {
                    touch_start.set(None);
                }
            },

            ontouchmove: move |evt: Event<TouchData>| {
                let touches = evt.data().touches();
                let Some(((x0, y0), start_pose)) = *touch_start.read() else {
                    return;
                };
                if touches.len() != 1 {
                    return;
                }
                evt.prevent_default();
                let c = touches[0].client_coordinates();
                let start_view = ScreenView::new(start_pose, size.0, size.1);
                on_user_pose.call(start_view.pan_by_pixels(c.x - x0, c.y - y0));
            },

            ontouchend: move |_| touch_start.set(None),
            ontouchcancel: move |_| touch_start.set(None),

            onkeydown: move |evt: Event<KeyboardData>| {
                if !gestures.keyboard {
                    return;
                }
                let next = match evt.key() {
                    Key::ArrowLeft => view.pan_by_pixels(KEY_PAN_PX, 0.0),
                    Key::ArrowRight => view.pan_by_pixels(-KEY_PAN_PX, 0.0),
                    Key::ArrowUp => view.pan_by_pixels(0.0, KEY_PAN_PX),
                    Key::ArrowDown => view.pan_by_pixels(0.0, -KEY_PAN_PX),
                    Key::Character(c) if c == "+" || c == "=" => {
                        view.zoom_around(1.0, size.0 / 2.0, size.1 / 2.0)
                    }
                    Key::Character(c) if c == "-" => {
                        view.zoom_around(-1.0, size.0 / 2.0, size.1 / 2.0)
                    }
                    _ => return,
                };
                evt.prevent_default();
                on_user_pose.call(next);
            },

            div { class: "map-tiles",
                for tile in tiles {
                    img {
                        key: "{tile.z}-{tile.x}-{tile.y}-{tile.left}",
                        src: "{tile.url(TILE_URL)}",
                        draggable: "false",
                        alt: "",
                        style: "position:absolute;left:{tile.left}px;top:{tile.top}px;width:{tile.size}px;height:{tile.size}px;",
                    }
                }
            }

            div {
                dangerous_inner_html: "{svg_html}",
                style: "position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none;",
            }

            if gestures.navigation_control {
                div { class: "map-zoom-controls",
                    button {
                        title: "Zoom in",
                        onclick: move |_| on_user_pose.call(view.zoom_around(1.0, size.0 / 2.0, size.1 / 2.0)),
                        "+"
                    }
                    button {
                        title: "Zoom out",
                        onclick: move |_| on_user_pose.call(view.zoom_around(-1.0, size.0 / 2.0, size.1 / 2.0)),
                        "−"
                    }
                }
            }

            if gestures.scale_control && bar_px > 0.0 {
                div { class: "map-scale",
                    div { class: "map-scale-bar", style: "width:{bar_px}px;", "{bar_label}" }
                    span { class: "map-readout", "{readout}" }
                }
            }

            div { class: "map-attribution", "© OpenStreetMap contributors" }
        }
    }
}
