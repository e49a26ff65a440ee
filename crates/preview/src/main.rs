use serde::{Deserialize, Serialize};
use storymap_shared::cities;
use storymap_shared::config::StoryConfig;
use storymap_shared::flight::{FlightAnimator, FlightPhase, VirtualScheduler};
use storymap_shared::models::{Chapter, City, INTRO_ID};
use storymap_shared::reactor::{ChapterReactor, Reaction};
use tracing::{debug, info, warn};

const DEFAULT_FPS: f64 = 60.0;
const USAGE: &str =
    "Usage: storymap-preview --story <file|url> [--config <file>] [--fps <frames-per-second>]";

/// A story is either a bare city list or a document-store listing.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoryInput {
    Cities(Vec<City>),
    Documents { documents: Vec<City> },
}

/// One line of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct FrameRecord {
    chapter: String,
    /// `None` on the frame that lands the flight.
    phase: Option<FlightPhase>,
    /// Milliseconds since the simulation started.
    t: f64,
    lat: f64,
    lng: f64,
    zoom: f64,
    revealed: usize,
}

fn load_text(source: &str) -> Result<String, String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        eprintln!("Fetching story from {source}...");
        reqwest::blocking::get(source)
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| format!("Failed to fetch {source}: {e}"))
    } else {
        std::fs::read_to_string(source).map_err(|e| format!("Failed to read {source}: {e}"))
    }
}

fn parse_story(text: &str) -> Result<Vec<Chapter>, String> {
    let input: StoryInput =
        serde_json::from_str(text).map_err(|e| format!("Invalid story document: {e}"))?;
    let cities = match input {
        StoryInput::Cities(c) | StoryInput::Documents { documents: c } => c,
    };
    let chapters = cities::to_chapters(&cities);
    for chapter in &chapters {
        if let Err(e) = chapter.location.validate() {
            warn!(chapter = %chapter.id, error = %e, "Chapter has an invalid location");
        }
    }
    Ok(chapters)
}

/// Walk the story from the intro through every chapter, letting each flight
/// finish before the next chapter becomes active.
fn simulate(chapters: &[Chapter], config: &StoryConfig, fps: f64) -> Vec<FrameRecord> {
    let frame_ms = 1000.0 / fps;
    let mut animator = FlightAnimator::new(config.flight.clone(), config.intro_view.into());
    let mut reactor = ChapterReactor::new(config.intro_view);
    let mut scheduler = VirtualScheduler::new();
    let mut records = Vec::new();
    let mut now = 0.0;

    for chapter in chapters {
        let reaction =
            reactor.on_chapter_change(Some(&chapter.id), chapters, &mut animator, &mut scheduler, now);
        debug!(chapter = %chapter.id, ?reaction, "Chapter activated");
        if !matches!(reaction, Reaction::Flew { .. }) {
            continue;
        }
        while scheduler.take() {
            now += frame_ms;
            let Some(frame) = animator.tick(now, &mut scheduler) else {
                continue;
            };
            records.push(FrameRecord {
                chapter: chapter.id.clone(),
                phase: (!frame.finished).then_some(frame.phase),
                t: now,
                lat: frame.pose.center.lat,
                lng: frame.pose.center.lng,
                zoom: frame.pose.zoom,
                revealed: frame.revealed,
            });
        }
    }
    records
}

fn get_arg(flag: &str) -> Option<String> {
    std::env::args()
        .skip_while(|a| a != flag)
        .nth(1)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storymap_preview=info,storymap_shared=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let story_source = get_arg("--story").unwrap_or_else(|| {
        eprintln!("Error: --story <file|url> is required");
        eprintln!("{USAGE}");
        std::process::exit(1);
    });

    let config = match get_arg("--config") {
        Some(path) => load_text(&path)
            .and_then(|text| StoryConfig::from_json(&text).map_err(|e| format!("{path}: {e}")))
            .unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }),
        None => StoryConfig::default(),
    };

    let fps = match get_arg("--fps") {
        Some(v) => match v.parse::<f64>() {
            Ok(f) if f.is_finite() && f > 0.0 => f,
            _ => {
                eprintln!("Error: --fps must be a positive number, got {v}");
                std::process::exit(1);
            }
        },
        None => DEFAULT_FPS,
    };

    let chapters = load_text(&story_source)
        .and_then(|text| parse_story(&text))
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    info!(chapters = chapters.len(), fps, intro = INTRO_ID, "Simulating story");
    let records = simulate(&chapters, &config, fps);
    info!(frames = records.len(), "Simulation finished");

    for record in &records {
        match serde_json::to_string(record) {
            Ok(line) => println!("{line}"),
            Err(e) => {
                eprintln!("Error: failed to encode frame: {e}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIP: &str = r#"[
        {"id":"brugge","title":"Brugge","location":{"lat":51.2093,"lng":3.2247,"zoom":13},"order":2},
        {"id":"paris","title":"Paris","location":{"lat":48.8566,"lng":2.3522,"zoom":12},"order":0},
        {"id":"lille","title":"Lille","location":{"lat":50.6292,"lng":3.0573,"zoom":12},"order":1}
    ]"#;

    #[test]
    fn test_parse_story_sorts_by_order() {
        let chapters = parse_story(TRIP).unwrap();
        let ids: Vec<_> = chapters.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["paris", "lille", "brugge"]);
    }

    #[test]
    fn test_parse_story_accepts_document_listing() {
        let text = format!(r#"{{"documents":{TRIP}}}"#);
        assert_eq!(parse_story(&text).unwrap().len(), 3);
    }

    #[test]
    fn test_parse_story_rejects_garbage() {
        assert!(parse_story("{\"chapters\":1}").is_err());
    }

    #[test]
    fn test_simulate_lands_on_every_chapter() {
        let chapters = parse_story(TRIP).unwrap();
        let records = simulate(&chapters, &StoryConfig::default(), 60.0);
        let landings: Vec<_> = records.iter().filter(|r| r.phase.is_none()).collect();
        assert_eq!(landings.len(), 3);
        for (landing, chapter) in landings.iter().zip(&chapters) {
            assert_eq!(landing.chapter, chapter.id);
            assert_eq!(landing.lat, chapter.location.lat);
            assert_eq!(landing.lng, chapter.location.lng);
            assert_eq!(landing.zoom, chapter.location.zoom);
        }
    }

    #[test]
    fn test_simulate_first_flight_has_no_line() {
        let chapters = parse_story(TRIP).unwrap();
        let records = simulate(&chapters, &StoryConfig::default(), 60.0);
        assert!(records
            .iter()
            .filter(|r| r.chapter == "paris")
            .all(|r| r.revealed == 0));
        let brugge_landing = records
            .iter()
            .find(|r| r.chapter == "brugge" && r.phase.is_none())
            .unwrap();
        assert_eq!(brugge_landing.revealed, 51);
    }

    #[test]
    fn test_simulate_time_is_increasing() {
        let chapters = parse_story(TRIP).unwrap();
        let records = simulate(&chapters, &StoryConfig::default(), 30.0);
        assert!(records.windows(2).all(|w| w[0].t < w[1].t));
    }

    #[test]
    fn test_frame_record_json_shape() {
        let record = FrameRecord {
            chapter: "lille".to_string(),
            phase: Some(FlightPhase::ZoomOut),
            t: 16.0,
            lat: 50.0,
            lng: 3.0,
            zoom: 9.0,
            revealed: 0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["phase"], "zoomOut");
        assert_eq!(json["revealed"], 0);
    }
}
