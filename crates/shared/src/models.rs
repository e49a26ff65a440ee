use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Reserved chapter id for the overview pose shown before any real chapter.
pub const INTRO_ID: &str = "intro";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Clamp into the valid lat/lng box. Non-finite components collapse to 0.
    pub fn clamped(&self) -> Self {
        let fix = |v: f64, limit: f64| if v.is_finite() { v.clamp(-limit, limit) } else { 0.0 };
        Self {
            lat: fix(self.lat, 90.0),
            lng: fix(self.lng, 180.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChapterLocation {
    pub lat: f64,
    pub lng: f64,
    pub zoom: f64,
}

impl ChapterLocation {
    pub fn new(lat: f64, lng: f64, zoom: f64) -> Self {
        Self { lat, lng, zoom }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if !self.lat.is_finite() || !self.lng.is_finite() || !self.zoom.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(GeometryError::LatitudeOutOfRange(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(GeometryError::LongitudeOutOfRange(self.lng));
        }
        if self.zoom <= 0.0 {
            return Err(GeometryError::NonPositiveZoom(self.zoom));
        }
        Ok(())
    }
}

impl From<ChapterLocation> for CameraPose {
    fn from(loc: ChapterLocation) -> Self {
        CameraPose {
            center: loc.center(),
            zoom: loc.zoom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub location: ChapterLocation,
}

/// Find a chapter by id in an ordered chapter list.
pub fn find_chapter<'a>(chapters: &'a [Chapter], id: &str) -> Option<&'a Chapter> {
    chapters.iter().find(|c| c.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub center: LatLng,
    pub zoom: f64,
}

impl CameraPose {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self { center, zoom }
    }

    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.zoom.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Joyful,
    Calm,
    Nostalgic,
    Adventurous,
    Melancholic,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Joyful,
        Mood::Calm,
        Mood::Nostalgic,
        Mood::Adventurous,
        Mood::Melancholic,
    ];

    pub fn from_slug(s: &str) -> Option<Mood> {
        Mood::ALL.into_iter().find(|m| m.slug() == s)
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Mood::Joyful => "joyful",
            Mood::Calm => "calm",
            Mood::Nostalgic => "nostalgic",
            Mood::Adventurous => "adventurous",
            Mood::Melancholic => "melancholic",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mood::Joyful => write!(f, "Joyful"),
            Mood::Calm => write!(f, "Calm"),
            Mood::Nostalgic => write!(f, "Nostalgic"),
            Mood::Adventurous => write!(f, "Adventurous"),
            Mood::Melancholic => write!(f, "Melancholic"),
        }
    }
}

/// A personal note attached to a chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: String,
    pub chapter_id: String,
    pub author: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub mood: Option<Mood>,
    /// RFC 3339 timestamp as written by the document store.
    pub created_at: String,
}

impl Memory {
    #[cfg(feature = "uuid-support")]
    pub fn new(chapter_id: &str, author: &str, text: &str, mood: Option<Mood>, created_at: &str) -> Self {
        Memory {
            id: uuid::Uuid::new_v4().to_string(),
            chapter_id: chapter_id.to_string(),
            author: author.to_string(),
            text: text.trim().to_string(),
            photo_urls: Vec::new(),
            mood,
            created_at: created_at.to_string(),
        }
    }
}

/// Sort memories newest first. RFC 3339 strings in UTC sort lexically.
pub fn sorted_newest_first(mut memories: Vec<Memory>) -> Vec<Memory> {
    memories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    memories
}

/// A chapter as managed from the admin screen, carrying its display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub title: String,
    pub location: ChapterLocation,
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Playlist {
    /// The track after `current`, wrapping around. `None` for an empty playlist.
    pub fn next_track(&self, current: Option<&str>) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        let idx = current
            .and_then(|id| self.tracks.iter().position(|t| t.id == id))
            .map(|i| (i + 1) % self.tracks.len())
            .unwrap_or(0);
        self.tracks.get(idx)
    }
}
