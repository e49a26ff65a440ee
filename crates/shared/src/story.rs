use crate::models::{Chapter, INTRO_ID};

/// Vertical extent of one story section in page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBox {
    pub id: String,
    pub top: f64,
    pub bottom: f64,
}

impl SectionBox {
    pub fn new(id: &str, top: f64, bottom: f64) -> Self {
        Self {
            id: id.to_string(),
            top,
            bottom,
        }
    }

    fn contains(&self, y: f64) -> bool {
        self.top <= y && y < self.bottom
    }
}

/// Section ids in scroll order: the intro first, then every chapter.
pub fn section_ids(chapters: &[Chapter]) -> Vec<String> {
    std::iter::once(INTRO_ID.to_string())
        .chain(chapters.iter().map(|c| c.id.clone()))
        .collect()
}

/// The section crossing the probe line at `probe_y`.
///
/// Above the first section the intro is active. In a gap between sections,
/// or below the last one, the last section whose top is above the probe wins.
pub fn active_section(sections: &[SectionBox], probe_y: f64) -> Option<&str> {
    if let Some(hit) = sections.iter().find(|s| s.contains(probe_y)) {
        return Some(&hit.id);
    }
    match sections.first() {
        None => None,
        Some(first) if probe_y < first.top => Some(INTRO_ID),
        Some(_) => sections
            .iter()
            .rev()
            .find(|s| s.top <= probe_y)
            .map(|s| s.id.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChapterLocation;

    fn sections() -> Vec<SectionBox> {
        vec![
            SectionBox::new("intro", 0.0, 800.0),
            SectionBox::new("paris", 800.0, 1600.0),
            SectionBox::new("lille", 1700.0, 2500.0),
        ]
    }

    #[test]
    fn test_active_section_hit() {
        let s = sections();
        assert_eq!(active_section(&s, 400.0), Some("intro"));
        assert_eq!(active_section(&s, 800.0), Some("paris"));
        assert_eq!(active_section(&s, 2000.0), Some("lille"));
    }

    #[test]
    fn test_active_section_gap_keeps_previous() {
        assert_eq!(active_section(&sections(), 1650.0), Some("paris"));
    }

    #[test]
    fn test_active_section_past_end() {
        assert_eq!(active_section(&sections(), 9000.0), Some("lille"));
    }

    #[test]
    fn test_active_section_above_first() {
        let s = vec![SectionBox::new("paris", 500.0, 900.0)];
        assert_eq!(active_section(&s, 100.0), Some(INTRO_ID));
    }

    #[test]
    fn test_active_section_empty() {
        assert_eq!(active_section(&[], 100.0), None);
    }

    #[test]
    fn test_section_ids_start_with_intro() {
        let chapters = vec![Chapter {
            id: "paris".to_string(),
            title: "Paris".to_string(),
            location: ChapterLocation::new(48.8566, 2.3522, 12.0),
        }];
        assert_eq!(section_ids(&chapters), vec!["intro", "paris"]);
    }
}
