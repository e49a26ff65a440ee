//! Turns active-chapter changes into camera moves.

use tracing::debug;

use crate::flight::{FlightAnimator, FlyTo, FrameScheduler};
use crate::models::{find_chapter, Chapter, ChapterLocation, INTRO_ID};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveChapter {
    #[default]
    Intro,
    Chapter(String),
}

impl ActiveChapter {
    /// `None` and the reserved intro id both mean the overview.
    pub fn from_id(id: Option<&str>) -> Self {
        match id {
            None | Some(INTRO_ID) => ActiveChapter::Intro,
            Some(id) => ActiveChapter::Chapter(id.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub current: ActiveChapter,
    pub explore_mode: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    /// Explore mode is on; chapter changes do not move the camera.
    Suspended,
    JumpedToIntro,
    Unchanged,
    MissingChapter(String),
    Flew {
        chapter: String,
        skip_line: bool,
        outcome: FlyTo,
    },
}

#[derive(Debug, Clone)]
pub struct ChapterReactor {
    intro: ChapterLocation,
    state: NavigationState,
}

impl ChapterReactor {
    pub fn new(intro: ChapterLocation) -> Self {
        Self {
            intro,
            state: NavigationState::default(),
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn intro(&self) -> ChapterLocation {
        self.intro
    }

    /// Leaving explore mode does not move the camera; the next chapter change does.
    pub fn set_explore_mode(&mut self, on: bool) {
        if self.state.explore_mode != on {
            debug!(explore = on, "Explore mode changed");
        }
        self.state.explore_mode = on;
    }

    pub fn on_chapter_change(
        &mut self,
        active: Option<&str>,
        chapters: &[Chapter],
        animator: &mut FlightAnimator,
        scheduler: &mut impl FrameScheduler,
        now_ms: f64,
    ) -> Reaction {
        if self.state.explore_mode {
            return Reaction::Suspended;
        }

        let next = ActiveChapter::from_id(active);
        if next == self.state.current {
            return Reaction::Unchanged;
        }

        let id = match next {
            ActiveChapter::Intro => {
                debug!("Returning to intro view");
                animator.jump_to(self.intro.into());
                self.state.current = ActiveChapter::Intro;
                return Reaction::JumpedToIntro;
            }
            ActiveChapter::Chapter(id) => id,
        };

        let Some(chapter) = find_chapter(chapters, &id) else {
            debug!(chapter = %id, "Active chapter not in chapter list");
            return Reaction::MissingChapter(id);
        };

        let skip_line = self.state.current == ActiveChapter::Intro;
        let config = animator.config();
        let (duration_ms, interrupt) = (config.duration_ms, config.interrupt_in_flight);
        if interrupt {
            animator.cancel();
        }
        let outcome = animator.fly_to(chapter.location, duration_ms, skip_line, now_ms, scheduler);
        debug!(chapter = %id, skip_line, ?outcome, "Chapter change");

        self.state.current = ActiveChapter::Chapter(id.clone());
        Reaction::Flew {
            chapter: id,
            skip_line,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlightConfig;
    use crate::flight::VirtualScheduler;
    use crate::models::CameraPose;

    fn intro() -> ChapterLocation {
        ChapterLocation::new(48.5, 4.0, 4.5)
    }

    fn chapters() -> Vec<Chapter> {
        let ch = |id: &str, lat, lng, zoom| Chapter {
            id: id.to_string(),
            title: id.to_string(),
            location: ChapterLocation::new(lat, lng, zoom),
        };
        vec![
            ch("paris", 48.8566, 2.3522, 12.0),
            ch("lille", 50.6292, 3.0573, 12.0),
            ch("brugge", 51.2093, 3.2247, 13.0),
        ]
    }

    fn setup(config: FlightConfig) -> (ChapterReactor, FlightAnimator, VirtualScheduler) {
        (
            ChapterReactor::new(intro()),
            FlightAnimator::new(config, intro().into()),
            VirtualScheduler::new(),
        )
    }

    fn finish(anim: &mut FlightAnimator, sched: &mut VirtualScheduler, mut now: f64) -> f64 {
        while sched.take() {
            now += 16.0;
            anim.tick(now, sched);
        }
        now
    }

    #[test]
    fn test_intro_to_chapter_skips_line() {
        let (mut reactor, mut anim, mut sched) = setup(FlightConfig::default());
        let reaction = reactor.on_chapter_change(Some("paris"), &chapters(), &mut anim, &mut sched, 0.0);
        assert_eq!(
            reaction,
            Reaction::Flew {
                chapter: "paris".to_string(),
                skip_line: true,
                outcome: FlyTo::Started,
            }
        );
        finish(&mut anim, &mut sched, 0.0);
        assert!(anim.revealed_path().is_empty());
    }

    #[test]
    fn test_chapter_to_chapter_draws_line() {
        let (mut reactor, mut anim, mut sched) = setup(FlightConfig::default());
        let chapters = chapters();
        reactor.on_chapter_change(Some("lille"), &chapters, &mut anim, &mut sched, 0.0);
        let now = finish(&mut anim, &mut sched, 0.0);

        let reaction = reactor.on_chapter_change(Some("brugge"), &chapters, &mut anim, &mut sched, now);
        assert!(matches!(reaction, Reaction::Flew { skip_line: false, .. }));
        finish(&mut anim, &mut sched, now);
        assert_eq!(anim.revealed_path().len(), 51);
        assert_eq!(anim.pose(), CameraPose::from(chapters[2].location));
    }

    #[test]
    fn test_duplicate_event_triggers_one_flight() {
        let (mut reactor, mut anim, mut sched) = setup(FlightConfig::default());
        let chapters = chapters();
        reactor.on_chapter_change(Some("paris"), &chapters, &mut anim, &mut sched, 0.0);
        let again = reactor.on_chapter_change(Some("paris"), &chapters, &mut anim, &mut sched, 10.0);
        assert_eq!(again, Reaction::Unchanged);
        assert_eq!(sched.requested(), 1);
    }

    #[test]
    fn test_explore_mode_suspends() {
        let (mut reactor, mut anim, mut sched) = setup(FlightConfig::default());
        reactor.set_explore_mode(true);
        let reaction = reactor.on_chapter_change(Some("paris"), &chapters(), &mut anim, &mut sched, 0.0);
        assert_eq!(reaction, Reaction::Suspended);
        assert!(!anim.is_animating());
        assert_eq!(reactor.state().current, ActiveChapter::Intro);
    }

    #[test]
    fn test_leaving_explore_mode_does_not_fly() {
        let (mut reactor, mut anim, mut sched) = setup(FlightConfig::default());
        reactor.set_explore_mode(true);
        reactor.set_explore_mode(false);
        assert!(!anim.is_animating());
        assert_eq!(sched.pending(), 0);
        let reaction = reactor.on_chapter_change(Some("paris"), &chapters(), &mut anim, &mut sched, 0.0);
        assert!(matches!(reaction, Reaction::Flew { .. }));
    }

    #[test]
    fn test_return_to_intro_jumps() {
        let (mut reactor, mut anim, mut sched) = setup(FlightConfig::default());
        let chapters = chapters();
        reactor.on_chapter_change(Some("lille"), &chapters, &mut anim, &mut sched, 0.0);
        finish(&mut anim, &mut sched, 0.0);

        let reaction = reactor.on_chapter_change(Some(INTRO_ID), &chapters, &mut anim, &mut sched, 5000.0);
        assert_eq!(reaction, Reaction::JumpedToIntro);
        assert_eq!(anim.pose(), CameraPose::from(intro()));
        assert!(anim.revealed_path().is_empty());
        assert_eq!(reactor.state().current, ActiveChapter::Intro);
    }

    #[test]
    fn test_intro_while_at_intro_is_unchanged() {
        let (mut reactor, mut anim, mut sched) = setup(FlightConfig::default());
        assert_eq!(
            reactor.on_chapter_change(None, &chapters(), &mut anim, &mut sched, 0.0),
            Reaction::Unchanged
        );
    }

    #[test]
    fn test_missing_chapter_keeps_previous() {
        let (mut reactor, mut anim, mut sched) = setup(FlightConfig::default());
        let reaction = reactor.on_chapter_change(Some("atlantis"), &chapters(), &mut anim, &mut sched, 0.0);
        assert_eq!(reaction, Reaction::MissingChapter("atlantis".to_string()));
        assert_eq!(reactor.state().current, ActiveChapter::Intro);
        assert!(!anim.is_animating());
    }

    #[test]
    fn test_busy_flight_still_records_previous() {
        let (mut reactor, mut anim, mut sched) = setup(FlightConfig::default());
        let chapters = chapters();
        reactor.on_chapter_change(Some("lille"), &chapters, &mut anim, &mut sched, 0.0);
        let reaction = reactor.on_chapter_change(Some("brugge"), &chapters, &mut anim, &mut sched, 100.0);
        assert!(matches!(reaction, Reaction::Flew { outcome: FlyTo::Busy, .. }));
        assert_eq!(reactor.state().current, ActiveChapter::Chapter("brugge".to_string()));
        // The running flight still lands on lille.
        finish(&mut anim, &mut sched, 100.0);
        assert_eq!(anim.pose(), CameraPose::from(chapters[1].location));
    }

    #[test]
    fn test_interrupt_in_flight_restarts() {
        let config = FlightConfig {
            interrupt_in_flight: true,
            ..FlightConfig::default()
        };
        let (mut reactor, mut anim, mut sched) = setup(config);
        let chapters = chapters();
        reactor.on_chapter_change(Some("lille"), &chapters, &mut anim, &mut sched, 0.0);
        let reaction = reactor.on_chapter_change(Some("brugge"), &chapters, &mut anim, &mut sched, 100.0);
        assert!(matches!(reaction, Reaction::Flew { outcome: FlyTo::Started, .. }));
        finish(&mut anim, &mut sched, 100.0);
        assert_eq!(anim.pose(), CameraPose::from(chapters[2].location));
    }

    #[test]
    fn test_active_chapter_from_id() {
        assert_eq!(ActiveChapter::from_id(None), ActiveChapter::Intro);
        assert_eq!(ActiveChapter::from_id(Some("intro")), ActiveChapter::Intro);
        assert_eq!(
            ActiveChapter::from_id(Some("paris")),
            ActiveChapter::Chapter("paris".to_string())
        );
    }
}
