//! Camera flights between chapters.
//!
//! A flight runs in three phases over a fixed duration: zoom out toward the
//! middle of the arc, hold there while the arc is drawn, then zoom in on the
//! target. The animator never drives time itself. The host calls [`FlightAnimator::tick`]
//! whenever a frame it asked for via [`FrameScheduler`] comes due.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::FlightConfig;
use crate::error::GeometryError;
use crate::geometry::{arc_path, ease, fit_zoom_for_extent, lerp, lerp_lat_lng};
use crate::models::{CameraPose, ChapterLocation, LatLng};

/// Something that can call back into the animator on the next display frame.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Scheduler for tests and offline simulation: frames only run when the caller steps them.
#[derive(Debug, Default, Clone)]
pub struct VirtualScheduler {
    pending: usize,
    requested: usize,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one pending frame request, if any.
    pub fn take(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Total frame requests seen since creation.
    pub fn requested(&self) -> usize {
        self.requested
    }
}

impl FrameScheduler for VirtualScheduler {
    fn request_frame(&mut self) {
        self.pending += 1;
        self.requested += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FlightPhase {
    ZoomOut,
    Draw,
    ZoomIn,
}

/// State of one flight, alive from `fly_to` until the last frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSession {
    pub start_ms: f64,
    pub duration_ms: f64,
    pub start_pose: CameraPose,
    pub target: ChapterLocation,
    pub arc: Vec<LatLng>,
    pub fitted_zoom: f64,
    pub skip_line: bool,
    last_ms: f64,
}

impl FlightSession {
    /// The arc point the camera hovers over while the line is drawn.
    pub fn midpoint(&self) -> LatLng {
        self.arc[self.arc.len() / 2]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FlightStatus {
    #[default]
    Idle,
    Animating(FlightSession),
}

/// Outcome of a `fly_to` request.
#[derive(Debug, Clone, PartialEq)]
pub enum FlyTo {
    Started,
    /// A flight is already running; the request was dropped.
    Busy,
    Rejected(GeometryError),
}

/// What one tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightFrame {
    pub pose: CameraPose,
    pub phase: FlightPhase,
    pub revealed: usize,
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct FlightAnimator {
    config: FlightConfig,
    status: FlightStatus,
    pose: CameraPose,
    /// Arc left on screen by the last completed flight.
    path: Vec<LatLng>,
    revealed: usize,
    phase: Option<FlightPhase>,
}

impl FlightAnimator {
    pub fn new(config: FlightConfig, initial: CameraPose) -> Self {
        Self {
            config,
            status: FlightStatus::Idle,
            pose: initial,
            path: Vec::new(),
            revealed: 0,
            phase: None,
        }
    }

    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.status, FlightStatus::Animating(_))
    }

    pub fn session(&self) -> Option<&FlightSession> {
        match &self.status {
            FlightStatus::Animating(s) => Some(s),
            FlightStatus::Idle => None,
        }
    }

    /// Phase of the most recent tick, `None` when idle.
    pub fn phase(&self) -> Option<FlightPhase> {
        if self.is_animating() {
            self.phase
        } else {
            None
        }
    }

    /// The part of the current arc that should be drawn. Empty means no line.
    pub fn revealed_path(&self) -> &[LatLng] {
        let arc = match &self.status {
            FlightStatus::Animating(s) => &s.arc,
            FlightStatus::Idle => &self.path,
        };
        &arc[..self.revealed.min(arc.len())]
    }

    /// Start a flight from the current pose to `target`.
    ///
    /// While a flight is running every new request is dropped: there is no
    /// queue and the running flight is not interrupted.
    pub fn fly_to(
        &mut self,
        target: ChapterLocation,
        duration_ms: f64,
        skip_line: bool,
        now_ms: f64,
        scheduler: &mut impl FrameScheduler,
    ) -> FlyTo {
        if self.is_animating() {
            return FlyTo::Busy;
        }
        if let Err(e) = target.validate() {
            warn!(?target, error = %e, "Rejected flight target");
            return FlyTo::Rejected(e);
        }

        let duration_ms = if duration_ms.is_finite() && duration_ms > 0.0 {
            duration_ms
        } else {
            self.config.duration_ms
        };
        let start = self.pose.center;
        let end = target.center();
        let arc = arc_path(
            start,
            end,
            self.config.arc_samples,
            self.config.arc_height_ratio,
        );
        let fitted_zoom = f64::from(fit_zoom_for_extent(start, end));

        debug!(
            from_lat = start.lat,
            from_lng = start.lng,
            to_lat = end.lat,
            to_lng = end.lng,
            fitted_zoom,
            skip_line,
            "Starting flight"
        );

        self.path.clear();
        self.revealed = 0;
        self.phase = Some(FlightPhase::ZoomOut);
        self.status = FlightStatus::Animating(FlightSession {
            start_ms: now_ms,
            duration_ms,
            start_pose: self.pose,
            target,
            arc,
            fitted_zoom,
            skip_line,
            last_ms: now_ms,
        });
        scheduler.request_frame();
        FlyTo::Started
    }

    /// Advance the running flight to `now_ms`. Requests the next frame unless
    /// the flight finished on this tick. Returns `None` when idle.
    pub fn tick(&mut self, now_ms: f64, scheduler: &mut impl FrameScheduler) -> Option<FlightFrame> {
        let zoom_out = self.config.zoom_out_fraction;
        let zoom_in_start = self.config.zoom_in_start();

        let FlightStatus::Animating(session) = &mut self.status else {
            return None;
        };

        // Frames never go backwards in time.
        let now_ms = if now_ms.is_finite() {
            now_ms.max(session.last_ms)
        } else {
            session.last_ms
        };
        session.last_ms = now_ms;

        let progress = (now_ms - session.start_ms) / session.duration_ms;
        if progress >= 1.0 {
            return self.finish();
        }

        let mid = session.midpoint();
        let len = session.arc.len();
        let (pose, phase, revealed) = if progress < zoom_out {
            let t = ease(progress / zoom_out);
            let pose = CameraPose::new(
                lerp_lat_lng(session.start_pose.center, mid, t),
                lerp(session.start_pose.zoom, session.fitted_zoom, t),
            );
            (pose, FlightPhase::ZoomOut, 0)
        } else if progress < zoom_in_start {
            let q = ease((progress - zoom_out) / (zoom_in_start - zoom_out));
            let revealed = if session.skip_line {
                0
            } else {
                ((q * len as f64).round() as usize).min(len)
            };
            (CameraPose::new(mid, session.fitted_zoom), FlightPhase::Draw, revealed)
        } else {
            let t = ease((progress - zoom_in_start) / (1.0 - zoom_in_start));
            let pose = CameraPose::new(
                lerp_lat_lng(mid, session.target.center(), t),
                lerp(session.fitted_zoom, session.target.zoom, t),
            );
            let revealed = if session.skip_line { 0 } else { len };
            (pose, FlightPhase::ZoomIn, revealed)
        };

        debug_assert!(pose.is_finite(), "flight produced a non-finite pose: {pose:?}");

        self.pose = pose;
        self.revealed = revealed;
        self.phase = Some(phase);
        scheduler.request_frame();

        Some(FlightFrame {
            pose,
            phase,
            revealed,
            finished: false,
        })
    }

    /// Pin the pose to the target and leave the whole arc on screen.
    fn finish(&mut self) -> Option<FlightFrame> {
        let FlightStatus::Animating(session) = std::mem::take(&mut self.status) else {
            return None;
        };

        self.pose = session.target.into();
        if session.skip_line {
            self.path.clear();
        } else {
            self.path = session.arc;
        }
        self.revealed = self.path.len();
        self.phase = None;

        debug!(lat = self.pose.center.lat, lng = self.pose.center.lng, "Flight finished");

        Some(FlightFrame {
            pose: self.pose,
            phase: FlightPhase::ZoomIn,
            revealed: self.revealed,
            finished: true,
        })
    }

    /// Move the camera instantly, dropping any drawn path and any running flight.
    pub fn jump_to(&mut self, pose: CameraPose) {
        if !pose.is_finite() {
            warn!(?pose, "Ignored jump to non-finite pose");
            return;
        }
        self.status = FlightStatus::Idle;
        self.pose = pose;
        self.path.clear();
        self.revealed = 0;
        self.phase = None;
    }

    /// Apply a user gesture. Ignored while a flight owns the camera.
    pub fn set_user_pose(&mut self, pose: CameraPose) -> bool {
        if self.is_animating() || !pose.is_finite() {
            return false;
        }
        self.pose = pose;
        true
    }

    /// Stop a running flight where it is and clear its line.
    /// Returns whether a flight was running.
    pub fn cancel(&mut self) -> bool {
        if !self.is_animating() {
            return false;
        }
        debug!("Flight cancelled");
        self.status = FlightStatus::Idle;
        self.path.clear();
        self.revealed = 0;
        self.phase = None;
        true
    }
}
