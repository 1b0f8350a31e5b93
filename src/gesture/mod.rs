//! Pull-to-refresh gesture state machine
//!
//! Phases: idle -> pulling -> (refreshing | idle) -> idle.
//!
//! Coordinates are abstract vertical units that grow downward. The host
//! reports the scroll offset of the list the gesture is attached to; pulling
//! only starts, and only updates, while that offset is zero.
//!
//! Two ways to finish a gesture:
//! - [`PullToRefresh::touch_end`] awaits the refresh callback inline.
//! - [`PullToRefresh::release`] + [`PullToRefresh::finish_refresh`] for event
//!   loops that run the refresh elsewhere and report back when it settles.

use std::future::Future;

pub const DEFAULT_THRESHOLD: f64 = 80.0;
pub const DEFAULT_RESISTANCE: f64 = 2.5;
/// Pull distance is clamped to `threshold * MAX_PULL_FACTOR`
pub const MAX_PULL_FACTOR: f64 = 1.5;
/// Indicator rotation per unit of pull distance
const DEGREES_PER_UNIT: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PullToRefreshConfig {
    pub threshold: f64,
    pub resistance: f64,
    pub enabled: bool,
}

impl Default for PullToRefreshConfig {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD, resistance: DEFAULT_RESISTANCE, enabled: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pulling,
    Refreshing,
}

/// Snapshot for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pub is_pulling: bool,
    pub pull_distance: f64,
    pub is_refreshing: bool,
    pub is_triggered: bool,
}

/// Result of lifting the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Not pulling (or disabled): nothing happened
    Ignored,
    /// Released below the threshold; distance reset
    Cancelled,
    /// Threshold reached; now refreshing until `finish_refresh`
    Refresh,
}

#[derive(Debug, Clone)]
pub struct PullToRefresh {
    config: PullToRefreshConfig,
    phase: Phase,
    start_y: f64,
    pull_distance: f64,
}

impl PullToRefresh {
    pub fn new(config: PullToRefreshConfig) -> Self {
        Self { config, phase: Phase::Idle, start_y: 0.0, pull_distance: 0.0 }
    }

    pub fn config(&self) -> &PullToRefreshConfig {
        &self.config
    }

    /// Disabling drops a pull in progress; a running refresh is left to settle
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        if !enabled && self.is_pulling() {
            self.reset();
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_pulling(&self) -> bool {
        self.phase == Phase::Pulling
    }

    pub fn is_refreshing(&self) -> bool {
        self.phase == Phase::Refreshing
    }

    pub fn pull_distance(&self) -> f64 {
        self.pull_distance
    }

    pub fn is_triggered(&self) -> bool {
        self.pull_distance >= self.config.threshold
    }

    /// Fraction of the threshold reached, capped at 1.0
    pub fn progress(&self) -> f64 {
        if self.config.threshold <= 0.0 {
            return 1.0;
        }
        (self.pull_distance / self.config.threshold).min(1.0)
    }

    /// Spinner rotation in degrees, proportional to pull distance
    pub fn indicator_rotation(&self) -> f64 {
        self.pull_distance * DEGREES_PER_UNIT
    }

    pub fn state(&self) -> GestureState {
        GestureState {
            is_pulling: self.is_pulling(),
            pull_distance: self.pull_distance,
            is_refreshing: self.is_refreshing(),
            is_triggered: self.is_triggered(),
        }
    }

    /// Begin a pull. Returns whether the gesture was accepted.
    pub fn touch_start(&mut self, y: f64, scroll_offset: f64) -> bool {
        if !self.config.enabled || self.is_refreshing() || scroll_offset > 0.0 {
            return false;
        }

        self.start_y = y;
        self.phase = Phase::Pulling;
        true
    }

    /// Update the pull. Returns true when the host should suppress native scrolling.
    pub fn touch_move(&mut self, y: f64, scroll_offset: f64) -> bool {
        if !self.config.enabled || !self.is_pulling() {
            return false;
        }

        let distance = ((y - self.start_y) / self.config.resistance).max(0.0);

        // Scrolled away from the top: keep pulling but ignore this update
        if scroll_offset > 0.0 {
            return false;
        }

        self.pull_distance = distance.min(self.config.threshold * MAX_PULL_FACTOR);
        distance > 0.0
    }

    /// Lift the pointer without running the refresh inline
    pub fn release(&mut self) -> Release {
        if !self.config.enabled || !self.is_pulling() {
            return Release::Ignored;
        }

        if self.is_triggered() {
            self.phase = Phase::Refreshing;
            Release::Refresh
        } else {
            self.reset();
            Release::Cancelled
        }
    }

    /// The refresh started by [`Release::Refresh`] has settled
    pub fn finish_refresh(&mut self) {
        if self.is_refreshing() {
            self.reset();
        }
    }

    /// Lift the pointer; when triggered, await `on_refresh` and log its failure
    pub async fn touch_end<F, Fut>(&mut self, on_refresh: F) -> Release
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        let release = self.release();
        if release == Release::Refresh {
            if let Err(e) = on_refresh().await {
                log::error!("Refresh failed: {:#}", e);
            }
            self.finish_refresh();
        }
        release
    }

    /// Same as [`touch_end`](Self::touch_end)
    pub async fn touch_cancel<F, Fut>(&mut self, on_refresh: F) -> Release
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        self.touch_end(on_refresh).await
    }

    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.pull_distance = 0.0;
    }
}

impl Default for PullToRefresh {
    fn default() -> Self {
        Self::new(PullToRefreshConfig::default())
    }
}
