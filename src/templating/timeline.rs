//! Render timing.
//!
//! The engine reports one [`Activity`] per render to the [`Timeline`] it was
//! built with. Hosts plug in their own profiler; [`ActivityLog`] keeps
//! activities in memory and [`NoopTimeline`] drops them.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// A timed unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    /// Kind of work, e.g. `template rendering`
    pub name: String,
    /// What was done, e.g. `Rendering of template "index.html"`
    pub description: String,
    pub duration: Duration,
}

impl Activity {
    /// Run `f` and time it.
    pub fn measure<T>(
        name: impl Into<String>,
        description: impl Into<String>,
        f: impl FnOnce() -> T,
    ) -> (T, Self) {
        let start = Instant::now();
        let result = f();
        let activity = Self {
            name: name.into(),
            description: description.into(),
            duration: start.elapsed(),
        };
        (result, activity)
    }

    /// Duration in milliseconds, with sub-millisecond precision.
    pub fn millis(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// Sink for timed activities.
pub trait Timeline: Send + Sync {
    fn record(&self, activity: Activity);
}

/// Drops every activity.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTimeline;

impl Timeline for NoopTimeline {
    fn record(&self, _activity: Activity) {}
}

/// Keeps activities in memory, in recording order.
#[derive(Debug, Default)]
pub struct ActivityLog {
    activities: Mutex<Vec<Activity>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the recorded activities.
    pub fn activities(&self) -> Vec<Activity> {
        self.activities.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn len(&self) -> usize {
        self.activities.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total time spent in activities named `name`.
    pub fn total(&self, name: &str) -> Duration {
        self.activities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|a| a.name == name)
            .map(|a| a.duration)
            .sum()
    }
}

impl Timeline for ActivityLog {
    fn record(&self, activity: Activity) {
        self.activities.lock().unwrap_or_else(PoisonError::into_inner).push(activity);
    }
}
