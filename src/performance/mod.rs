//! # Frame statistics
//!
//! Rolling frame-time window plus counters for the picking path. Shown in
//! the room panel and logged by the headless runner.
//!
//! ```no_run
//! use parlour::performance::FrameStats;
//!
//! let mut stats = FrameStats::new();
//! stats.begin_frame();
//! // ... render frame ...
//! stats.end_frame();
//! println!("{:.1} fps", stats.metrics().fps);
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::picking::PickOutcome;

/// Derived frame timings for display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMetrics {
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    pub min_frame_time_ms: f32,
    pub max_frame_time_ms: f32,
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
        }
    }
}

/// How the clicks of a session resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PickCounters {
    /// Clicks that needed a pixel readback
    pub readbacks: u64,
    /// Clicks that reached an object's `interact()`
    pub dispatches: u64,
    pub misses: u64,
    pub out_of_bounds: u64,
    /// Clicks dropped because their frame failed
    pub failures: u64,
}

pub struct FrameStats {
    /// Ring buffer of recent frame times
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    frame_start: Option<Instant>,
    metrics: FrameMetrics,
    picks: PickCounters,
    frames: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::with_window(120) // ~2 seconds at 60fps
    }

    pub fn with_window(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            frame_start: None,
            metrics: FrameMetrics::default(),
            picks: PickCounters::default(),
            frames: 0,
        }
    }

    /// Mark the beginning of a frame
    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    /// Mark the end of a frame started with [`begin_frame`](Self::begin_frame)
    pub fn end_frame(&mut self) {
        if let Some(start) = self.frame_start.take() {
            self.record_frame(start.elapsed());
        }
    }

    /// Adds one frame time sample and refreshes the metrics
    pub fn record_frame(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
        self.frames += 1;
        self.update_metrics();
    }

    pub fn record_pick(&mut self, outcome: &PickOutcome) {
        match outcome {
            PickOutcome::NoClick => {}
            PickOutcome::OutOfBounds => self.picks.out_of_bounds += 1,
            PickOutcome::Missed(_) => {
                self.picks.readbacks += 1;
                self.picks.misses += 1;
            }
            PickOutcome::Hit { .. } => {
                self.picks.readbacks += 1;
                self.picks.dispatches += 1;
            }
            PickOutcome::Failed => self.picks.failures += 1,
        }
    }

    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total_time: Duration = self.frame_times.iter().sum();
        let avg_frame_time_ms =
            total_time.as_secs_f32() * 1000.0 / self.frame_times.len() as f32;

        self.metrics.frame_time_ms = avg_frame_time_ms;
        self.metrics.fps = if avg_frame_time_ms > 0.0 {
            1000.0 / avg_frame_time_ms
        } else {
            0.0
        };

        if let (Some(min_time), Some(max_time)) =
            (self.frame_times.iter().min(), self.frame_times.iter().max())
        {
            self.metrics.min_frame_time_ms = min_time.as_secs_f32() * 1000.0;
            self.metrics.max_frame_time_ms = max_time.as_secs_f32() * 1000.0;
        }
    }

    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    pub fn picks(&self) -> &PickCounters {
        &self.picks
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frame time history in milliseconds, oldest first
    pub fn frame_time_history(&self) -> Vec<f32> {
        self.frame_times
            .iter()
            .map(|duration| duration.as_secs_f32() * 1000.0)
            .collect()
    }

    /// Stats block for embedding in another imgui window
    pub fn render_section(&self, ui: &imgui::Ui) {
        let metrics = &self.metrics;
        ui.text(format!(
            "FPS: {:.1}  ({:.2}ms avg, {:.2}-{:.2}ms)",
            metrics.fps, metrics.frame_time_ms, metrics.min_frame_time_ms, metrics.max_frame_time_ms
        ));
        ui.text(format!(
            "Readbacks: {}  Dispatches: {}  Misses: {}",
            self.picks.readbacks, self.picks.dispatches, self.picks.misses
        ));
        if self.picks.out_of_bounds > 0 || self.picks.failures > 0 {
            ui.text(format!(
                "Off-surface: {}  Failed: {}",
                self.picks.out_of_bounds, self.picks.failures
            ));
        }

        if !self.frame_times.is_empty() {
            let history = self.frame_time_history();
            ui.plot_lines("##frame_times", &history)
                .graph_size([260.0, 40.0])
                .scale_min(0.0)
                .scale_max(50.0)
                .build();
        }
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picking::ObjectId;

    #[test]
    fn test_metrics_over_window() {
        let mut stats = FrameStats::with_window(3);
        for ms in [10, 20, 30, 40] {
            stats.record_frame(Duration::from_millis(ms));
        }
        // 10ms fell out of the window
        let metrics = stats.metrics();
        assert!((metrics.frame_time_ms - 30.0).abs() < 1e-3);
        assert!((metrics.min_frame_time_ms - 20.0).abs() < 1e-3);
        assert!((metrics.max_frame_time_ms - 40.0).abs() < 1e-3);
        assert!((metrics.fps - 1000.0 / 30.0).abs() < 1e-2);
        assert_eq!(stats.frames(), 4);
        assert_eq!(stats.frame_time_history().len(), 3);
    }

    #[test]
    fn test_pick_counters() {
        let mut stats = FrameStats::new();
        stats.record_pick(&PickOutcome::NoClick);
        stats.record_pick(&PickOutcome::Missed(ObjectId::NO_SELECTION));
        stats.record_pick(&PickOutcome::Hit {
            id: ObjectId(1000),
            index: 0,
        });
        stats.record_pick(&PickOutcome::OutOfBounds);
        stats.record_pick(&PickOutcome::Failed);

        let picks = stats.picks();
        assert_eq!(picks.readbacks, 2);
        assert_eq!(picks.dispatches, 1);
        assert_eq!(picks.misses, 1);
        assert_eq!(picks.out_of_bounds, 1);
        assert_eq!(picks.failures, 1);
    }

    #[test]
    fn test_end_without_begin_is_ignored() {
        let mut stats = FrameStats::new();
        stats.end_frame();
        assert_eq!(stats.frames(), 0);
        assert_eq!(*stats.metrics(), FrameMetrics::default());
    }
}
