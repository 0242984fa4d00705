//! Frame governor
//!
//! Tracks how long frames take and sheds load when they run slow: at the top
//! optimization level every even-numbered frame is skipped outright. The
//! metrics only drive that decision and diagnostics, never gameplay.

use log::info;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Snapshot of governor state for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Running average of wall-clock time between frames (ms)
    pub avg_frame_time_ms: f64,
    /// Samples in the current reporting window
    pub frame_count: u64,
    /// Frames skipped in the current reporting window
    pub skipped_frames: u64,
    /// Frames skipped since the last reset
    pub total_skipped: u64,
    /// 1 (normal) up to the configured maximum
    pub optimization_level: u8,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            avg_frame_time_ms: 0.0,
            frame_count: 0,
            skipped_frames: 0,
            total_skipped: 0,
            optimization_level: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecision {
    Run,
    Skip,
}

#[derive(Debug, Clone)]
pub struct FrameGovernor {
    metrics: PerformanceMetrics,
    /// Frames seen since reset; its parity picks which frames to skip
    frame_counter: u64,
    last_frame_ms: Option<f64>,
    last_report_ms: Option<f64>,
    slow_frame_ms: f64,
    fast_frame_ms: f64,
    max_level: u8,
    report_interval_ms: f64,
}

impl FrameGovernor {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            metrics: PerformanceMetrics::default(),
            frame_counter: 0,
            last_frame_ms: None,
            last_report_ms: None,
            slow_frame_ms: tuning.slow_frame_ms,
            fast_frame_ms: tuning.fast_frame_ms,
            max_level: tuning.max_optimization_level.max(1),
            report_interval_ms: tuning.perf_report_interval_ms,
        }
    }

    /// Record a frame starting at `now_ms` and decide whether to simulate it.
    /// The first frame after a reset counts as taking no time.
    pub fn begin_frame(&mut self, now_ms: f64) -> FrameDecision {
        self.frame_counter += 1;
        let frame_time = self.last_frame_ms.map_or(0.0, |last| now_ms - last);

        let m = &mut self.metrics;
        m.avg_frame_time_ms =
            (m.avg_frame_time_ms * m.frame_count as f64 + frame_time) / (m.frame_count + 1) as f64;
        m.frame_count += 1;

        if m.avg_frame_time_ms > self.slow_frame_ms {
            m.optimization_level = (m.optimization_level + 1).min(self.max_level);
        } else if m.avg_frame_time_ms < self.fast_frame_ms {
            m.optimization_level = m.optimization_level.saturating_sub(1).max(1);
        }

        self.maybe_report(now_ms);

        if self.metrics.optimization_level >= self.max_level && self.frame_counter % 2 == 0 {
            self.metrics.skipped_frames += 1;
            self.metrics.total_skipped += 1;
            return FrameDecision::Skip;
        }
        self.last_frame_ms = Some(now_ms);
        FrameDecision::Run
    }

    fn maybe_report(&mut self, now_ms: f64) {
        let Some(last) = self.last_report_ms else {
            self.last_report_ms = Some(now_ms);
            return;
        };
        if now_ms - last < self.report_interval_ms {
            return;
        }
        let m = &mut self.metrics;
        info!(
            "Performance: avg frame {:.2}ms, optimization level {}, skipped {}/{} frames",
            m.avg_frame_time_ms, m.optimization_level, m.skipped_frames, m.frame_count
        );
        m.frame_count = 0;
        m.skipped_frames = 0;
        self.last_report_ms = Some(now_ms);
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        self.metrics
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn reset(&mut self) {
        self.metrics = PerformanceMetrics::default();
        self.frame_counter = 0;
        self.last_frame_ms = None;
        self.last_report_ms = None;
    }
}
