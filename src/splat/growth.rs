//! Time-based growth of the stain from the base circle to its final shape
//!
//! Progress is computed from wall-clock timestamps, not frame counts, so a
//! late or skipped frame only changes how many steps are drawn, never the
//! total duration.

use crate::geom::ease_out_cubic;

/// Growth state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrowthPhase {
    /// No frame seen yet
    NotStarted,
    /// Growing since `start_ms`
    Running { start_ms: f64 },
    /// Reached full size
    Finished,
}

/// Result of advancing growth by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthFrame {
    /// Elapsed time since the first frame (ms)
    pub elapsed_ms: f64,
    /// Linear progress in [0, 1]
    pub progress: f32,
    /// Eased progress used for interpolation
    pub eased: f32,
    /// True on the frame that completes the growth
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct Growth {
    duration_ms: f64,
    phase: GrowthPhase,
}

impl Growth {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            phase: GrowthPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> GrowthPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == GrowthPhase::Finished
    }

    /// Advance to `timestamp_ms`. The first call records the start time.
    ///
    /// Once finished, every further call reports full size with
    /// `completed == false`, so completion is observed exactly once.
    pub fn advance(&mut self, timestamp_ms: f64) -> GrowthFrame {
        let start_ms = match self.phase {
            GrowthPhase::NotStarted => {
                self.phase = GrowthPhase::Running {
                    start_ms: timestamp_ms,
                };
                timestamp_ms
            }
            GrowthPhase::Running { start_ms } => start_ms,
            GrowthPhase::Finished => {
                return GrowthFrame {
                    elapsed_ms: self.duration_ms,
                    progress: 1.0,
                    eased: 1.0,
                    completed: false,
                };
            }
        };

        let elapsed_ms = (timestamp_ms - start_ms).max(0.0);
        let progress = (elapsed_ms / self.duration_ms).clamp(0.0, 1.0) as f32;
        let completed = elapsed_ms >= self.duration_ms;
        if completed {
            self.phase = GrowthPhase::Finished;
        }

        GrowthFrame {
            elapsed_ms,
            progress,
            eased: ease_out_cubic(progress),
            completed,
        }
    }
}
