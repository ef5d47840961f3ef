//! Preview / accumulation state machine.
//!
//! ```text
//!            toggle                      toggle
//! Preview ----------> Accumulating ----------> Preview
//! frame_count = 0     frame_count 0,1,2,...    frame_count = 0
//! history reset       history carried          history reset
//! ```

use crate::util::UVec2;

/// Accumulated frame counts are logged every `CHECKPOINT_INTERVAL` frames
/// until `CHECKPOINT_LIMIT`.
pub const CHECKPOINT_INTERVAL: u32 = 100;
pub const CHECKPOINT_LIMIT: u32 = 2000;

/// What the current tick has to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePlan {
    /// Value written to the frame-info block for this tick.
    pub frame_count: u32,
    pub accumulating: bool,
    /// Ask the backend to clear its image history before dispatch.
    pub reset_history: bool,
}

impl FramePlan {
    pub fn encode(&self, resolution: UVec2) -> gpu_layout::FrameInfoBlock {
        gpu_layout::FrameInfoBlock {
            frame_count: self.frame_count,
            accumulating: u32::from(self.accumulating),
            width: resolution.x,
            height: resolution.y,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrameOrchestrator {
    frame_count: u32,
    accumulating: bool,
}

impl FrameOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn is_accumulating(&self) -> bool {
        self.accumulating
    }

    /// Flip the mode. Returns the new `accumulating` value.
    pub fn toggle(&mut self) -> bool {
        self.set_accumulating(!self.accumulating);
        self.accumulating
    }

    /// Either transition restarts the sample counter at 0.
    pub fn set_accumulating(&mut self, accumulating: bool) {
        if self.accumulating != accumulating {
            self.accumulating = accumulating;
            self.frame_count = 0;
            tracing::info!(accumulating, "render mode changed");
        }
    }

    /// Plan this tick, then advance the counter for the next one.
    pub fn next_frame(&mut self) -> FramePlan {
        let plan = FramePlan {
            frame_count: self.frame_count,
            accumulating: self.accumulating,
            reset_history: !self.accumulating,
        };

        if self.accumulating {
            self.frame_count = self.frame_count.saturating_add(1);
            if self.frame_count % CHECKPOINT_INTERVAL == 0 && self.frame_count <= CHECKPOINT_LIMIT {
                tracing::info!(frame = self.frame_count, "accumulated frames");
            }
        } else {
            self.frame_count = 0;
        }
        plan
    }
}
