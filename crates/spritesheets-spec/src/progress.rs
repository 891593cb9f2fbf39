//! Run progress shared with passive observers (progress bars, logs).

use serde::Serialize;

/// Snapshot of a run's progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunProgress {
    /// True while tiles are being rendered.
    pub rendering: bool,
    /// True once the whole run finished successfully.
    pub success: bool,
    /// Current camera angle in degrees.
    pub angle: u32,
    /// Current action name (loop suffix stripped).
    pub action_name: String,
    /// Index of the current action in enumeration order.
    pub action_index: usize,
    /// Number of actions per angle.
    pub action_total: usize,
    /// Index of the current tile within the current action.
    pub tile_index: usize,
    /// Number of tiles the current action renders.
    pub tile_total: usize,
    /// Tiles rendered so far across the run.
    pub tiles_rendered: u32,
    /// Tiles the run renders in total.
    pub tiles_expected: u32,
}

/// Receives read-only progress snapshots.
pub trait ProgressObserver {
    /// Called after every progress update.
    fn on_progress(&mut self, progress: &RunProgress);
}

impl<F: FnMut(&RunProgress)> ProgressObserver for F {
    fn on_progress(&mut self, progress: &RunProgress) {
        self(progress)
    }
}

/// Observer that ignores all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _progress: &RunProgress) {}
}

/// Owns the progress record of one run. The run is its only writer.
pub struct RunContext<'o> {
    progress: RunProgress,
    observer: &'o mut dyn ProgressObserver,
}

impl<'o> RunContext<'o> {
    /// Creates a context reporting to `observer`.
    pub fn new(observer: &'o mut dyn ProgressObserver) -> Self {
        Self {
            progress: RunProgress::default(),
            observer,
        }
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> &RunProgress {
        &self.progress
    }

    fn notify(&mut self) {
        self.observer.on_progress(&self.progress);
    }

    pub(crate) fn begin(&mut self, action_total: usize, tiles_expected: u32) {
        self.progress = RunProgress {
            rendering: true,
            action_total,
            tiles_expected,
            ..Default::default()
        };
        self.notify();
    }

    pub(crate) fn enter_action(&mut self, angle: u32, index: usize, name: &str, tile_total: usize) {
        self.progress.angle = angle;
        self.progress.action_index = index;
        self.progress.action_name = name.to_string();
        self.progress.tile_index = 0;
        self.progress.tile_total = tile_total;
        self.notify();
    }

    pub(crate) fn tile_rendered(&mut self, tile_index: usize) {
        self.progress.tile_index = tile_index + 1;
        self.progress.tiles_rendered += 1;
        self.notify();
    }

    /// Marks the run as finished.
    pub fn finish(&mut self, success: bool) {
        self.progress.rendering = false;
        self.progress.success = success;
        self.notify();
    }
}
