//! Frame selection for a single action.
//!
//! In uniform mode every frame of the action is rendered and displayed for one
//! tick, encoded as the single-element duration list `[1]`. In marker mode
//! only pose-marker frames are rendered and each carries its own duration,
//! measured up to the next marker (or the end of the range for the last one).

use crate::action::{Action, FrameBounds};
use crate::error::{SheetError, SheetResult};

/// Duration list that marks a selection as uniform.
pub const UNIFORM_DURATIONS: [u32; 1] = [1];

/// How a selection was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Every frame of the range, one tick each.
    Uniform,
    /// One frame per pose marker.
    Marked,
}

/// Frames to render for one action and how long each is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSelection {
    /// Which selection rule produced this result.
    pub mode: SelectionMode,
    /// Frame numbers to render, ascending.
    pub frames: Vec<i32>,
    /// Either `[1]` (uniform) or one duration per entry in `frames`.
    pub durations: Vec<u32>,
}

impl FrameSelection {
    /// Number of tiles this selection renders.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if no frame is selected.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns true if every frame is displayed for one tick.
    pub fn is_uniform(&self) -> bool {
        self.mode == SelectionMode::Uniform
    }

    /// Display duration of the `index`-th selected frame.
    pub fn duration_of(&self, index: usize) -> Option<u32> {
        if index >= self.frames.len() {
            return None;
        }
        if self.durations.len() == self.frames.len() {
            self.durations.get(index).copied()
        } else {
            self.durations.first().copied()
        }
    }
}

/// Selects the frames to render for `action`.
///
/// Marker mode applies only when `only_marked_frames` is set and the action
/// has at least one pose marker; otherwise every frame is selected.
///
/// In marker mode each duration is the distance to the next marker, and the
/// last one is the distance to `ceil(range.end)`. Durations are clamped to at
/// least 1, so a marker sitting exactly on the last frame gets `1` rather
/// than the `0` that distance would give. Markers before the first frame of
/// the range are selected as-is; markers past the last frame are an error.
pub fn select_frames(action: &Action, only_marked_frames: bool) -> SheetResult<FrameSelection> {
    let bounds = action.frame_bounds()?;

    if only_marked_frames && !action.pose_markers.is_empty() {
        select_marked(action, bounds)
    } else {
        Ok(select_uniform(bounds))
    }
}

fn select_uniform(bounds: FrameBounds) -> FrameSelection {
    FrameSelection {
        mode: SelectionMode::Uniform,
        frames: (bounds.min..=bounds.max).collect(),
        durations: UNIFORM_DURATIONS.to_vec(),
    }
}

fn select_marked(action: &Action, bounds: FrameBounds) -> SheetResult<FrameSelection> {
    let mut frames: Vec<i32> = action.pose_markers.iter().map(|m| m.frame).collect();
    frames.sort();

    for pair in frames.windows(2) {
        if pair[0] == pair[1] {
            return Err(SheetError::DuplicateMarker {
                action: action.name.clone(),
                frame: pair[0],
            });
        }
    }

    // Markers before the first frame are kept; only those past the end are rejected.
    if let Some(&frame) = frames.last().filter(|&&f| f > bounds.max) {
        return Err(SheetError::MarkerAfterEnd {
            action: action.name.clone(),
            frame,
            max: bounds.max,
        });
    }

    let durations = frames
        .iter()
        .enumerate()
        .map(|(i, &frame)| {
            let next = frames.get(i + 1).copied().unwrap_or(bounds.max);
            // A marker on the last frame still shows for one tick.
            let span = (i64::from(next) - i64::from(frame)).max(1);
            u32::try_from(span).unwrap_or(u32::MAX)
        })
        .collect();

    Ok(FrameSelection {
        mode: SelectionMode::Marked,
        frames,
        durations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_uniform_selects_every_frame() {
        let action = Action::new("walk", 0.0, 10.0);
        let selection = select_frames(&action, false).unwrap();
        assert_eq!(selection.frames, (0..=10).collect::<Vec<_>>());
        assert_eq!(selection.durations, vec![1]);
        assert_eq!(selection.len(), 11);
        assert!(selection.is_uniform());
    }

    #[test]
    fn test_uniform_ignores_markers_when_flag_off() {
        let action = Action::new("walk", 0.0, 10.0).marker("a", 2).marker("b", 7);
        let selection = select_frames(&action, false).unwrap();
        assert_eq!(selection.len(), 11);
        assert_eq!(selection.durations, vec![1]);
    }

    #[test]
    fn test_no_markers_falls_back_to_uniform() {
        let action = Action::new("idle_loop", 1.0, 4.0);
        assert_eq!(
            select_frames(&action, true).unwrap(),
            select_frames(&action, false).unwrap()
        );
    }

    #[test]
    fn test_single_frame_range() {
        let action = Action::new("pose", 5.0, 5.0);
        let selection = select_frames(&action, false).unwrap();
        assert_eq!(selection.frames, vec![5]);
        assert_eq!(selection.durations, vec![1]);
    }

    #[test]
    fn test_fractional_range_rounds_outward() {
        let action = Action::new("blink", 0.5, 2.2);
        let selection = select_frames(&action, false).unwrap();
        assert_eq!(selection.frames, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_marked_frames_and_durations() {
        let action = Action::new("attack", 0.0, 10.0).marker("a", 2).marker("b", 7);
        let selection = select_frames(&action, true).unwrap();
        assert_eq!(selection.mode, SelectionMode::Marked);
        assert_eq!(selection.frames, vec![2, 7]);
        assert_eq!(selection.durations, vec![5, 3]);
    }

    #[test]
    fn test_marked_frames_are_sorted() {
        let action = Action::new("attack", 0.0, 12.0)
            .marker("c", 9)
            .marker("a", 1)
            .marker("b", 4);
        let selection = select_frames(&action, true).unwrap();
        assert_eq!(selection.frames, vec![1, 4, 9]);
        assert_eq!(selection.durations, vec![3, 5, 3]);
    }

    #[test]
    fn test_last_duration_measures_to_range_end() {
        let action = Action::new("cast", 0.0, 7.4).marker("a", 3);
        let selection = select_frames(&action, true).unwrap();
        assert_eq!(selection.frames, vec![3]);
        assert_eq!(selection.durations, vec![5]);
    }

    #[test]
    fn test_marker_on_last_frame_displays_once() {
        let action = Action::new("land", 0.0, 6.0).marker("a", 0).marker("b", 6);
        let selection = select_frames(&action, true).unwrap();
        assert_eq!(selection.durations, vec![6, 1]);
    }

    #[test]
    fn test_duplicate_markers_rejected() {
        let action = Action::new("hit", 0.0, 6.0).marker("a", 3).marker("b", 3);
        let err = select_frames(&action, true).unwrap_err();
        assert!(matches!(err, SheetError::DuplicateMarker { frame: 3, .. }));
    }

    #[test]
    fn test_marker_after_end_rejected() {
        let action = Action::new("hit", 0.0, 6.0).marker("a", 9);
        let err = select_frames(&action, true).unwrap_err();
        assert!(matches!(err, SheetError::MarkerAfterEnd { frame: 9, max: 6, .. }));
    }

    #[test]
    fn test_marker_before_start_is_selected() {
        let action = Action::new("attack", 1.0, 10.0).marker("a", 0).marker("b", 5);
        let selection = select_frames(&action, true).unwrap();
        assert_eq!(selection.frames, vec![0, 5]);
        assert_eq!(selection.durations, vec![5, 5]);
    }

    #[test]
    fn test_invalid_range_rejected_in_both_modes() {
        let action = Action::new("broken", 4.0, 1.0);
        assert!(select_frames(&action, false).is_err());
        assert!(select_frames(&action, true).is_err());
    }

    #[test]
    fn test_duration_of() {
        let uniform = select_frames(&Action::new("walk", 0.0, 3.0), false).unwrap();
        assert_eq!(uniform.duration_of(2), Some(1));
        assert_eq!(uniform.duration_of(4), None);

        let marked = select_frames(
            &Action::new("attack", 0.0, 10.0).marker("a", 2).marker("b", 7),
            true,
        )
        .unwrap();
        assert_eq!(marked.duration_of(0), Some(5));
        assert_eq!(marked.duration_of(1), Some(3));
    }
}
