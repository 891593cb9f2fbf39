//! Property-based tests for frame selection and manifest accumulation.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p spritesheets-tests --test manifest_properties
//! ```

use proptest::prelude::*;

use spritesheets_spec::{
    plan_manifest, select_frames, split_loop_suffix, Action, Manifest, SheetConfig, ANGLE_COUNT,
};

/// Strategy for actions with a valid range and distinct markers, some of
/// which may sit before the first frame.
fn arbitrary_action() -> impl Strategy<Value = Action> {
    (-20i32..40, 0i32..30, 0.0f64..1.0, 0.0f64..1.0)
        .prop_flat_map(|(start, len, start_frac, end_frac)| {
            let min = start;
            let max = start + len;
            let markers = prop::collection::btree_set((min - 10)..=max, 0..6);
            let name = "[a-z]{1,8}(_loop)?";
            (
                Just((min, max, start_frac, end_frac)),
                markers,
                name,
                any::<bool>(),
            )
        })
        .prop_map(|((min, max, start_frac, end_frac), markers, name, reverse)| {
            // Fractions never cross the integer bounds.
            let start = min as f64 + if max > min { start_frac * 0.99 } else { 0.0 };
            let end = if max > min {
                max as f64 - end_frac * 0.99
            } else {
                max as f64
            };
            let mut frames: Vec<i32> = markers.into_iter().collect();
            if reverse {
                frames.reverse();
            }
            let mut action = Action::new(name, start.min(end), end);
            for (i, frame) in frames.into_iter().enumerate() {
                action = action.marker(format!("m{}", i), frame);
            }
            action
        })
}

fn bounds(action: &Action) -> (i32, i32) {
    let b = action.frame_bounds().unwrap();
    (b.min, b.max)
}

proptest! {
    /// Uniform selection renders every frame once with the `[1]` sentinel.
    #[test]
    fn uniform_selection_covers_range(action in arbitrary_action()) {
        let (min, max) = bounds(&action);
        let selection = select_frames(&action, false).unwrap();
        prop_assert_eq!(selection.len() as i32, max - min + 1);
        prop_assert_eq!(selection.durations, vec![1]);
    }

    /// Marker selection yields one sorted frame and one duration per marker.
    #[test]
    fn marked_selection_matches_markers(action in arbitrary_action()) {
        let (_, max) = bounds(&action);
        let selection = select_frames(&action, true).unwrap();
        let n = action.pose_markers.len();

        if n == 0 {
            prop_assert_eq!(selection, select_frames(&action, false).unwrap());
        } else {
            prop_assert_eq!(selection.frames.len(), n);
            prop_assert_eq!(selection.durations.len(), n);
            prop_assert!(selection.frames.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(selection.durations.iter().all(|&d| d >= 1));
            prop_assert!(selection.frames.iter().all(|&f| f <= max));

            let last = selection.frames[n - 1];
            prop_assert_eq!(selection.durations[n - 1], ((max - last).max(1)) as u32);
        }
    }

    /// Ends never decrease and finish at the total tile count.
    #[test]
    fn ends_accumulate_tile_counts(
        actions in prop::collection::vec(arbitrary_action(), 0..5),
        only_marked in any::<bool>(),
    ) {
        let config = SheetConfig::new("Hero").only_render_marked_frames(only_marked);
        let manifest = plan_manifest("Hero", &actions, &config).unwrap();

        prop_assert_eq!(manifest.animations.len(), actions.len() * ANGLE_COUNT as usize);

        let per_angle: u32 = actions
            .iter()
            .map(|a| select_frames(a, only_marked).unwrap().len() as u32)
            .sum();
        prop_assert_eq!(manifest.tile_count(), per_angle * ANGLE_COUNT);

        let mut previous = 0;
        for animation in &manifest.animations {
            prop_assert!(animation.end >= previous);
            previous = animation.end;
        }
        prop_assert!(manifest.validate().is_empty());
    }

    /// Serializing then parsing yields the same manifest.
    #[test]
    fn manifest_round_trip(
        actions in prop::collection::vec(arbitrary_action(), 0..4),
        frame_rate in prop_oneof![Just(12.0f64), Just(24.0), 0.5f64..240.0],
    ) {
        let config = SheetConfig::new("Hero")
            .frame_rate(frame_rate)
            .only_render_marked_frames(true);
        let manifest = plan_manifest("Hero", &actions, &config).unwrap();
        let parsed = Manifest::from_json(&manifest.to_bss_string().unwrap()).unwrap();
        prop_assert_eq!(parsed, manifest);
    }

    /// Loop suffix stripping is exact and only strips one suffix.
    #[test]
    fn loop_suffix_is_exact(base in "[a-zA-Z_]{0,12}") {
        let looped = format!("{}_loop", base);
        prop_assert_eq!(split_loop_suffix(&looped), (base.as_str(), true));
        if !base.ends_with("_loop") {
            prop_assert_eq!(split_loop_suffix(&base), (base.as_str(), false));
        }
    }
}
