//! Angle x action iteration, tile rendering, and manifest accumulation.
//!
//! For each camera angle (ascending) and each action (in enumeration order)
//! the selected frames are rendered one tile at a time through a
//! [`TileRenderer`], and one [`AnimationDescriptor`] is appended whose `end`
//! is the running global tile count. Any render failure aborts the run.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::action::Action;
use crate::angle::{angles, ANGLE_COUNT};
use crate::config::SheetConfig;
use crate::error::{SheetError, SheetResult};
use crate::manifest::{AnimationDescriptor, Manifest};
use crate::progress::RunContext;
use crate::selection::{select_frames, FrameSelection};

/// One tile the renderer must produce.
#[derive(Debug, Clone, Copy)]
pub struct TileRequest<'a> {
    /// Global tile index across the whole sheet, starting at 0.
    pub tile_index: u32,
    /// Camera angle in degrees.
    pub angle: u32,
    /// Action bound as the active animation.
    pub action: &'a Action,
    /// Timeline frame to render.
    pub frame: i32,
}

/// A rendered tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileHandle {
    /// Where the tile image was written.
    pub path: PathBuf,
}

/// Renders single tiles. Calls are blocking and strictly sequential.
pub trait TileRenderer {
    /// Error produced when a tile cannot be rendered.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Renders one tile for the request's frame, angle, and action.
    fn render_tile(&mut self, request: &TileRequest<'_>) -> Result<TileHandle, Self::Error>;
}

impl<R: TileRenderer + ?Sized> TileRenderer for &mut R {
    type Error = R::Error;

    fn render_tile(&mut self, request: &TileRequest<'_>) -> Result<TileHandle, Self::Error> {
        (**self).render_tile(request)
    }
}

/// Frame selection for one action at one angle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationPlan {
    /// Camera angle in degrees.
    pub angle: u32,
    /// Index of the action in enumeration order.
    pub action_index: usize,
    /// Action name without the loop suffix.
    pub name: String,
    /// Whether the action name carried the loop suffix.
    pub looping: bool,
    /// Frames and durations.
    pub selection: FrameSelection,
}

/// Computes the plan for every (angle, action) pair in render order.
///
/// Every action is validated before anything is returned, so a malformed
/// action fails the run before the first tile is rendered.
pub fn plan_animations(actions: &[Action], only_marked_frames: bool) -> SheetResult<Vec<AnimationPlan>> {
    let selections = actions
        .iter()
        .map(|action| select_frames(action, only_marked_frames))
        .collect::<SheetResult<Vec<_>>>()?;

    let mut plans = Vec::with_capacity(actions.len() * ANGLE_COUNT as usize);
    for angle in angles() {
        for (action_index, (action, selection)) in actions.iter().zip(&selections).enumerate() {
            plans.push(AnimationPlan {
                angle,
                action_index,
                name: action.display_name().to_string(),
                looping: action.is_loop(),
                selection: selection.clone(),
            });
        }
    }
    Ok(plans)
}

/// Running tile counter and the descriptors appended so far.
#[derive(Debug, Clone, Default)]
pub struct AnimationAccumulator {
    frame_counter: u32,
    descriptors: Vec<AnimationDescriptor>,
}

impl AnimationAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Global tile count so far.
    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    /// Descriptors appended so far.
    pub fn descriptors(&self) -> &[AnimationDescriptor] {
        &self.descriptors
    }

    /// Advances the counter by the plan's tile count and appends its descriptor.
    pub fn push(&mut self, plan: &AnimationPlan) -> &AnimationDescriptor {
        self.frame_counter += plan.selection.len() as u32;
        self.descriptors.push(AnimationDescriptor {
            angle: plan.angle,
            name: plan.name.clone(),
            end: self.frame_counter,
            frame_durations: plan.selection.durations.clone(),
            looping: plan.looping,
        });
        &self.descriptors[self.descriptors.len() - 1]
    }

    /// Finalizes the descriptors into a manifest.
    pub fn into_manifest(self, subject: &str, config: &SheetConfig) -> Manifest {
        let mut manifest = Manifest::new(subject, config.tile_size, config.frame_rate);
        manifest.animations = self.descriptors;
        manifest
    }
}

/// Tiles and manifest produced by a completed render pass.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    /// The finished manifest.
    pub manifest: Manifest,
    /// Every rendered tile, in global tile order.
    pub tiles: Vec<TileHandle>,
}

/// Builds the manifest a run would produce, without rendering.
pub fn plan_manifest(subject: &str, actions: &[Action], config: &SheetConfig) -> SheetResult<Manifest> {
    config.validate()?;
    let mut accumulator = AnimationAccumulator::new();
    for plan in plan_animations(actions, config.only_render_marked_frames)? {
        accumulator.push(&plan);
    }
    Ok(accumulator.into_manifest(subject, config))
}

/// Renders every tile of the sheet and accumulates the manifest.
///
/// The first render failure aborts the run; no manifest is returned for a
/// partial run.
#[tracing::instrument(skip_all, fields(subject = %subject, actions = actions.len()))]
pub fn render_animations<R: TileRenderer>(
    subject: &str,
    actions: &[Action],
    config: &SheetConfig,
    mut renderer: R,
    ctx: &mut RunContext<'_>,
) -> SheetResult<RenderOutcome> {
    config.validate()?;
    let plans = plan_animations(actions, config.only_render_marked_frames)?;
    let tiles_expected: u32 = plans.iter().map(|p| p.selection.len() as u32).sum();

    ctx.begin(actions.len(), tiles_expected);
    info!(tiles = tiles_expected, "rendering sprite sheet");

    let mut accumulator = AnimationAccumulator::new();
    let mut tiles = Vec::with_capacity(tiles_expected as usize);

    for plan in &plans {
        let action = &actions[plan.action_index];
        ctx.enter_action(plan.angle, plan.action_index, &plan.name, plan.selection.len());

        for (offset, &frame) in plan.selection.frames.iter().enumerate() {
            let request = TileRequest {
                tile_index: accumulator.frame_counter() + offset as u32,
                angle: plan.angle,
                action,
                frame,
            };
            debug!(tile = request.tile_index, angle = plan.angle, action = %action.name, frame, "render tile");

            let tile = renderer.render_tile(&request).map_err(|e| {
                ctx.finish(false);
                SheetError::Render {
                    tile_index: request.tile_index,
                    angle: plan.angle,
                    action: action.name.clone(),
                    frame,
                    source: Box::new(e),
                }
            })?;
            tiles.push(tile);
            ctx.tile_rendered(offset);
        }

        let descriptor = accumulator.push(plan);
        debug!(angle = descriptor.angle, name = %descriptor.name, end = descriptor.end, "animation done");
    }

    Ok(RenderOutcome {
        manifest: accumulator.into_manifest(subject, config),
        tiles,
    })
}
