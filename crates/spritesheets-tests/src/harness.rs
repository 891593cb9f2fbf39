//! Test harness: sandbox directory, fake renderer, scripted assembler.

use std::fmt;
use std::path::{Path, PathBuf};

use spritesheets_backend_blender::tile_file_name;
use spritesheets_cli::assembler::Assembler;
use spritesheets_spec::{SheetConfig, TileHandle, TileRenderer, TileRequest};
use tempfile::TempDir;

/// A sandbox directory for one test.
pub struct TestHarness {
    /// Working directory for test outputs.
    pub work_dir: TempDir,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Create a new test harness.
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().expect("Failed to create work dir"),
        }
    }

    /// Get the working directory path.
    pub fn path(&self) -> &Path {
        self.work_dir.path()
    }

    /// Output directory used by [`TestHarness::config`].
    pub fn output_dir(&self) -> PathBuf {
        self.path().join("sprites")
    }

    /// Sheet config writing into this harness.
    pub fn config(&self, target: &str) -> SheetConfig {
        SheetConfig::new(target)
            .tile_size(64, 64)
            .frame_rate(12.0)
            .output_path(self.output_dir())
    }

    /// Writes an executable shell script and returns it as an assembler.
    #[cfg(unix)]
    pub fn script_assembler(&self, name: &str, body: &str) -> Assembler {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write script");
        let mut perms = std::fs::metadata(&path).expect("stat script").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("chmod script");
        Assembler::new(path)
    }

    /// Assembler that writes the tile count of `<root>/temp` into `--out`.
    #[cfg(unix)]
    pub fn counting_assembler(&self) -> Assembler {
        self.script_assembler(
            "assembler_ok",
            r#"[ "$1" = "--root" ] || exit 2
[ "$3" = "--out" ] || exit 2
ls "$2/temp" | wc -l | tr -d ' ' > "$4""#,
        )
    }

    /// Assembler that always fails.
    #[cfg(unix)]
    pub fn failing_assembler(&self) -> Assembler {
        self.script_assembler("assembler_fail", "echo 'cannot pack tiles' >&2\nexit 3")
    }
}

/// Error returned by [`FakeRenderer`] when told to fail.
#[derive(Debug)]
pub struct FakeRenderError(pub u32);

impl fmt::Display for FakeRenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fake render failure at tile {}", self.0)
    }
}

impl std::error::Error for FakeRenderError {}

/// One recorded render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCall {
    pub tile_index: u32,
    pub angle: u32,
    pub action: String,
    pub frame: i32,
}

/// Writes a placeholder file per tile and records every request.
pub struct FakeRenderer {
    tile_dir: PathBuf,
    fail_at: Option<u32>,
    pub calls: Vec<RenderCall>,
}

impl FakeRenderer {
    /// Renderer writing into `config.tile_dir()`.
    pub fn new(config: &SheetConfig) -> Self {
        Self {
            tile_dir: config.tile_dir(),
            fail_at: None,
            calls: Vec::new(),
        }
    }

    /// Fails when asked for the given global tile index.
    pub fn fail_at(mut self, tile_index: u32) -> Self {
        self.fail_at = Some(tile_index);
        self
    }
}

impl TileRenderer for FakeRenderer {
    type Error = FakeRenderError;

    fn render_tile(&mut self, request: &TileRequest<'_>) -> Result<TileHandle, FakeRenderError> {
        if self.fail_at == Some(request.tile_index) {
            return Err(FakeRenderError(request.tile_index));
        }
        std::fs::create_dir_all(&self.tile_dir).map_err(|_| FakeRenderError(request.tile_index))?;
        let path = self.tile_dir.join(tile_file_name(request.tile_index));
        std::fs::write(
            &path,
            format!("{} {} {}", request.angle, request.action.name, request.frame),
        )
        .map_err(|_| FakeRenderError(request.tile_index))?;

        self.calls.push(RenderCall {
            tile_index: request.tile_index,
            angle: request.angle,
            action: request.action.name.clone(),
            frame: request.frame,
        });
        Ok(TileHandle { path })
    }
}

/// Check if Blender is available in the environment.
pub fn is_blender_available() -> bool {
    spritesheets_backend_blender::Orchestrator::new()
        .find_blender()
        .is_ok()
}

/// Check if Blender tests should run based on environment variable.
pub fn should_run_blender_tests() -> bool {
    std::env::var("SPRITESHEETS_RUN_BLENDER_TESTS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Fixture `.blend` file named by `SPRITESHEETS_TEST_BLEND`.
pub fn test_blend_file() -> Option<PathBuf> {
    std::env::var_os("SPRITESHEETS_TEST_BLEND")
        .map(PathBuf::from)
        .filter(|path| path.exists())
}
