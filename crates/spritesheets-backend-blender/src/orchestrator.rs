//! Blender subprocess orchestrator.
//!
//! This module locates Blender and the Python entrypoint, spawns Blender in
//! background mode against a `.blend` file, and reads back the JSON report the
//! entrypoint writes.

use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use spritesheets_spec::SceneDescription;
use tracing::debug;

use crate::error::{BlenderError, BlenderResult};
use crate::report::BlenderReport;

const EMBEDDED_ENTRYPOINT_PY: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../blender/entrypoint.py"
));

/// Default timeout for a single Blender invocation (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Operation performed by the Blender entrypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrypointMode {
    /// Export actions and pose markers.
    Inspect,
    /// Render one tile.
    RenderTile,
}

impl EntrypointMode {
    /// Returns the string identifier for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntrypointMode::Inspect => "inspect",
            EntrypointMode::RenderTile => "render_tile",
        }
    }
}

/// Configuration for the Blender orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Path to the Blender executable.
    pub blender_path: Option<PathBuf>,
    /// Path to the Python entrypoint script.
    pub entrypoint_path: PathBuf,
    /// Timeout for each Blender invocation.
    pub timeout: Duration,
    /// Whether to capture Blender's stderr.
    pub capture_output: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            blender_path: None,
            entrypoint_path: PathBuf::from("blender/entrypoint.py"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            capture_output: true,
        }
    }
}

impl OrchestratorConfig {
    /// Creates a new config with the given entrypoint path.
    pub fn with_entrypoint(entrypoint_path: impl Into<PathBuf>) -> Self {
        Self {
            entrypoint_path: entrypoint_path.into(),
            ..Default::default()
        }
    }

    /// Sets the Blender executable path.
    pub fn blender_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.blender_path = Some(path.into());
        self
    }

    /// Sets the timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// The Blender subprocess orchestrator.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    config: OrchestratorConfig,
}

#[derive(Debug)]
struct ResolvedEntrypoint {
    path: PathBuf,
    _tempfile: Option<tempfile::NamedTempFile>,
}

impl Orchestrator {
    /// Creates a new orchestrator with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new orchestrator with the given configuration.
    pub fn with_config(config: OrchestratorConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Finds the Blender executable path.
    ///
    /// A configured path must exist; the environment and search path are only
    /// consulted when none is configured.
    pub fn find_blender(&self) -> BlenderResult<PathBuf> {
        // An explicit override never falls back to the search path.
        if let Some(ref path) = self.config.blender_path {
            if path.exists() {
                return Ok(path.clone());
            }
            return Err(BlenderError::ConfiguredBlenderMissing { path: path.clone() });
        }

        if let Ok(path) = std::env::var("BLENDER_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
        }

        let blender_names = if cfg!(windows) {
            vec!["blender.exe", "blender"]
        } else {
            vec!["blender"]
        };

        for name in blender_names {
            if let Ok(path) = which::which(name) {
                return Ok(path);
            }
        }

        let common_paths = if cfg!(windows) {
            vec![
                "C:\\Program Files\\Blender Foundation\\Blender 4.1\\blender.exe",
                "C:\\Program Files\\Blender Foundation\\Blender 4.0\\blender.exe",
                "C:\\Program Files\\Blender Foundation\\Blender 3.6\\blender.exe",
                "C:\\Program Files\\Blender Foundation\\Blender\\blender.exe",
            ]
        } else if cfg!(target_os = "macos") {
            vec![
                "/Applications/Blender.app/Contents/MacOS/Blender",
                "/Applications/Blender.app/Contents/MacOS/blender",
            ]
        } else {
            vec![
                "/usr/bin/blender",
                "/usr/local/bin/blender",
                "/snap/bin/blender",
            ]
        };

        for path_str in common_paths {
            let path = PathBuf::from(path_str);
            if path.exists() {
                return Ok(path);
            }
        }

        Err(BlenderError::BlenderNotFound)
    }

    fn resolve_entrypoint(&self) -> BlenderResult<ResolvedEntrypoint> {
        if self.config.entrypoint_path.exists() {
            return Ok(ResolvedEntrypoint {
                path: self.config.entrypoint_path.clone(),
                _tempfile: None,
            });
        }

        if let Ok(path) = std::env::var("SPRITESHEETS_BLENDER_ENTRYPOINT") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(ResolvedEntrypoint {
                    path,
                    _tempfile: None,
                });
            }
            return Err(BlenderError::EntrypointNotFound { path });
        }

        // Last resort: write embedded entrypoint to a temp file.
        let mut file = tempfile::Builder::new()
            .prefix("spritesheets_blender_entrypoint_")
            .suffix(".py")
            .tempfile()?;
        file.write_all(EMBEDDED_ENTRYPOINT_PY.as_bytes())?;
        file.flush()?;

        Ok(ResolvedEntrypoint {
            path: file.path().to_path_buf(),
            _tempfile: Some(file),
        })
    }

    /// Locates Blender and the entrypoint once for a series of invocations.
    pub fn session(&self, blend_file: &Path) -> BlenderResult<BlenderSession> {
        if !blend_file.exists() {
            return Err(BlenderError::BlendFileNotFound {
                path: blend_file.to_path_buf(),
            });
        }

        let blender_path = self.find_blender()?;
        let entrypoint = self.resolve_entrypoint()?;
        let scratch = tempfile::tempdir()?;
        debug!(blender = %blender_path.display(), entrypoint = %entrypoint.path.display(), "blender session ready");

        Ok(BlenderSession {
            blender_path,
            blend_file: blend_file.to_path_buf(),
            entrypoint,
            scratch,
            timeout: self.config.timeout,
            capture_output: self.config.capture_output,
        })
    }

    /// Exports the actions of `blend_file`.
    ///
    /// The subject defaults to the active object when `target` is `None`.
    pub fn inspect(&self, blend_file: &Path, target: Option<&str>) -> BlenderResult<SceneDescription> {
        let session = self.session(blend_file)?;
        let mut args = Vec::new();
        if let Some(target) = target {
            args.push(OsString::from("--target"));
            args.push(OsString::from(target));
        }

        let report = session.run(EntrypointMode::Inspect, &args)?;
        report.scene.ok_or(BlenderError::MissingScene)
    }
}

/// A located Blender executable and entrypoint bound to one `.blend` file.
#[derive(Debug)]
pub struct BlenderSession {
    blender_path: PathBuf,
    blend_file: PathBuf,
    entrypoint: ResolvedEntrypoint,
    scratch: tempfile::TempDir,
    timeout: Duration,
    capture_output: bool,
}

impl BlenderSession {
    /// Path of the Blender executable in use.
    pub fn blender_path(&self) -> &Path {
        &self.blender_path
    }

    /// Runs the entrypoint once and returns its report.
    ///
    /// `args` are passed to the entrypoint after `--mode` and `--report`.
    pub fn run(&self, mode: EntrypointMode, args: &[OsString]) -> BlenderResult<BlenderReport> {
        let report_path = self.scratch.path().join("report.json");
        if report_path.exists() {
            std::fs::remove_file(&report_path)?;
        }

        // blender --background <file> --python entrypoint.py -- --mode <mode> --report <path> ...
        let mut cmd = Command::new(&self.blender_path);
        cmd.arg("--background")
            .arg(&self.blend_file)
            .arg("--python")
            .arg(&self.entrypoint.path)
            .arg("--")
            .arg("--mode")
            .arg(mode.as_str())
            .arg("--report")
            .arg(&report_path)
            .args(args);

        if self.capture_output {
            // Only stderr is surfaced; a filled stdout pipe could stall Blender.
            cmd.stdout(Stdio::null()).stderr(Stdio::piped());
        }

        let child = cmd.spawn().map_err(BlenderError::SpawnFailed)?;
        let (status, stderr) = wait_with_timeout(child, self.timeout, self.capture_output)?;

        let report = read_report(&report_path);

        if !status.success() {
            // Prefer the entrypoint's own error message when it wrote one.
            if let Ok(BlenderReport {
                ok: false,
                error: Some(message),
                ..
            }) = &report
            {
                return Err(BlenderError::entrypoint_failed(mode.as_str(), message.clone()));
            }
            let exit_code = status.code().unwrap_or(-1);
            return Err(BlenderError::process_failed(exit_code, stderr));
        }

        let report = report?;
        if !report.ok {
            return Err(BlenderError::entrypoint_failed(
                mode.as_str(),
                report.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        Ok(report)
    }
}

fn read_report(report_path: &Path) -> BlenderResult<BlenderReport> {
    let report_content =
        std::fs::read_to_string(report_path).map_err(|e| BlenderError::ReadReportFailed {
            path: report_path.to_path_buf(),
            source: e,
        })?;
    serde_json::from_str(&report_content).map_err(BlenderError::ParseReportFailed)
}

/// Waits for `child`, killing it once `timeout` elapses.
///
/// Stderr is drained on a separate thread while waiting when `capture_output`
/// is set.
pub fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
    capture_output: bool,
) -> BlenderResult<(ExitStatus, String)> {
    let stderr_reader = child
        .stderr
        .take()
        .filter(|_| capture_output)
        .map(|mut err| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = err.read_to_end(&mut buf);
                String::from_utf8_lossy(&buf).into_owned()
            })
        });
    let start = Instant::now();

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(BlenderError::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(e) => return Err(BlenderError::SpawnFailed(e)),
        }
    };

    let stderr = stderr_reader
        .and_then(|reader| reader.join().ok())
        .unwrap_or_default();
    Ok((status, stderr))
}

/// Parses the version out of `blender --version` output.
pub fn parse_blender_version(output: &str) -> Option<String> {
    output
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("Blender "))
        .map(|v| v.trim().to_string())
}

/// Runs `blender --version` and returns the reported version.
pub fn blender_version(blender_path: &Path) -> BlenderResult<String> {
    let output = Command::new(blender_path)
        .arg("--version")
        .output()
        .map_err(BlenderError::SpawnFailed)?;
    if !output.status.success() {
        return Err(BlenderError::process_failed(
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr),
        ));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_blender_version(&stdout).unwrap_or_else(|| "unknown".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entrypoint_mode_as_str() {
        assert_eq!(EntrypointMode::Inspect.as_str(), "inspect");
        assert_eq!(EntrypointMode::RenderTile.as_str(), "render_tile");
    }

    #[test]
    fn test_config_builder() {
        let config = OrchestratorConfig::with_entrypoint("custom/path.py")
            .blender_path("/usr/bin/blender")
            .timeout_secs(600);

        assert_eq!(config.entrypoint_path, PathBuf::from("custom/path.py"));
        assert_eq!(config.blender_path, Some(PathBuf::from("/usr/bin/blender")));
        assert_eq!(config.timeout, Duration::from_secs(600));
    }

    #[test]
    fn test_wait_with_timeout_captures_stderr() {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "echo hello 1>&2"]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", "echo hello 1>&2"]);
            cmd
        };

        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        let child = cmd.spawn().unwrap();

        let (status, stderr) = wait_with_timeout(child, Duration::from_secs(2), true).unwrap();
        assert!(status.success());
        assert!(stderr.to_lowercase().contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn test_wait_with_timeout_drains_large_stderr() {
        let child = Command::new("sh")
            .args(["-c", "head -c 200000 /dev/zero | tr '\\0' x >&2"])
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        let (status, stderr) = wait_with_timeout(child, Duration::from_secs(10), true).unwrap();
        assert!(status.success());
        assert_eq!(stderr.len(), 200_000);
    }

    #[cfg(unix)]
    #[test]
    fn test_wait_with_timeout_kills_slow_process() {
        let child = Command::new("sh").args(["-c", "sleep 5"]).spawn().unwrap();
        let err = wait_with_timeout(child, Duration::from_millis(100), false).unwrap_err();
        assert!(matches!(err, BlenderError::Timeout { .. }));
    }

    #[test]
    fn test_resolve_entrypoint_falls_back_to_embedded() {
        if std::env::var_os("SPRITESHEETS_BLENDER_ENTRYPOINT").is_some() {
            eprintln!("SPRITESHEETS_BLENDER_ENTRYPOINT is set; skipping embedded entrypoint test");
            return;
        }

        let config = OrchestratorConfig::with_entrypoint("this/does/not/exist.py");
        let orchestrator = Orchestrator::with_config(config);

        let entrypoint = orchestrator.resolve_entrypoint().unwrap();
        assert!(entrypoint.path.exists());

        let content = std::fs::read_to_string(&entrypoint.path).unwrap();
        assert!(content.contains("Spritesheets Blender Entrypoint"));
    }

    #[test]
    fn test_missing_configured_blender_is_an_error() {
        let config = OrchestratorConfig::default().blender_path("this/does/not/exist/blender");
        let err = Orchestrator::with_config(config).find_blender().unwrap_err();
        match err {
            BlenderError::ConfiguredBlenderMissing { path } => {
                assert_eq!(path, PathBuf::from("this/does/not/exist/blender"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_session_requires_blend_file() {
        let err = Orchestrator::new()
            .session(Path::new("this/does/not/exist.blend"))
            .unwrap_err();
        assert!(matches!(err, BlenderError::BlendFileNotFound { .. }));
    }

    #[test]
    fn test_parse_blender_version() {
        let out = "Blender 4.0.2\nBuild date: ...\n";
        assert_eq!(parse_blender_version(out).as_deref(), Some("4.0.2"));
        assert_eq!(parse_blender_version("not blender\n"), None);
    }
}
