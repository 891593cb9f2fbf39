//! External sheet assembler.
//!
//! The assembler packs the tiles under `<root>/temp` into one image. It is
//! shipped as one executable per host platform and invoked as
//! `<assembler> --root <root> --out <subject>.png` with `<root>` as working
//! directory.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

/// Default timeout for the assembler (10 minutes).
pub const DEFAULT_ASSEMBLER_TIMEOUT_SECS: u64 = 600;

/// Errors from locating or running the assembler.
#[derive(Debug, Error)]
pub enum AssemblerError {
    /// No assembler executable found.
    #[error("assembler '{name}' not found (searched {searched})")]
    NotFound { name: &'static str, searched: String },

    /// Failed to spawn the assembler.
    #[error("failed to spawn assembler {path}: {source}")]
    SpawnFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Assembler timed out.
    #[error("assembler timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Assembler exited with non-zero status.
    #[error("assembler exited with status {exit_code}: {stderr}")]
    Failed { exit_code: i32, stderr: String },

    /// Assembler exited cleanly without writing the sheet image.
    #[error("assembler did not produce {path}")]
    OutputMissing { path: PathBuf },
}

/// Host platforms the assembler is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerPlatform {
    Windows,
    Linux,
    MacOs,
}

impl AssemblerPlatform {
    /// Platform of the running host.
    pub fn current() -> Self {
        if cfg!(windows) {
            AssemblerPlatform::Windows
        } else if cfg!(target_os = "linux") {
            AssemblerPlatform::Linux
        } else {
            AssemblerPlatform::MacOs
        }
    }

    /// Executable name of the assembler build for this platform.
    pub fn executable_name(&self) -> &'static str {
        match self {
            AssemblerPlatform::Windows => "assembler.exe",
            AssemblerPlatform::Linux => "assembler_linux",
            AssemblerPlatform::MacOs => "assembler_mac",
        }
    }
}

/// A located assembler executable.
#[derive(Debug, Clone)]
pub struct Assembler {
    path: PathBuf,
    timeout: Duration,
}

impl Assembler {
    /// Uses the executable at `path` as-is.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            timeout: Duration::from_secs(DEFAULT_ASSEMBLER_TIMEOUT_SECS),
        }
    }

    /// Finds the assembler for `platform` in `bin_path`, falling back to PATH.
    pub fn locate(bin_path: Option<&Path>, platform: AssemblerPlatform) -> Result<Self, AssemblerError> {
        let name = platform.executable_name();
        let mut searched = Vec::new();

        if let Some(dir) = bin_path {
            let candidate = dir.join(name);
            if candidate.is_file() {
                // Absolute, since the assembler runs with a different working directory.
                let candidate = candidate.canonicalize().unwrap_or(candidate);
                return Ok(Self::new(candidate));
            }
            searched.push(dir.display().to_string());
        }

        if let Ok(path) = which::which(name) {
            return Ok(Self::new(path));
        }
        searched.push("PATH".to_string());

        Err(AssemblerError::NotFound {
            name,
            searched: searched.join(", "),
        })
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Path of the executable.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Packs the tiles under `root` into `<root>/<subject>.png`.
    pub fn assemble(&self, root: &Path, subject: &str) -> Result<PathBuf, AssemblerError> {
        let out_name = format!("{}.png", subject);
        info!(assembler = %self.path.display(), root = %root.display(), "assembling sheet");

        let mut cmd = Command::new(&self.path);
        cmd.arg("--root")
            .arg(root)
            .arg("--out")
            .arg(&out_name)
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let child = cmd.spawn().map_err(|source| AssemblerError::SpawnFailed {
            path: self.path.clone(),
            source,
        })?;
        let (status, stderr) = wait_with_timeout(child, self.timeout)?;

        if !status.success() {
            return Err(AssemblerError::Failed {
                exit_code: status.code().unwrap_or(-1),
                stderr,
            });
        }

        let sheet = root.join(out_name);
        if !sheet.exists() {
            return Err(AssemblerError::OutputMissing { path: sheet });
        }
        debug!(sheet = %sheet.display(), "sheet assembled");
        Ok(sheet)
    }
}

fn wait_with_timeout(mut child: Child, timeout: Duration) -> Result<(ExitStatus, String), AssemblerError> {
    // Drained concurrently; a full pipe would stall the child until the timeout.
    let stderr_reader = child.stderr.take().map(|mut err| {
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
                    return Err(AssemblerError::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(source) => {
                return Err(AssemblerError::SpawnFailed {
                    path: PathBuf::new(),
                    source,
                })
            }
        }
    };

    let stderr = stderr_reader
        .and_then(|reader| reader.join().ok())
        .unwrap_or_default();
    Ok((status, stderr))
}
