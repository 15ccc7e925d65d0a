//! Launching one external sorting program and capturing what it prints.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::SweepConfig;
use crate::error::{BenchError, Result};
use crate::types::{AlgorithmId, SizeExponent};

/// Poll interval while waiting on a child with a deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Something that can execute one trial and hand back its raw output.
///
/// Calls are blocking and must never overlap: the measured programs time
/// themselves and would contend for the same cores.
pub trait TrialRunner {
    fn run_trial(&mut self, algorithm: &AlgorithmId, size: SizeExponent) -> Result<String>;
}

/// Runs `<bin_dir>/<algorithm> <2^n>` as a child process.
#[derive(Clone, Debug)]
pub struct ProcessRunner {
    bin_dir: PathBuf,
    timeout: Option<Duration>,
    max_argument: u64,
}

impl ProcessRunner {
    pub fn new(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            timeout: None,
            max_argument: crate::config::DEFAULT_MAX_ARGUMENT,
        }
    }

    pub fn from_config(config: &SweepConfig) -> Self {
        Self {
            bin_dir: config.bin_dir.clone(),
            timeout: config.timeout(),
            max_argument: config.max_argument,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Path of the executable for an algorithm.
    pub fn program_path(&self, algorithm: &AlgorithmId) -> PathBuf {
        self.bin_dir.join(algorithm.as_str())
    }
}

impl TrialRunner for ProcessRunner {
    fn run_trial(&mut self, algorithm: &AlgorithmId, size: SizeExponent) -> Result<String> {
        let elements = size.elements(self.max_argument)?;
        let path = self.program_path(algorithm);
        debug!(program = %path.display(), elements, "launching trial");

        let mut command = Command::new(&path);
        command
            .arg(elements.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // A deadline kills the whole group, so helpers the program forks die with it.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            if self.timeout.is_some() {
                command.process_group(0);
            }
        }

        let child = command.spawn().map_err(|source| BenchError::LaunchFailure {
            path: path.clone(),
            source,
        })?;

        let (status, stdout, stderr) = match self.timeout {
            None => {
                let output = child.wait_with_output()?;
                (
                    output.status,
                    String::from_utf8_lossy(&output.stdout).into_owned(),
                    String::from_utf8_lossy(&output.stderr).into_owned(),
                )
            }
            Some(timeout) => wait_with_deadline(child, &path, timeout)?,
        };

        if !status.success() {
            return Err(BenchError::NonZeroExit {
                path,
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(stdout)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            // A read error just truncates the capture; the exit status still decides.
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Kill the child and everything in its process group.
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    unsafe {
        // The child leads its own group, so its pid is the group id.
        libc::killpg(child.id() as libc::pid_t, libc::SIGKILL);
    }
    // kill fails only if the child already exited, in which case wait reaps it
    let _ = child.kill();
}

/// Wait for the child, killing and reaping it if it outlives `timeout`.
///
/// On expiry the drain threads are left detached: a descendant that escaped
/// the kill may still hold the pipes open, and its output is discarded anyway.
fn wait_with_deadline(
    mut child: Child,
    path: &Path,
    timeout: Duration,
) -> Result<(ExitStatus, String, String)> {
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());
    let deadline = Instant::now() + timeout;

    let status = loop {
        if let Some(status) = child.try_wait()? {
            break Some(status);
        }
        if Instant::now() >= deadline {
            kill_tree(&mut child);
            child.wait()?;
            break None;
        }
        thread::sleep(POLL_INTERVAL);
    };

    match status {
        Some(status) => Ok((
            status,
            stdout.join().unwrap_or_default(),
            stderr.join().unwrap_or_default(),
        )),
        None => Err(BenchError::Timeout {
            path: path.to_path_buf(),
            timeout,
        }),
    }
}
