//! External command execution.
//!
//! Runners never fail: a missing executable, a spawn error or a timeout is
//! reported through a reserved exit code so collectors can treat "tool not
//! installed" exactly like "tool found nothing".

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Exit code reported when the command ran past its timeout.
pub const EXIT_TIMED_OUT: i32 = 124;

/// Exit code reported when the command exists but could not be started.
pub const EXIT_CANNOT_EXECUTE: i32 = 126;

/// Exit code reported when the executable could not be located.
pub const EXIT_NOT_FOUND: i32 = 127;

/// Interval between exit checks while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured result of one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Output with exit code 0 and the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Output describing a failure with no captured stdout.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Sentinel output for an executable that is not installed.
    #[must_use]
    pub fn not_found(program: &str) -> Self {
        Self::failed(EXIT_NOT_FOUND, format!("command not found: {program}"))
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.code == 0
    }
}

/// Something that can run an external command.
///
/// Implementations must not panic or return errors; failures are encoded in
/// [`CommandOutput::code`].
pub trait CommandRunner: Sync {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> CommandOutput;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// A runner that waits for commands indefinitely.
    #[must_use]
    pub const fn new() -> Self {
        Self { timeout: None }
    }

    /// A runner that kills commands still running after `timeout`.
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> CommandOutput {
        tracing::trace!(program, ?args, cwd = %cwd.display(), "running command");

        let spawned = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return CommandOutput::not_found(program);
            }
            Err(e) => {
                return CommandOutput::failed(
                    EXIT_CANNOT_EXECUTE,
                    format!("failed to run {program}: {e}"),
                );
            }
        };

        // Drain both pipes concurrently so a chatty child cannot block on a full pipe.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);
        match wait(&mut child, self.timeout) {
            Ok(Some(status)) => CommandOutput {
                code: status.code().unwrap_or(-1),
                stdout: collect(stdout),
                stderr: collect(stderr),
            },
            Ok(None) => {
                // Grandchildren may still hold the pipes open; leave the drain threads detached.
                drop((stdout, stderr));
                tracing::debug!(program, timeout = ?self.timeout, "command timed out");
                CommandOutput::failed(EXIT_TIMED_OUT, format!("{program} timed out"))
            }
            Err(e) => CommandOutput::failed(
                EXIT_CANNOT_EXECUTE,
                format!("failed to wait for {program}: {e}"),
            ),
        }
    }
}

/// Waits for `child`, returning `None` if it was killed at the deadline.
fn wait(child: &mut Child, timeout: Option<Duration>) -> io::Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return child.wait().map(Some);
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            // The child may exit between the check and the kill; either way it is gone.
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
