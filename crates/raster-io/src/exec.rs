//! External process boundary.
//!
//! Video tooling and similar collaborators are driven through an
//! external command-line tool; the engine only needs to run an
//! executable with an ordered argument list and read back stdout and the
//! exit code. Success is exit code 0.

use crate::IoResult;
use std::process::Command;

/// Captured result of an external command.
#[derive(Debug, Clone)]
pub struct Exec {
    /// Raw bytes the command wrote to stdout.
    pub stdout: Vec<u8>,
    /// Process exit code; -1 when terminated by a signal.
    pub exit_code: i32,
}

impl Exec {
    /// Returns `true` if the command exited with code 0.
    #[inline]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs `program` with `args` and captures stdout and the exit code.
///
/// # Errors
///
/// Returns [`IoError::Io`](crate::IoError::Io) if the program cannot be
/// spawned at all; a nonzero exit is not an error here, callers check
/// [`Exec::success`].
pub fn run<I, S>(program: &str, args: I) -> IoResult<Exec>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let output = Command::new(program).args(args).output()?;
    Ok(Exec {
        stdout: output.stdout,
        exit_code: output.status.code().unwrap_or(-1),
    })
}
