//! Driving parallel-ssh.
//!
//! We only build its argument vector, start it and wait. Per-host results
//! end up in the output directory; the only thing we look at is the exit
//! status of parallel-ssh itself.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tokio::process::Command;

use crate::error::PsshError;
use crate::log::Logger;

/// Upper bound of the random per-host delay, in seconds.
pub const SPLAY_WINDOW_SECS: u32 = 30;

/// SSH options that turn off host key verification.
const NO_HOST_KEY_VERIFY: [&str; 2] = ["StrictHostKeyChecking=no", "UserKnownHostsFile=/dev/null"];

#[derive(Debug, Clone)]
pub struct RunSpec {
    /// Command words, joined with spaces on the remote side.
    pub command: Vec<String>,
    /// Maximum number of simultaneous connections.
    pub threads: usize,
    /// Per-host timeout in seconds.
    pub timeout: u64,
    pub host_key_verify: bool,
    /// Passed to parallel-ssh verbatim, one argument each.
    pub extra_args: Vec<String>,
    pub user: Option<String>,
    pub splay: bool,
    pub output_dir: PathBuf,
}

impl RunSpec {
    /// The command string the remote shell runs.
    pub fn remote_command(&self) -> String {
        let command = format!("{} 2>&1", self.command.join(" "));
        if self.splay {
            format!(
                "sleep $(( $(od -An -N2 -tu2 /dev/urandom) % {} + 1 )); {}",
                SPLAY_WINDOW_SECS, command
            )
        } else {
            command
        }
    }

    /// Arguments for parallel-ssh, without the program itself.
    pub fn args(&self, hostlist: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-p".into(),
            self.threads.to_string().into(),
            "-o".into(),
            self.output_dir.clone().into(),
            "-t".into(),
            self.timeout.to_string().into(),
            "-h".into(),
            hostlist.into(),
        ];
        if !self.host_key_verify {
            for option in NO_HOST_KEY_VERIFY {
                args.push("-O".into());
                args.push(option.into());
            }
        }
        if let Some(user) = &self.user {
            args.push("-l".into());
            args.push(user.into());
        }
        args.extend(self.extra_args.iter().map(OsString::from));
        args.push(self.remote_command().into());
        args
    }
}

/// What happened when we were asked to run.
#[derive(Debug)]
pub enum RunOutcome {
    /// The host list was empty; parallel-ssh was not started.
    Skipped,
    Finished(ExitStatus),
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Skipped => 0,
            RunOutcome::Finished(status) => status.code().unwrap_or(1),
        }
    }
}

pub struct Executor {
    path: PathBuf,
}

impl Executor {
    /// Fails unless `path` is a regular file.
    pub fn locate(path: impl Into<PathBuf>) -> Result<Self, PsshError> {
        let path = path.into();
        if !path.is_file() {
            return Err(PsshError::ExecutorNotFound(path));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn run(
        &self,
        spec: &RunSpec,
        hostlist: &Path,
        targets: &[String],
        log: &Logger,
    ) -> Result<RunOutcome, PsshError> {
        // A cached host list may hold nothing but blank lines.
        if targets.iter().all(|t| t.trim().is_empty()) {
            log.warn("The host list is empty, not running anything.");
            log.warn("The --match pattern may be too narrow.");
            return Ok(RunOutcome::Skipped);
        }

        log.info(format!("Node log output path: {}", spec.output_dir.display()));
        log.info(format!(
            "Running command '{}' with parallel-ssh on {} nodes...",
            spec.command.join(" "),
            targets.len()
        ));
        if !spec.host_key_verify {
            log.warn("Disabled host key verification");
        }

        let args = spec.args(hostlist);
        log.debug(format!("{} {:?}", self.path.display(), args));

        // parallel-ssh inherits our stdout; get ours out first.
        let _ = std::io::stdout().flush();
        let mut child = Command::new(&self.path)
            .args(&args)
            .kill_on_drop(true)
            .spawn()
            .map_err(PsshError::Spawn)?;

        tokio::select! {
            status = child.wait() => Ok(RunOutcome::Finished(status.map_err(PsshError::Spawn)?)),
            _ = tokio::signal::ctrl_c() => {
                log.error("Ctrl-c detected. Killing parallel-ssh.");
                let _ = child.kill().await;
                Err(PsshError::Interrupted)
            }
        }
    }
}
