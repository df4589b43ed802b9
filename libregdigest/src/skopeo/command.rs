//! `skopeo inspect` invocations.
//!
//! Every call site builds its command line through [`InspectCommand`], which
//! produces a plain argument vector. Nothing goes through a shell, so
//! credentials containing spaces, quotes or `$` are passed through intact.

use crate::error::{DigestError, Result};
use async_trait::async_trait;
use std::fmt;
use tokio::process::Command;
use tracing::debug;

/// One `skopeo inspect` call.
#[derive(Clone, PartialEq, Eq)]
pub struct InspectCommand {
    program: String,
    override_os: String,
    credentials: Option<(String, String)>,
    raw: bool,
    image: String,
}

impl InspectCommand {
    /// Creates an inspect command for `image` (without the `docker://` transport).
    pub fn new(program: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            override_os: "linux".to_string(),
            credentials: None,
            raw: false,
            image: image.into(),
        }
    }

    /// Sets the value of `--override-os`.
    pub fn override_os(mut self, os: impl Into<String>) -> Self {
        self.override_os = os.into();
        self
    }

    /// Authenticates with `--creds user:key`.
    pub fn credentials(mut self, user: impl Into<String>, key: impl Into<String>) -> Self {
        self.credentials = Some((user.into(), key.into()));
        self
    }

    /// Requests the raw manifest instead of skopeo's resolved summary.
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Returns the program to execute.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the arguments, program excluded.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::skopeo::InspectCommand;
    ///
    /// let cmd = InspectCommand::new("skopeo", "library/nginx:1.25")
    ///     .credentials("ci-bot", "dckr_pat")
    ///     .raw(true);
    /// assert_eq!(
    ///     cmd.args(),
    ///     vec![
    ///         "inspect", "--creds", "ci-bot:dckr_pat", "--override-os", "linux",
    ///         "--raw", "docker://library/nginx:1.25",
    ///     ]
    /// );
    /// ```
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["inspect".to_string()];
        if let Some((user, key)) = &self.credentials {
            args.push("--creds".to_string());
            args.push(format!("{}:{}", user, key));
        }
        args.push("--override-os".to_string());
        args.push(self.override_os.clone());
        if self.raw {
            args.push("--raw".to_string());
        }
        args.push(format!("docker://{}", self.image));
        args
    }
}

/// Renders the command line with the credentials masked.
impl fmt::Display for InspectCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} inspect", self.program)?;
        if self.credentials.is_some() {
            f.write_str(" --creds <redacted>")?;
        }
        write!(f, " --override-os {}", self.override_os)?;
        if self.raw {
            f.write_str(" --raw")?;
        }
        write!(f, " docker://{}", self.image)
    }
}

impl fmt::Debug for InspectCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InspectCommand({})", self)
    }
}

/// What an inspection run produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InspectOutput {
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// Runs inspect commands.
#[async_trait]
pub trait InspectRunner: Send + Sync {
    /// Executes `command`. Only a failure to start the program is an error;
    /// a non-zero exit is reported through [`InspectOutput::success`].
    async fn run(&self, command: &InspectCommand) -> Result<InspectOutput>;
}

/// Runs the real program as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl InspectRunner for ProcessRunner {
    async fn run(&self, command: &InspectCommand) -> Result<InspectOutput> {
        debug!(command = %command, "running inspection");

        let output = Command::new(command.program())
            .args(command.args())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                DigestError::backend(
                    format!("Failed to run {}: {}", command.program(), e),
                    None,
                )
            })?;

        Ok(InspectOutput {
            success: output.status.success(),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
