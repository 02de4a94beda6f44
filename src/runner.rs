use anyhow::{anyhow, Context, Result};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// One game played by the bot: the weight string goes in on stdin, the whole
/// stdout comes back as text.
pub trait BotProcess {
    fn describe(&self) -> String;
    fn play(&mut self, weights: &str) -> Result<String>;
}

/// The pre-built game executable, launched once per run and waited on.
#[derive(Clone, Debug)]
pub struct ExternalBot {
    program: PathBuf,
    args: Vec<String>,
}

impl ExternalBot {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl BotProcess for ExternalBot {
    fn describe(&self) -> String {
        let program = self.program().display();
        if self.args.is_empty() {
            program.to_string()
        } else {
            format!("{program} {}", self.args.join(" "))
        }
    }

    fn play(&mut self, weights: &str) -> Result<String> {
        let mut child = Command::new(self.program())
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed launching {}", self.describe()))?;

        // Dropping the handle closes the pipe so the bot sees EOF after the weights.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("stdin of {} was not captured", self.describe()))?;
        match stdin.write_all(weights.as_bytes()) {
            Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                tracing::warn!(weights, "bot exited before reading its weights");
            }
            other => other.with_context(|| format!("failed writing weights {weights}"))?,
        }
        drop(stdin);

        let output = child
            .wait_with_output()
            .with_context(|| format!("failed waiting on {}", self.describe()))?;
        if !output.status.success() {
            tracing::warn!(status = %output.status, weights, "bot exited unsuccessfully");
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
