use async_trait::async_trait;
use recall_core::{AdvisorError, TextAdvisor};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Advisor backed by a local command: the prompt goes to its stdin, the
/// answer is read from its stdout. Token budget and temperature are passed as
/// `RECALL_MAX_TOKENS` and `RECALL_TEMPERATURE`.
pub struct CommandAdvisor {
    program: String,
    args: Vec<String>,
}

impl CommandAdvisor {
    /// Splits a command line on whitespace. Returns `None` for a blank line.
    pub fn parse(cmdline: &str) -> Option<Self> {
        let mut parts = cmdline.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait]
impl TextAdvisor for CommandAdvisor {
    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, AdvisorError> {
        // killed if the caller's timeout drops this future
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("RECALL_MAX_TOKENS", max_tokens.to_string())
            .env("RECALL_TEMPERATURE", temperature.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AdvisorError::Unavailable(format!("{}: {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .await
                .map_err(|e| AdvisorError::Failed(e.to_string()))?;
        }

        let out = child
            .wait_with_output()
            .await
            .map_err(|e| AdvisorError::Failed(e.to_string()))?;
        if out.status.code().is_none() {
            return Err(AdvisorError::Cancelled);
        }
        if !out.status.success() {
            return Err(AdvisorError::Failed(format!("exited with {}", out.status)));
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }
}
