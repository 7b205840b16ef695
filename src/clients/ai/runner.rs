//! Local model runner transport.
//!
//! Spawns the runner executable, writes the prompt to its stdin and reads the
//! reply from stdout. The child is killed if the future is dropped, so a
//! timeout or a closed client connection does not leave a model process behind.

use crate::clients::ai::CompletionBackend;
use crate::{AppError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

pub struct LocalRunnerClient {
    program: String,
    args: Vec<String>,
}

impl LocalRunnerClient {
    pub fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
        }
    }

    async fn run(&self, prompt: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::ExternalApi(format!("Failed to start {}: {}", self.program, e)))?;

        let stdin = child.stdin.take();
        let write_prompt = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(prompt.as_bytes()).await?;
                // Closing stdin signals end of prompt
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };

        // Output is drained while the prompt is still being written
        let (written, output) = tokio::join!(write_prompt, child.wait_with_output());

        let output = output
            .map_err(|e| AppError::ExternalApi(format!("Failed to read output of {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::ExternalApi(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        written.map_err(|e| {
            AppError::ExternalApi(format!("Failed to write prompt to {}: {}", self.program, e))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(program = %self.program, bytes = stdout.len(), "Runner produced output");

        Ok(stdout)
    }
}

#[async_trait]
impl CompletionBackend for LocalRunnerClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.run(prompt).await
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_prompt_goes_through_stdin() {
        let client = LocalRunnerClient::new("cat", vec![]);
        let output = client.complete("  {\"trend\": \"Positive\"}\n").await.unwrap();
        assert_eq!(output, "{\"trend\": \"Positive\"}");
    }

    #[tokio::test]
    async fn test_large_prompt_does_not_block_on_full_pipes() {
        let client = LocalRunnerClient::new("cat", vec![]);
        let prompt = "x".repeat(1 << 20);

        let output = tokio::time::timeout(Duration::from_secs(10), client.complete(&prompt))
            .await
            .expect("runner finished within 10s")
            .unwrap();
        assert_eq!(output.len(), 1 << 20);
    }

    #[tokio::test]
    async fn test_missing_executable() {
        let client = LocalRunnerClient::new("definitely-not-a-model-runner", vec![]);
        let err = client.complete("hello").await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
        assert!(err.to_string().contains("Failed to start definitely-not-a-model-runner"));
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let client = LocalRunnerClient::new(
            "sh",
            vec!["-c".to_string(), "cat >/dev/null; echo model not found >&2; exit 3".to_string()],
        );
        let err = client.complete("hello").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("exited with"), "{}", message);
        assert!(message.contains("model not found"), "{}", message);
    }
}
