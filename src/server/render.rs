//! Rendering graph descriptions with an external process.
//!
//! [`DotRenderer`] feeds a graph description to a command such as
//! `dot -Tsvg` on stdin and returns what it prints. Every run is bounded by a
//! timeout, and the child process is killed whenever the render future is
//! dropped before the process exits, including on timeout.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{PolydictError, Result};

/// Trait for components that turn a textual graph description into an image.
#[async_trait]
pub trait GraphRenderer: Send + Sync {
    /// Render `graph`, returning the image as text (e.g. SVG).
    async fn render(&self, graph: &str) -> Result<String>;
}

/// Renders graphs by piping them through an external command.
#[derive(Debug, Clone)]
pub struct DotRenderer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl DotRenderer {
    /// Create a renderer for a whitespace-separated command line.
    pub fn new(command: &str, timeout: Duration) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| PolydictError::invalid_config("render command is empty"))?;

        Ok(DotRenderer {
            program,
            args: parts.collect(),
            timeout,
        })
    }

    /// The command line this renderer runs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn run(&self, graph: &str) -> Result<String> {
        info!("Running {}", self.command_line());
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| PolydictError::render("child process has no stdin"))?;
        let input = graph.as_bytes().to_vec();
        let feed = async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;
        fed?;

        info!("Process exited with {}", output.status);
        if !output.status.success() {
            return Err(PolydictError::render(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let rendered = String::from_utf8(output.stdout)
            .map_err(|e| PolydictError::render(format!("output is not UTF-8: {e}")))?;
        debug!("Read {} bytes of rendered output", rendered.len());
        Ok(rendered)
    }
}

#[async_trait]
impl GraphRenderer for DotRenderer {
    async fn render(&self, graph: &str) -> Result<String> {
        match tokio::time::timeout(self.timeout, self.run(graph)).await {
            Ok(result) => result,
            Err(_) => Err(PolydictError::render(format!(
                "{} did not finish within {:?}",
                self.command_line(),
                self.timeout
            ))),
        }
    }
}
