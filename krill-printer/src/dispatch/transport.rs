//! Artifact transports
//!
//! Ordered delivery strategies for a finished artifact. The chain is built
//! as an explicit list so additional transports append without
//! restructuring control flow; the dispatcher walks it in order and stops
//! at the first success.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::error::{PrintError, PrintResult};

use super::DispatchConfig;

/// One concrete way of delivering bytes to a printer queue
#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &'static str;

    /// Deliver the spooled file; an `Err` advances the chain
    async fn send(&self, file: &Path) -> PrintResult<()>;
}

/// Binary copy of the spool file onto a network share path
pub struct ShareCopy {
    target: PathBuf,
}

impl ShareCopy {
    pub fn new(target: PathBuf) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Transport for ShareCopy {
    fn name(&self) -> &'static str {
        "share-copy"
    }

    async fn send(&self, file: &Path) -> PrintResult<()> {
        let written = tokio::fs::copy(file, &self.target).await?;
        info!(target = %self.target.display(), bytes = written, "spool copied to share");
        Ok(())
    }
}

/// Named-queue print command
pub struct QueueCommand {
    printer: String,
    program: QueueProgram,
}

/// Which spool program backs the queue command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueProgram {
    /// CUPS `lp -d <printer> <file>`
    Lp,
    /// BSD `lpr -P <printer> <file>`
    Lpr,
    /// Windows `print /D:<printer> <file>`
    WindowsPrint,
    /// Operator-supplied program invoked as `<program> <printer> <file>`
    Custom(String),
}

impl QueueCommand {
    pub fn new(printer: impl Into<String>, program: QueueProgram) -> Self {
        Self {
            printer: printer.into(),
            program,
        }
    }

    fn command(&self, file: &Path) -> Command {
        match &self.program {
            QueueProgram::Lp => {
                let mut cmd = Command::new("lp");
                cmd.arg("-d").arg(&self.printer).arg(file);
                cmd
            }
            QueueProgram::Lpr => {
                let mut cmd = Command::new("lpr");
                cmd.arg("-P").arg(&self.printer).arg(file);
                cmd
            }
            QueueProgram::WindowsPrint => {
                let mut cmd = Command::new("cmd");
                cmd.arg("/C")
                    .arg("print")
                    .arg(format!("/D:{}", self.printer))
                    .arg(file);
                cmd
            }
            QueueProgram::Custom(program) => {
                let mut cmd = Command::new(program);
                cmd.arg(&self.printer).arg(file);
                cmd
            }
        }
    }
}

#[async_trait]
impl Transport for QueueCommand {
    fn name(&self) -> &'static str {
        match self.program {
            QueueProgram::Lp => "lp",
            QueueProgram::Lpr => "lpr",
            QueueProgram::WindowsPrint => "print",
            QueueProgram::Custom(_) => "custom-queue",
        }
    }

    async fn send(&self, file: &Path) -> PrintResult<()> {
        let output = self.command(file).output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PrintError::Transport(format!(
                "{} exited with {}: {}",
                self.name(),
                output.status,
                stderr.trim()
            )));
        }
        info!(printer = %self.printer, program = self.name(), "queue command accepted job");
        Ok(())
    }
}

/// Resolve a target that is itself a network share path
///
/// UNC names (`\\host\queue`) and `smb://host/queue` URLs qualify; plain
/// queue names do not.
pub fn share_target(printer: &str) -> Option<PathBuf> {
    if printer.starts_with(r"\\") {
        return Some(PathBuf::from(printer));
    }
    printer
        .strip_prefix("smb://")
        .map(|rest| PathBuf::from(format!(r"\\{}", rest.replace('/', r"\"))))
}

/// Build the ordered transport chain for a target queue
pub fn transport_chain(printer: &str, config: &DispatchConfig) -> Vec<Box<dyn Transport>> {
    let mut chain: Vec<Box<dyn Transport>> = Vec::new();

    if let Some(share) = share_target(printer) {
        chain.push(Box::new(ShareCopy::new(share)));
    }

    if let Some(program) = &config.queue_command {
        chain.push(Box::new(QueueCommand::new(
            printer,
            QueueProgram::Custom(program.clone()),
        )));
    } else if cfg!(windows) {
        chain.push(Box::new(QueueCommand::new(
            printer,
            QueueProgram::WindowsPrint,
        )));
    } else {
        chain.push(Box::new(QueueCommand::new(printer, QueueProgram::Lp)));
        chain.push(Box::new(QueueCommand::new(printer, QueueProgram::Lpr)));
    }

    chain
}
