//! Printer queue discovery
//!
//! Best-effort, platform-branched enumeration behind the [`Enumerator`]
//! trait. The POSIX implementation queries CUPS (`lpstat`); the Windows
//! implementation queries WMI (`wmic`) and cross-checks the default queue
//! against the user registry. Output parsing is split into pure functions
//! so each format is unit-testable on canned command output.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use shared::models::{PrinterDescriptor, PrinterStatus};

use crate::error::{PrintError, PrintResult};

/// Platform printer discovery
#[async_trait]
pub trait Enumerator: Send + Sync {
    /// Snapshot of visible queues, default-first then alphabetical
    async fn printers(&self) -> PrintResult<Vec<PrinterDescriptor>>;
}

/// The enumerator for the compiled platform
pub fn platform_enumerator(timeout: Duration) -> Box<dyn Enumerator> {
    #[cfg(windows)]
    {
        Box::new(WindowsEnumerator { timeout })
    }
    #[cfg(not(windows))]
    {
        Box::new(CupsEnumerator { timeout })
    }
}

/// CUPS-based discovery (`lpstat -a` / `lpstat -d`)
pub struct CupsEnumerator {
    pub timeout: Duration,
}

#[async_trait]
impl Enumerator for CupsEnumerator {
    async fn printers(&self) -> PrintResult<Vec<PrinterDescriptor>> {
        let queues = run_capture("lpstat", &["-a"], self.timeout).await?;
        // The default query failing is not fatal; queues alone are useful
        let default = run_capture("lpstat", &["-d"], self.timeout)
            .await
            .ok()
            .and_then(|out| parse_lpstat_default(&out));

        let mut printers = parse_lpstat_queues(&queues, default.as_deref());
        sort_printers(&mut printers);
        Ok(printers)
    }
}

/// WMI-based discovery with a registry cross-check for the default queue
pub struct WindowsEnumerator {
    pub timeout: Duration,
}

#[async_trait]
impl Enumerator for WindowsEnumerator {
    async fn printers(&self) -> PrintResult<Vec<PrinterDescriptor>> {
        let csv = run_capture(
            "wmic",
            &[
                "printer",
                "get",
                "Default,Name,PortName,ShareName,WorkOffline",
                "/format:csv",
            ],
            self.timeout,
        )
        .await?;
        let mut printers = parse_wmic_csv(&csv);

        // WMI sometimes reports no default at all; fall back to the
        // per-user registry value
        if !printers.iter().any(|p| p.is_default) {
            let reg = run_capture(
                "reg",
                &[
                    "query",
                    r"HKCU\Software\Microsoft\Windows NT\CurrentVersion\Windows",
                    "/v",
                    "Device",
                ],
                self.timeout,
            )
            .await;
            if let Ok(reg) = reg
                && let Some(default) = parse_registry_default(&reg)
            {
                for printer in &mut printers {
                    if printer.name == default {
                        printer.is_default = true;
                    }
                }
            }
        }

        sort_printers(&mut printers);
        Ok(printers)
    }
}

async fn run_capture(program: &str, args: &[&str], timeout: Duration) -> PrintResult<String> {
    let output = tokio::time::timeout(timeout, Command::new(program).args(args).output())
        .await
        .map_err(|_| PrintError::Timeout(format!("{program} timed out")))?
        .map_err(PrintError::Io)?;

    if !output.status.success() {
        return Err(PrintError::Enumeration(format!(
            "{program} exited with {}",
            output.status
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `lpstat -a` output ("<queue> accepting requests since ...")
pub fn parse_lpstat_queues(output: &str, default: Option<&str>) -> Vec<PrinterDescriptor> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(|name| {
            let mut printer = PrinterDescriptor::new(name);
            printer.status = PrinterStatus::Available;
            printer.is_default = Some(name) == default;
            printer
        })
        .collect()
}

/// Parse `lpstat -d` output ("system default destination: <queue>")
pub fn parse_lpstat_default(output: &str) -> Option<String> {
    let line = output.lines().next()?;
    if line.contains("no system default") {
        return None;
    }
    line.rsplit(':')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Parse `wmic printer get ... /format:csv` output
///
/// The CSV carries a `Node` column first and properties in alphabetical
/// order; columns are matched by header name to stay robust.
pub fn parse_wmic_csv(output: &str) -> Vec<PrinterDescriptor> {
    let mut lines = output.lines().map(str::trim).filter(|l| !l.is_empty());
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let columns: Vec<&str> = header.split(',').collect();
    let index_of = |name: &str| columns.iter().position(|c| c.eq_ignore_ascii_case(name));

    let Some(name_idx) = index_of("Name") else {
        return Vec::new();
    };
    let default_idx = index_of("Default");
    let port_idx = index_of("PortName");
    let share_idx = index_of("ShareName");
    let offline_idx = index_of("WorkOffline");

    lines
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            let name = fields.get(name_idx)?.trim();
            if name.is_empty() {
                return None;
            }

            let field = |idx: Option<usize>| {
                idx.and_then(|i| fields.get(i))
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
            };

            let mut printer = PrinterDescriptor::new(name);
            printer.is_default = field(default_idx).is_some_and(|v| v.eq_ignore_ascii_case("TRUE"));
            printer.share_name = field(share_idx).map(String::from);
            printer.port = field(port_idx).map(String::from);
            printer.status = match field(offline_idx) {
                Some(v) if v.eq_ignore_ascii_case("TRUE") => PrinterStatus::Offline,
                Some(_) => PrinterStatus::Available,
                None => PrinterStatus::Unknown,
            };
            Some(printer)
        })
        .collect()
}

/// Parse the default device out of the user registry
/// (`Device    REG_SZ    <printer>,winspool,Ne01:`)
pub fn parse_registry_default(output: &str) -> Option<String> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("Device"))?;
    let value = line.rsplit("REG_SZ").next()?;
    value
        .split(',')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Default-first, then alphabetical
pub fn sort_printers(printers: &mut [PrinterDescriptor]) {
    printers.sort_by(|a, b| {
        b.is_default
            .cmp(&a.is_default)
            .then_with(|| a.name.cmp(&b.name))
    });
}
