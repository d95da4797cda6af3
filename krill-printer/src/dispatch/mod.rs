//! Printer dispatcher
//!
//! Discovers printer queues and transmits one finished artifact to a named
//! queue. The artifact is spooled to a uniquely named temp file that is
//! removed on every exit path (RAII); transport strategies run strictly in
//! order with a per-attempt timeout.

pub mod enumerate;
pub mod transport;

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::{info, instrument, warn};

use shared::models::PrinterDescriptor;

use crate::error::{PrintError, PrintResult};
use crate::render::Artifact;

pub use enumerate::Enumerator;
pub use transport::Transport;

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Upper bound on each transport attempt
    pub attempt_timeout: Duration,
    /// Upper bound on each discovery command
    pub enum_timeout: Duration,
    /// Operator override for the POSIX spool program
    pub queue_command: Option<String>,
}

impl DispatchConfig {
    pub fn from_env() -> Self {
        Self {
            attempt_timeout: Duration::from_millis(
                std::env::var("PRINT_ATTEMPT_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10_000),
            ),
            enum_timeout: Duration::from_millis(
                std::env::var("PRINT_ENUM_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5_000),
            ),
            queue_command: std::env::var("PRINT_QUEUE_COMMAND")
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_millis(10_000),
            enum_timeout: Duration::from_millis(5_000),
            queue_command: None,
        }
    }
}

/// Discovers queues and delivers artifacts
pub struct PrinterDispatcher {
    config: DispatchConfig,
    enumerator: Box<dyn Enumerator>,
}

impl PrinterDispatcher {
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::from_env())
    }

    pub fn with_config(config: DispatchConfig) -> Self {
        let enumerator = enumerate::platform_enumerator(config.enum_timeout);
        Self {
            config,
            enumerator,
        }
    }

    /// Custom discovery backend (tests, exotic spoolers)
    pub fn with_parts(config: DispatchConfig, enumerator: Box<dyn Enumerator>) -> Self {
        Self {
            config,
            enumerator,
        }
    }

    /// Snapshot of visible printer queues
    ///
    /// Discovery is best-effort: any failure degrades to a single synthetic
    /// default entry rather than propagating. Results are never cached.
    #[instrument(skip(self))]
    pub async fn enumerate(&self) -> Vec<PrinterDescriptor> {
        match self.enumerator.printers().await {
            Ok(printers) if !printers.is_empty() => printers,
            Ok(_) => {
                warn!("no printer queues visible, degrading to synthetic default");
                vec![PrinterDescriptor::synthetic_default()]
            }
            Err(e) => {
                warn!(error = %e, "printer discovery failed, degrading to synthetic default");
                vec![PrinterDescriptor::synthetic_default()]
            }
        }
    }

    /// Transmit one artifact to the named queue
    ///
    /// Spools to a temp file, then walks the ordered transport chain. The
    /// temp file is removed when this function returns, on every path.
    #[instrument(skip(self, artifact), fields(bytes = artifact.len()))]
    pub async fn dispatch(&self, printer: &str, artifact: &Artifact) -> PrintResult<()> {
        let spool = spool_artifact(artifact)?;
        let chain = transport::transport_chain(printer, &self.config);

        // `spool` drops (and deletes the file) whether the chain succeeded,
        // exhausted itself, or a timeout fired mid-attempt.
        self.try_chain(&chain, spool.path(), printer).await
    }

    async fn try_chain(
        &self,
        chain: &[Box<dyn Transport>],
        file: &std::path::Path,
        printer: &str,
    ) -> PrintResult<()> {
        let mut last_error: Option<PrintError> = None;

        for transport in chain {
            match tokio::time::timeout(self.config.attempt_timeout, transport.send(file)).await {
                Ok(Ok(())) => {
                    info!(transport = transport.name(), printer, "artifact delivered");
                    return Ok(());
                }
                Ok(Err(e)) => {
                    warn!(transport = transport.name(), error = %e, "transport failed, trying next");
                    last_error = Some(e);
                }
                Err(_) => {
                    warn!(transport = transport.name(), "transport attempt timed out");
                    last_error = Some(PrintError::Timeout(format!(
                        "{} timed out after {:?}",
                        transport.name(),
                        self.config.attempt_timeout
                    )));
                }
            }
        }

        Err(PrintError::Transport(match last_error {
            Some(e) => format!("all transports failed for '{printer}': {e}"),
            None => format!("no transport available for '{printer}'"),
        }))
    }
}

impl Default for PrinterDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Write the artifact to a uniquely named temp file
///
/// The returned handle owns the file; dropping it removes the file.
fn spool_artifact(artifact: &Artifact) -> PrintResult<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("label-job-")
        .suffix(&format!(".{}", artifact.extension()))
        .tempfile()?;
    file.write_all(artifact.bytes())?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    type AttemptLog = Arc<Mutex<Vec<&'static str>>>;

    /// Transport double that records attempts into a shared log
    struct MockTransport {
        name: &'static str,
        succeed: bool,
        log: AttemptLog,
    }

    impl MockTransport {
        fn boxed(name: &'static str, succeed: bool, log: &AttemptLog) -> Box<dyn Transport> {
            Box::new(Self {
                name,
                succeed,
                log: Arc::clone(log),
            })
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn send(&self, file: &Path) -> PrintResult<()> {
            assert!(file.exists(), "spool file must exist during the attempt");
            self.log.lock().unwrap().push(self.name);
            if self.succeed {
                Ok(())
            } else {
                Err(PrintError::Transport(format!("{} rejected the job", self.name)))
            }
        }
    }

    struct FailingEnumerator;

    #[async_trait]
    impl Enumerator for FailingEnumerator {
        async fn printers(&self) -> PrintResult<Vec<PrinterDescriptor>> {
            Err(PrintError::Enumeration("lpstat not found".to_string()))
        }
    }

    fn test_dispatcher() -> PrinterDispatcher {
        PrinterDispatcher::with_parts(
            DispatchConfig::default().with_attempt_timeout(Duration::from_millis(500)),
            Box::new(FailingEnumerator),
        )
    }

    #[tokio::test]
    async fn test_first_success_stops_the_chain() {
        let dispatcher = test_dispatcher();
        let log: AttemptLog = Arc::default();
        let chain = vec![
            MockTransport::boxed("share-copy", true, &log),
            MockTransport::boxed("lp", true, &log),
        ];

        let spool = spool_artifact(&Artifact::Zpl("^XA^XZ".into())).unwrap();
        dispatcher
            .try_chain(&chain, spool.path(), "Zebra")
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), ["share-copy"]);
    }

    #[tokio::test]
    async fn test_fallback_order_and_aggregated_error() {
        let dispatcher = test_dispatcher();
        let log: AttemptLog = Arc::default();
        let chain = vec![
            MockTransport::boxed("share-copy", false, &log),
            MockTransport::boxed("lp", false, &log),
        ];

        let spool = spool_artifact(&Artifact::Zpl("^XA^XZ".into())).unwrap();
        let err = dispatcher
            .try_chain(&chain, spool.path(), "Zebra")
            .await
            .unwrap_err();

        // Attempts run in order; the aggregated error carries the LAST
        // attempt's diagnostic
        assert_eq!(*log.lock().unwrap(), ["share-copy", "lp"]);
        let message = err.to_string();
        assert!(message.contains("lp rejected the job"), "{message}");
        assert!(message.contains("Zebra"));
    }

    #[tokio::test]
    async fn test_spool_removed_after_success_and_failure() {
        let dispatcher = test_dispatcher();

        for succeed in [true, false] {
            let log: AttemptLog = Arc::default();
            let chain = vec![MockTransport::boxed("lp", succeed, &log)];
            let artifact = Artifact::Pdf(b"%PDF-1.3 test".to_vec());

            let spool = spool_artifact(&artifact).unwrap();
            let path = spool.path().to_path_buf();
            assert!(path.exists());

            let result = dispatcher.try_chain(&chain, spool.path(), "Zebra").await;
            assert_eq!(result.is_ok(), succeed);

            drop(spool);
            assert!(!path.exists(), "spool file must be removed on drop");
        }
    }

    #[tokio::test]
    async fn test_spool_extension_follows_artifact() {
        let pdf = spool_artifact(&Artifact::Pdf(b"%PDF".to_vec())).unwrap();
        assert!(pdf.path().to_string_lossy().ends_with(".pdf"));

        let zpl = spool_artifact(&Artifact::Zpl("^XA^XZ".into())).unwrap();
        assert!(zpl.path().to_string_lossy().ends_with(".zpl"));
    }

    #[tokio::test]
    async fn test_enumeration_failure_degrades_to_default() {
        let dispatcher = test_dispatcher();
        let printers = dispatcher.enumerate().await;

        assert_eq!(printers.len(), 1);
        assert_eq!(printers[0].name, "default");
        assert!(printers[0].is_default);
    }
}
