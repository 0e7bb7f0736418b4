use rdm_core::config::Config;
use rdm_core::{
    DisplaySurface, HttpSource, MemorySurface, RefreshController, RefreshReport, Region,
};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;

/// Region store shared between the refresh pass and request handlers.
///
/// Each region write takes the lock briefly, so readers see regions update
/// one at a time while a pass is still waiting on the node.
#[derive(Clone, Default)]
pub struct SharedSurface(Arc<Mutex<MemorySurface>>);

impl SharedSurface {
    pub fn lock(&self) -> MutexGuard<'_, MemorySurface> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DisplaySurface for SharedSurface {
    fn set_region(&mut self, region: Region, html: String) -> rdm_core::Result<()> {
        self.lock().set_region(region, html)
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub controller: Arc<RefreshController<HttpSource>>,
    pub surface: SharedSurface,
    pub last_report: Arc<Mutex<Option<RefreshReport>>>,
    pub event_tx: broadcast::Sender<()>,
    pass_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let source = HttpSource::new(&config.device.url)?
            .with_timeout(config.device.request_timeout());
        let (tx, _) = broadcast::channel(64);
        Ok(Self {
            config: Arc::new(config),
            controller: Arc::new(RefreshController::new(source)),
            surface: SharedSurface::default(),
            last_report: Arc::new(Mutex::new(None)),
            event_tx: tx,
            pass_lock: Arc::new(tokio::sync::Mutex::new(())),
        })
    }

    /// Run one pass now. Passes are serialized; a caller arriving during a
    /// pass waits for it and then runs its own.
    pub async fn refresh_now(&self) -> RefreshReport {
        let _pass = self.pass_lock.lock().await;
        let mut surface = self.surface.clone();
        let report = self.controller.refresh(&mut surface).await;

        match &report {
            RefreshReport::Rendered { ports, .. } => {
                tracing::debug!(ports, "status page refreshed");
                let _ = self.event_tx.send(());
            }
            RefreshReport::Aborted { reason, .. } => {
                tracing::warn!(%reason, "refresh aborted, keeping previous regions");
            }
        }

        *self
            .last_report
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(report.clone());
        report
    }

    pub fn last_report(&self) -> Option<RefreshReport> {
        self.last_report
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Refresh every `server.poll_interval_secs` in the background.
    pub fn spawn_poller(&self) -> tokio::task::JoinHandle<()> {
        let state = self.clone();
        let every = Duration::from_secs(self.config.server.poll_interval_secs.max(1));
        tokio::spawn(async move {
            loop {
                state.refresh_now().await;
                tokio::time::sleep(every).await;
            }
        })
    }
}
