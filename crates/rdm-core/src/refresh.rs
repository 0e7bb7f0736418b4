//! The refresh pass: fetch port status, schedules and queue from the node,
//! render them, and write the three regions.
//!
//! Failure policy:
//!
//! - port status or any schedule fetch fails: the pass is aborted before any
//!   region is written.
//! - queue fetch fails: the queue renders empty and the pass continues.
//!
//! [`RefreshController::refresh`] swallows errors and returns a
//! [`RefreshReport`] for logging only.

use crate::client::DeviceSource;
use crate::error::{RdmError, Result};
use crate::render;
use crate::surface::{DisplaySurface, Region};
use crate::types::{order_by_ports, PortStatus, QueueState, ScheduleEntry};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    PortStatus,
    Schedule,
    Queue,
    Render,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::PortStatus => "port status fetch",
            Step::Schedule => "schedule fetch",
            Step::Queue => "queue fetch",
            Step::Render => "region write",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Snapshot / Fragments
// ---------------------------------------------------------------------------

/// Everything one pass fetched, schedules already in port order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub ports: Vec<PortStatus>,
    pub schedules: Vec<ScheduleEntry>,
    pub queue: QueueState,
    /// The queue fetch failed and `queue` is the empty fallback.
    pub queue_degraded: bool,
}

impl Snapshot {
    pub fn render(&self) -> Fragments {
        Fragments {
            config: render::config_table(&self.ports),
            queue: render::queue_rows(&self.queue),
            display: render::schedule_table(&self.schedules),
        }
    }

    pub fn tod_entries(&self) -> usize {
        self.schedules.iter().map(|s| s.tod.len()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragments {
    pub config: String,
    pub queue: String,
    pub display: String,
}

// ---------------------------------------------------------------------------
// RefreshReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshReport {
    Rendered {
        ports: usize,
        tod_entries: usize,
        queue_len: usize,
        queue_degraded: bool,
        finished_at: DateTime<Utc>,
    },
    Aborted {
        step: Option<Step>,
        reason: String,
        finished_at: DateTime<Utc>,
    },
}

impl RefreshReport {
    fn rendered(snapshot: &Snapshot) -> Self {
        RefreshReport::Rendered {
            ports: snapshot.ports.len(),
            tod_entries: snapshot.tod_entries(),
            queue_len: snapshot.queue.uid.len(),
            queue_degraded: snapshot.queue_degraded,
            finished_at: Utc::now(),
        }
    }

    fn aborted(err: &RdmError) -> Self {
        RefreshReport::Aborted {
            step: err.step(),
            reason: err.to_string(),
            finished_at: Utc::now(),
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, RefreshReport::Rendered { .. })
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        match self {
            RefreshReport::Rendered { finished_at, .. }
            | RefreshReport::Aborted { finished_at, .. } => *finished_at,
        }
    }
}

// ---------------------------------------------------------------------------
// RefreshController
// ---------------------------------------------------------------------------

pub struct RefreshController<S> {
    source: S,
}

impl<S: DeviceSource> RefreshController<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one pass into `surface`. Never fails; see the module docs for
    /// which failures abort and which degrade.
    pub async fn refresh<D: DisplaySurface + ?Sized>(&self, surface: &mut D) -> RefreshReport {
        match self.try_refresh(surface).await {
            Ok(report) => report,
            Err(e) => {
                tracing::debug!(error = %e, "refresh aborted");
                RefreshReport::aborted(&e)
            }
        }
    }

    async fn try_refresh<D: DisplaySurface + ?Sized>(
        &self,
        surface: &mut D,
    ) -> Result<RefreshReport> {
        let ports = self.fetch_ports().await?;
        let mut schedules = self.fetch_schedules(&ports).await?;

        write(surface, Region::Config, render::config_table(&ports))?;

        let (queue, queue_degraded) = self.fetch_queue().await;
        write(surface, Region::Queue, render::queue_rows(&queue))?;

        order_by_ports(&mut schedules, &ports);
        write(surface, Region::Display, render::schedule_table(&schedules))?;

        let snapshot = Snapshot {
            ports,
            schedules,
            queue,
            queue_degraded,
        };
        tracing::debug!(
            ports = snapshot.ports.len(),
            tod_entries = snapshot.tod_entries(),
            queue_len = snapshot.queue.uid.len(),
            queue_degraded,
            "refresh rendered"
        );
        Ok(RefreshReport::rendered(&snapshot))
    }

    /// Fetch everything a pass needs without touching any surface.
    pub async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let ports = self.fetch_ports().await?;
        let mut schedules = self.fetch_schedules(&ports).await?;
        let (queue, queue_degraded) = self.fetch_queue().await;
        order_by_ports(&mut schedules, &ports);
        Ok(Snapshot {
            ports,
            schedules,
            queue,
            queue_degraded,
        })
    }

    async fn fetch_ports(&self) -> Result<Vec<PortStatus>> {
        self.source
            .port_status()
            .await
            .map_err(|e| e.at(Step::PortStatus))
    }

    /// One concurrent tod request per port; the first failure fails the batch.
    async fn fetch_schedules(&self, ports: &[PortStatus]) -> Result<Vec<ScheduleEntry>> {
        let source = &self.source;
        try_join_all(ports.iter().map(|item| async move {
            let response = source.tod(&item.port).await?;
            Ok::<_, RdmError>(ScheduleEntry::new(item.port.clone(), response))
        }))
        .await
        .map_err(|e| e.at(Step::Schedule))
    }

    async fn fetch_queue(&self) -> (QueueState, bool) {
        match self.source.queue().await {
            Ok(queue) => (queue, false),
            Err(e) => {
                tracing::debug!(error = %e, "queue unavailable, rendering empty");
                (QueueState::default(), true)
            }
        }
    }
}

fn write<D: DisplaySurface + ?Sized>(surface: &mut D, region: Region, html: String) -> Result<()> {
    surface
        .set_region(region, html)
        .map_err(|e| e.at(Step::Render))
}
