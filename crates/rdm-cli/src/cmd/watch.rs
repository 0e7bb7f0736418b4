use crate::settings::Settings;
use rdm_core::{FileSurface, RefreshController, RefreshReport, Region};
use std::path::PathBuf;
use std::time::Duration;

pub struct WatchArgs {
    pub interval: Option<u64>,
    pub out: Option<PathBuf>,
    pub once: bool,
}

/// Refresh into `<out>/<element id>.html` until Ctrl-C.
pub fn run(settings: &Settings, args: WatchArgs) -> anyhow::Result<()> {
    let interval = args.interval.unwrap_or(settings.config.watch.interval_secs);
    if interval == 0 {
        anyhow::bail!("--interval must be at least 1 second");
    }
    let out = args
        .out
        .unwrap_or_else(|| settings.config.watch.output_dir.clone());

    let controller = RefreshController::new(settings.source()?);
    let mut surface = FileSurface::new(&out)?;

    tracing::info!(
        device = %settings.config.device.url,
        out = %surface.dir().display(),
        interval,
        "watching"
    );
    for region in Region::ALL {
        println!("{} → {}", region, surface.path_for(region).display());
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        loop {
            let report = tokio::select! {
                report = controller.refresh(&mut surface) => report,
                _ = tokio::signal::ctrl_c() => break,
            };
            log_report(&report);

            if args.once {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(interval)) => {}
                _ = tokio::signal::ctrl_c() => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}

fn log_report(report: &RefreshReport) {
    match report {
        RefreshReport::Rendered {
            ports,
            tod_entries,
            queue_len,
            queue_degraded,
            ..
        } => tracing::info!(
            ports,
            tod_entries,
            queue_len,
            queue_degraded,
            "regions updated"
        ),
        RefreshReport::Aborted { reason, .. } => {
            tracing::warn!(%reason, "refresh aborted, regions unchanged")
        }
    }
}
