use crate::output::{print_json, print_table};
use crate::settings::Settings;
use anyhow::Context;
use rdm_core::RefreshController;

/// Fetch a snapshot and print it as plain tables. Unlike `refresh`, node
/// failures are reported as errors.
pub fn run(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let controller = RefreshController::new(settings.source()?);
    let rt = tokio::runtime::Runtime::new()?;
    let snapshot = rt
        .block_on(controller.fetch_snapshot())
        .with_context(|| format!("failed to read {}", settings.config.device.url))?;

    if json {
        return print_json(&snapshot);
    }

    let rows: Vec<Vec<String>> = snapshot
        .ports
        .iter()
        .map(|p| vec![p.port.to_string(), p.direction.clone(), p.status.clone()])
        .collect();
    print_table(&["PORT", "DIRECTION", "STATUS"], rows);
    println!();

    if snapshot.queue_degraded {
        println!("Queue: unavailable");
    } else if snapshot.queue.is_empty() {
        println!("Queue: empty");
    } else {
        let rows: Vec<Vec<String>> = snapshot.queue.uid.iter().map(|u| vec![u.clone()]).collect();
        print_table(&["QUEUED UID"], rows);
    }
    println!();

    let headers: Vec<String> = snapshot
        .schedules
        .iter()
        .map(|s| format!("PORT {}", s.port))
        .collect();
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    let depth = snapshot
        .schedules
        .iter()
        .map(|s| s.tod.len())
        .max()
        .unwrap_or(0);
    let rows: Vec<Vec<String>> = (0..depth)
        .map(|i| {
            snapshot
                .schedules
                .iter()
                .map(|s| s.tod.get(i).cloned().unwrap_or_default())
                .collect::<Vec<String>>()
        })
        .collect();
    print_table(&header_refs, rows);
    Ok(())
}
