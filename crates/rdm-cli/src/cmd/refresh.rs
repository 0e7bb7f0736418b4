use crate::output::print_json;
use crate::settings::Settings;
use rdm_core::{MemorySurface, RefreshController, RefreshReport, Region};

/// One pass into memory, then print the fragments.
///
/// An aborted pass is not a command failure: the regions are simply left
/// empty and the reason goes to stderr.
pub fn run(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let controller = RefreshController::new(settings.source()?);
    let rt = tokio::runtime::Runtime::new()?;
    let mut surface = MemorySurface::new();
    let report = rt.block_on(controller.refresh(&mut surface));

    if json {
        let value = serde_json::json!({
            "regions": surface.by_element_id(),
            "report": report,
        });
        return print_json(&value);
    }

    if let RefreshReport::Aborted { reason, .. } = &report {
        eprintln!("warning: refresh aborted: {reason}");
        return Ok(());
    }

    for region in Region::ALL {
        println!("<!-- {} -->", region.element_id());
        println!("{}", surface.get(region).unwrap_or_default());
    }
    Ok(())
}
