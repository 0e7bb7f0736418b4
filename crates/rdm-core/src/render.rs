//! HTML fragments for the three status regions.
//!
//! The markup is what the node's own status page produces, so fragments can
//! be dropped into that page unchanged. All interpolated values are escaped.

use crate::types::{PortStatus, QueueState, ScheduleEntry};
use std::fmt::Write;

/// Port table: one header row, then one row per port in device order.
pub fn config_table(ports: &[PortStatus]) -> String {
    let mut h = String::from("<tr><th>Port</th><th>Direction</th><th>Status</th></tr>");
    for item in ports {
        let _ = write!(
            h,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(item.port.as_str()),
            escape(&item.direction),
            escape(&item.status)
        );
    }
    h
}

/// Queue rows, one per uid. Empty queue renders as an empty string.
pub fn queue_rows(queue: &QueueState) -> String {
    let mut h = String::new();
    for uid in &queue.uid {
        let _ = write!(h, "<tr><td colspan=\"3\">{}</td></tr>", escape(uid));
    }
    h
}

/// Transposed schedule table: a column per port, tod values stacked in the
/// column's single data cell.
pub fn schedule_table(schedules: &[ScheduleEntry]) -> String {
    let mut hdrs = String::from("<tr>");
    let mut tdd = String::from("<tr>");

    for r in schedules {
        let _ = write!(hdrs, "<th>{}</th>", escape(r.port.as_str()));
        tdd.push_str("<td>");
        for tod in &r.tod {
            let _ = write!(tdd, "{}<br/>", escape(tod));
        }
        tdd.push_str("</td>");
    }

    hdrs.push_str("</tr>");
    tdd.push_str("</tr>");
    format!("<table>{hdrs}{tdd}</table>")
}

/// Escape text for use inside element content.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
