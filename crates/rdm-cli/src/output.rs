use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    for line in format_table(headers, &rows) {
        println!("{line}");
    }
}

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header. Width is counted in chars.
fn format_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let pad = |i: usize, cell: &str| {
        let w = widths.get(i).copied().unwrap_or(0);
        format!("{:width$}", cell, width = w)
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    let header_row: Vec<String> = headers.iter().enumerate().map(|(i, h)| pad(i, *h)).collect();
    lines.push(header_row.join("  ").trim_end().to_string());

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    lines.push(sep.join("  "));

    for row in rows {
        let cells: Vec<String> = row.iter().enumerate().map(|(i, c)| pad(i, c.as_str())).collect();
        lines.push(cells.join("  ").trim_end().to_string());
    }
    lines
}
