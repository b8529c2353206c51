use footprint_core::aggregate::intensity::IntensityAnalysis;
use footprint_core::aggregate::summary::{DisplayGroup, SheetShare, WorkbookSummary};
use footprint_core::calculate::outcome::FootprintReport;
use rust_decimal::Decimal;

fn pct(share: Option<Decimal>) -> String {
    match share {
        Some(p) => format!("{:.1}%", p),
        None => "-".into(),
    }
}

pub fn print_report(report: &FootprintReport, summary: Option<&WorkbookSummary>) {
    let rows: Vec<_> = report.rows().collect();
    let width = rows
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or(9)
        .max(9);

    println!(
        "  {:<width$}  {:<5}  {:>14}  {:>14}  {:>14}",
        "Component", "Unit", "Factor", "Consumption", "Footprint"
    );
    for row in &rows {
        let unit = row.unit.as_ref().map(|u| u.to_string()).unwrap_or_default();
        let marker = if row.resolution.is_defaulted() {
            "  (no factor)"
        } else {
            ""
        };
        println!(
            "  {:<width$}  {:<5}  {:>14}  {:>14.2}  {:>14.2}{}",
            row.label,
            unit,
            row.factor.normalize(),
            row.quantity,
            row.footprint,
            marker
        );
    }
    println!();
    println!("  Total CO₂ footprint: {:.2} kg CO₂-eq", report.total_footprint);

    let unrecognized: Vec<_> = report.unrecognized().collect();
    if !unrecognized.is_empty() {
        println!();
        println!("  Skipped sheets (no recognizable columns):");
        for sheet in unrecognized {
            println!("    {} [{}]", sheet.sheet, sheet.columns.join(", "));
        }
    }

    let defaulted = report.defaulted_rows().count();
    if defaulted > 0 {
        println!();
        println!("  {defaulted} row(s) had no configured factor and were costed at zero.");
    }

    if let Some(summary) = summary {
        print_summary(summary);
    }
}

fn print_summary(summary: &WorkbookSummary) {
    for sheet in &summary.sheets {
        let group = match sheet.group {
            DisplayGroup::Transport => "transport",
            DisplayGroup::Equipment => "equipment",
        };
        println!();
        println!("=== {} ({group}, {}) ===\n", sheet.sheet, sheet.model);
        println!("  Total consumption: {:.2}", sheet.total_quantity);
        println!("  Total footprint:   {:.2} kg CO₂-eq", sheet.total_footprint);

        if !sheet.top_entries.is_empty() {
            println!("\n  Top {}:", sheet.top_entries.len());
            for entry in &sheet.top_entries {
                let fuel = entry
                    .fuel
                    .as_deref()
                    .map(|f| format!(" ({f})"))
                    .unwrap_or_default();
                println!(
                    "    {:<16} {:<16} {:>12.2}{}",
                    entry.brand, entry.model, entry.quantity, fuel
                );
            }
        }
    }

    print_shares("Sheets by consumption", &summary.top_by_quantity);
    print_shares("Sheets by footprint", &summary.top_by_footprint);
}

fn print_shares(title: &str, shares: &[SheetShare]) {
    if shares.is_empty() {
        return;
    }
    println!();
    println!("=== {title} ===\n");
    for share in shares {
        println!(
            "  {:<24} {:>14.2}  {:>6}",
            share.sheet,
            share.value,
            pct(share.share_pct)
        );
    }
}

pub fn print_intensity(analysis: &IntensityAnalysis) {
    println!("=== CO₂ intensity: {} ===\n", analysis.sheet);
    println!(
        "  {:<6}  {:>14}  {:>14}  {:>12}",
        "Year", "Revenue", "CO₂ footprint", "Intensity"
    );
    for point in &analysis.series.points {
        println!(
            "  {:<6}  {:>14}  {:>14}  {:>12.3}",
            point.year,
            point.revenue.normalize(),
            point.footprint.normalize(),
            point.intensity
        );
    }

    let Some(summary) = &analysis.summary else {
        println!("\n  Need at least two years to assess the trend.");
        return;
    };
    println!();
    println!(
        "  Start ({}):  {:.3}",
        summary.start.year, summary.start.intensity
    );
    println!("  Current ({}): {:.3}", summary.end.year, summary.end.intensity);
    println!("  Change:        {}", summary.percent_change);
    println!(
        "  Best year:     {} ({:.3})",
        summary.best.year, summary.best.intensity
    );
    match summary.assessment {
        Some(assessment) => println!("\n  Assessment: {assessment}"),
        None => println!("\n  Assessment: not available (start intensity is zero)"),
    }
}
