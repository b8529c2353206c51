use footprint_core::aggregate::summary::WorkbookSummary;
use footprint_core::calculate::outcome::FootprintReport;
use footprint_core::error::FootprintError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), FootprintError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Print a report, with the workbook summary under `"summary"` when given.
pub fn print_report(
    report: &FootprintReport,
    summary: Option<&WorkbookSummary>,
) -> Result<(), FootprintError> {
    let mut value = serde_json::to_value(report)?;
    if let (Some(summary), Some(object)) = (summary, value.as_object_mut()) {
        object.insert("summary".into(), serde_json::to_value(summary)?);
    }
    print(&value)
}
