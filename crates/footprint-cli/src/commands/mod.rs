pub mod calculate;
pub mod factors;
pub mod intensity;

use footprint_core::model::SourceColor;

/// Parse a `SHEET=VALUE` argument.
pub fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    let (sheet, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected SHEET=VALUE, got '{arg}'"))?;
    let (sheet, value) = (sheet.trim(), value.trim());
    if sheet.is_empty() || value.is_empty() {
        return Err(format!("expected SHEET=VALUE, got '{arg}'"));
    }
    Ok((sheet.to_string(), value.to_string()))
}

/// Parse a `SHEET=green|grey` argument.
pub fn parse_color_assignment(arg: &str) -> Result<(String, SourceColor), String> {
    let (sheet, value) = parse_assignment(arg)?;
    Ok((sheet, value.parse()?))
}
