use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FootprintError {
    #[error("failed to read workbook: {0}")]
    WorkbookRead(String),

    #[error("failed to write workbook: {0}")]
    WorkbookWrite(String),

    #[error("workbook contains no sheets")]
    EmptyWorkbook,

    #[error("sheet '{sheet}' has no '{expected}' column")]
    MissingColumn { sheet: String, expected: String },

    #[error(
        "required trend columns not found: {}. Found columns: {}",
        .missing.join(", "),
        .found.join(", ")
    )]
    MissingTrendColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("no valid trend data left after cleaning")]
    NoTrendData,

    #[error("failed to load emission factors from {path}: {reason}")]
    FactorLoad { path: PathBuf, reason: String },

    #[error("invalid emission factor: {0}")]
    FactorInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
