pub mod xlsx;

pub use xlsx::{read_factor_table, read_workbook};
