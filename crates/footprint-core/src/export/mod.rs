pub mod xlsx;

pub use xlsx::{
    write_intensity, write_intensity_to, write_results, write_results_to, INTENSITY_SHEET,
    RESULTS_SHEET,
};
