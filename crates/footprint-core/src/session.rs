use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::calculate::outcome::FootprintReport;
use crate::calculate::{calculate_workbook, CalculationOptions};
use crate::error::FootprintError;
use crate::extraction::read_workbook;
use crate::factors::schema::EmissionFactorStore;
use crate::model::Workbook;

/// Identity of an uploaded workbook: hex SHA-256 of its bytes.
pub fn dataset_id(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[derive(Debug, Clone)]
struct CachedUpload {
    dataset_id: String,
    workbook: Workbook,
    report: Option<FootprintReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub dataset_id: String,
    /// The same bytes were already loaded; parsed sheets were reused.
    pub reused: bool,
}

/// One operator's working state: the factor store, calculation options and
/// the most recent upload.
///
/// The parsed workbook is cached by dataset identity. The computed report is
/// cached until the store or the options change.
#[derive(Debug, Clone, Default)]
pub struct Session {
    store: EmissionFactorStore,
    options: CalculationOptions,
    upload: Option<CachedUpload>,
}

impl Session {
    pub fn new(store: EmissionFactorStore, options: CalculationOptions) -> Self {
        Session {
            store,
            options,
            upload: None,
        }
    }

    /// Load a workbook. Re-uploading identical bytes keeps the cached sheets
    /// and report; different bytes replace them.
    pub fn upload(&mut self, bytes: &[u8]) -> Result<UploadOutcome, FootprintError> {
        let id = dataset_id(bytes);
        if self.upload.as_ref().is_some_and(|u| u.dataset_id == id) {
            debug!(dataset = %id, "upload unchanged, reusing parsed workbook");
            return Ok(UploadOutcome {
                dataset_id: id,
                reused: true,
            });
        }

        let workbook = read_workbook(bytes)?;
        info!(dataset = %id, sheets = workbook.sheets.len(), "workbook uploaded");
        self.upload = Some(CachedUpload {
            dataset_id: id.clone(),
            workbook,
            report: None,
        });
        Ok(UploadOutcome {
            dataset_id: id,
            reused: false,
        })
    }

    /// Report for the current upload, computed on first request.
    pub fn report(&mut self) -> Option<&FootprintReport> {
        let upload = self.upload.as_mut()?;
        if upload.report.is_none() {
            upload.report = Some(calculate_workbook(
                &upload.workbook,
                &self.store,
                &self.options,
            ));
        }
        upload.report.as_ref()
    }

    /// Change factors. Any cached report is discarded.
    pub fn update_store<F>(&mut self, update: F) -> Result<(), FootprintError>
    where
        F: FnOnce(&mut EmissionFactorStore) -> Result<(), FootprintError>,
    {
        let result = update(&mut self.store);
        self.invalidate();
        result
    }

    pub fn set_options(&mut self, options: CalculationOptions) {
        self.options = options;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        if let Some(upload) = self.upload.as_mut() {
            upload.report = None;
        }
    }

    pub fn store(&self) -> &EmissionFactorStore {
        &self.store
    }

    pub fn options(&self) -> &CalculationOptions {
        &self.options
    }

    pub fn workbook(&self) -> Option<&Workbook> {
        self.upload.as_ref().map(|u| &u.workbook)
    }

    pub fn dataset_id(&self) -> Option<&str> {
        self.upload.as_ref().map(|u| u.dataset_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::schema::FactorKey;
    use rust_decimal_macros::dec;
    use rust_xlsxwriter::Workbook as XlsxWorkbook;

    fn ledger(liters: f64) -> Vec<u8> {
        let mut wb = XlsxWorkbook::new();
        let ws = wb.add_worksheet();
        ws.write_string(0, 0, "Brandstof").unwrap();
        ws.write_string(0, 1, "Brandstof p/j").unwrap();
        ws.write_string(1, 0, "diesel").unwrap();
        ws.write_number(1, 1, liters).unwrap();
        wb.save_to_buffer().unwrap()
    }

    fn diesel_store() -> EmissionFactorStore {
        let mut store = EmissionFactorStore::new();
        store.set_factor(FactorKey::fuel("diesel"), dec!(2)).unwrap();
        store
    }

    #[test]
    fn dataset_id_is_sha256_hex() {
        assert_eq!(
            dataset_id(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn same_bytes_are_reused() {
        let mut session = Session::new(diesel_store(), CalculationOptions::default());
        let bytes = ledger(10.0);
        let first = session.upload(&bytes).unwrap();
        assert!(!first.reused);
        assert_eq!(session.report().unwrap().total_footprint, dec!(20));

        let second = session.upload(&bytes).unwrap();
        assert!(second.reused);
        assert_eq!(second.dataset_id, first.dataset_id);

        let third = session.upload(&ledger(20.0)).unwrap();
        assert!(!third.reused);
        assert_eq!(session.report().unwrap().total_footprint, dec!(40));
    }

    #[test]
    fn store_change_recomputes_report() {
        let mut session = Session::new(diesel_store(), CalculationOptions::default());
        session.upload(&ledger(10.0)).unwrap();
        assert_eq!(session.report().unwrap().total_footprint, dec!(20));

        session
            .update_store(|store| store.set_factor(FactorKey::fuel("diesel"), dec!(3)))
            .unwrap();
        assert_eq!(session.report().unwrap().total_footprint, dec!(30));
    }

    #[test]
    fn no_upload_no_report() {
        let mut session = Session::default();
        assert!(session.report().is_none());
        assert!(session.dataset_id().is_none());
    }

    #[test]
    fn failed_upload_keeps_previous() {
        let mut session = Session::new(diesel_store(), CalculationOptions::default());
        session.upload(&ledger(10.0)).unwrap();
        assert!(session.upload(b"garbage").is_err());
        assert!(session.workbook().is_some());
    }
}
