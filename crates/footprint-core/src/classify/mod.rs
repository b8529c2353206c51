pub mod engine;
pub mod resolver;
pub mod vocabulary;

pub use engine::{classify, ModelKind, SheetModel};
pub use resolver::{resolve_equipment_unit, resolve_fuel_category, FuelCategory};
pub use vocabulary::{ColumnVocabulary, FuelVocabulary, TrendVocabulary};
