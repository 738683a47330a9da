mod types;

pub use types::{
    bed_gated_columns, Catalog, TreatmentKind, TreatmentSpec, RECOGNIZED_COLUMNS,
    REQUIRED_COLUMNS,
};
