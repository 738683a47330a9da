use serde::Serialize;

/// Every column a submission may declare, in canonical order.
pub const RECOGNIZED_COLUMNS: [&str; 12] = [
    "id",
    "health",
    "decline",
    "bed",
    "ventilator",
    "oxygen",
    "remdesivir",
    "dexamethasone",
    "plasma",
    "casirivimab",
    "chloroquine",
    "total",
];

/// Columns the later checks cannot run without.
pub const REQUIRED_COLUMNS: [&str; 4] = ["id", "health", "decline", "bed"];

/// Columns that must be zero when a patient has no bed: `bed` through the
/// last treatment, i.e. everything except the patient keys and `total`.
pub fn bed_gated_columns() -> &'static [&'static str] {
    &RECOGNIZED_COLUMNS[3..RECOGNIZED_COLUMNS.len() - 1]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentKind {
    /// Equipment shared across the day (ventilator, oxygen)
    Reusable,
    /// Drugs consumed on use
    Onetime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentSpec {
    pub name: &'static str,
    pub kind: TreatmentKind,
    /// Maximum number of patients that may receive it in one day
    pub daily_quantity: u32,
    /// The only non-zero value a submission may put in this column
    pub efficacy: f64,
}

impl TreatmentSpec {
    const fn new(name: &'static str, kind: TreatmentKind, daily_quantity: u32, efficacy: f64) -> Self {
        Self {
            name,
            kind,
            daily_quantity,
            efficacy,
        }
    }
}

const STANDARD_TREATMENTS: [TreatmentSpec; 7] = [
    TreatmentSpec::new("ventilator", TreatmentKind::Reusable, 10, 30.0),
    TreatmentSpec::new("oxygen", TreatmentKind::Reusable, 10, 20.0),
    TreatmentSpec::new("remdesivir", TreatmentKind::Onetime, 7, 30.0),
    TreatmentSpec::new("dexamethasone", TreatmentKind::Onetime, 20, 25.0),
    TreatmentSpec::new("plasma", TreatmentKind::Onetime, 10, 15.0),
    TreatmentSpec::new("casirivimab", TreatmentKind::Onetime, 10, 15.0),
    TreatmentSpec::new("chloroquine", TreatmentKind::Onetime, 17, 10.0),
];

/// Ordered set of treatments available for a day.
///
/// Reusable treatments always come before onetime ones and each group keeps
/// its declaration order, so checks and bonus lines are reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    treatments: Vec<TreatmentSpec>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// The built-in catalog
    pub fn standard() -> Self {
        Self {
            treatments: STANDARD_TREATMENTS.to_vec(),
        }
    }

    /// Build a catalog from explicit specs, reordering so reusable entries lead.
    pub fn from_specs(specs: Vec<TreatmentSpec>) -> Self {
        let (mut treatments, onetime): (Vec<_>, Vec<_>) = specs
            .into_iter()
            .partition(|t| t.kind == TreatmentKind::Reusable);
        treatments.extend(onetime);
        Self { treatments }
    }

    /// All treatments: reusable first, then onetime
    pub fn iter(&self) -> impl Iterator<Item = &TreatmentSpec> {
        self.treatments.iter()
    }

    pub fn reusable(&self) -> impl Iterator<Item = &TreatmentSpec> {
        self.iter().filter(|t| t.kind == TreatmentKind::Reusable)
    }

    pub fn onetime(&self) -> impl Iterator<Item = &TreatmentSpec> {
        self.iter().filter(|t| t.kind == TreatmentKind::Onetime)
    }

    pub fn get(&self, name: &str) -> Option<&TreatmentSpec> {
        self.treatments.iter().find(|t| t.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TreatmentSpec> {
        self.treatments.iter_mut().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.treatments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.treatments.is_empty()
    }

    /// Whether `name` is one of the columns a submission may declare
    pub fn is_recognized_column(name: &str) -> bool {
        RECOGNIZED_COLUMNS.contains(&name)
    }
}
