use std::collections::HashMap;
use serde::{Serialize, Deserialize};

/// Partition under which "no immediate repeat" is enforced independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftCategory {
    BusinessDayOpening,
    BusinessDayClosing,
    Holiday,
}

impl ShiftCategory {
    pub const ALL: [ShiftCategory; 3] = [
        ShiftCategory::BusinessDayOpening,
        ShiftCategory::BusinessDayClosing,
        ShiftCategory::Holiday,
    ];

    /// Key of this category's previous-assignment record in the store
    pub fn storage_key(self) -> &'static str {
        match self {
            ShiftCategory::BusinessDayOpening => "last_draw_opening",
            ShiftCategory::BusinessDayClosing => "last_draw_closing",
            ShiftCategory::Holiday => "last_draw_holiday",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShiftCategory::BusinessDayOpening => "Opening",
            ShiftCategory::BusinessDayClosing => "Closing",
            ShiftCategory::Holiday => "Holiday",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            ShiftCategory::BusinessDayOpening => 0,
            ShiftCategory::BusinessDayClosing => 1,
            ShiftCategory::Holiday => 2,
        }
    }
}

/// Business day draws two shifts, a holiday draws a single one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayMode {
    #[default]
    BusinessDay,
    Holiday,
}

impl DayMode {
    pub fn label(self) -> &'static str {
        match self {
            DayMode::BusinessDay => "Business day",
            DayMode::Holiday => "Holiday",
        }
    }
}

/// One PDV and the operator drawn for it (None = no operator left)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedPdv {
    pub pdv: String,
    pub operator: Option<String>,
}

/// Result of one draw, in PDV-list order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Assignment {
    pub rows: Vec<AssignedPdv>,
}

/// Stored form of the last accepted assignment: PDV -> operator or null
pub type PreviousAssignment = HashMap<String, Option<String>>;

impl Assignment {
    /// Pairs `operators[i]` with `pdvs[i]`. Extra operators are dropped,
    /// PDVs past the end of `operators` get no operator.
    pub fn pair(pdvs: &[String], operators: &[String]) -> Self {
        let rows = pdvs
            .iter()
            .enumerate()
            .map(|(i, pdv)| AssignedPdv {
                pdv: pdv.clone(),
                operator: operators.get(i).cloned(),
            })
            .collect();
        Assignment { rows }
    }

    pub fn operator_for(&self, pdv: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.pdv == pdv)
            .and_then(|row| row.operator.as_deref())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_record(&self) -> PreviousAssignment {
        self.rows
            .iter()
            .map(|row| (row.pdv.clone(), row.operator.clone()))
            .collect()
    }
}

/// Fatal errors block the draw, warnings are reported alongside the result
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_fatal(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Outcome of the distribution engine for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distribution {
    pub category: ShiftCategory,
    pub assignment: Assignment,
    /// Shuffles tried before acceptance (the retry ceiling when exhausted)
    pub attempts: usize,
    /// No non-repeating pairing was found; the assignment is unconstrained
    /// and was not recorded as the category's previous draw.
    pub retry_exhausted: bool,
}

/// The six editable input lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    OpeningOperators,
    ClosingOperators,
    OpeningPdvs,
    ClosingPdvs,
    HolidayOperators,
    HolidayPdvs,
}

impl ListKind {
    pub const ALL: [ListKind; 6] = [
        ListKind::OpeningOperators,
        ListKind::ClosingOperators,
        ListKind::OpeningPdvs,
        ListKind::ClosingPdvs,
        ListKind::HolidayOperators,
        ListKind::HolidayPdvs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ListKind::OpeningOperators => "opening_operators",
            ListKind::ClosingOperators => "closing_operators",
            ListKind::OpeningPdvs => "opening_pdvs",
            ListKind::ClosingPdvs => "closing_pdvs",
            ListKind::HolidayOperators => "holiday_operators",
            ListKind::HolidayPdvs => "holiday_pdvs",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

/// Raw operator and PDV lists, in insertion order. Duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawLists {
    pub opening_operators: Vec<String>,
    pub closing_operators: Vec<String>,
    pub opening_pdvs: Vec<String>,
    pub closing_pdvs: Vec<String>,
    pub holiday_operators: Vec<String>,
    pub holiday_pdvs: Vec<String>,
}

impl DrawLists {
    pub fn get(&self, kind: ListKind) -> &Vec<String> {
        match kind {
            ListKind::OpeningOperators => &self.opening_operators,
            ListKind::ClosingOperators => &self.closing_operators,
            ListKind::OpeningPdvs => &self.opening_pdvs,
            ListKind::ClosingPdvs => &self.closing_pdvs,
            ListKind::HolidayOperators => &self.holiday_operators,
            ListKind::HolidayPdvs => &self.holiday_pdvs,
        }
    }

    pub fn get_mut(&mut self, kind: ListKind) -> &mut Vec<String> {
        match kind {
            ListKind::OpeningOperators => &mut self.opening_operators,
            ListKind::ClosingOperators => &mut self.closing_operators,
            ListKind::OpeningPdvs => &mut self.opening_pdvs,
            ListKind::ClosingPdvs => &mut self.closing_pdvs,
            ListKind::HolidayOperators => &mut self.holiday_operators,
            ListKind::HolidayPdvs => &mut self.holiday_pdvs,
        }
    }

    pub fn is_empty(&self) -> bool {
        ListKind::ALL.iter().all(|kind| self.get(*kind).is_empty())
    }
}
