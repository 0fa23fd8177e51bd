pub mod types;
pub mod random;
pub mod ordering;
pub mod validation;
pub mod memory;
pub mod engine;
pub mod orchestrator;

pub use types::{
    AssignedPdv, Assignment, DayMode, Distribution, DrawLists, ListKind, PreviousAssignment,
    ShiftCategory, ValidationResult,
};
pub use random::{shuffle, shuffled, RandomSource};
pub use ordering::order_numerically;
pub use validation::{validate_business_day, validate_holiday};
pub use memory::AssignmentMemory;
pub use engine::{distribute, MAX_ATTEMPTS};
pub use orchestrator::{DrawReport, Drawer};
