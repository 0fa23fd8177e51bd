use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::{Serialize, Deserialize};
use tracing::{error, info};

use crate::error::DrawError;
use crate::store::KeyValueStore;
use super::engine::distribute;
use super::memory::AssignmentMemory;
use super::ordering::order_numerically;
use super::random::RandomSource;
use super::types::{DayMode, Distribution, DrawLists, ShiftCategory};
use super::validation::{validate_business_day, validate_holiday};

/// Everything the presentation layer needs from one successful draw
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawReport {
    pub mode: DayMode,
    pub drawn_at: DateTime<Local>,
    /// Non-fatal validation messages (count mismatches)
    pub warnings: Vec<String>,
    /// One entry per shift: opening then closing, or the single holiday shift
    pub shifts: Vec<Distribution>,
}

impl DrawReport {
    /// Whether any shift fell back to an unconstrained shuffle
    pub fn retry_exhausted(&self) -> bool {
        self.shifts.iter().any(|s| s.retry_exhausted)
    }
}

/// Validates input lists and runs the distribution engine per shift
pub struct Drawer {
    memory: AssignmentMemory,
}

impl Drawer {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            memory: AssignmentMemory::new(store),
        }
    }

    pub fn memory(&self) -> &AssignmentMemory {
        &self.memory
    }

    pub fn draw<R: RandomSource + ?Sized>(
        &self,
        mode: DayMode,
        lists: &DrawLists,
        rng: &mut R,
    ) -> Result<DrawReport, DrawError> {
        match mode {
            DayMode::BusinessDay => self.draw_business_day(lists, rng),
            DayMode::Holiday => self.draw_holiday(lists, rng),
        }
    }

    /// Opening and closing shifts, each against numerically ordered PDVs
    pub fn draw_business_day<R: RandomSource + ?Sized>(
        &self,
        lists: &DrawLists,
        rng: &mut R,
    ) -> Result<DrawReport, DrawError> {
        let opening_pdvs = order_numerically(&lists.opening_pdvs);
        let closing_pdvs = order_numerically(&lists.closing_pdvs);

        let validation = validate_business_day(
            &lists.opening_operators,
            &lists.closing_operators,
            &opening_pdvs,
            &closing_pdvs,
        );
        if validation.is_fatal() {
            return Err(DrawError::FatalInput(validation));
        }

        let opening_before = self.memory.previous(ShiftCategory::BusinessDayOpening)?;
        let opening = distribute(
            &self.memory,
            rng,
            &opening_pdvs,
            &lists.opening_operators,
            ShiftCategory::BusinessDayOpening,
        )?;
        let closing = match distribute(
            &self.memory,
            rng,
            &closing_pdvs,
            &lists.closing_operators,
            ShiftCategory::BusinessDayClosing,
        ) {
            Ok(closing) => closing,
            Err(e) => {
                // The draw as a whole failed, so the opening record goes back too
                if !opening.retry_exhausted {
                    if let Err(rollback) = self
                        .memory
                        .lock(ShiftCategory::BusinessDayOpening)
                        .and_then(|record| record.write(&opening_before))
                    {
                        error!(error = %rollback, "could not restore the opening record");
                    }
                }
                return Err(e.into());
            }
        };

        info!(
            opening = opening.assignment.len(),
            closing = closing.assignment.len(),
            warnings = validation.warnings.len(),
            "business day draw completed"
        );

        Ok(DrawReport {
            mode: DayMode::BusinessDay,
            drawn_at: Local::now(),
            warnings: validation.warnings,
            shifts: vec![opening, closing],
        })
    }

    /// Single holiday shift. PDVs are used in the order they were entered.
    pub fn draw_holiday<R: RandomSource + ?Sized>(
        &self,
        lists: &DrawLists,
        rng: &mut R,
    ) -> Result<DrawReport, DrawError> {
        let validation = validate_holiday(&lists.holiday_operators, &lists.holiday_pdvs);
        if validation.is_fatal() {
            return Err(DrawError::FatalInput(validation));
        }

        let general = distribute(
            &self.memory,
            rng,
            &lists.holiday_pdvs,
            &lists.holiday_operators,
            ShiftCategory::Holiday,
        )?;

        info!(pdvs = general.assignment.len(), "holiday draw completed");

        Ok(DrawReport {
            mode: DayMode::Holiday,
            drawn_at: Local::now(),
            warnings: validation.warnings,
            shifts: vec![general],
        })
    }
}
