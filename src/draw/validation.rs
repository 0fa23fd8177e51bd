use super::types::ValidationResult;

/// Checks the four business-day lists.
///
/// Empty lists are fatal: one message for the operator lists and one for
/// the PDV lists, each checked independently. Count mismatches per shift
/// are warnings and the draw goes ahead with unfilled PDVs.
pub fn validate_business_day(
    opening_operators: &[String],
    closing_operators: &[String],
    opening_pdvs: &[String],
    closing_pdvs: &[String],
) -> ValidationResult {
    let mut result = ValidationResult::default();

    if opening_operators.is_empty() || closing_operators.is_empty() {
        result.errors.push("Operator list cannot be empty".to_string());
    }
    if opening_pdvs.is_empty() || closing_pdvs.is_empty() {
        result.errors.push("PDV list cannot be empty".to_string());
    }

    if opening_operators.len() != opening_pdvs.len() {
        result.warnings.push(format!(
            "Opening: {} operator(s) vs {} PDV(s)",
            opening_operators.len(),
            opening_pdvs.len()
        ));
    }
    if closing_operators.len() != closing_pdvs.len() {
        result.warnings.push(format!(
            "Closing: {} operator(s) vs {} PDV(s)",
            closing_operators.len(),
            closing_pdvs.len()
        ));
    }

    result
}

/// Checks the single holiday list pair. Both emptiness and a count
/// mismatch are fatal here; the mismatch is only checked on non-empty lists.
pub fn validate_holiday(operators: &[String], pdvs: &[String]) -> ValidationResult {
    let mut result = ValidationResult::default();

    if operators.is_empty() || pdvs.is_empty() {
        result
            .errors
            .push("Fill in operators and PDVs before drawing".to_string());
    } else if operators.len() != pdvs.len() {
        result
            .errors
            .push("The number of operators must equal the number of PDVs".to_string());
    }

    result
}
