/// Numeric index embedded in a PDV label: every digit in the label,
/// concatenated. Labels without digits sort as 0; indexes too long for
/// u128 saturate.
pub fn pdv_number(label: &str) -> u128 {
    let digits: String = label.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u128::MAX)
}

/// Sorts PDV labels by their embedded number, ascending. Ties keep input order.
pub fn order_numerically(pdvs: &[String]) -> Vec<String> {
    let mut ordered = pdvs.to_vec();
    ordered.sort_by_key(|label| pdv_number(label));
    ordered
}
