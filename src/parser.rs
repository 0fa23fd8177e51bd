use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

use crate::draw::{DrawLists, ListKind};

/// Loads the six input lists from a CSV file
///
/// The file needs a `list` column naming one of the list identifiers
/// (e.g. `opening_operators`) and a `label` column with the value.
/// Row order is insertion order; blank labels are skipped.
pub fn load_lists<P: AsRef<Path>>(csv_path: P) -> Result<DrawLists, Box<dyn std::error::Error>> {
    let file = std::fs::File::open(csv_path)?;
    read_lists(file)
}

/// Reads lists from any CSV source, see `load_lists`
pub fn read_lists<R: Read>(source: R) -> Result<DrawLists, Box<dyn std::error::Error>> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    let headers = reader.headers()?;

    // Find column indices, falling back to the documented order
    let list_col = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("list"))
        .unwrap_or(0);
    let label_col = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("label"))
        .unwrap_or(1);

    let mut lists = DrawLists::default();
    for (row, result) in reader.records().enumerate() {
        let record = result?;

        let label = record.get(label_col).unwrap_or("").trim();
        if label.is_empty() {
            continue;
        }

        let list_name = record.get(list_col).unwrap_or("");
        let kind = ListKind::from_name(list_name)
            .ok_or_else(|| format!("row {}: unknown list '{}'", row + 2, list_name))?;
        lists.get_mut(kind).push(label.to_string());
    }

    Ok(lists)
}
