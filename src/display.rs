use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::draw::{AssignedPdv, DrawReport};

/// Shown in place of an operator when the PDV list outran the operators
pub const NO_OPERATOR: &str = "NO OPERATOR";

/// Formats the operator cell of a result row
pub fn format_operator(row: &AssignedPdv) -> &str {
    row.operator.as_deref().unwrap_or(NO_OPERATOR)
}

fn format_pdv(row: &AssignedPdv) -> &str {
    if row.pdv.is_empty() {
        "-"
    } else {
        &row.pdv
    }
}

/// Renders a draw as printable text: one table per shift
pub fn render_report(report: &DrawReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("** Draw ({}) **\n", report.mode.label()));
    out.push_str(&format!(
        "Drawn at: {}\n",
        report.drawn_at.format("%d/%m/%Y %H:%M:%S")
    ));

    for shift in &report.shifts {
        out.push_str(&format!("\n== {} ==\n", shift.category.label()));
        let width = shift
            .assignment
            .rows
            .iter()
            .map(|row| format_pdv(row).chars().count())
            .max()
            .unwrap_or(0)
            .max(3);
        out.push_str(&format!("{:<width$}  OPERATOR\n", "PDV", width = width));
        for row in &shift.assignment.rows {
            out.push_str(&format!(
                "{:<width$}  {}\n",
                format_pdv(row),
                format_operator(row),
                width = width
            ));
        }
        if shift.retry_exhausted {
            out.push_str("(repeats could not be avoided for this shift)\n");
        }
    }

    if !report.warnings.is_empty() {
        out.push_str(&format!("\nWarnings: {}\n", report.warnings.join("; ")));
    }

    out
}

/// Writes the printable form of a draw to `filename`
pub fn write_report_to_file<P: AsRef<Path>>(
    report: &DrawReport,
    filename: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;
    write!(file, "{}", render_report(report))?;
    Ok(())
}

/// Prints a draw to stdout, followed by any relaxed-constraint notice
pub fn print_report(report: &DrawReport) {
    println!("{}", render_report(report));
    if report.retry_exhausted() {
        println!("⚠️  Could not avoid repeating the previous draw with the current lists. A normal result was used.");
    }
}
