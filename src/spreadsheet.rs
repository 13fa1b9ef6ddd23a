//! Export solved reports to an `.xlsx` workbook, one sheet per exercise.

use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use tracing::info;

use crate::error::Error;
use crate::types::Report;

const LABEL_COLUMN_WIDTH: f64 = 30.0;
const VALUE_COLUMN_WIDTH: f64 = 14.0;
/// The constraint block spans label, lhs, sense, rhs and slack.
const MIN_COLUMNS: u16 = 5;

struct Formats {
    title: Format,
    header: Format,
    text: Format,
    number: Format,
}

impl Formats {
    fn new() -> Self {
        let bordered = Format::new().set_border(FormatBorder::Thin);
        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin),
            header: bordered
                .clone()
                .set_bold()
                .set_align(FormatAlign::Center),
            text: bordered.clone(),
            number: bordered.set_num_format("0.00"),
        }
    }
}

/// Write every report to its own sheet and sign each sheet with `signature`.
pub fn write_workbook(
    reports: &[Report],
    signature: &str,
    path: impl AsRef<Path>,
) -> Result<(), Error> {
    let path = path.as_ref();
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    for report in reports {
        let sheet = workbook.add_worksheet();
        write_sheet(sheet, report, signature, &formats)?;
    }

    workbook.save(path)?;
    info!(path = %path.display(), sheets = reports.len(), "spreadsheet written");
    Ok(())
}

fn write_sheet(
    sheet: &mut Worksheet,
    report: &Report,
    signature: &str,
    formats: &Formats,
) -> Result<(), XlsxError> {
    sheet.set_name(report.exercise.sheet_name())?;

    let table_columns = report
        .table
        .as_ref()
        .map_or(0, |t| t.columns.len() as u16 + 1);
    let last_column = MIN_COLUMNS.max(table_columns) - 1;

    sheet.set_column_width(0, LABEL_COLUMN_WIDTH)?;
    for column in 1..=last_column {
        sheet.set_column_width(column, VALUE_COLUMN_WIDTH)?;
    }

    sheet.set_row_height(0, 24)?;
    sheet.merge_range(0, 0, 0, last_column, &report.title, &formats.title)?;

    let mut row: u32 = 2;
    sheet.write_string_with_format(row, 0, "Status", &formats.header)?;
    sheet.write_string_with_format(row, 1, &report.status.to_string(), &formats.text)?;
    row += 1;
    sheet.write_string_with_format(row, 0, &report.objective.label, &formats.header)?;
    sheet.write_number_with_format(row, 1, report.objective.value, &formats.number)?;
    sheet.write_string_with_format(row, 2, &report.objective.unit, &formats.text)?;
    row += 2;

    if !report.variables.is_empty() {
        sheet.merge_range(row, 0, row, 2, &report.variables_heading, &formats.header)?;
        row += 1;
        for (column, heading) in ["Variable", "Value", "Unit"].into_iter().enumerate() {
            sheet.write_string_with_format(row, column as u16, heading, &formats.header)?;
        }
        row += 1;
        for q in &report.variables {
            sheet.write_string_with_format(row, 0, &q.name, &formats.text)?;
            sheet.write_number_with_format(row, 1, q.value, &formats.number)?;
            sheet.write_string_with_format(row, 2, &q.unit, &formats.text)?;
            row += 1;
        }
        row += 1;
    }

    if let Some(table) = &report.table {
        sheet.write_string_with_format(row, 0, &table.corner, &formats.header)?;
        for (j, column) in table.columns.iter().enumerate() {
            sheet.write_string_with_format(row, j as u16 + 1, column, &formats.header)?;
        }
        row += 1;
        for table_row in &table.rows {
            sheet.write_string_with_format(row, 0, &table_row.label, &formats.text)?;
            for (j, &cell) in table_row.cells.iter().enumerate() {
                sheet.write_number_with_format(row, j as u16 + 1, cell, &formats.number)?;
            }
            row += 1;
        }
        row += 1;
    }

    for line in &report.details {
        sheet.write_string(row, 0, line)?;
        row += 1;
    }
    if !report.details.is_empty() {
        row += 1;
    }

    if !report.constraints.is_empty() {
        let headings = ["Constraint", "LHS", "Sense", "RHS", "Slack"];
        for (column, heading) in headings.into_iter().enumerate() {
            sheet.write_string_with_format(row, column as u16, heading, &formats.header)?;
        }
        row += 1;
        for c in &report.constraints {
            sheet.write_string_with_format(row, 0, &c.name, &formats.text)?;
            sheet.write_number_with_format(row, 1, c.lhs, &formats.number)?;
            sheet.write_string_with_format(row, 2, &c.sense.to_string(), &formats.text)?;
            sheet.write_number_with_format(row, 3, c.rhs, &formats.number)?;
            sheet.write_number_with_format(row, 4, c.slack.abs(), &formats.number)?;
            row += 1;
        }
    }

    row += 2;
    sheet.write_string(row, 0, "Prepared by:")?;
    sheet.write_string(row, 1, "____________")?;
    if !signature.is_empty() {
        sheet.write_string(row, 2, signature)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Exercise, Instance};
    use std::fs;

    #[test]
    fn every_exercise_lands_in_one_workbook() {
        let reports: Vec<Report> = Exercise::ALL
            .into_iter()
            .map(|exercise| Instance::builtin(exercise).solve().unwrap())
            .collect();

        let path = std::env::temp_dir().join(format!("opsplan-{}.xlsx", std::process::id()));
        write_workbook(&reports, "Site engineer", &path).unwrap();

        let metadata = fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unwritable_path_is_reported() {
        let report = Instance::builtin(Exercise::Production).solve().unwrap();
        let path = std::env::temp_dir()
            .join("opsplan-missing-dir")
            .join("nested")
            .join("report.xlsx");
        let err = write_workbook(&[report], "", &path).unwrap_err();
        assert!(matches!(err, Error::Spreadsheet(_)));
    }
}
