use std::fmt;

use crate::types::{Report, Table};

const LABEL_WIDTH: usize = 24;
const CELL_WIDTH: usize = 8;

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(self.exercise.rule_width());
        writeln!(f, "{rule}")?;
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Status: {}", self.status)?;
        writeln!(
            f,
            "{}: {:.2} {}",
            self.objective.label, self.objective.value, self.objective.unit
        )?;

        if !self.variables.is_empty() || !self.details.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}:", self.variables_heading)?;
        }
        for q in &self.variables {
            writeln!(f, "{} = {:.2} {}", q.name, q.value, q.unit)?;
        }
        for line in &self.details {
            writeln!(f, "{line}")?;
        }

        if let Some(table) = &self.table {
            writeln!(f)?;
            write!(f, "{table}")?;
        }

        if !self.constraints.is_empty() {
            writeln!(f)?;
            writeln!(f, "Constraint analysis:")?;
        }
        for c in &self.constraints {
            write!(
                f,
                "{}: {:.2} {} {:.2} (slack: {:.2})",
                c.name,
                c.lhs,
                c.sense,
                c.rhs,
                c.slack.abs()
            )?;
            if c.binding {
                write!(f, " binding")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = LABEL_WIDTH + 2 + self.columns.len() * (CELL_WIDTH + 1);
        let rule = "=".repeat(width);

        write!(f, "{:<LABEL_WIDTH$} |", self.corner)?;
        for column in &self.columns {
            write!(f, " {column:>CELL_WIDTH$}")?;
        }
        writeln!(f)?;
        writeln!(f, "{rule}")?;
        for row in &self.rows {
            write!(f, "{:<LABEL_WIDTH$} |", row.label)?;
            for cell in &row.cells {
                write!(f, " {cell:>CELL_WIDTH$.1}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{rule}")
    }
}
