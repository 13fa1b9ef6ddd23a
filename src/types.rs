use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the textbook problems this crate knows how to formulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Exercise {
    Production,
    Transport,
    Assignment,
    Allocation,
}

impl Exercise {
    pub const ALL: [Exercise; 4] = [
        Exercise::Production,
        Exercise::Transport,
        Exercise::Assignment,
        Exercise::Allocation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Exercise::Production => "production",
            Exercise::Transport => "transport",
            Exercise::Assignment => "assignment",
            Exercise::Allocation => "allocation",
        }
    }

    /// Worksheet name used when the report is exported.
    pub fn sheet_name(self) -> &'static str {
        match self {
            Exercise::Production => "Production",
            Exercise::Transport => "Transport",
            Exercise::Assignment => "Assignment",
            Exercise::Allocation => "Allocation",
        }
    }

    /// Width of the `=` rule framing the console title.
    pub fn rule_width(self) -> usize {
        match self {
            Exercise::Assignment | Exercise::Allocation => 60,
            Exercise::Production | Exercise::Transport => 50,
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Maximise,
    Minimise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Optimal,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Optimal => f.write_str("Optimal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sense {
    #[serde(rename = "<=")]
    Leq,
    #[serde(rename = ">=")]
    Geq,
    #[serde(rename = "==")]
    Eq,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sense::Leq => "<=",
            Sense::Geq => ">=",
            Sense::Eq => "==",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Objective {
    pub label: String,
    pub value: f64,
    pub unit: String,
}

/// A decision variable as read back from the solver.
#[derive(Debug, Clone, Serialize)]
pub struct Quantity {
    pub name: String,
    pub value: f64,
    pub unit: String,
}

/// A named constraint evaluated at the optimum.
#[derive(Debug, Clone, Serialize)]
pub struct ConstraintCheck {
    pub name: String,
    pub lhs: f64,
    pub sense: Sense,
    pub rhs: f64,
    pub slack: f64,
    pub binding: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub corner: String,
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub label: String,
    pub cells: Vec<f64>,
}

/// Everything printed or exported for one solved exercise.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub exercise: Exercise,
    pub title: String,
    pub direction: Direction,
    pub status: Status,
    pub objective: Objective,
    #[serde(rename = "variablesHeading")]
    pub variables_heading: String,
    pub variables: Vec<Quantity>,
    pub constraints: Vec<ConstraintCheck>,
    pub details: Vec<String>,
    pub table: Option<Table>,
}
