//! Worker allocation: split the workforce into groups of fixed sizes and send
//! one group to every site so that the total volume of construction and
//! assembly work is maximal.

use good_lp::{Expression, ProblemVariables, Solution, Variable, variable};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{self, NamedConstraint};
use crate::types::{
    ConstraintCheck, Direction, Exercise, Objective, Report, Sense, Status, Table, TableRow,
};

const OUTPUT_UNIT: &str = "thousand currency units";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerAllocation {
    /// Head count of each group; a group of zero leaves the site idle.
    #[serde(rename = "groupSizes")]
    pub group_sizes: Vec<u32>,
    /// `output[i][j]` is the work volume group `i` delivers at site `j`.
    pub output: Vec<Vec<f64>>,
    /// Every worker must be placed.
    #[serde(rename = "totalWorkers")]
    pub total_workers: u32,
}

#[derive(Debug, Clone)]
pub struct AllocationPlan {
    pub group_sizes: Vec<u32>,
    pub output: Vec<Vec<f64>>,
    /// Group chosen for each site.
    pub selected: Vec<usize>,
    /// Solver values of the binary variables, one row per group.
    pub matrix: Vec<Vec<f64>>,
    pub total_output: f64,
    pub constraints: Vec<ConstraintCheck>,
}

impl Default for WorkerAllocation {
    fn default() -> Self {
        Self {
            group_sizes: vec![0, 17, 34, 51, 68],
            output: vec![
                vec![0.0, 0.0, 0.0, 0.0],
                vec![8.0, 9.0, 7.0, 6.0],
                vec![14.0, 16.0, 16.0, 10.0],
                vec![24.0, 25.0, 22.0, 18.0],
                vec![32.0, 33.0, 30.0, 24.0],
            ],
            total_workers: 68,
        }
    }
}

impl WorkerAllocation {
    pub fn sites(&self) -> usize {
        self.output.first().map_or(0, Vec::len)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.group_sizes.is_empty() {
            return Err(Error::invalid("groupSizes", "must list at least one group"));
        }
        let sites = self.sites();
        if sites == 0 {
            return Err(Error::invalid("output", "must have at least one site"));
        }
        model::require_matrix("output", &self.output, self.group_sizes.len(), sites)
    }

    pub fn solve(&self) -> Result<AllocationPlan, Error> {
        self.validate()?;
        let groups = self.group_sizes.len();
        let sites = self.sites();

        let mut vars = ProblemVariables::new();
        let v: Vec<Vec<Variable>> = (0..groups)
            .map(|_| (0..sites).map(|_| vars.add(variable().binary())).collect())
            .collect();

        let objective: Expression = cells(groups, sites)
            .map(|(i, j)| self.output[i][j] * v[i][j])
            .sum();

        let mut constraints = Vec::with_capacity(sites + 1);
        let placed: Expression = cells(groups, sites)
            .map(|(i, j)| f64::from(self.group_sizes[i]) * v[i][j])
            .sum();
        constraints.push(NamedConstraint::new(
            "Total workers",
            placed,
            Sense::Eq,
            f64::from(self.total_workers),
        ));
        for j in 0..sites {
            let chosen: Expression = v.iter().map(|row| row[j]).sum();
            constraints.push(NamedConstraint::new(
                format!("Site {}", j + 1),
                chosen,
                Sense::Eq,
                1.0,
            ));
        }

        let (solution, total_output) = model::solve(
            Exercise::Allocation,
            vars,
            Direction::Maximise,
            objective,
            &constraints,
        )?;

        let matrix: Vec<Vec<f64>> = v
            .iter()
            .map(|row| row.iter().map(|&x| solution.value(x).round()).collect())
            .collect();
        let selected = (0..sites)
            .map(|j| {
                (0..groups)
                    .find(|&i| model::is_selected(matrix[i][j]))
                    .ok_or_else(|| Error::Solver {
                        exercise: Exercise::Allocation.name(),
                        message: format!("no group selected for site {}", j + 1),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AllocationPlan {
            group_sizes: self.group_sizes.clone(),
            output: self.output.clone(),
            selected,
            matrix,
            total_output,
            constraints: model::check_all(&constraints, &solution),
        })
    }
}

fn cells(rows: usize, columns: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..rows).flat_map(move |i| (0..columns).map(move |j| (i, j)))
}

impl AllocationPlan {
    /// Workers placed according to the chosen cells.
    pub fn placed_workers(&self) -> u32 {
        self.selected.iter().map(|&i| self.group_sizes[i]).sum()
    }

    /// Work volume recomputed from the chosen cells rather than taken from
    /// the solver's objective.
    pub fn placed_output(&self) -> f64 {
        self.selected
            .iter()
            .enumerate()
            .map(|(j, &i)| self.output[i][j])
            .sum()
    }

    pub fn report(&self) -> Report {
        let mut details: Vec<String> = self
            .selected
            .iter()
            .enumerate()
            .map(|(j, &i)| {
                format!(
                    "Site {}: {} workers, output = {} {OUTPUT_UNIT}",
                    j + 1,
                    self.group_sizes[i],
                    self.output[i][j]
                )
            })
            .collect();
        details.push(format!("Workers placed: {}", self.placed_workers()));
        details.push(format!(
            "Total output: {} {OUTPUT_UNIT}",
            self.placed_output()
        ));

        let table = Table {
            corner: "Sites →".to_owned(),
            columns: (1..=self.selected.len()).map(|j| j.to_string()).collect(),
            rows: self
                .matrix
                .iter()
                .enumerate()
                .map(|(i, row)| TableRow {
                    label: format!("Group {i} ({} workers)", self.group_sizes[i]),
                    cells: row.clone(),
                })
                .collect(),
        };

        Report {
            exercise: Exercise::Allocation,
            title: "ALLOCATION OF WORKERS TO SITES".to_owned(),
            direction: Direction::Maximise,
            status: Status::Optimal,
            objective: Objective {
                label: "Maximum work volume".to_owned(),
                value: self.total_output,
                unit: OUTPUT_UNIT.to_owned(),
            },
            variables_heading: "Distribution".to_owned(),
            variables: Vec::new(),
            constraints: self.constraints.clone(),
            details,
            table: Some(table),
        }
    }
}
