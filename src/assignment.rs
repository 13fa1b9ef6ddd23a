//! Brigade assignment: send every brigade to exactly one site, and staff
//! every site with exactly one brigade, so that the total time is minimal.

use good_lp::{Expression, ProblemVariables, Solution, Variable, variable};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{self, NamedConstraint};
use crate::types::{
    ConstraintCheck, Direction, Exercise, Objective, Report, Sense, Status, Table, TableRow,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// `time[i][j]` is how long brigade `i` needs to finish site `j`.
    pub time: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pairing {
    pub brigade: usize,
    pub site: usize,
    pub time: f64,
}

#[derive(Debug, Clone)]
pub struct AssignmentPlan {
    /// Chosen pairs, ordered by brigade. Indices are zero-based.
    pub pairings: Vec<Pairing>,
    pub total_time: f64,
    /// Solver values of the binary variables, one row per brigade.
    pub matrix: Vec<Vec<f64>>,
    pub constraints: Vec<ConstraintCheck>,
}

impl Default for Assignment {
    fn default() -> Self {
        Self {
            time: vec![
                vec![30.0, 40.0, 50.0, 60.0],
                vec![37.0, 47.0, 57.0, 58.0],
                vec![27.0, 44.0, 49.0, 57.0],
                vec![35.0, 37.0, 47.0, 63.0],
            ],
        }
    }
}

impl Assignment {
    pub fn validate(&self) -> Result<(), Error> {
        let n = self.time.len();
        if n == 0 {
            return Err(Error::invalid("time", "must have at least one brigade"));
        }
        model::require_matrix("time", &self.time, n, n)?;
        for (i, row) in self.time.iter().enumerate() {
            for (j, &t) in row.iter().enumerate() {
                model::require_finite_non_negative(&format!("time[{i}][{j}]"), t)?;
            }
        }
        Ok(())
    }

    pub fn solve(&self) -> Result<AssignmentPlan, Error> {
        self.validate()?;
        let n = self.time.len();

        let mut vars = ProblemVariables::new();
        let x: Vec<Vec<Variable>> = (0..n)
            .map(|_| (0..n).map(|_| vars.add(variable().binary())).collect())
            .collect();

        let objective: Expression = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .map(|(i, j)| self.time[i][j] * x[i][j])
            .sum();

        let brigades = (0..n).map(|i| {
            let sites: Expression = x[i].iter().copied().sum();
            NamedConstraint::new(format!("Brigade {}", i + 1), sites, Sense::Eq, 1.0)
        });
        let sites = (0..n).map(|j| {
            let brigades: Expression = x.iter().map(|row| row[j]).sum();
            NamedConstraint::new(format!("Site {}", j + 1), brigades, Sense::Eq, 1.0)
        });
        let constraints: Vec<NamedConstraint> = brigades.chain(sites).collect();

        let (solution, total_time) = model::solve(
            Exercise::Assignment,
            vars,
            Direction::Minimise,
            objective,
            &constraints,
        )?;

        let matrix: Vec<Vec<f64>> = x
            .iter()
            .map(|row| row.iter().map(|&v| solution.value(v).round()).collect())
            .collect();
        let pairings = matrix
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &value)| model::is_selected(value))
                    .map(move |(j, _)| Pairing {
                        brigade: i,
                        site: j,
                        time: self.time[i][j],
                    })
            })
            .collect();

        Ok(AssignmentPlan {
            pairings,
            total_time,
            matrix,
            constraints: model::check_all(&constraints, &solution),
        })
    }
}

impl AssignmentPlan {
    pub fn report(&self) -> Report {
        let details = self
            .pairings
            .iter()
            .map(|p| {
                format!(
                    "Brigade {} → Site {} (time: {})",
                    p.brigade + 1,
                    p.site + 1,
                    p.time
                )
            })
            .collect();

        let table = Table {
            corner: "Brigade".to_owned(),
            columns: (1..=self.matrix.len()).map(|j| format!("Site {j}")).collect(),
            rows: self
                .matrix
                .iter()
                .enumerate()
                .map(|(i, row)| TableRow {
                    label: format!("Brigade {}", i + 1),
                    cells: row.clone(),
                })
                .collect(),
        };

        Report {
            exercise: Exercise::Assignment,
            title: "OPTIMAL ASSIGNMENT OF BRIGADES TO SITES".to_owned(),
            direction: Direction::Minimise,
            status: Status::Optimal,
            objective: Objective {
                label: "Minimum total time".to_owned(),
                value: self.total_time,
                unit: "time units".to_owned(),
            },
            variables_heading: "Brigade assignments".to_owned(),
            variables: Vec::new(),
            constraints: self.constraints.clone(),
            details,
            table: Some(table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    fn assert_is_permutation(plan: &AssignmentPlan, n: usize) {
        assert_eq!(plan.pairings.len(), n);
        let mut sites: Vec<usize> = plan.pairings.iter().map(|p| p.site).collect();
        let brigades: Vec<usize> = plan.pairings.iter().map(|p| p.brigade).collect();
        sites.sort_unstable();
        assert_eq!(brigades, (0..n).collect::<Vec<_>>());
        assert_eq!(sites, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn textbook_instance_reaches_known_optimum() {
        let plan = Assignment::default().solve().unwrap();

        assert_float_eq!(plan.total_time, 172.0, abs <= 1e-4);
        assert_is_permutation(&plan, 4);

        let summed: f64 = plan.pairings.iter().map(|p| p.time).sum();
        assert_float_eq!(summed, plan.total_time, abs <= 1e-4);
    }

    #[test]
    fn every_assignment_constraint_is_tight() {
        let plan = Assignment::default().solve().unwrap();
        assert_eq!(plan.constraints.len(), 8);
        assert!(plan.constraints.iter().all(|c| c.binding));
    }

    #[test]
    fn smaller_instance_has_unique_optimum() {
        let instance = Assignment {
            time: vec![
                vec![9.0, 2.0, 7.0],
                vec![6.0, 4.0, 3.0],
                vec![5.0, 8.0, 1.0],
            ],
        };
        let plan = instance.solve().unwrap();

        assert_float_eq!(plan.total_time, 9.0, abs <= 1e-4);
        let pairs: Vec<(usize, usize)> = plan.pairings.iter().map(|p| (p.brigade, p.site)).collect();
        assert_eq!(pairs, [(0, 1), (1, 0), (2, 2)]);
    }

    #[test]
    fn report_lists_one_line_per_brigade() {
        let report = Assignment::default().solve().unwrap().report();
        assert_eq!(report.details.len(), 4);
        assert!(report.details[0].starts_with("Brigade 1 → Site "));
        assert!(report.variables.is_empty());
    }

    #[test]
    fn time_matrix_must_be_square() {
        let instance = Assignment {
            time: vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
        };
        assert!(matches!(
            instance.solve(),
            Err(Error::InvalidInstance { .. })
        ));
    }
}
