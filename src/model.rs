use good_lp::solvers::microlp::microlp;
use good_lp::{Constraint, Expression, ProblemVariables, Solution, SolverModel};
use tracing::{debug, info};

use crate::error::Error;
use crate::types::{ConstraintCheck, Direction, Exercise, Sense};

/// Slack below this is reported as a binding constraint.
pub const BINDING_TOLERANCE: f64 = 1e-6;

/// A linear constraint that keeps its name and its left-hand side so it can
/// be evaluated again once the solver is done.
pub(crate) struct NamedConstraint {
    name: String,
    lhs: Expression,
    sense: Sense,
    rhs: f64,
}

impl NamedConstraint {
    pub fn new(name: impl Into<String>, lhs: Expression, sense: Sense, rhs: f64) -> Self {
        Self {
            name: name.into(),
            lhs,
            sense,
            rhs,
        }
    }

    fn to_constraint(&self) -> Constraint {
        let lhs = self.lhs.clone();
        let rhs = Expression::from(self.rhs);
        match self.sense {
            Sense::Leq => lhs.leq(rhs),
            Sense::Geq => lhs.geq(rhs),
            Sense::Eq => lhs.eq(rhs),
        }
    }

    pub fn check(&self, solution: &impl Solution) -> ConstraintCheck {
        let lhs = solution.eval(&self.lhs);
        let slack = match self.sense {
            Sense::Leq => self.rhs - lhs,
            Sense::Geq => lhs - self.rhs,
            Sense::Eq => (lhs - self.rhs).abs(),
        };
        ConstraintCheck {
            name: self.name.clone(),
            lhs,
            sense: self.sense,
            rhs: self.rhs,
            slack,
            binding: slack.abs() < BINDING_TOLERANCE,
        }
    }
}

/// Hand the model to the solver and return its solution together with the
/// objective value at the optimum.
pub(crate) fn solve(
    exercise: Exercise,
    variables: ProblemVariables,
    direction: Direction,
    objective: Expression,
    constraints: &[NamedConstraint],
) -> Result<(impl Solution, f64), Error> {
    debug!(
        exercise = exercise.name(),
        constraints = constraints.len(),
        ?direction,
        "building model"
    );

    let problem = match direction {
        Direction::Maximise => variables.maximise(objective.clone()),
        Direction::Minimise => variables.minimise(objective.clone()),
    };
    let model = constraints
        .iter()
        .fold(problem.using(microlp), |m, c| m.with(c.to_constraint()));

    let solution = model
        .solve()
        .map_err(|err| Error::resolution(exercise.name(), err))?;
    let value = solution.eval(&objective);

    info!(exercise = exercise.name(), objective = value, "solved");
    Ok((solution, value))
}

pub(crate) fn check_all(
    constraints: &[NamedConstraint],
    solution: &impl Solution,
) -> Vec<ConstraintCheck> {
    constraints.iter().map(|c| c.check(solution)).collect()
}

/// A binary variable counts as chosen once the solver pushes it past one half.
pub(crate) fn is_selected(value: f64) -> bool {
    value > 0.5
}

pub(crate) fn require_finite_non_negative(field: &str, value: f64) -> Result<(), Error> {
    if !value.is_finite() {
        return Err(Error::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(Error::invalid(field, format!("must not be negative, got {value}")));
    }
    Ok(())
}

pub(crate) fn require_len<T>(field: &str, values: &[T], expected: usize) -> Result<(), Error> {
    if values.len() != expected {
        return Err(Error::invalid(
            field,
            format!("has {} entries, expected {expected}", values.len()),
        ));
    }
    Ok(())
}

/// Check that `matrix` is `rows` x `columns` and that every cell is usable.
pub(crate) fn require_matrix(
    field: &str,
    matrix: &[Vec<f64>],
    rows: usize,
    columns: usize,
) -> Result<(), Error> {
    if matrix.len() != rows {
        return Err(Error::invalid(
            field,
            format!("has {} rows, expected {rows}", matrix.len()),
        ));
    }
    for (i, row) in matrix.iter().enumerate() {
        let row_field = format!("{field}[{i}]");
        if row.len() != columns {
            return Err(Error::invalid(
                row_field,
                format!("has {} columns, expected {columns}", row.len()),
            ));
        }
        if let Some(j) = row.iter().position(|v| !v.is_finite()) {
            return Err(Error::invalid(
                format!("{row_field}[{j}]"),
                "must be a finite number",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use good_lp::{variable, variables};

    #[test]
    fn binding_and_slack_are_reported_per_sense() {
        let mut vars = variables!();
        let a = vars.add(variable().min(0));
        let b = vars.add(variable().min(0));

        let constraints = vec![
            NamedConstraint::new("cap", a + b, Sense::Leq, 10.0),
            NamedConstraint::new("floor", Expression::from(a), Sense::Geq, 2.0),
            NamedConstraint::new("fixed", Expression::from(b), Sense::Eq, 3.0),
        ];
        let (solution, value) = solve(
            Exercise::Production,
            vars,
            Direction::Maximise,
            2 * a + b,
            &constraints,
        )
        .unwrap();

        assert_float_eq!(value, 17.0, abs <= 1e-6);
        let checks = check_all(&constraints, &solution);

        assert_eq!(checks[0].name, "cap");
        assert_float_eq!(checks[0].lhs, 10.0, abs <= 1e-6);
        assert!(checks[0].binding);

        assert_float_eq!(checks[1].slack, 5.0, abs <= 1e-6);
        assert!(!checks[1].binding);

        assert_float_eq!(checks[2].slack, 0.0, abs <= 1e-6);
        assert!(checks[2].binding);
    }

    #[test]
    fn infeasible_model_is_an_error() {
        let mut vars = variables!();
        let a = vars.add(variable().min(0));
        let constraints = vec![
            NamedConstraint::new("low", Expression::from(a), Sense::Leq, 1.0),
            NamedConstraint::new("high", Expression::from(a), Sense::Geq, 2.0),
        ];
        let result = solve(
            Exercise::Transport,
            vars,
            Direction::Minimise,
            Expression::from(a),
            &constraints,
        );
        assert!(matches!(result, Err(Error::Infeasible { exercise: "transport" })));
    }

    #[test]
    fn ragged_matrix_is_rejected() {
        let matrix = vec![vec![1.0, 2.0], vec![3.0]];
        let err = require_matrix("cost", &matrix, 2, 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid instance: `cost[1]` has 1 columns, expected 2"
        );
    }

    #[test]
    fn negative_capacity_is_rejected() {
        assert!(require_finite_non_negative("supply[0]", 4.0).is_ok());
        assert!(require_finite_non_negative("supply[0]", -1.0).is_err());
        assert!(require_finite_non_negative("supply[0]", f64::NAN).is_err());
    }
}
