//! Ballast transportation: ship ballast from quarries to track sections at
//! minimal cost without exceeding quarry output or leaving demand unmet.

use good_lp::{Expression, ProblemVariables, Solution, Variable, variable};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{self, NamedConstraint};
use crate::types::{
    ConstraintCheck, Direction, Exercise, Objective, Quantity, Report, Sense, Status, Table,
    TableRow,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transportation {
    /// Output of each quarry.
    pub supply: Vec<f64>,
    /// Requirement of each track section.
    pub demand: Vec<f64>,
    /// `cost[i][j]` is the cost of moving one unit from quarry `i` to section `j`.
    pub cost: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub struct ShippingPlan {
    /// `shipments[i][j]` is the volume sent from quarry `i` to section `j`.
    pub shipments: Vec<Vec<f64>>,
    pub cost: f64,
    pub constraints: Vec<ConstraintCheck>,
}

impl Default for Transportation {
    fn default() -> Self {
        Self {
            supply: vec![35.0, 25.0],
            demand: vec![27.0, 15.0],
            cost: vec![vec![10.0, 9.0], vec![4.0, 5.0]],
        }
    }
}

impl Transportation {
    pub fn validate(&self) -> Result<(), Error> {
        if self.supply.is_empty() || self.demand.is_empty() {
            return Err(Error::invalid(
                "supply",
                "needs at least one quarry and one section",
            ));
        }
        for (i, &s) in self.supply.iter().enumerate() {
            model::require_finite_non_negative(&format!("supply[{i}]"), s)?;
        }
        for (j, &d) in self.demand.iter().enumerate() {
            model::require_finite_non_negative(&format!("demand[{j}]"), d)?;
        }
        model::require_matrix("cost", &self.cost, self.supply.len(), self.demand.len())
    }

    pub fn solve(&self) -> Result<ShippingPlan, Error> {
        self.validate()?;

        let mut vars = ProblemVariables::new();
        let routes: Vec<Vec<Variable>> = self
            .supply
            .iter()
            .map(|_| {
                self.demand
                    .iter()
                    .map(|_| vars.add(variable().min(0)))
                    .collect()
            })
            .collect();

        let objective: Expression = routes
            .iter()
            .zip(&self.cost)
            .flat_map(|(row, costs)| row.iter().zip(costs).map(|(&x, &c)| c * x))
            .sum();

        let supply = self.supply.iter().enumerate().map(|(i, &available)| {
            let shipped: Expression = routes[i].iter().copied().sum();
            NamedConstraint::new(
                format!("Supply quarry {}", i + 1),
                shipped,
                Sense::Leq,
                available,
            )
        });
        let demand = self.demand.iter().enumerate().map(|(j, &required)| {
            let received: Expression = routes.iter().map(|row| row[j]).sum();
            NamedConstraint::new(
                format!("Demand section {}", j + 1),
                received,
                Sense::Geq,
                required,
            )
        });
        let constraints: Vec<NamedConstraint> = supply.chain(demand).collect();

        let (solution, cost) = model::solve(
            Exercise::Transport,
            vars,
            Direction::Minimise,
            objective,
            &constraints,
        )?;

        let shipments = routes
            .iter()
            .map(|row| row.iter().map(|&x| solution.value(x)).collect())
            .collect();

        Ok(ShippingPlan {
            shipments,
            cost,
            constraints: model::check_all(&constraints, &solution),
        })
    }
}

impl ShippingPlan {
    pub fn report(&self) -> Report {
        let variables = self
            .shipments
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.iter().enumerate().map(move |(j, &value)| Quantity {
                    name: format!("x{}{}", i + 1, j + 1),
                    value,
                    unit: "thousand m³".to_owned(),
                })
            })
            .collect();

        let columns = self
            .shipments
            .first()
            .map(|row| (1..=row.len()).map(|j| format!("Section {j}")).collect())
            .unwrap_or_default();
        let table = Table {
            corner: "Quarry".to_owned(),
            columns,
            rows: self
                .shipments
                .iter()
                .enumerate()
                .map(|(i, row)| TableRow {
                    label: format!("Quarry {}", i + 1),
                    cells: row.clone(),
                })
                .collect(),
        };

        Report {
            exercise: Exercise::Transport,
            title: "BALLAST TRANSPORTATION PLAN".to_owned(),
            direction: Direction::Minimise,
            status: Status::Optimal,
            objective: Objective {
                label: "Minimum cost".to_owned(),
                value: self.cost,
                unit: "thousand currency units".to_owned(),
            },
            variables_heading: "Optimal volumes".to_owned(),
            variables,
            constraints: self.constraints.clone(),
            details: Vec::new(),
            table: Some(table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn textbook_instance_reaches_known_optimum() {
        let plan = Transportation::default().solve().unwrap();

        assert_float_eq!(plan.cost, 255.0, abs <= 1e-4);
        assert_float_eq!(plan.shipments[0][0], 2.0, abs <= 1e-4);
        assert_float_eq!(plan.shipments[0][1], 15.0, abs <= 1e-4);
        assert_float_eq!(plan.shipments[1][0], 25.0, abs <= 1e-4);
        assert_float_eq!(plan.shipments[1][1], 0.0, abs <= 1e-4);
    }

    #[test]
    fn first_quarry_keeps_spare_output() {
        let plan = Transportation::default().solve().unwrap();
        let quarry = &plan.constraints[0];
        assert_eq!(quarry.name, "Supply quarry 1");
        assert_float_eq!(quarry.slack, 18.0, abs <= 1e-4);
        assert!(!quarry.binding);

        assert!(plan.constraints[1..].iter().all(|c| c.binding));
    }

    #[test]
    fn demand_above_supply_is_infeasible() {
        let instance = Transportation {
            demand: vec![40.0, 30.0],
            ..Transportation::default()
        };
        let err = instance.solve().unwrap_err();
        assert!(matches!(err, Error::Infeasible { exercise: "transport" }));
    }

    #[test]
    fn cost_matrix_must_match_quarries_and_sections() {
        let instance = Transportation {
            cost: vec![vec![10.0, 9.0]],
            ..Transportation::default()
        };
        let err = instance.solve().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid instance: `cost` has 1 rows, expected 2"
        );
    }

    #[test]
    fn report_names_routes_by_quarry_and_section() {
        let report = Transportation::default().solve().unwrap().report();
        let names: Vec<&str> = report.variables.iter().map(|q| q.name.as_str()).collect();
        assert_eq!(names, ["x11", "x12", "x21", "x22"]);

        let table = report.table.unwrap();
        assert_eq!(table.columns, ["Section 1", "Section 2"]);
        assert_eq!(table.rows.len(), 2);
    }
}
