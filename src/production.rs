//! Ballast production mix: choose how much of each ballast type to produce so
//! that profit is maximal while machines and labor stay within capacity.

use good_lp::{Expression, ProblemVariables, Solution, Variable, variable};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{self, NamedConstraint};
use crate::types::{
    ConstraintCheck, Direction, Exercise, Objective, Quantity, Report, Sense, Status,
};

const VOLUME_UNIT: &str = "thousand m³";
const MONEY_UNIT: &str = "thousand currency units";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionMix {
    /// Profit per unit of each product.
    pub profit: Vec<f64>,
    pub resources: Vec<Resource>,
    /// Upper bound on the volume of each product, if any.
    #[serde(default, rename = "maxDemand")]
    pub max_demand: Vec<Option<f64>>,
}

/// A limited resource and how much of it one unit of each product consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub usage: Vec<f64>,
    pub available: f64,
}

#[derive(Debug, Clone)]
pub struct ProductionPlan {
    pub volumes: Vec<f64>,
    pub profit: f64,
    pub constraints: Vec<ConstraintCheck>,
}

impl Default for ProductionMix {
    fn default() -> Self {
        let resource = |name: &str, usage: [f64; 3], available| Resource {
            name: name.to_owned(),
            usage: usage.to_vec(),
            available,
        };
        Self {
            profit: vec![6.0, 10.0, 12.0],
            resources: vec![
                resource("Excavators", [13.0, 27.0, 24.0], 230.0),
                resource("Bulldozers", [8.0, 4.0, 6.0], 50.0),
                resource("Labor", [50.0, 30.0, 50.0], 610.0),
            ],
            max_demand: vec![None, Some(8.0), Some(5.0)],
        }
    }
}

impl ProductionMix {
    pub fn validate(&self) -> Result<(), Error> {
        let products = self.profit.len();
        if products == 0 {
            return Err(Error::invalid("profit", "must list at least one product"));
        }
        for (i, &p) in self.profit.iter().enumerate() {
            if !p.is_finite() {
                return Err(Error::invalid(format!("profit[{i}]"), "must be a finite number"));
            }
        }
        for (r, resource) in self.resources.iter().enumerate() {
            let field = format!("resources[{r}]");
            model::require_len(&format!("{field}.usage"), &resource.usage, products)?;
            model::require_finite_non_negative(&format!("{field}.available"), resource.available)?;
            for (i, &u) in resource.usage.iter().enumerate() {
                if !u.is_finite() {
                    return Err(Error::invalid(
                        format!("{field}.usage[{i}]"),
                        "must be a finite number",
                    ));
                }
            }
        }
        if !self.max_demand.is_empty() {
            model::require_len("maxDemand", &self.max_demand, products)?;
            for (i, cap) in self.max_demand.iter().enumerate() {
                if let Some(cap) = cap {
                    model::require_finite_non_negative(&format!("maxDemand[{i}]"), *cap)?;
                }
            }
        }
        Ok(())
    }

    pub fn solve(&self) -> Result<ProductionPlan, Error> {
        self.validate()?;

        let mut vars = ProblemVariables::new();
        let volumes: Vec<Variable> = self
            .profit
            .iter()
            .map(|_| vars.add(variable().min(0)))
            .collect();

        let objective = weighted_sum(&self.profit, &volumes);
        let constraints = self.constraints(&volumes);

        let (solution, profit) = model::solve(
            Exercise::Production,
            vars,
            Direction::Maximise,
            objective,
            &constraints,
        )?;

        Ok(ProductionPlan {
            volumes: volumes.iter().map(|&v| solution.value(v)).collect(),
            profit,
            constraints: model::check_all(&constraints, &solution),
        })
    }

    fn constraints(&self, volumes: &[Variable]) -> Vec<NamedConstraint> {
        let resources = self.resources.iter().map(|resource| {
            NamedConstraint::new(
                resource.name.clone(),
                weighted_sum(&resource.usage, volumes),
                Sense::Leq,
                resource.available,
            )
        });
        let demand = self
            .max_demand
            .iter()
            .zip(volumes)
            .enumerate()
            .filter_map(|(i, (cap, &volume))| {
                cap.map(|cap| {
                    NamedConstraint::new(
                        format!("Demand_x{}", i + 1),
                        Expression::from(volume),
                        Sense::Leq,
                        cap,
                    )
                })
            });
        resources.chain(demand).collect()
    }
}

fn weighted_sum(coefficients: &[f64], variables: &[Variable]) -> Expression {
    coefficients
        .iter()
        .zip(variables)
        .map(|(&c, &v)| c * v)
        .sum()
}

impl ProductionPlan {
    pub fn report(&self) -> Report {
        Report {
            exercise: Exercise::Production,
            title: "BALLAST PRODUCTION PLAN".to_owned(),
            direction: Direction::Maximise,
            status: Status::Optimal,
            objective: Objective {
                label: "Maximum profit".to_owned(),
                value: self.profit,
                unit: MONEY_UNIT.to_owned(),
            },
            variables_heading: "Optimal volumes".to_owned(),
            variables: self
                .volumes
                .iter()
                .enumerate()
                .map(|(i, &value)| Quantity {
                    name: format!("x{}", i + 1),
                    value,
                    unit: VOLUME_UNIT.to_owned(),
                })
                .collect(),
            constraints: self.constraints.clone(),
            details: Vec::new(),
            table: None,
        }
    }
}
