pub mod allocation;
pub mod assignment;
mod error;
mod model;
pub mod production;
mod report;
pub mod spreadsheet;
pub mod telemetry;
pub mod transport;
pub mod types;

pub use allocation::WorkerAllocation;
pub use assignment::Assignment;
pub use error::Error;
pub use model::BINDING_TOLERANCE;
pub use production::ProductionMix;
pub use transport::Transportation;
pub use types::{Exercise, Report};

use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;
use tracing::debug;

/// A problem instance as read from a YAML file, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Instance {
    Production(ProductionMix),
    Transport(Transportation),
    Assignment(Assignment),
    Allocation(WorkerAllocation),
}

impl Instance {
    /// The textbook data for `exercise`.
    pub fn builtin(exercise: Exercise) -> Self {
        match exercise {
            Exercise::Production => Instance::Production(ProductionMix::default()),
            Exercise::Transport => Instance::Transport(Transportation::default()),
            Exercise::Assignment => Instance::Assignment(Assignment::default()),
            Exercise::Allocation => Instance::Allocation(WorkerAllocation::default()),
        }
    }

    pub fn from_yaml(buf: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(buf)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading instance");
        let buf = read_to_string(path)?;
        Self::from_yaml(&buf)
    }

    pub fn exercise(&self) -> Exercise {
        match self {
            Instance::Production(_) => Exercise::Production,
            Instance::Transport(_) => Exercise::Transport,
            Instance::Assignment(_) => Exercise::Assignment,
            Instance::Allocation(_) => Exercise::Allocation,
        }
    }

    pub fn solve(&self) -> Result<Report, Error> {
        let report = match self {
            Instance::Production(mix) => mix.solve()?.report(),
            Instance::Transport(transport) => transport.solve()?.report(),
            Instance::Assignment(assignment) => assignment.solve()?.report(),
            Instance::Allocation(allocation) => allocation.solve()?.report(),
        };
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use serde::Deserialize;
    use std::fs::read_dir;
    use std::path::PathBuf;

    #[derive(Debug, Deserialize)]
    struct Expected {
        objective: f64,
    }

    // Each fixture holds an instance followed by an `expected:` block
    fn run_test_file(test_file: &Path) {
        println!("Running test for file: {:?}", test_file);

        let failure_message = format!("Failed to read test file: {}", test_file.display());
        let yaml_content = read_to_string(test_file).expect(&failure_message);

        let parts: Vec<&str> = yaml_content.split("expected:").collect();

        let input_yaml = parts.first().expect("No input found in test file").trim();
        let failure_message = format!("Failed to parse input YAML: {}", test_file.display());
        let instance = Instance::from_yaml(input_yaml).expect(&failure_message);

        let failure_message = format!("Failed to parse expected YAML: {}", test_file.display());
        let expected_yaml = parts.get(1).expect(&failure_message);
        let expected: Expected = serde_yaml::from_str(expected_yaml).expect(&failure_message);

        let failure_message = format!("Failed to solve test file: {}", test_file.display());
        let report = instance.solve().expect(&failure_message);

        println!("expected: {}", expected.objective);
        println!("received: {}", report.objective.value);

        assert_float_eq!(
            expected.objective,
            report.objective.value,
            abs <= 1e-4,
            "{}",
            test_file.display()
        );
        assert_eq!(report.exercise, instance.exercise());
        assert!(
            report
                .constraints
                .iter()
                .all(|c| c.slack > -BINDING_TOLERANCE),
            "{}: a constraint is violated",
            test_file.display()
        );
    }

    #[test]
    fn run_all_test_files() {
        let test_data_dir = Path::new("test_data");
        let mut entries: Vec<PathBuf> = read_dir(test_data_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| {
                path.is_file() && path.extension().map(|ext| ext == "yaml").unwrap_or(false)
            })
            .collect();

        entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        assert!(!entries.is_empty());

        for path in entries {
            run_test_file(&path);
        }
    }

    #[test]
    fn builtin_instances_solve() {
        for exercise in Exercise::ALL {
            let report = Instance::builtin(exercise).solve().unwrap();
            assert_eq!(report.exercise, exercise);
        }
    }

    #[test]
    fn unknown_kind_is_a_yaml_error() {
        let err = Instance::from_yaml("kind: knapsack\nitems: []").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Instance::from_file("test_data/does-not-exist.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
