use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use opsplan::{Exercise, Instance, Report, spreadsheet, telemetry};
use tracing::info;

#[derive(Parser)]
#[command(name = "opsplan")]
#[command(about = "Solve textbook operations-planning problems with linear programming", long_about = None)]
struct Cli {
    /// Exercise to solve with its built-in data
    #[arg(value_enum, default_value_t = Target::All)]
    exercise: Target,
    /// Solve the instance in this YAML file instead
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Console output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Also export the reports to this .xlsx file
    #[arg(long)]
    xlsx: Option<PathBuf>,
    /// Name written on the spreadsheet signature row
    #[arg(long, default_value = "")]
    signature: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    All,
    Production,
    Transport,
    Assignment,
    Allocation,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Yaml,
}

impl Target {
    fn instances(self) -> Vec<Instance> {
        let exercises: &[Exercise] = match self {
            Target::All => &Exercise::ALL,
            Target::Production => &[Exercise::Production],
            Target::Transport => &[Exercise::Transport],
            Target::Assignment => &[Exercise::Assignment],
            Target::Allocation => &[Exercise::Allocation],
        };
        exercises.iter().map(|&e| Instance::builtin(e)).collect()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();
    let cli = Cli::parse();

    let instances = match &cli.input {
        Some(path) => vec![Instance::from_file(path)?],
        None => cli.exercise.instances(),
    };

    let reports = instances
        .iter()
        .map(|instance| {
            info!(exercise = %instance.exercise(), "solving");
            instance.solve()
        })
        .collect::<Result<Vec<Report>, _>>()?;

    match cli.format {
        Format::Text => {
            for (i, report) in reports.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print!("{report}");
            }
        }
        Format::Yaml => println!("{}", serde_yaml::to_string(&reports)?),
    }

    if let Some(path) = &cli.xlsx {
        spreadsheet::write_workbook(&reports, &cli.signature, path)?;
    }
    Ok(())
}
