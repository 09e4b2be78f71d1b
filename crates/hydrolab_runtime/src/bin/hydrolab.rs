//! hydrolab CLI entry point.
//!
//! ```text
//! hydrolab analyze --ph 5.0 --sulfate 300 --turbidity 2 --industry
//! hydrolab schedule chemical
//! hydrolab interactive
//! hydrolab parameters
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use hydrolab_engine::Evidence;
use hydrolab_engine::water::{self, Observation, Parameter};
use hydrolab_runtime::{
    Intake, Oracles, RuntimeConfig, Sample, StaticOntology, TabularRiskModel, analyze,
    format_parameters, format_schedule,
};
use hydrolab_scheduler::{Category, schedule};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Water-quality diagnosis and lab scheduling")]
struct Cli {
    /// Path to the TOML configuration file (default: ./hydrolab.toml if present).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log engine activity to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Diagnose one sample given on the command line.
    Analyze(AnalyzeArgs),
    /// Print the available slots for an intervention category.
    Schedule {
        /// chemical, physical, critical; anything else uses the default staff.
        category: String,
    },
    /// Answer the intake questions interactively.
    Interactive {
        /// Print how each problem was derived.
        #[arg(long)]
        trace: bool,
    },
    /// List the monitored parameters.
    Parameters,
}

#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
struct AnalyzeArgs {
    /// pH
    #[arg(long, allow_negative_numbers = true)]
    ph: Option<f64>,
    /// Sulfate (mg/L)
    #[arg(long, allow_negative_numbers = true)]
    sulfate: Option<f64>,
    /// Turbidity (NTU)
    #[arg(long, allow_negative_numbers = true)]
    turbidity: Option<f64>,
    /// Total dissolved solids (ppm)
    #[arg(long, allow_negative_numbers = true)]
    solids: Option<f64>,
    /// Hardness (mg/L)
    #[arg(long, allow_negative_numbers = true)]
    hardness: Option<f64>,
    /// Chloramines (ppm)
    #[arg(long, allow_negative_numbers = true)]
    chloramines: Option<f64>,
    /// Conductivity (uS/cm)
    #[arg(long, allow_negative_numbers = true)]
    conductivity: Option<f64>,
    /// Organic carbon (ppm)
    #[arg(long, allow_negative_numbers = true)]
    organic_carbon: Option<f64>,
    /// Trihalomethanes (ug/L)
    #[arg(long, allow_negative_numbers = true)]
    trihalomethanes: Option<f64>,

    /// Observation: turbid, odor, taste or sediment (repeatable).
    #[arg(long = "observe", value_parser = parse_observation)]
    observations: Vec<Observation>,

    /// Industrial sites near the source.
    #[arg(long)]
    industry: bool,
    /// Recent heavy rain.
    #[arg(long)]
    heavy_rain: bool,

    /// Print how each problem was derived.
    #[arg(long)]
    trace: bool,
}

impl AnalyzeArgs {
    fn sample(&self) -> Sample {
        let readings = [
            (Parameter::Ph, self.ph),
            (Parameter::Sulfate, self.sulfate),
            (Parameter::Turbidity, self.turbidity),
            (Parameter::Solids, self.solids),
            (Parameter::Hardness, self.hardness),
            (Parameter::Chloramines, self.chloramines),
            (Parameter::Conductivity, self.conductivity),
            (Parameter::OrganicCarbon, self.organic_carbon),
            (Parameter::Trihalomethanes, self.trihalomethanes),
        ];
        Sample {
            readings: readings
                .into_iter()
                .filter_map(|(param, value)| Some((param, value?)))
                .collect(),
            observations: self.observations.clone(),
            evidence: Evidence {
                industry_nearby: self.industry,
                heavy_rain: self.heavy_rain,
            },
        }
    }
}

fn parse_observation(name: &str) -> Result<Observation, String> {
    Observation::parse(&name.to_ascii_lowercase()).ok_or_else(|| {
        let names: Vec<_> = Observation::ALL.iter().map(|o| o.name()).collect();
        format!("expected one of: {}", names.join(", "))
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e:#}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Schedule { category } => {
            let category = Category::parse(&category);
            println!("{category} ({})", category.facility());
            print!("{}", format_schedule(&schedule(category.as_str())));
            Ok(())
        }
        Command::Parameters => {
            print!("{}", format_parameters());
            Ok(())
        }
        Command::Analyze(args) => {
            let config = RuntimeConfig::load(cli.config.as_deref())
                .context("failed to load configuration")?;
            let rules = water::rule_base().context("failed to build rule base")?;
            let ontology = StaticOntology::from_config(&config);
            let model = TabularRiskModel::default();
            let oracles = Oracles {
                thresholds: &ontology,
                semantics: &ontology,
                risk: &model,
            };
            let report = analyze(&rules, &args.sample(), &oracles, &config, args.trace)
                .context("analysis failed")?;
            print!("{report}");
            Ok(())
        }
        Command::Interactive { trace } => {
            let config = RuntimeConfig::load(cli.config.as_deref())
                .context("failed to load configuration")?;
            let rules = water::rule_base().context("failed to build rule base")?;
            let ontology = StaticOntology::from_config(&config);
            let model = TabularRiskModel::default();
            let oracles = Oracles {
                thresholds: &ontology,
                semantics: &ontology,
                risk: &model,
            };
            let mut intake = Intake::new(&rules, oracles, &config)
                .context("failed to start line editor")?
                .with_trace(trace);
            intake
                .run(&mut io::stdout())
                .context("interactive session failed")?;
            Ok(())
        }
    }
}
