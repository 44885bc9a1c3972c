use crate::solver::SolverKind;
use crate::utils::Result;
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="paracn",
          version=&**FULL_VERSION,
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Copy-number estimator")]
    Estimate(EstimateArgs),
    #[clap(about = "List copy-number configurations of a gene model")]
    Configs(ConfigsArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("estimate")))]
#[command(arg_required_else_help(true))]
pub struct EstimateArgs {
    #[clap(required = true)]
    #[clap(short = 'g')]
    #[clap(long = "gene")]
    #[clap(help = "Gene model with regions and copy-number configurations")]
    #[clap(value_name = "GENE")]
    #[arg(value_parser = check_file_exists)]
    pub gene_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "coverage")]
    #[clap(help = "Region and mutation coverage of the sample")]
    #[clap(value_name = "COVERAGE")]
    #[arg(value_parser = check_file_exists)]
    pub coverage_path: PathBuf,

    #[clap(long = "solver")]
    #[clap(value_name = "SOLVER")]
    #[clap(help = "Integer-programming backend (any or microlp)")]
    #[clap(default_value = "any")]
    #[arg(value_parser = solver_from_string)]
    pub solver: SolverKind,

    #[clap(long = "cn")]
    #[clap(value_name = "CONFIGS")]
    #[clap(help = "Comma-separated copy-number solution to use instead of estimating it (e.g., 1,1,5)")]
    #[clap(value_delimiter = ',')]
    pub user_cn: Option<Vec<String>>,

    #[clap(long = "threshold")]
    #[clap(value_name = "FRAC")]
    #[clap(help = "Minimum fraction of the position coverage needed to support a mutation")]
    #[clap(default_value = "0.5")]
    #[arg(value_parser = ensure_unit_float)]
    pub threshold: f64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "left-fusion-penalty")]
    #[clap(value_name = "PENALTY")]
    #[clap(help = "Objective penalty for every selected left fusion")]
    #[clap(default_value = "0.1")]
    #[arg(value_parser = ensure_non_negative_float)]
    pub left_fusion_penalty: f64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "pce-penalty")]
    #[clap(value_name = "COEFF")]
    #[clap(help = "Error weight of the PCE region")]
    #[clap(default_value = "1.5")]
    #[arg(value_parser = ensure_non_negative_float)]
    pub pce_penalty_coeff: f64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "max-cn-error")]
    #[clap(value_name = "ERROR")]
    #[clap(help = "Maximum absolute copy-number error of a region")]
    #[clap(default_value = "10")]
    #[arg(value_parser = ensure_non_negative_float)]
    pub max_cn_error: f64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "parsimony-penalty")]
    #[clap(value_name = "PENALTY")]
    #[clap(help = "Objective penalty for every selected copy")]
    #[clap(default_value = "0.5")]
    #[arg(value_parser = ensure_non_negative_float)]
    pub parsimony_penalty: f64,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("configs")))]
#[command(arg_required_else_help(true))]
pub struct ConfigsArgs {
    #[clap(required = true)]
    #[clap(short = 'g')]
    #[clap(long = "gene")]
    #[clap(help = "Gene model with regions and copy-number configurations")]
    #[clap(value_name = "GENE")]
    #[arg(value_parser = check_file_exists)]
    pub gene_path: PathBuf,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn solver_from_string(s: &str) -> Result<SolverKind> {
    s.parse::<SolverKind>().map_err(|e| e.to_string())
}

fn ensure_unit_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "The value must be between 0.0 and 1.0, got: {}",
            value
        ))
    } else {
        Ok(value)
    }
}

fn ensure_non_negative_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if !value.is_finite() || value < 0.0 {
        Err(format!("The value must be a non-negative number, got: {}", value))
    } else {
        Ok(value)
    }
}
