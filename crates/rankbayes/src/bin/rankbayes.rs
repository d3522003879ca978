//! Command-line front end for Bayesian rank tests.
//!
//! # Usage
//!
//! ```bash
//! # Signed-rank test on a pre/post questionnaire export
//! rankbayes signed-rank --csv data/likability_pre_post.csv \
//!   --x-items post_1,post_2,post_3 --y-items pre_1,pre_2,pre_3 --seed 1
//!
//! # Spearman correlation on literal values
//! rankbayes spearman --x "1,2,3,4,5,6" --y "2,1,4,3,6,5"
//!
//! # Rank-sum test on two one-column files, JSON report
//! rankbayes rank-sum --x-file group_a.txt --y-file group_b.txt --format json
//!
//! # Classical tests only
//! rankbayes classical --x "3,4,5,4" --y "2,2,4,3"
//! ```

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use rankbayes::data::{
    load_likert_csv, load_separate_files, load_single_column_file, parse_values, LikertScale,
};
use rankbayes::output::{format_classical, format_report, to_json_pretty};
use rankbayes::{
    classical_tests, Alternative, BfType, Config, IndependentSamples, OneSample, PairedSample,
    RankTest, SampleInput, SamplerConfig, TestFamily,
};

/// Bayesian rank-based hypothesis tests for ordinal data
#[derive(Parser, Debug)]
#[command(name = "rankbayes")]
#[command(about = "Bayesian Spearman, signed-rank and rank-sum tests with Savage-Dickey Bayes factors")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bayesian Spearman correlation on paired data
    Spearman(BayesArgs),

    /// Bayesian Wilcoxon signed-rank test (paired, or one sample with --x only)
    SignedRank(BayesArgs),

    /// Bayesian Wilcoxon rank-sum test on two independent groups
    RankSum(BayesArgs),

    /// Classical rank tests only, no sampling
    Classical(ClassicalArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Literal values of the first sample (comma or space separated)
    #[arg(long, allow_hyphen_values = true)]
    x: Option<String>,

    /// Literal values of the second sample
    #[arg(long, allow_hyphen_values = true)]
    y: Option<String>,

    /// Likert CSV export with one row per respondent
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Columns averaged into the first composite (comma-separated)
    #[arg(long, value_delimiter = ',', requires = "csv")]
    x_items: Vec<String>,

    /// Columns averaged into the second composite (comma-separated)
    #[arg(long, value_delimiter = ',', requires = "csv")]
    y_items: Vec<String>,

    /// Lowest admissible response of the CSV scale
    #[arg(long, default_value_t = 1)]
    scale_min: i32,

    /// Highest admissible response of the CSV scale
    #[arg(long, default_value_t = 7)]
    scale_max: i32,

    /// One-column file with the first sample
    #[arg(long)]
    x_file: Option<PathBuf>,

    /// One-column file with the second sample
    #[arg(long)]
    y_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BayesArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Preset: quick, default or thorough
    #[arg(short, long, default_value = "default")]
    preset: String,

    /// Draws per chain, burn-in included (overrides preset)
    #[arg(long)]
    samples: Option<usize>,

    /// Leading draws discarded per chain (overrides preset)
    #[arg(long)]
    burnin: Option<usize>,

    /// Number of chains (overrides preset)
    #[arg(long)]
    chains: Option<usize>,

    /// Inner (delta, g) Gibbs rounds per draw for the signed-rank and
    /// rank-sum tests; Spearman ignores it
    #[arg(long)]
    gibbs_iterations: Option<usize>,

    /// Prior parameter: Cauchy scale, or kappa for Spearman
    #[arg(long)]
    prior: Option<f64>,

    /// Location the data are shifted by before ranking
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    test_value: f64,

    /// Direction of H1: two-sided, less (left) or greater (right)
    #[arg(short, long, default_value = "two-sided")]
    alternative: Alternative,

    /// RNG seed for reproducible draws
    #[arg(long)]
    seed: Option<u64>,

    /// Bayes factor shown in text output
    #[arg(long, value_enum, default_value_t = BfKind::Bf10)]
    bf_type: BfKind,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Omit the verbal evidence band
    #[arg(long)]
    no_interpretation: bool,

    /// Skip the classical companion test
    #[arg(long)]
    no_classical: bool,
}

#[derive(Args, Debug)]
struct ClassicalArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Treat x and y as independent groups (Mann-Whitney U)
    #[arg(long)]
    independent: bool,

    /// Location the data are shifted by before ranking
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    test_value: f64,

    /// Direction of H1: two-sided, less (left) or greater (right)
    #[arg(short, long, default_value = "two-sided")]
    alternative: Alternative,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BfKind {
    Bf10,
    Bf01,
    LogBf10,
}

impl From<BfKind> for BfType {
    fn from(kind: BfKind) -> Self {
        match kind {
            BfKind::Bf10 => BfType::Bf10,
            BfKind::Bf01 => BfType::Bf01,
            BfKind::LogBf10 => BfType::LogBf10,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

/// Which shape of input a command expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    /// Paired data, or a single sample when y is absent.
    PairedOrOne,
    /// Strictly paired data.
    Paired,
    /// Two independent groups.
    Independent,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Spearman(args) => run_bayes(TestFamily::Spearman, args),
        Command::SignedRank(args) => run_bayes(TestFamily::SignedRank, args),
        Command::RankSum(args) => run_bayes(TestFamily::RankSum, args),
        Command::Classical(args) => run_classical(args),
    };

    if let Err(message) = outcome {
        eprintln!("Error: {}", message);
        process::exit(1);
    }
}

fn run_bayes(family: TestFamily, args: BayesArgs) -> Result<(), String> {
    let shape = match family {
        TestFamily::Spearman => Shape::Paired,
        TestFamily::SignedRank => Shape::PairedOrOne,
        TestFamily::RankSum => Shape::Independent,
    };
    let input = load_input(&args.input, shape)?;

    let mut sampler = match args.preset.to_lowercase().as_str() {
        "quick" => SamplerConfig::quick(),
        "default" => SamplerConfig::default(),
        "thorough" => SamplerConfig::thorough(),
        other => {
            return Err(format!(
                "Unknown preset '{}'. Available: quick, default, thorough",
                other
            ))
        }
    };

    // Apply custom overrides
    if let Some(samples) = args.samples {
        sampler.n_samples = samples;
    }
    if let Some(burnin) = args.burnin {
        sampler.n_burnin = burnin;
    }
    if let Some(chains) = args.chains {
        sampler.n_chains = chains;
    }
    if let Some(iterations) = args.gibbs_iterations {
        sampler.n_gibbs_iterations = iterations;
    }
    if let Some(prior) = args.prior {
        sampler.prior_parameter = Some(prior);
    }
    sampler.test_value = args.test_value;
    sampler.seed = args.seed;

    let show_progress = !args.no_progress && args.format == Format::Text;
    let config = Config::new()
        .sampler(sampler)
        .alternative(args.alternative)
        .bf_type(args.bf_type.into())
        .interpret(!args.no_interpretation)
        .include_classical(!args.no_classical)
        .show_progress(show_progress);

    let total_draws = (config.sampler.n_chains * config.sampler.n_samples) as u64;
    let progress_bar = if show_progress {
        let bar = ProgressBar::new(total_draws);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
                .map_err(|e| e.to_string())?
                .progress_chars("=>-"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message(format!("sampling {}", family.parameter_symbol()));
        bar
    } else {
        ProgressBar::hidden()
    };

    let tick = |n: u64| progress_bar.inc(n);
    let test = RankTest::new(family).config(config.clone());
    let result = test.run_with_progress(&input, Some(&tick));
    progress_bar.finish_and_clear();

    let report = result.map_err(|e| e.to_string())?;
    match args.format {
        Format::Text => println!("{}", format_report(&report, config.bf_type)),
        Format::Json => println!("{}", to_json_pretty(&report).map_err(|e| e.to_string())?),
    }
    Ok(())
}

fn run_classical(args: ClassicalArgs) -> Result<(), String> {
    let shape = if args.independent {
        Shape::Independent
    } else {
        Shape::PairedOrOne
    };
    let input = load_input(&args.input, shape)?;
    let results =
        classical_tests(&input, args.test_value, args.alternative).map_err(|e| e.to_string())?;

    match args.format {
        Format::Text => println!("{}", format_classical(&results)),
        Format::Json => println!("{}", to_json_pretty(&results).map_err(|e| e.to_string())?),
    }
    Ok(())
}

/// Read x and y from whichever source was given and shape them for the test.
fn load_input(args: &InputArgs, shape: Shape) -> Result<SampleInput, String> {
    let (x, y) = if let Some(path) = &args.csv {
        if args.x_items.is_empty() {
            return Err("--csv needs --x-items".to_string());
        }
        let scale = LikertScale::new(args.scale_min, args.scale_max);
        if scale.min >= scale.max {
            return Err(format!("Likert scale {} is empty", scale));
        }
        let table = load_likert_csv(path, scale).map_err(|e| e.to_string())?;
        tracing::info!(
            source = %path.display(),
            rows = table.n_rows(),
            columns = table.headers().len(),
            "loaded Likert table"
        );

        if args.y_items.is_empty() {
            let x = table.composite(&args.x_items).map_err(|e| e.to_string())?;
            (x.into_iter().flatten().collect(), None)
        } else if shape == Shape::Independent {
            let x = table.composite(&args.x_items).map_err(|e| e.to_string())?;
            let y = table.composite(&args.y_items).map_err(|e| e.to_string())?;
            (
                x.into_iter().flatten().collect(),
                Some(y.into_iter().flatten().collect()),
            )
        } else {
            let pairs = table
                .paired(&args.x_items, &args.y_items)
                .map_err(|e| e.to_string())?;
            (pairs.x().to_vec(), Some(pairs.y().to_vec()))
        }
    } else if let (Some(x_path), Some(y_path)) = (&args.x_file, &args.y_file) {
        if shape == Shape::Independent {
            let x = load_single_column_file(x_path).map_err(|e| e.to_string())?;
            let y = load_single_column_file(y_path).map_err(|e| e.to_string())?;
            (x, Some(y))
        } else {
            let pairs = load_separate_files(x_path, y_path).map_err(|e| e.to_string())?;
            (pairs.x().to_vec(), Some(pairs.y().to_vec()))
        }
    } else if let Some(x_path) = &args.x_file {
        (
            load_single_column_file(x_path).map_err(|e| e.to_string())?,
            None,
        )
    } else if let Some(x_text) = &args.x {
        let x = parse_values(x_text).map_err(|e| e.to_string())?;
        let y = args
            .y
            .as_deref()
            .map(parse_values)
            .transpose()
            .map_err(|e| e.to_string())?;
        (x, y)
    } else {
        return Err("no input given; use --x/--y, --csv or --x-file/--y-file".to_string());
    };

    let input = match (shape, y) {
        (Shape::Independent, Some(y)) => IndependentSamples::new(x, y).map(SampleInput::from),
        (Shape::Independent, None) => return Err("rank-sum test needs a second group".to_string()),
        (Shape::Paired, Some(y)) | (Shape::PairedOrOne, Some(y)) => {
            PairedSample::new(x, y).map(SampleInput::from)
        }
        (Shape::Paired, None) => return Err("Spearman correlation needs paired x and y".to_string()),
        (Shape::PairedOrOne, None) => OneSample::new(x).map(SampleInput::from),
    };
    input.map_err(|e| e.to_string())
}
