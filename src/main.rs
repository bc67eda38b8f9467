use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::PathBuf;
use supplier_topsis::io::catalog::{
    generate_synthetic_catalog, load_catalog, write_catalog, SyntheticCatalog,
};
use supplier_topsis::io::reporting::{write_allocation_report, AllocationReport};
use supplier_topsis::{CsvRunRecorder, Optimizer, OptimizerConfig, TieBreak, WeightVector};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TieBreakArg {
    InputOrder,
    Price,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::InputOrder => TieBreak::InputOrder,
            TieBreakArg::Price => TieBreak::LowestPrice,
        }
    }
}

/// Rank suppliers with TOPSIS and allocate demand greedily by score.
#[derive(Debug, Parser)]
#[command(name = "supplier-topsis", version)]
struct Cli {
    /// Supplier catalog CSV (id,name,price,quality,time,capacity)
    #[arg(long, conflicts_with = "synthetic")]
    catalog: Option<PathBuf>,

    /// Generate a random catalog of this many suppliers instead of reading one
    #[arg(long)]
    synthetic: Option<usize>,

    /// Seed for the synthetic catalog
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Save the catalog snapshot used for this run
    #[arg(long)]
    save_catalog: Option<PathBuf>,

    /// Total units to allocate
    #[arg(long, allow_negative_numbers = true)]
    demand: Option<i64>,

    /// Minimum acceptable weighted average score
    #[arg(long)]
    min_score: Option<f64>,

    /// Weights as price,quality,time fractions
    #[arg(long, value_delimiter = ',', num_args = 3, allow_negative_numbers = true)]
    weights: Option<Vec<f64>>,

    /// Weights as price,quality,time whole percentages
    #[arg(long, value_delimiter = ',', num_args = 3, conflicts_with = "weights")]
    weight_percent: Option<Vec<u32>>,

    #[arg(long, value_enum, default_value_t = TieBreakArg::InputOrder)]
    tie_break: TieBreakArg,

    /// Record the run into this history directory
    #[arg(long)]
    history: Option<PathBuf>,

    /// Write the allocation table to this CSV file
    #[arg(long)]
    report: Option<PathBuf>,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> OptimizerConfig {
        let defaults = OptimizerConfig::default();
        let weights = match (&self.weights, &self.weight_percent) {
            (Some(w), _) => WeightVector::new(w[0], w[1], w[2]),
            (None, Some(p)) => WeightVector::from_percentages(p[0], p[1], p[2]),
            (None, None) => defaults.weights,
        };

        OptimizerConfig {
            total_demand: self.demand.unwrap_or(defaults.total_demand),
            min_avg_score: self.min_score.unwrap_or(defaults.min_avg_score),
            weights,
            tie_break: self.tie_break.into(),
        }
    }
}

fn init_logging(level: LevelFilter, log_file: Option<&PathBuf>) -> Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file '{}'", path.display()))?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_file.as_ref())?;

    // 1. SETUP CONFIGURATION
    let config = cli.config();
    let request = config.request();

    // 2. TAKE THE CATALOG SNAPSHOT
    // Read once; the optimizer never goes back to the source.
    let suppliers = match &cli.catalog {
        Some(path) => load_catalog(path)
            .with_context(|| format!("loading catalog '{}'", path.display()))?,
        None => {
            let count = cli.synthetic.unwrap_or(8);
            info!("generating {count} synthetic suppliers (seed {})", cli.seed);
            let mut rng = StdRng::seed_from_u64(cli.seed);
            generate_synthetic_catalog(count, &SyntheticCatalog::default(), &mut rng)?
        }
    };
    if let Some(path) = &cli.save_catalog {
        write_catalog(path, &suppliers)
            .with_context(|| format!("saving catalog to '{}'", path.display()))?;
    }

    // 3. OPTIMIZE (AND RECORD)
    let optimizer = Optimizer::from_config(&config);
    let (outcome, recorded) = match &cli.history {
        Some(dir) => {
            let mut recorder = CsvRunRecorder::open(dir)
                .with_context(|| format!("opening history '{}'", dir.display()))?;
            let recorded = optimizer.optimize_and_record(&suppliers, &request, &mut recorder)?;
            (recorded.outcome, Some(recorded.run_id))
        }
        None => (optimizer.optimize(&suppliers, &request)?, None),
    };

    // 4. REPORT
    println!("{}", AllocationReport::new(&outcome, &request));
    if let Some(path) = &cli.report {
        let demand = u64::try_from(request.total_demand).unwrap_or(0);
        write_allocation_report(path, &outcome.results, demand)
            .with_context(|| format!("writing report '{}'", path.display()))?;
    }

    match recorded {
        Some(Ok(id)) => println!("\nRecorded as run {id}."),
        Some(Err(e)) => bail!("allocation computed but not recorded: {e}"),
        None => {}
    }
    Ok(())
}
