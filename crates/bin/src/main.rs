//! Hobart CLI binary.
//!
//! Scores a universe on six factors, ranks it by weighted composite score, and
//! serves the same operations over HTTP.

mod integration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use hobart::{FactorSnapshot, FactorWeights, RankingEngine};
use hobart_factors::{FactorId, SignalProvider};
use hobart_output::{
    ExportFormat, Exporter, RankedSecurity, RankingReport, RankingTable, ReportBuilder,
    factor_scores_ascii_table,
};
use integration::inputs::{InputPaths, build_engine};
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "hobart=info,tower_http=info";

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: sector-neutral multi-factor equity ranking", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    inputs: InputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Precomputed signal snapshot (CSV or JSON)
    #[arg(long, global = true, conflicts_with = "records")]
    signals: Option<PathBuf>,

    /// Company records to derive signals from (JSON)
    #[arg(long, global = true)]
    records: Option<PathBuf>,

    /// Benchmark closes for beta estimation (JSON, used with --records)
    #[arg(long, global = true, requires = "records")]
    benchmark: Option<PathBuf>,

    /// Reference universe list (CSV); defaults to every input symbol
    #[arg(long, global = true)]
    universe: Option<PathBuf>,

    /// Engine configuration (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

impl From<InputArgs> for InputPaths {
    fn from(args: InputArgs) -> Self {
        Self {
            signals: args.signals,
            records: args.records,
            benchmark: args.benchmark,
            universe: args.universe,
            config: args.config,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show every factor's scores
    Factors {
        /// Output format
        #[arg(long, value_enum, default_value_t = FactorsFormat::Text)]
        format: FactorsFormat,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Rank the universe by weighted composite score
    Rank {
        #[command(flatten)]
        weights: WeightArgs,

        /// Show only the best N securities
        #[arg(long)]
        top: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = RankFormat::Text)]
        format: RankFormat,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also write a JSON run report
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show sector membership of the universe
    Universe {
        /// List members of one sector
        #[arg(long)]
        sector: Option<String>,
    },

    /// Serve the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: String,
    },
}

/// Per-factor weight overrides. Unset factors keep the configured weight.
#[derive(Args)]
struct WeightArgs {
    /// Value factor weight
    #[arg(long)]
    value: Option<f64>,
    /// Size factor weight
    #[arg(long)]
    size: Option<f64>,
    /// Momentum factor weight
    #[arg(long)]
    momentum: Option<f64>,
    /// Low-volatility factor weight
    #[arg(long)]
    lowvol: Option<f64>,
    /// Quality factor weight
    #[arg(long)]
    quality: Option<f64>,
    /// Market-risk factor weight
    #[arg(long)]
    market_risk: Option<f64>,
}

impl WeightArgs {
    fn apply(&self, mut weights: FactorWeights) -> FactorWeights {
        let overrides = [
            (FactorId::Value, self.value),
            (FactorId::Size, self.size),
            (FactorId::Momentum, self.momentum),
            (FactorId::LowVol, self.lowvol),
            (FactorId::Quality, self.quality),
            (FactorId::MarketRisk, self.market_risk),
        ];
        for (id, weight) in overrides {
            if let Some(weight) = weight {
                weights.set(id, weight);
            }
        }
        weights
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FactorsFormat {
    Text,
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
enum RankFormat {
    Text,
    Markdown,
    Json,
    Csv,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let engine = build_engine(&cli.inputs.into())?;

    match cli.command {
        Commands::Factors { format, output } => {
            show_factors(&engine, format, output.as_deref())?;
        }
        Commands::Rank {
            weights,
            top,
            format,
            output,
            report,
        } => {
            let weights = weights.apply(*engine.default_weights());
            rank_universe(&engine, &weights, top, format, output.as_deref(), report.as_deref())?;
        }
        Commands::Universe { sector } => {
            show_universe(&engine, sector.as_deref());
        }
        Commands::Serve { addr } => {
            integration::server::serve(engine, &addr).await?;
        }
    }

    Ok(())
}

fn emit(content: &str, output: Option<&Path>) -> std::io::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            info!(path = %path.display(), "output written");
        }
        None => println!("{content}"),
    }
    Ok(())
}

fn show_factors<P: SignalProvider>(
    engine: &RankingEngine<P>,
    format: FactorsFormat,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = engine.load_factor_scores();
    let content = match format {
        FactorsFormat::Text => factor_scores_ascii_table(&snapshot.rows()),
        FactorsFormat::Json => serde_json::to_string_pretty(&snapshot)?,
        FactorsFormat::Csv => snapshot.rows().export_to_string(ExportFormat::Csv)?,
    };
    emit(&content, output)?;
    Ok(())
}

fn rank_universe<P: SignalProvider>(
    engine: &RankingEngine<P>,
    weights: &FactorWeights,
    top: Option<usize>,
    format: RankFormat,
    output: Option<&Path>,
    report: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = engine.session();
    let mut ranking = session.rank_all(weights)?;
    if let Some(n) = top {
        ranking.truncate(n);
    }
    let rows = ranking.to_rows();

    let title = format!(
        "Composite ranking ({} of {} securities)",
        rows.len(),
        engine.universe().len()
    );
    let content = match format {
        RankFormat::Text => RankingTable::new(&title, &rows).to_ascii_table(),
        RankFormat::Markdown => RankingTable::new(&title, &rows).to_markdown(),
        RankFormat::Json => rows.export_to_string(ExportFormat::PrettyJson)?,
        RankFormat::Csv => rows.export_to_string(ExportFormat::Csv)?,
    };
    emit(&content, output)?;

    if let Some(path) = report {
        ranking_report(engine.universe().len(), weights, session.snapshot(), rows)?
            .write_json(path)?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

/// Run report recording the normalized weights the composite was built with.
fn ranking_report(
    universe_size: usize,
    weights: &FactorWeights,
    snapshot: &FactorSnapshot,
    rows: Vec<RankedSecurity>,
) -> Result<RankingReport, Box<dyn std::error::Error>> {
    let mut builder = ReportBuilder::new().universe_size(universe_size);
    for (id, weight) in weights.normalized()?.iter() {
        builder = builder
            .weight(id.name(), weight)
            .coverage(id.name(), snapshot.coverage(id));
    }
    Ok(builder.ranking(rows).build()?)
}

fn show_universe<P: SignalProvider>(engine: &RankingEngine<P>, sector: Option<&str>) {
    let universe = engine.universe();
    let groups = engine.sectors().groups(universe);

    match sector {
        Some(wanted) => {
            match groups
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
            {
                Some((name, members)) => {
                    println!("{} ({} securities)", name, members.len());
                    for symbol in members {
                        println!("  {}", symbol);
                    }
                }
                None => println!("No securities in sector '{}'", wanted),
            }
        }
        None => {
            println!("Universe: {} securities\n", universe.len());
            let mut classified = 0;
            for (name, members) in &groups {
                println!("  {:<32} {:>5}", name, members.len());
                classified += members.len();
            }
            let unknown = universe.len() - classified;
            if unknown > 0 {
                println!("  {:<32} {:>5}", "(unknown)", unknown);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["hobart", "--signals", "s.csv", "rank", "--momentum", "2"], Some(2.0))]
    #[case(&["hobart", "rank", "--signals", "s.csv"], None)]
    fn test_rank_weight_flags(#[case] argv: &[&str], #[case] momentum: Option<f64>) {
        let cli = Cli::try_parse_from(argv).unwrap();
        assert_eq!(cli.inputs.signals, Some(PathBuf::from("s.csv")));
        let Commands::Rank { weights, .. } = cli.command else {
            panic!("expected rank command");
        };
        assert_eq!(weights.momentum, momentum);

        let applied = weights.apply(FactorWeights::default());
        assert_eq!(applied.momentum, momentum.unwrap_or(0.2));
        assert_eq!(applied.value, 0.2);
    }

    #[rstest]
    #[case([2.0, 2.0, 0.0, 0.0, 0.0, 0.0], [0.5, 0.5, 0.0, 0.0, 0.0, 0.0])]
    #[case([0.0; 6], [1.0 / 6.0; 6])]
    fn test_report_records_normalized_weights(#[case] raw: [f64; 6], #[case] expected: [f64; 6]) {
        let mut weights = FactorWeights::default();
        for (id, w) in FactorId::ALL.into_iter().zip(raw) {
            weights.set(id, w);
        }
        let rows = RankedSecurity::from_pairs([("AAA", 1.0)]);

        let report = ranking_report(1, &weights, &FactorSnapshot::default(), rows).unwrap();

        let total: f64 = report.weights.values().sum();
        assert!((total - 1.0).abs() < 1e-12);
        for (id, want) in FactorId::ALL.into_iter().zip(expected) {
            assert!((report.weights[id.name()] - want).abs() < 1e-12);
        }
        assert_eq!(report.coverage[FactorId::Value.name()], 0);
    }

    #[test]
    fn test_market_risk_flag_name() {
        let cli = Cli::try_parse_from(["hobart", "rank", "--market-risk", "0.5"]).unwrap();
        let Commands::Rank { weights, .. } = cli.command else {
            panic!("expected rank command");
        };
        assert_eq!(weights.market_risk, Some(0.5));
    }

    #[test]
    fn test_signals_conflicts_with_records() {
        let result = Cli::try_parse_from([
            "hobart", "--signals", "a.csv", "--records", "b.json", "factors",
        ]);
        assert!(result.is_err());
    }
}
