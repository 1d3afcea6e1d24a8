mod api;
mod server;

use ads_metrics::{
    config::default_config_path, diagnose, format_figure, format_percent, CalculatorId,
    MetricsConfig, MetricsError, ModuleId,
};
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Number, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::api::{ApiDiagnoseRequest, ApiDiagnoseResponse};

#[derive(Parser)]
#[command(name = "ads-metrics", about = "Ad campaign metrics calculators and diagnosis")]
struct Cli {
    /// TOML file with calculator constants and diagnosis thresholds.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate the diagnosis rules against a campaign snapshot.
    Diagnose(DiagnoseArgs),
    /// Run a single calculator by tab id.
    Calc(CalcArgs),
    /// List modules and their calculators.
    List,
    #[command(subcommand)]
    Config(ConfigCommand),
    Serve(ServeArgs),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write the default configuration to disk.
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct DiagnoseArgs {
    #[arg(long)]
    roas: Option<f64>,
    #[arg(long)]
    target_roas: Option<f64>,
    #[arg(long)]
    cpa: Option<f64>,
    #[arg(long)]
    target_cpa: Option<f64>,
    #[arg(long)]
    budget: Option<f64>,
    #[arg(long)]
    spent: Option<f64>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct CalcArgs {
    tab: String,
    /// Input override as `field=value`; repeatable.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
    #[arg(long, default_value = "web")]
    web_root: String,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), MetricsError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or(Command::Diagnose(DiagnoseArgs::default()));

    if let Command::Config(ConfigCommand::Init { path }) = &command {
        return run_config_init(path.clone().or(cli.config));
    }

    let (config, config_path) = MetricsConfig::load(cli.config)?;
    match config_path {
        Some(path) if path.exists() => tracing::debug!(path = %path.display(), "loaded config"),
        _ => tracing::debug!("using built-in defaults"),
    }

    match command {
        Command::Diagnose(args) => run_diagnose(args, &config),
        Command::Calc(args) => run_calc(args, &config),
        Command::List => {
            run_list();
            Ok(())
        }
        Command::Serve(args) => server::serve(args, config).await,
        Command::Config(_) => Ok(()),
    }
}

fn run_diagnose(args: DiagnoseArgs, config: &MetricsConfig) -> Result<(), MetricsError> {
    let request = ApiDiagnoseRequest {
        roas: args.roas,
        target_roas: args.target_roas,
        cpa: args.cpa,
        target_cpa: args.target_cpa,
        budget: args.budget,
        spent: args.spent,
    };
    let diagnosis = diagnose(&request.into_snapshot(), &config.diagnosis);

    if args.json {
        let response = ApiDiagnoseResponse::from_diagnosis(diagnosis);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!(
        "ROAS gap: {} | CPA gap: {} | Spend rate: {}",
        format_percent(diagnosis.gaps.roas_gap_pct),
        format_percent(diagnosis.gaps.cpa_gap_pct),
        format_percent(diagnosis.gaps.spend_rate_pct)
    );
    for recommendation in &diagnosis.recommendations {
        println!(
            "\n[{:?}] {}\n  {}\n  -> {} ({}/{})",
            recommendation.severity,
            recommendation.title,
            recommendation.description,
            recommendation.action_label,
            recommendation.target_module.id(),
            recommendation.target_tab.tab()
        );
    }
    Ok(())
}

fn run_calc(args: CalcArgs, config: &MetricsConfig) -> Result<(), MetricsError> {
    let id = CalculatorId::from_tab(&args.tab)
        .ok_or_else(|| MetricsError::UnknownCalculator(args.tab.clone()))?;
    let fields = parse_overrides(id, &args.set)?;
    let result = ads_metrics::compute(id, fields, config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{} ({})", id.title(), id.module().label());
    for figure in &result.figures {
        println!("  {}: {}", figure.label, format_figure(figure.value, figure.unit));
    }
    if let Some(classification) = result.classification {
        println!("Status: {}", classification.label());
    }
    if let Some(subtext) = result.subtext {
        println!("{}", subtext);
    }
    Ok(())
}

fn parse_overrides(id: CalculatorId, pairs: &[String]) -> Result<Value, MetricsError> {
    let mut fields = Map::new();
    for pair in pairs {
        let (key, raw) = pair.split_once('=').ok_or_else(|| {
            MetricsError::invalid_input(id.tab(), format!("expected field=value, got {}", pair))
        })?;
        let number = raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .ok_or_else(|| {
                MetricsError::invalid_input(id.tab(), format!("{} is not a number: {}", key, raw))
            })?;
        fields.insert(key.trim().to_string(), Value::Number(number));
    }
    Ok(Value::Object(fields))
}

fn run_list() {
    for module in ModuleId::ALL {
        let tabs: Vec<CalculatorId> = module.calculators().collect();
        if tabs.is_empty() {
            continue;
        }
        println!("{} ({})", module.label(), module.id());
        for id in tabs {
            println!("  {:<12} {}", id.tab(), id.title());
        }
    }
}

fn run_config_init(path: Option<PathBuf>) -> Result<(), MetricsError> {
    let path = path
        .or_else(default_config_path)
        .unwrap_or_else(|| PathBuf::from("config/metrics.toml"));
    MetricsConfig::default().write(&path)?;
    tracing::info!(path = %path.display(), "wrote default config");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
