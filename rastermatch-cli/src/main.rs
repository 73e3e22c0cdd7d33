use clap::Parser;
use rastermatch::io::{load_gray_raster, save_gray_raster};
use rastermatch::{
    Candidate, EdgePolicy, MatchConfig, MatchResult, Matcher, ScoreFormula, SpreadMode,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "rastermatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum FormulaConfig {
    Reference,
    Ncc,
}

impl From<FormulaConfig> for ScoreFormula {
    fn from(value: FormulaConfig) -> Self {
        match value {
            FormulaConfig::Reference => ScoreFormula::Reference,
            FormulaConfig::Ncc => ScoreFormula::Ncc,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SpreadConfig {
    Reference,
    Corrected,
}

impl From<SpreadConfig> for SpreadMode {
    fn from(value: SpreadConfig) -> Self {
        match value {
            SpreadConfig::Reference => SpreadMode::Reference,
            SpreadConfig::Corrected => SpreadMode::Corrected,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum EdgeConfig {
    Exclusive,
    Inclusive,
}

impl From<EdgeConfig> for EdgePolicy {
    fn from(value: EdgeConfig) -> Self {
        match value {
            EdgeConfig::Exclusive => EdgePolicy::Exclusive,
            EdgeConfig::Inclusive => EdgePolicy::Inclusive,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MatchConfigJson {
    formula: FormulaConfig,
    spread: SpreadConfig,
    edge: EdgeConfig,
    min_score: f64,
    min_spread: f64,
    parallel: bool,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            formula: FormulaConfig::Reference,
            spread: SpreadConfig::Reference,
            edge: EdgeConfig::Exclusive,
            min_score: cfg.min_score,
            min_spread: cfg.min_spread,
            parallel: cfg.parallel,
        }
    }
}

impl From<MatchConfigJson> for MatchConfig {
    fn from(value: MatchConfigJson) -> Self {
        Self {
            formula: value.formula.into(),
            spread: value.spread.into(),
            edge: value.edge.into(),
            min_score: value.min_score,
            min_spread: value.min_spread,
            parallel: value.parallel,
            ..MatchConfig::default()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    source_path: String,
    pattern_path: String,
    output_path: Option<String>,
    window_path: Option<String>,
    topk: usize,
    nms_radius: usize,
    #[serde(rename = "match")]
    match_cfg: MatchConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_path: String::new(),
            pattern_path: String::new(),
            output_path: None,
            window_path: None,
            topk: 1,
            nms_radius: 0,
            match_cfg: MatchConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CandidateRecord {
    x: usize,
    y: usize,
    score: f64,
}

impl From<Candidate> for CandidateRecord {
    fn from(value: Candidate) -> Self {
        Self {
            x: value.x,
            y: value.y,
            score: value.score,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    found: bool,
    best: Option<CandidateRecord>,
    evaluated: usize,
    skipped: usize,
    topk: Vec<CandidateRecord>,
}

impl Output {
    fn new(result: &MatchResult<u8>, topk: Vec<Candidate>) -> Self {
        Self {
            found: result.found,
            best: result.candidate().map(CandidateRecord::from),
            evaluated: result.evaluated,
            skipped: result.skipped,
            topk: topk.into_iter().map(CandidateRecord::from).collect(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("rastermatch=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.source_path.is_empty() || config.pattern_path.is_empty() {
        return Err("source_path and pattern_path must be set in the config".into());
    }

    let source = load_gray_raster(&config.source_path)?;
    let pattern = load_gray_raster(&config.pattern_path)?;
    info!(
        source_width = source.width(),
        source_height = source.height(),
        pattern_width = pattern.width(),
        pattern_height = pattern.height(),
        "loaded rasters"
    );

    let matcher = Matcher::new(pattern.view())?.with_config(config.match_cfg.into());
    let result = matcher.match_source(source.view())?;
    let topk = if config.topk > 1 {
        matcher.match_topk(source.view(), config.topk, config.nms_radius)?
    } else {
        result.candidate().into_iter().collect()
    };

    if let (Some(path), Some(window)) = (&config.window_path, &result.window) {
        save_gray_raster(window, path)?;
        info!(path = %path, "saved best window");
    }

    let output = Output::new(&result, topk);
    let json = serde_json::to_string_pretty(&output)?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
