use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use clap::Parser;
use futures::future::join_all;
use serde::Serialize;
use tower::ServiceExt;
use tracing::{error, Level};

use leafscan::pipeline::services::formatter;
use leafscan::{
    AnalysisConfig, AnalysisError, AnalysisReport, DiagnosisResult, PlantHealthAnalyzer,
    PlantHealthReportService, PlantHealthService,
};

/// Diagnose plant-leaf health from images
#[derive(Parser, Debug)]
#[command(name = "leafscan", version, about)]
struct Cli {
    /// Image files to analyze
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Configuration file (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print full reports as JSON
    #[arg(long)]
    json: bool,

    /// Run the feature extractors in parallel
    #[arg(long)]
    parallel: bool,

    /// Override the clustering seed
    #[arg(long)]
    seed: Option<u64>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct FileOutcome {
    path: String,
    result: DiagnosisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<AnalysisReport>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn analyze_file(
    path: PathBuf,
    analyzer: Arc<PlantHealthAnalyzer>,
    with_report: bool,
) -> Option<FileOutcome> {
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };
    let payload = STANDARD.encode(bytes);
    let display = path.display().to_string();

    let (result, report) = if with_report {
        match PlantHealthReportService::new(analyzer).oneshot(payload).await {
            Ok(report) => (report.result(), Some(report)),
            Err(err) => (formatter::format_error(&err), None),
        }
    } else {
        match PlantHealthService::new(analyzer).oneshot(payload).await {
            Ok(result) => (result, None),
            Err(err) => (formatter::format_error(&err), None),
        }
    };

    Some(FileOutcome {
        path: display,
        result,
        report,
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode, AnalysisError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AnalysisConfig::load(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if cli.parallel {
        config = config.with_parallel_extraction(true);
    }
    let analyzer = Arc::new(PlantHealthAnalyzer::new(config)?);

    let requested = cli.images.len();
    let outcomes: Vec<FileOutcome> = join_all(
        cli.images
            .into_iter()
            .map(|path| analyze_file(path, analyzer.clone(), cli.json)),
    )
    .await
    .into_iter()
    .flatten()
    .collect();

    if cli.json {
        let rendered = serde_json::to_string_pretty(&outcomes)
            .map_err(|e| AnalysisError::processing(format!("failed to render JSON: {e}")))?;
        println!("{rendered}");
    } else {
        for outcome in &outcomes {
            println!("{}", outcome.path);
            println!("  disease: {}", outcome.result.disease);
            println!("  recommendations: {}", outcome.result.recommendations);
        }
    }

    if outcomes.len() == requested {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
