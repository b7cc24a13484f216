//! Check command implementation

use serde::Serialize;

use crate::artifacts::{load_artifacts, TrainedArtifacts};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{CheckArgs, MonitorConfig, OutputFormat};
use crate::schema::FeatureKind;

/// Summary of a loaded artifact set
#[derive(Debug, Serialize)]
pub struct ArtifactReport {
    pub dir: String,
    pub classifier: String,
    pub features: Vec<String>,
    pub categorical: Vec<String>,
    pub status_labels: Vec<String>,
    pub failure_types: Vec<String>,
    pub decoder_conflicts: Vec<usize>,
}

impl ArtifactReport {
    fn new(dir: String, artifacts: &TrainedArtifacts) -> Self {
        let schema = artifacts.schema();
        Self {
            dir,
            classifier: artifacts.classifier().describe(),
            features: schema.names().map(str::to_string).collect(),
            categorical: schema
                .features()
                .iter()
                .filter(|f| matches!(f.kind, FeatureKind::Categorical(_)))
                .map(|f| f.name.clone())
                .collect(),
            status_labels: artifacts.status_decoder().labels().to_vec(),
            failure_types: artifacts.failure_type_decoder().labels().to_vec(),
            decoder_conflicts: artifacts.decoder_conflicts(),
        }
    }
}

/// Format the report for the terminal
pub fn format_report(report: &ArtifactReport) -> String {
    let mut lines = vec![
        format!("✓ Artifacts loaded from {}", report.dir),
        format!("  Classifier: {}", report.classifier),
        format!("  Features ({}):", report.features.len()),
    ];
    for name in &report.features {
        let marker = if report.categorical.contains(name) { " (categorical)" } else { "" };
        lines.push(format!("    - {name}{marker}"));
    }
    lines.push(format!("  Failure types: {}", report.failure_types.join(", ")));
    if !report.decoder_conflicts.is_empty() {
        lines.push(format!(
            "  ⚠ Status and failure-type decoders disagree for class ids {:?}",
            report.decoder_conflicts
        ));
    }
    lines.join("\n")
}

pub fn run_check(config: &MonitorConfig, args: CheckArgs, level: LogLevel) -> Result<(), String> {
    let artifacts = load_artifacts(
        &config.artifacts.dir,
        &config.artifacts.files,
        &config.pipeline.decoder_policy(),
    )
    .map_err(|e| e.to_string())?;

    let report = ArtifactReport::new(config.artifacts.dir.display().to_string(), &artifacts);
    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| format!("Failed to serialize report: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Text => log(level, LogLevel::Normal, &format_report(&report)),
    }
    Ok(())
}
