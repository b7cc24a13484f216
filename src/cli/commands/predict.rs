//! Predict command implementation

use super::build_pipeline;
use crate::cli::LogLevel;
use crate::config::{MonitorConfig, OutputFormat, PredictArgs};
use crate::monitor::render_diagnosis;
use crate::schema::Reading;

pub fn run_predict(
    config: &MonitorConfig,
    args: PredictArgs,
    level: LogLevel,
) -> Result<(), String> {
    let pipeline = build_pipeline(config)?;

    let reading =
        Reading::from_form(args.values, pipeline.schema()).map_err(|e| e.to_string())?;
    let diagnosis = pipeline.diagnose(&reading).map_err(|e| e.to_string())?;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&diagnosis)
                .map_err(|e| format!("Failed to serialize diagnosis: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Text if level == LogLevel::Quiet => println!("{}", diagnosis.verdict),
        OutputFormat::Text => print!("{}", render_diagnosis(&diagnosis)),
    }
    Ok(())
}
