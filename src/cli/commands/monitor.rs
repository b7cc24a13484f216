//! Monitor command implementation

use super::build_pipeline;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{MonitorArgs, MonitorConfig, OutputFormat};
use crate::monitor::{ConsoleSink, LoopControl, MonitoringLoop};

pub fn run_monitor(
    config: &MonitorConfig,
    args: MonitorArgs,
    level: LogLevel,
) -> Result<(), String> {
    let pipeline = build_pipeline(config)?;
    let text = args.format == OutputFormat::Text;
    let level = if text { level } else { LogLevel::Quiet };

    log(level, LogLevel::Normal, &format!("Monitoring every {} ms", config.monitor.interval_ms));
    if let Some(max) = config.monitor.max_cycles {
        log(level, LogLevel::Verbose, &format!("  Stopping after {max} cycles"));
    }
    if let Some(seed) = config.monitor.seed {
        log(level, LogLevel::Verbose, &format!("  Sensor seed: {seed}"));
    }

    let control = match config.monitor.max_cycles {
        Some(max) => LoopControl::new().with_max_cycles(max),
        None => LoopControl::new(),
    };

    let mut monitor = MonitoringLoop::new(
        pipeline,
        config.monitor.sensor(),
        ConsoleSink::stdout(args.format.into()),
    )
    .with_interval(config.monitor.interval());
    let summary = monitor.run(&control);

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Monitoring finished: {} cycles, {} failures predicted, {} skipped",
            summary.cycles, summary.failures, summary.skipped
        ),
    );
    Ok(())
}
