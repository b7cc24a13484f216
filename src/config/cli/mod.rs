//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! vigilar init ./artifacts
//! vigilar check
//! vigilar monitor --interval-ms 1000 --cycles 10 --seed 42
//! vigilar predict "Torque [Nm]=240" "Tool Wear [min]=590" ...
//! vigilar --config monitor.yaml serve --address 0.0.0.0:5000
//! ```

mod args;
mod types;


pub use args::{
    apply_overrides, parse_args, parse_key_value, CheckArgs, Cli, Command, InitArgs, MonitorArgs,
    PredictArgs, ServeArgs,
};
pub use types::OutputFormat;
