use std::path::PathBuf;
use std::time::Duration;

use super::sim_error::SimError;
use super::{DEFAULT_FLEET_SIZE, DEFAULT_WORKERS, TICK_FREQUENCY_MILLIS};

/// Shortest tick interval accepted, in milliseconds.
pub const MIN_TICK_MILLIS: u64 = 1;
/// Longest tick interval accepted, in milliseconds.
pub const MAX_TICK_MILLIS: u64 = 60_000;

/// Settings the simulation is started with.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub fleet_size: usize,
    pub tick_interval: Duration,
    pub workers: usize,
    /// Seed for every random draw. `None` seeds from system entropy.
    pub seed: Option<u64>,
    /// Directory for the simulation log. `None` disables logging.
    pub log_dir: Option<PathBuf>,
    /// Echo every log line to the console in color. Needs `log_dir`.
    pub log_console: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            fleet_size: DEFAULT_FLEET_SIZE,
            tick_interval: Duration::from_millis(TICK_FREQUENCY_MILLIS),
            workers: DEFAULT_WORKERS,
            seed: None,
            log_dir: None,
            log_console: false,
        }
    }
}

impl SimConfig {
    /// Builds a configuration from command line flags (program name excluded).
    ///
    /// # Usage
    ///
    /// ```sh
    /// simulator [--fleet-size N] [--tick-ms N] [--workers N] [--seed N] [--log-dir PATH] [--log-console]
    /// ```
    pub fn from_args<I, S>(args: I) -> Result<Self, SimError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = SimConfig::default();
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            let flag = flag.as_ref().to_string();
            if flag == "--log-console" {
                config.log_console = true;
                continue;
            }

            let value = args
                .next()
                .map(|v| v.as_ref().to_string())
                .ok_or_else(|| SimError::InvalidArgument(format!("Missing value for {}", flag)))?;

            match flag.as_str() {
                "--fleet-size" => config.fleet_size = parse_positive(&flag, &value)? as usize,
                "--tick-ms" => config.tick_interval = tick_interval(parse_positive(&flag, &value)?)?,
                "--workers" => config.workers = parse_positive(&flag, &value)? as usize,
                "--seed" => {
                    config.seed = Some(value.parse().map_err(|_| {
                        SimError::InvalidArgument(format!("{} expects a number, got {}", flag, value))
                    })?)
                }
                "--log-dir" => config.log_dir = Some(PathBuf::from(value)),
                _ => return Err(SimError::InvalidArgument(format!("Unknown flag {}", flag))),
            }
        }

        if config.log_console && config.log_dir.is_none() {
            return Err(SimError::InvalidArgument(
                "--log-console requires --log-dir".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Validates a tick interval given in milliseconds.
pub fn tick_interval(millis: u64) -> Result<Duration, SimError> {
    if !(MIN_TICK_MILLIS..=MAX_TICK_MILLIS).contains(&millis) {
        return Err(SimError::InvalidDuration(millis.to_string()));
    }
    Ok(Duration::from_millis(millis))
}

fn parse_positive(flag: &str, value: &str) -> Result<u64, SimError> {
    match value.parse::<u64>() {
        Ok(0) => Err(SimError::InvalidArgument(format!(
            "{} must be greater than zero",
            flag
        ))),
        Ok(number) => Ok(number),
        Err(_) => Err(SimError::InvalidArgument(format!(
            "{} expects a number, got {}",
            flag, value
        ))),
    }
}
