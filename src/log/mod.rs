//! The `log` module configures logging for the simulation engine and for programs built on it.
//! It (re)exports the five logging macros: `error!`, `warn!`, `info!`, `debug!` and `trace!`.
//!
//! ```rust
//! use outbreak::log::info;
//!
//! pub fn do_a_thing() {
//!     info!("A thing is being done.");
//! }
//! ```
//!
//! Logging is _disabled_ by default. It can be enabled and tuned from code:
//!
//!  - `enable_logging()`: turns on all log messages
//!  - `disable_logging()`: turns off all log messages
//!  - `set_log_level(level: LevelFilter)`: enables only log messages with priority at least `level`
//!  - `set_module_filter()` / `set_module_filters()` / `remove_module_filter()`: per-module levels
//!  - `set_log_spec("info,outbreak::timer=trace")`: all of the above from one string, as accepted
//!    by the `--log-level` command line option
//!
//! ```rust
//! use outbreak::log::{set_log_level, set_module_filter, LevelFilter};
//!
//! pub fn setup_logging() {
//!     // Enable `info` log messages globally.
//!     set_log_level(LevelFilter::Info);
//!     // Trace every timer the simulation schedules and fires.
//!     set_module_filter("outbreak::timer", LevelFilter::Trace);
//! }
//! ```
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(not(feature = "logging"))]
mod null_logger;

use std::collections::hash_map::Entry;
use std::str::FromStr;
use std::sync::{LazyLock, Mutex, MutexGuard};

pub use log::{debug, error, info, trace, warn, LevelFilter};

use crate::error::OutbreakError;
use crate::hashing::HashMap;

// Logging disabled
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Off;

/// A global instance of the logging configuration.
static LOG_CONFIGURATION: LazyLock<Mutex<LogConfiguration>> = LazyLock::new(Mutex::default);

/// A log level filter for the messages emitted under one module path (e.g.
/// `"outbreak::collision"`).
#[derive(Debug, PartialEq)]
struct ModuleLogConfiguration {
    module: String,
    level: LevelFilter,
}

impl From<(&str, LevelFilter)> for ModuleLogConfiguration {
    fn from((module, level): (&str, LevelFilter)) -> Self {
        Self {
            module: module.to_string(),
            level,
        }
    }
}

/// Holds the global level, the per-module levels and, with the `logging` feature, the handle to
/// the installed logger. Only one instance exists; the public API are free functions which
/// fetch it and call the appropriate member function.
#[derive(Debug)]
pub(in crate::log) struct LogConfiguration {
    /// Level for modules without their own filter. `LevelFilter::Off` disables logging.
    pub(in crate::log) global_log_level: LevelFilter,
    pub(in crate::log) module_configurations: HashMap<String, ModuleLogConfiguration>,

    #[cfg(feature = "logging")]
    root_handle: Option<log4rs::Handle>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        Self {
            global_log_level: DEFAULT_LOG_LEVEL,
            module_configurations: HashMap::default(),

            #[cfg(feature = "logging")]
            root_handle: None,
        }
    }
}

impl LogConfiguration {
    fn set_log_level(&mut self, level: LevelFilter) {
        self.global_log_level = level;
        self.set_config();
    }

    /// Returns true if the configuration was mutated, false otherwise.
    fn insert_module_filter(&mut self, module: &str, level: LevelFilter) -> bool {
        match self.module_configurations.entry(module.to_string()) {
            Entry::Occupied(mut entry) => {
                if entry.get().level == level {
                    return false;
                }
                entry.get_mut().level = level;
            }
            Entry::Vacant(entry) => {
                entry.insert((module, level).into());
            }
        }
        true
    }

    fn set_module_filters(&mut self, module_filters: &[(&str, LevelFilter)]) {
        let mut mutated = false;
        for (module, level) in module_filters {
            mutated |= self.insert_module_filter(module, *level);
        }
        if mutated {
            self.set_config();
        }
    }

    fn remove_module_filter(&mut self, module: &str) {
        if self.module_configurations.remove(module).is_some() {
            self.set_config();
        }
    }
}

/// A parsed `--log-level` string: an optional bare global level plus `module=level` pairs,
/// separated by commas.
#[derive(Debug, PartialEq)]
pub struct LogSpec {
    pub global: Option<LevelFilter>,
    pub modules: Vec<(String, LevelFilter)>,
}

impl FromStr for LogSpec {
    type Err = OutbreakError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        fn level(text: &str) -> Result<LevelFilter, OutbreakError> {
            LevelFilter::from_str(text.trim()).map_err(|_| {
                OutbreakError::InvalidParameter(format!("unknown log level `{}`", text.trim()))
            })
        }

        let mut parsed = LogSpec {
            global: None,
            modules: Vec::new(),
        };
        for directive in spec.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.split_once('=') {
                Some((module, lvl)) => parsed.modules.push((module.trim().to_string(), level(lvl)?)),
                None => parsed.global = Some(level(directive)?),
            }
        }
        Ok(parsed)
    }
}

// The public API

/// Enables the logger with no global level filter / full logging. Equivalent to
/// `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Disables logging completely. Equivalent to `set_log_level(LevelFilter::Off)`.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the global log level. A global filter level of `LevelFilter::Off` disables logging.
pub fn set_log_level(level: LevelFilter) {
    get_log_configuration().set_log_level(level);
}

/// Sets a level filter for the given module path.
pub fn set_module_filter(module_path: &str, level_filter: LevelFilter) {
    get_log_configuration().set_module_filters(&[(module_path, level_filter)]);
}

/// Removes a module-specific level filter for the given module path. The global level filter will
/// apply to the module.
pub fn remove_module_filter(module_path: &str) {
    get_log_configuration().remove_module_filter(module_path);
}

/// Sets the level filters for a set of modules in one go.
pub fn set_module_filters(module_filters: &[(&str, LevelFilter)]) {
    get_log_configuration().set_module_filters(module_filters);
}

/// Applies a spec such as `"info,outbreak::collision=trace"`. A spec with only module filters
/// turns the global level up to `Error` if logging was off, so the module messages have a logger
/// to go to.
///
/// # Errors
/// `OutbreakError::InvalidParameter` if a level name is not recognised.
pub fn set_log_spec(spec: &str) -> Result<(), OutbreakError> {
    let spec: LogSpec = spec.parse()?;
    let mut config = get_log_configuration();
    let modules: Vec<(&str, LevelFilter)> = spec
        .modules
        .iter()
        .map(|(module, level)| (module.as_str(), *level))
        .collect();
    for (module, level) in &modules {
        config.insert_module_filter(module, *level);
    }
    let global = match spec.global {
        Some(level) => level,
        None if config.global_log_level == LevelFilter::Off && !modules.is_empty() => {
            LevelFilter::Error
        }
        None => config.global_log_level,
    };
    config.set_log_level(global);
    Ok(())
}

/// Fetches a mutable reference to the global `LogConfiguration`.
fn get_log_configuration() -> MutexGuard<'static, LogConfiguration> {
    LOG_CONFIGURATION.lock().expect("Mutex poisoned")
}
