/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("a logger is already installed")]
    AlreadyInstalled(#[from] log::SetLoggerError),

    #[error("could not open log file: {0}")]
    Io(#[from] std::io::Error),
}

/// Builder-style setup for logging
///
/// Nothing in this library installs a logger on its own. A host that wants to see
/// what the library has to say calls this once (directly, or through
/// `matcalc_init_logging`).
#[derive(Debug, Clone, Default)]
pub struct GlobalLogger {
    path: Option<PathBuf>,
    verbosity: Verbosity,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity { Quiet, Default, Loud }

impl Default for Verbosity {
    fn default() -> Self { Verbosity::Default }
}

impl GlobalLogger {
    /// Also log to a file (appending).
    pub fn path<P: AsRef<Path>>(&mut self, path: P) -> &mut Self
    { self.path = Some(path.as_ref().to_owned()); self }

    /// Negative is quiet, zero is the default, positive is loud.
    ///
    /// Any integer will be accepted.
    pub fn verbosity(&mut self, level: i32) -> &mut Self
    {
        self.verbosity = match level {
            l if l < 0 => Verbosity::Quiet,
            0 => Verbosity::Default,
            _ => Verbosity::Loud,
        };
        self
    }

    fn our_level(&self) -> LevelFilter {
        match self.verbosity {
            Verbosity::Quiet => LevelFilter::Warn,
            Verbosity::Default => LevelFilter::Info,
            Verbosity::Loud => LevelFilter::Trace,
        }
    }

    /// Install the logger. Fails if any logger (this one or another) is already installed.
    pub fn apply(&self) -> Result<(), LoggerError>
    {
        let start = Instant::now();
        let colors = ColoredLevelConfig::new()
            .error(Color::Red)
            .warn(Color::Yellow)
            .info(Color::Cyan)
            .debug(Color::White)
            .trace(Color::BrightBlack);

        let mut fern = fern::Dispatch::new()
            .format(move |out, message, record| {
                let t = start.elapsed();
                out.finish(format_args!("[{:>4}.{:03}s][{}][{}] {}",
                    t.as_secs(),
                    t.subsec_millis(),
                    record.target(),
                    colors.color(record.level()),
                    message))
            })
            .level(LevelFilter::Warn)
            .level_for("matcalc", self.our_level())
            .level_for("matcalc_core", self.our_level())
            .chain(std::io::stderr());

        if let Some(path) = self.path.as_ref() {
            fern = fern.chain(fern::log_file(path)?);
        }

        fern.apply()?;
        debug!("logging initialized at {:?}", self.our_level());
        Ok(())
    }
}
