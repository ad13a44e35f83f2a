//! Logger setup for the binaries.
//!
//! The library only talks to the `log` facade, binaries pick where records
//! go by calling `init` once.
use std::path::Path;

use flexi_logger::Cleanup;
use flexi_logger::Criterion;
use flexi_logger::FileSpec;
use flexi_logger::FlexiLoggerError;
use flexi_logger::Logger;
use flexi_logger::LoggerHandle;
use flexi_logger::Naming;
use flexi_logger::WriteMode;

/// Rotate log files once they reach this size.
const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_FILES: usize = 5;

/// Starts logging with a spec like `info` or `warn,route_search=trace`.
///
/// Records go to stderr, or to rotating files under `log_dir` when given.
/// Logging stops when the returned handle is dropped, so keep it alive.
pub fn init(spec: &str, log_dir: Option<&Path>) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = Logger::try_with_str(spec)?;
    let handle = match log_dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().basename("route").directory(dir))
            .rotate(
                Criterion::Size(MAX_FILE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(KEEP_FILES),
            )
            .format(flexi_logger::detailed_format)
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .start()?,
        None => logger.log_to_stderr().start()?,
    };

    match log_dir {
        Some(dir) => log::debug!("Logging '{spec}' to {}", dir.display()),
        None => log::debug!("Logging '{spec}' to stderr"),
    }
    Ok(handle)
}
