//! The access and error log sinks.
//!
//! Two append-only log files accompany the server: one recording every remote
//! operation and one recording business-level failures and fatal conditions. Both
//! are plain collaborators, opened once at startup and handed to the service; there
//! is no global logger state.
//!
//! A sink write failure is reported through `tracing` but never propagated: a lost
//! log line must not fail the operation that produced it.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{Local, SecondsFormat};
use tracing::error;

use crate::error::{Result, WeblogError};

// an append-only line sink shared between the worker threads
#[derive(Debug, Clone)]
struct LineSink {
    file: Arc<Mutex<File>>,
}

impl LineSink {
    fn open(path: &Path) -> Result<LineSink> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(WeblogError::Storage)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(WeblogError::Storage)?;

        Ok(LineSink {
            file: Arc::new(Mutex::new(file)),
        })
    }

    fn println(&self, line: String) {
        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(file, "{}", line) {
            error!("could not write log line: {}", e);
        }
    }
}

// current local time as rfc3339 with millisecond precision
fn timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// The access log: one line per remote operation, naming the caller, the operation
/// and a short parameter summary.
#[derive(Debug, Clone)]
pub struct AccessLog {
    sink: LineSink,
}

impl AccessLog {
    /// opens (or creates) the access log file at `path`, creating missing parent
    /// directories
    pub fn open(path: &Path) -> Result<AccessLog> {
        Ok(AccessLog {
            sink: LineSink::open(path)?,
        })
    }

    /// records one remote operation as `<timestamp> <peer> <operation> <detail>`
    pub fn record(&self, peer: &str, operation: &str, detail: &str) {
        self.sink
            .println(format!("{} {} {} {}", timestamp(), peer, operation, detail));
    }
}

/// The error log. It records two severities: notable conditions (the operation
/// completed but reported a business-level failure, such as not-found) and fatal
/// conditions (a failure that aborted a client stream or is about to take the
/// process down).
#[derive(Debug, Clone)]
pub struct ErrorLog {
    sink: LineSink,
}

impl ErrorLog {
    /// opens (or creates) the error log file at `path`, creating missing parent
    /// directories
    pub fn open(path: &Path) -> Result<ErrorLog> {
        Ok(ErrorLog {
            sink: LineSink::open(path)?,
        })
    }

    /// records a notable condition: `<timestamp> ERROR <peer> <operation> <message>`
    pub fn notable(&self, peer: &str, operation: &str, msg: &str) {
        self.sink
            .println(format!("{} ERROR {} {} {}", timestamp(), peer, operation, msg));
    }

    /// records a fatal condition alongside the error that caused it:
    /// `<timestamp> FATAL <peer> <operation> <message>: <error>`
    pub fn fatal(&self, peer: &str, operation: &str, msg: &str, err: &WeblogError) {
        self.sink.println(format!(
            "{} FATAL {} {} {}: {}",
            timestamp(),
            peer,
            operation,
            msg,
            err
        ));
    }

    /// records a fatal condition raised outside of request handling, before the
    /// server starts serving
    pub fn fatal_startup(&self, msg: &str, err: &WeblogError) {
        self.sink
            .println(format!("{} FATAL - server {}: {}", timestamp(), msg, err));
    }
}
