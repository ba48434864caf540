//! Access-log records and the sinks they are written to.
//!
//! The sink is built once at startup from `ACCESS_LOG_TARGET` and handed to the
//! request-log middleware as state. Sinks are best-effort: a failing sink reports
//! through `tracing::warn!` and never fails the request it describes.

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// 访问日志事件名
pub const HTTP_REQUEST_EVENT: &str = "http_request";

/// Status recorded when the handler chain produced no usable response.
pub const FALLBACK_STATUS: u16 = 500;

/// One structured record per request.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AccessLogRecord {
    pub event: &'static str,
    pub method: String,
    pub path: String,
    pub status_code: u16,
    pub duration_ms: f64,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub trace_id: String,
    pub error: Option<String>,
}

pub trait AccessLogSink: Send + Sync {
    fn emit(&self, record: AccessLogRecord);
}

/// Shared handle to the process-wide access log sink.
pub type AccessLogger = Arc<dyn AccessLogSink>;

/// Forwards records to the global `tracing` subscriber on target `access_log`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl AccessLogSink for TracingSink {
    fn emit(&self, record: AccessLogRecord) {
        info!(
            target: "access_log",
            event = record.event,
            method = %record.method,
            path = %record.path,
            status_code = record.status_code,
            duration_ms = record.duration_ms,
            client_ip = record.client_ip.as_deref(),
            user_agent = record.user_agent.as_deref(),
            trace_id = %record.trace_id,
            error = record.error.as_deref(),
            "Request log"
        );
    }
}

/// Writes each record as one JSON object per line.
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> AccessLogSink for JsonLinesSink<W> {
    fn emit(&self, record: AccessLogRecord) {
        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(e) => {
                warn!(trace_id = %record.trace_id, error = %e, "Failed to serialize access log record");
                return;
            }
        };

        let mut writer = self.lock();
        let result = writeln!(writer, "{}", line).and_then(|_| writer.flush());
        if let Err(e) = result {
            warn!(trace_id = %record.trace_id, error = %e, "Failed to write access log record");
        }
    }
}

/// Keeps records in memory; used by tests and diagnostics.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<AccessLogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AccessLogRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AccessLogRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AccessLogSink for MemorySink {
    fn emit(&self, record: AccessLogRecord) {
        self.lock().push(record);
    }
}

/// Where access log records go, as configured by `ACCESS_LOG_TARGET`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessLogTarget {
    Tracing,
    Stdout,
    Stderr,
    File(PathBuf),
}

impl AccessLogTarget {
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim() {
            "" | "tracing" => Ok(Self::Tracing),
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            other => match other.strip_prefix("file:") {
                Some(path) if !path.is_empty() => Ok(Self::File(PathBuf::from(path))),
                _ => Err(AppError::Config(format!(
                    "ACCESS_LOG_TARGET must be tracing, stdout, stderr or file:<path>, got '{}'",
                    other
                ))),
            },
        }
    }
}

pub fn build_access_logger(target: &AccessLogTarget) -> AppResult<AccessLogger> {
    let logger: AccessLogger = match target {
        AccessLogTarget::Tracing => Arc::new(TracingSink),
        AccessLogTarget::Stdout => Arc::new(JsonLinesSink::new(io::stdout())),
        AccessLogTarget::Stderr => Arc::new(JsonLinesSink::new(io::stderr())),
        AccessLogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Arc::new(JsonLinesSink::new(file))
        }
    };
    Ok(logger)
}
