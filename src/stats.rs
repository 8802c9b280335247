use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const STATUS_RUNNING: &str = "running";
pub const STATUS_RESTARTING: &str = "restarting";

/// Process-lifetime request counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallStats {
    pub status: String,
    pub requests_received: u64,
    pub last_request: Option<String>,
    pub tool_calls: BTreeMap<String, u64>,
    pub server_start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(flatten)]
    pub stats: ToolCallStats,
    pub uptime_seconds: i64,
}

/// Owner of the [`ToolCallStats`], shared with every handler through an
/// `Arc`. Handlers run on several actix worker threads, so all mutation goes
/// through the lock.
#[derive(Debug)]
pub struct StatsRecorder {
    inner: Mutex<ToolCallStats>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ToolCallStats {
                status: STATUS_RUNNING.to_string(),
                requests_received: 0,
                last_request: None,
                tool_calls: BTreeMap::new(),
                server_start_time: Utc::now(),
            }),
        }
    }

    /// Count a protocol request that is not a tool call (initialize, shutdown, ...).
    pub fn record_request(&self, method: &str) {
        let mut stats = self.inner.lock();
        stats.requests_received += 1;
        stats.last_request = Some(method.to_string());
    }

    /// Count a tool invocation, whichever adapter it came through.
    pub fn record_tool_call(&self, tool: &str) {
        let mut stats = self.inner.lock();
        stats.requests_received += 1;
        stats.last_request = Some(tool.to_string());
        *stats.tool_calls.entry(tool.to_string()).or_insert(0) += 1;
    }

    pub fn mark_restarting(&self) {
        self.inner.lock().status = STATUS_RESTARTING.to_string();
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let stats = self.inner.lock().clone();
        let uptime_seconds = (Utc::now() - stats.server_start_time).num_seconds().max(0);
        StatsSnapshot {
            stats,
            uptime_seconds,
        }
    }
}

impl Default for StatsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_tool_calls_are_counted_per_tool() {
        let recorder = StatsRecorder::new();
        recorder.record_tool_call("list-files");
        recorder.record_tool_call("read-file");
        recorder.record_tool_call("list-files");

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.stats.requests_received, 3);
        assert_eq!(snapshot.stats.last_request.as_deref(), Some("list-files"));
        assert_eq!(snapshot.stats.tool_calls["list-files"], 2);
        assert_eq!(snapshot.stats.tool_calls["read-file"], 1);
    }

    #[test]
    fn test_lifecycle_requests_skip_tool_counts() {
        let recorder = StatsRecorder::new();
        recorder.record_request("initialize");

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.stats.requests_received, 1);
        assert_eq!(snapshot.stats.last_request.as_deref(), Some("initialize"));
        assert!(snapshot.stats.tool_calls.is_empty());
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let recorder = Arc::new(StatsRecorder::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let recorder = recorder.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        recorder.record_tool_call("write-file");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.stats.requests_received, 800);
        assert_eq!(snapshot.stats.tool_calls["write-file"], 800);
    }

    #[test]
    fn test_snapshot_serializes_flat() {
        let recorder = StatsRecorder::new();
        recorder.mark_restarting();

        let value = serde_json::to_value(recorder.snapshot()).unwrap();
        assert_eq!(value["status"], STATUS_RESTARTING);
        assert_eq!(value["requests_received"], 0);
        assert!(value["uptime_seconds"].is_i64());
        assert!(value["server_start_time"].is_string());
    }
}
