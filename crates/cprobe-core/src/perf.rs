//! Operation timing with a resident-memory delta.
//!
//! `PerformanceMonitor::measure` wraps a fallible operation, records how
//! long it took and how much the process' resident set grew, and logs the
//! result. Operations slower than the threshold are logged at `warn`.

use std::fmt::Display;
use std::time::{Duration, Instant, SystemTime};

use serde::{Deserialize, Serialize};

/// Operations slower than this are reported as slow.
pub const SLOW_THRESHOLD: Duration = Duration::from_secs(1);

/// Measurements for one wrapped operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub function_name: String,
    /// Wall-clock duration in seconds.
    pub execution_time: f64,
    /// Resident set growth in MB; 0 where the platform does not expose it.
    pub memory_usage: f64,
    /// Completion time, seconds since the Unix epoch.
    pub timestamp: f64,
    pub success: bool,
    pub error: Option<String>,
}

impl PerformanceMetrics {
    pub fn is_slow(&self, threshold: Duration) -> bool {
        self.execution_time > threshold.as_secs_f64()
    }

    fn log_line(&self) -> String {
        let mut line = format!(
            "Function: {} | Time: {:.3}s | Memory: {:.2}MB | Success: {}",
            self.function_name, self.execution_time, self.memory_usage, self.success
        );
        if let Some(err) = &self.error {
            line.push_str(&format!(" | Error: {err}"));
        }
        line
    }
}

#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    slow_threshold: Duration,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self {
            slow_threshold: SLOW_THRESHOLD,
        }
    }

    /// Run `op`, log its metrics, and pass its result through unchanged.
    pub fn measure<T, E, F>(&self, name: &str, op: F) -> Result<T, E>
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        self.measure_with_metrics(name, op).0
    }

    /// Like [`measure`](Self::measure), also returning the metrics.
    pub fn measure_with_metrics<T, E, F>(&self, name: &str, op: F) -> (Result<T, E>, PerformanceMetrics)
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        let start_memory = resident_memory_mb();
        let start = Instant::now();
        let result = op();
        let elapsed = start.elapsed();
        let end_memory = resident_memory_mb();

        let metrics = PerformanceMetrics {
            function_name: name.to_string(),
            execution_time: elapsed.as_secs_f64(),
            memory_usage: end_memory - start_memory,
            timestamp: SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0),
            success: result.is_ok(),
            error: result.as_ref().err().map(|e| e.to_string()),
        };
        self.log(&metrics);
        (result, metrics)
    }

    fn log(&self, metrics: &PerformanceMetrics) {
        if metrics.is_slow(self.slow_threshold) {
            tracing::warn!(target: "performance", "Slow execution detected: {}", metrics.log_line());
        } else {
            tracing::info!(target: "performance", "{}", metrics.log_line());
        }
    }
}

/// Resident set size of this process in MB.
#[cfg(target_os = "linux")]
fn resident_memory_mb() -> f64 {
    let Ok(status) = std::fs::read_to_string("/proc/self/status") else {
        return 0.0;
    };
    status
        .lines()
        .find_map(|line| line.strip_prefix("VmRSS:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse::<f64>().ok())
        .map(|kb| kb / 1024.0)
        .unwrap_or(0.0)
}

#[cfg(not(target_os = "linux"))]
fn resident_memory_mb() -> f64 {
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_success_through() {
        let monitor = PerformanceMonitor::new();
        let (result, metrics) = monitor.measure_with_metrics("add", || Ok::<_, String>(2 + 2));
        assert_eq!(result, Ok(4));
        assert!(metrics.success);
        assert!(metrics.error.is_none());
        assert_eq!(metrics.function_name, "add");
        assert!(metrics.execution_time >= 0.0);
        assert!(metrics.timestamp > 0.0);
    }

    #[test]
    fn records_failure_message() {
        let monitor = PerformanceMonitor::new();
        let (result, metrics) =
            monitor.measure_with_metrics("fail", || Err::<(), _>("no responses".to_string()));
        assert!(result.is_err());
        assert!(!metrics.success);
        assert_eq!(metrics.error.as_deref(), Some("no responses"));
        assert!(metrics.log_line().ends_with("| Error: no responses"));
    }

    #[test]
    fn slow_threshold_classification() {
        let mut metrics = PerformanceMetrics {
            function_name: "x".into(),
            execution_time: 0.5,
            memory_usage: 0.0,
            timestamp: 0.0,
            success: true,
            error: None,
        };
        assert!(!metrics.is_slow(SLOW_THRESHOLD));
        metrics.execution_time = 1.5;
        assert!(metrics.is_slow(SLOW_THRESHOLD));
    }

    #[test]
    fn measure_returns_result_only() {
        let monitor = PerformanceMonitor::default();
        let value: Result<&str, std::io::Error> = monitor.measure("noop", || Ok("done"));
        assert_eq!(value.unwrap(), "done");
    }
}
