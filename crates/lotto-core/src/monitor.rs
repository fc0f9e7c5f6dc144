//! Wall-clock and memory bookkeeping around a single optimization call.

use std::time::{Duration, Instant};

use sysinfo::{ProcessesToUpdate, System};

/// Tracks elapsed time for one run and answers cooperative timeout polls.
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    started: Instant,
    timeout: Option<Duration>,
}

impl PerformanceMonitor {
    pub fn start(timeout_ms: Option<u64>) -> Self {
        Self {
            started: Instant::now(),
            timeout: timeout_ms.map(Duration::from_millis),
        }
    }

    /// Monitor without a deadline.
    pub fn unbounded() -> Self {
        Self::start(None)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Polled between iterations and scoring chunks; never interrupts.
    pub fn is_timed_out(&self) -> bool {
        self.timeout.is_some_and(|t| self.elapsed() >= t)
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.timeout.map(|t| t.saturating_sub(self.elapsed()))
    }
}

/// Working-set estimate for a run over `draws` draws and `candidates`
/// candidate grids: one mask per draw and candidate, one covered flag per
/// draw and one gain counter per candidate.
pub fn estimate_memory_bytes(draws: u64, candidates: u64) -> u64 {
    let mask = std::mem::size_of::<u64>() as u64;
    let gain = std::mem::size_of::<u32>() as u64;
    draws * (mask + 1) + candidates * (mask + gain)
}

/// Resident set size of this process as reported by the OS, or `None` when
/// the platform does not expose it. A diagnostic only.
pub fn resident_memory_bytes() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    system.process(pid).map(|process| process.memory())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_never_times_out() {
        let monitor = PerformanceMonitor::unbounded();
        assert!(!monitor.is_timed_out());
        assert!(monitor.remaining().is_none());
    }

    #[test]
    fn test_zero_timeout_expires_immediately() {
        let monitor = PerformanceMonitor::start(Some(0));
        assert!(monitor.is_timed_out());
        assert_eq!(monitor.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_memory_estimate_grows_with_input() {
        assert!(estimate_memory_bytes(15_504, 15_504) > estimate_memory_bytes(252, 252));
        assert_eq!(estimate_memory_bytes(0, 0), 0);
    }

    #[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
    #[test]
    fn test_resident_memory_is_reported() {
        let bytes = resident_memory_bytes().unwrap();
        assert!(bytes > 0);
    }
}
