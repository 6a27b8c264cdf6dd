//! Runtime environment inspection.
//!
//! The planner sizes the worker count by the number of logical CPUs, and
//! the populate command logs what the host offers at startup.

use crate::metrics::EnvironmentInfo;
use tracing::info;

/// Number of concurrent execution units (logical CPUs) this host offers.
pub fn available_parallelism_units() -> usize {
    num_cpus::get()
}

/// Log and capture runtime environment information.
pub fn log_runtime_environment() -> EnvironmentInfo {
    info!("=== Runtime Environment ===");

    let cpu_cores = available_parallelism_units();
    info!("CPU cores visible: {}", cpu_cores);

    let sys = sysinfo::System::new_all();
    let memory_mb = sys.total_memory() / 1024 / 1024;
    let available_memory_mb = sys.available_memory() / 1024 / 1024;
    info!("Total memory: {} MB", memory_mb);
    info!("Available memory: {} MB", available_memory_mb);

    let hostname = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());
    info!("Hostname: {}", hostname);

    info!("===========================");

    EnvironmentInfo {
        cpu_cores,
        memory_mb,
        available_memory_mb,
        hostname,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_positive() {
        assert!(available_parallelism_units() >= 1);
    }

    #[test]
    fn test_environment_info() {
        let env = log_runtime_environment();
        assert_eq!(env.cpu_cores, available_parallelism_units());
        assert!(!env.hostname.is_empty());
    }
}
