//! Host identity captured once at startup.
//!
//! The hostname is what tells two otherwise identical containers apart on the
//! status page, so it is resolved eagerly and never re-read.

use std::time::Instant;

use crate::config::RUNTIME_IDENT;

const UNKNOWN_HOSTNAME: &str = "unknown";

#[derive(Debug, Clone)]
pub struct HostInfo {
    pub hostname: String,
    /// Operating system identifier, e.g. "linux"
    pub platform: &'static str,
    pub runtime: &'static str,
    started_at: Instant,
}

impl HostInfo {
    /// Capture the identity of the current host, starting the uptime clock now.
    pub fn detect() -> Self {
        Self::new(detect_hostname())
    }

    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            platform: std::env::consts::OS,
            runtime: RUNTIME_IDENT,
            started_at: Instant::now(),
        }
    }

    /// Seconds since startup, from a monotonic clock.
    pub fn uptime_seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

fn detect_hostname() -> String {
    match hostname::get() {
        Ok(name) => clean_hostname(name.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNKNOWN_HOSTNAME.to_string()),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Could not determine hostname, using \"{}\"",
                UNKNOWN_HOSTNAME
            );
            UNKNOWN_HOSTNAME.to_string()
        }
    }
}

fn clean_hostname(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_hostname() {
        assert_eq!(clean_hostname("web-blue-1\n".to_string()), Some("web-blue-1".to_string()));
        assert_eq!(clean_hostname("  \n".to_string()), None);
        assert_eq!(clean_hostname(String::new()), None);
    }

    #[test]
    fn test_detect_never_empty() {
        let host = HostInfo::detect();
        assert!(!host.hostname.is_empty());
        assert_eq!(host.platform, std::env::consts::OS);
        assert_eq!(host.runtime, RUNTIME_IDENT);
    }

    #[test]
    fn test_detect_uses_kernel_hostname() {
        // An exported HOSTNAME must not override the kernel's name
        std::env::set_var("HOSTNAME", "exported-not-kernel");
        let kernel = hostname::get().unwrap().to_string_lossy().trim().to_string();
        assert_eq!(HostInfo::detect().hostname, kernel);
        assert_ne!(HostInfo::detect().hostname, "exported-not-kernel");
    }

    #[test]
    fn test_uptime_monotonic() {
        let host = HostInfo::new("test-host");
        let first = host.uptime_seconds();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = host.uptime_seconds();
        assert!(first >= 0.0);
        assert!(second >= first);
    }
}
