//! Read-only facts about the host, captured on demand.

use std::fmt::Write;
use sysinfo::{CpuRefreshKind, RefreshKind, System};

#[derive(Debug, Clone, PartialEq)]
pub struct CpuInfo {
    pub model: String,
    /// Clock speed in MHz.
    pub speed_mhz: u64,
}

impl CpuInfo {
    #[must_use]
    pub fn speed_ghz(&self) -> String {
        #[allow(clippy::cast_precision_loss)]
        let ghz = self.speed_mhz as f64 / 1000.0;
        format!("{ghz:.2}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OsSnapshot {
    /// Line terminator spelled as escapes, `\n` or `\r\n`.
    pub eol: String,
    pub home_dir: String,
    pub username: String,
    pub cpus: Vec<CpuInfo>,
    pub arch: String,
}

impl OsSnapshot {
    #[must_use]
    pub fn capture() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::new().with_cpu(CpuRefreshKind::new().with_frequency()),
        );
        let cpus = system
            .cpus()
            .iter()
            .map(|cpu| CpuInfo {
                model: cpu.brand().trim().to_string(),
                speed_mhz: cpu.frequency(),
            })
            .collect();

        Self {
            eol: eol_escape(),
            home_dir: dirs::home_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            username: whoami::username(),
            cpus,
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    /// CPU summary: total count, then a model / clock rate pair per core.
    #[must_use]
    pub fn cpus_text(&self) -> String {
        let mut text = format!("overall amount of CPUS: {}", self.cpus.len());
        for cpu in &self.cpus {
            let _ = write!(
                text,
                "\nmodel: {}\nclock rate: {}GHz",
                cpu.model,
                cpu.speed_ghz()
            );
        }
        text
    }
}

const fn eol_escape_for(windows: bool) -> &'static str {
    if windows {
        "\\r\\n"
    } else {
        "\\n"
    }
}

fn eol_escape() -> String {
    eol_escape_for(cfg!(windows)).to_string()
}
