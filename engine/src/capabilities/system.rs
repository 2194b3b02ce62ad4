//! Host integration: app launching, power actions, screenshots, and
//! resource snapshots.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use sysinfo::System;
use tokio::process::Command;
use tracing::{info, warn};

use sdk::capability::{ProcessControl, Result, ScreenCapture, SystemMonitor};
use sdk::errors::AssistantError;
use sdk::types::{SystemApp, SystemSnapshot};

/// Launches apps and issues power commands through platform binaries.
pub struct PlatformControl;

impl PlatformControl {
    async fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        info!("running {} {:?}", program, args);
        let status = Command::new(program)
            .args(args)
            .status()
            .await
            .map_err(|e| {
                warn!("failed to launch {}: {}", program, e);
                AssistantError::UnsupportedOperation(format!("{}: {}", program, e))
            })?;

        if !status.success() {
            return Err(AssistantError::UnsupportedOperation(format!(
                "{} exited with {}",
                program, status
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ProcessControl for PlatformControl {
    async fn open_app(&self, app: SystemApp) -> Result<()> {
        #[cfg(target_os = "linux")]
        let (program, args): (&str, &[&str]) = match app {
            SystemApp::Editor => ("gedit", &[]),
            SystemApp::Calculator => ("gnome-calculator", &[]),
            SystemApp::Terminal => ("gnome-terminal", &[]),
        };

        #[cfg(target_os = "macos")]
        let (program, args): (&str, &[&str]) = match app {
            SystemApp::Editor => ("open", &["-a", "TextEdit"]),
            SystemApp::Calculator => ("open", &["-a", "Calculator"]),
            SystemApp::Terminal => ("open", &["-a", "Terminal"]),
        };

        #[cfg(target_os = "windows")]
        let (program, args): (&str, &[&str]) = match app {
            SystemApp::Editor => ("notepad.exe", &[]),
            SystemApp::Calculator => ("calc.exe", &[]),
            SystemApp::Terminal => ("cmd.exe", &["/C", "start", "cmd"]),
        };

        self.run(program, args).await
    }

    async fn shutdown(&self) -> Result<()> {
        #[cfg(target_os = "linux")]
        return self.run("shutdown", &["-h", "now"]).await;

        #[cfg(target_os = "macos")]
        return self.run("shutdown", &["-h", "now"]).await;

        #[cfg(target_os = "windows")]
        return self.run("shutdown", &["/s", "/t", "1"]).await;
    }

    async fn restart(&self) -> Result<()> {
        #[cfg(target_os = "linux")]
        return self.run("shutdown", &["-r", "now"]).await;

        #[cfg(target_os = "macos")]
        return self.run("shutdown", &["-r", "now"]).await;

        #[cfg(target_os = "windows")]
        return self.run("shutdown", &["/r", "/t", "1"]).await;
    }
}

/// Captures the screen with the platform screenshot utility.
pub struct ScreenshotTool;

#[async_trait]
impl ScreenCapture for ScreenshotTool {
    async fn capture(&self, output: &Path) -> Result<PathBuf> {
        info!("capturing screenshot to {}", output.display());

        #[cfg(any(target_os = "macos", target_os = "linux"))]
        let output_str = output.to_string_lossy().to_string();

        #[cfg(target_os = "macos")]
        let result = Command::new("screencapture")
            .arg("-x")
            .arg(&output_str)
            .output()
            .await;

        #[cfg(target_os = "linux")]
        let result = Command::new("scrot").arg(&output_str).output().await;

        #[cfg(target_os = "windows")]
        let result: std::result::Result<std::process::Output, std::io::Error> =
            Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "native screenshot not available on this platform",
            ));

        match result {
            Ok(out) if out.status.success() => Ok(output.to_path_buf()),
            Ok(out) => {
                let err = String::from_utf8_lossy(&out.stderr);
                warn!("screenshot command failed: {}", err);
                Err(AssistantError::CapabilityUnavailable(format!(
                    "screenshot: {}",
                    err
                )))
            }
            Err(e) => {
                warn!("failed to execute screenshot utility: {}", e);
                Err(AssistantError::CapabilityUnavailable(format!(
                    "screenshot: {}",
                    e
                )))
            }
        }
    }
}

/// CPU and memory snapshots backed by sysinfo.
pub struct SysinfoMonitor {
    system: Mutex<System>,
}

impl SysinfoMonitor {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new_all()),
        }
    }
}

impl Default for SysinfoMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemMonitor for SysinfoMonitor {
    fn snapshot(&self) -> Result<SystemSnapshot> {
        let mut system = self
            .system
            .lock()
            .map_err(|_| AssistantError::CapabilityUnavailable("system monitor".to_string()))?;

        // CPU usage is a delta; two refreshes with the minimum interval
        // between them are required for a meaningful figure.
        system.refresh_cpu();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        system.refresh_cpu();
        system.refresh_memory();

        let cpu_percent = system.global_cpu_info().cpu_usage();
        let total = system.total_memory();
        let memory_percent = if total == 0 {
            0.0
        } else {
            (system.used_memory() as f32 / total as f32) * 100.0
        };

        Ok(SystemSnapshot {
            cpu_percent,
            memory_percent,
            battery_percent: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reports_plausible_figures() {
        let monitor = SysinfoMonitor::new();
        let snapshot = monitor.snapshot().unwrap();

        assert!(snapshot.cpu_percent >= 0.0);
        assert!(snapshot.memory_percent > 0.0);
        assert!(snapshot.memory_percent <= 100.0);
    }

    #[test]
    fn test_snapshot_is_repeatable() {
        let monitor = SysinfoMonitor::new();
        monitor.snapshot().unwrap();
        monitor.snapshot().unwrap();
    }
}
