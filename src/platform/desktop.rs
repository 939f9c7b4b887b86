use std::process::Stdio;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Clipboard, ClipboardRead, Dictation, Notifier, Permission};

#[cfg(not(target_os = "macos"))]
const APP_NAME: &str = "QuickCap";

/// System notifications through `notify-send` (libnotify) or `osascript`.
#[derive(Debug, Default)]
pub struct DesktopNotifier {
    permission: Mutex<Permission>,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn probe() -> bool {
        #[cfg(target_os = "macos")]
        let helper = "osascript";
        #[cfg(not(target_os = "macos"))]
        let helper = "notify-send";
        on_path(helper)
    }
}

/// Whether `program` is an executable file on `PATH`. Checked without running it.
fn on_path(program: &str) -> bool {
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path).any(|dir| dir.join(program).is_file())
}

impl Notifier for DesktopNotifier {
    fn request_permission(&self) -> Permission {
        let Ok(mut permission) = self.permission.lock() else {
            return Permission::Denied;
        };
        if *permission == Permission::Default {
            *permission = if Self::probe() {
                Permission::Granted
            } else {
                log::info!("No notification service found; system notifications disabled");
                Permission::Denied
            };
        }
        *permission
    }

    fn permission(&self) -> Permission {
        self.permission
            .lock()
            .map(|p| *p)
            .unwrap_or(Permission::Denied)
    }

    fn notify(&self, title: &str, body: &str) {
        if self.permission() != Permission::Granted {
            return;
        }
        #[cfg(target_os = "macos")]
        let command = {
            let mut command = tokio::process::Command::new("osascript");
            command.arg("-e").arg(format!(
                "display notification {:?} with title {:?}",
                body, title
            ));
            command
        };
        #[cfg(not(target_os = "macos"))]
        let command = {
            let mut command = tokio::process::Command::new("notify-send");
            command.args(["--app-name", APP_NAME, title, body]);
            command
        };
        spawn_detached(command);
    }
}

/// Start a helper without waiting on it. tokio reaps the child once it exits.
fn spawn_detached(mut command: tokio::process::Command) {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if let Err(e) = command.spawn() {
        log::warn!("Failed to show notification: {}", e);
    }
}

/// Clipboard text via the platform's paste helper.
#[derive(Debug, Default)]
pub struct SystemClipboard;

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn read_text(&self) -> ClipboardRead {
        #[cfg(target_os = "macos")]
        let output = tokio::process::Command::new("pbpaste").output().await;
        #[cfg(not(target_os = "macos"))]
        let output = if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            tokio::process::Command::new("wl-paste")
                .arg("--no-newline")
                .output()
                .await
        } else {
            tokio::process::Command::new("xclip")
                .args(["-selection", "clipboard", "-o"])
                .output()
                .await
        };

        match output {
            Ok(o) if o.status.success() => match String::from_utf8(o.stdout) {
                Ok(text) if !text.is_empty() => ClipboardRead::Text(text),
                Ok(_) => ClipboardRead::Empty,
                Err(_) => ClipboardRead::Denied,
            },
            // wl-paste and xclip exit non-zero on an empty selection.
            Ok(_) => ClipboardRead::Empty,
            Err(e) => {
                log::debug!("Clipboard helper unavailable: {}", e);
                ClipboardRead::Denied
            }
        }
    }
}

/// Dictation through a user-configured program that records one utterance
/// and prints its transcript on stdout.
#[derive(Debug, Default)]
pub struct CommandDictation {
    command: Option<String>,
}

impl CommandDictation {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }
}

#[async_trait]
impl Dictation for CommandDictation {
    fn is_available(&self) -> bool {
        self.command.is_some()
    }

    async fn listen(&self) -> Option<String> {
        let command = self.command.as_deref()?;
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .output()
            .await;
        match output {
            Ok(o) if o.status.success() => {
                let transcript = String::from_utf8_lossy(&o.stdout).trim().to_string();
                (!transcript.is_empty()).then_some(transcript)
            }
            Ok(o) => {
                log::warn!("Dictation command exited with {}", o.status);
                None
            }
            Err(e) => {
                log::warn!("Failed to run dictation command: {}", e);
                None
            }
        }
    }
}
