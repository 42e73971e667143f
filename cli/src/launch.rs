//! Opening a written report with the platform's default application.

use std::io;
use std::path::Path;
use std::process::Command;

/// The opener command for the current platform.
fn opener(path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(path);
        command
    } else if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(path);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}

/// Open `path` without waiting for the application to exit.
pub fn open_file(path: &Path) -> io::Result<()> {
    opener(path).spawn().map(|_| ())
}
