use std::process::Command;

fn cmd_stdout(cmd: &mut Command) -> Option<String> {
    let out = cmd.output().ok()?;
    String::from_utf8(out.stdout).ok()
}

fn main() {
    // Build timestamp for the about/status line.
    let timestamp = if cfg!(windows) {
        cmd_stdout(Command::new("powershell").args([
            "-Command",
            "(Get-Date).ToUniversalTime().ToString('yyyy-MM-dd HH:mm:ss')",
        ]))
    } else {
        cmd_stdout(
            Command::new("date")
                .env("TZ", "UTC")
                .args(["+%Y-%m-%d %H:%M:%S"]),
        )
    }
    .unwrap_or_else(|| "unknown".to_string());

    // Short git commit hash, "unknown" outside a checkout.
    let commit = cmd_stdout(Command::new("git").args(["rev-parse", "--short", "HEAD"]))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", timestamp.trim());
    println!("cargo:rustc-env=BUILD_COMMIT={}", commit.trim());

    // No rerun-if-changed so every rebuild refreshes the timestamp.
}
