use std::process::Command;

/// Print tool and environment version information (`--info`).
pub fn run() {
    println!("dotmeta version: {}", env!("CARGO_PKG_VERSION"));
    println!("metadata reader: dotscope (statically linked)");
    println!("{}", yara_version());
}

/// Probe the YARA CLI (`yara`, `yara64`, `yara32`) for its version string.
fn yara_version() -> String {
    for exe in ["yara", "yara64", "yara32"] {
        if let Ok(output) = Command::new(exe).arg("--version").output() {
            if output.status.success() {
                let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
                return format!("{exe} version: {version}");
            }
        }
    }
    "YARA version not found.".to_string()
}
