//! Platform and application version strings for `/api/info`.

use std::fs;

/// Human-readable platform string: OS release name plus kernel version,
/// e.g. "Debian GNU/Linux 12 (kernel 6.1.0)". Falls back to the bare OS
/// name when the release files are unavailable.
pub fn platform_version() -> String {
    let name = fs::read_to_string("/etc/os-release")
        .ok()
        .and_then(|content| parse_os_release(&content))
        .unwrap_or_else(|| std::env::consts::OS.to_string());

    match fs::read_to_string("/proc/sys/kernel/osrelease") {
        Ok(kernel) => format!("{} (kernel {})", name, kernel.trim()),
        Err(_) => name,
    }
}

/// Application version from package metadata, "Unknown" if unresolvable.
pub fn app_version() -> &'static str {
    option_env!("CARGO_PKG_VERSION").unwrap_or("Unknown")
}

fn parse_os_release(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let value = line.strip_prefix("PRETTY_NAME=")?;
        Some(value.trim().trim_matches('"').to_string())
    })
}
