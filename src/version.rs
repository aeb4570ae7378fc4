// Build-time version from Cargo.toml

/// Package version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name (from Cargo.toml).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Header line shown at the top of the dashboard.
pub fn banner(hostname: &str) -> String {
    format!("Glances v{} running on {}", VERSION, hostname)
}
