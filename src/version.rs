// Build identity, logged once at startup.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// `usage-charter 0.1.0`
pub fn banner() -> String {
    format!("{NAME} {VERSION}")
}
