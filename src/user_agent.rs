//! User-Agent header sent by the REST client.

use std::sync::OnceLock;

/// Library name used in the User-Agent string.
const LIB_NAME: &str = "ancine-query";

/// Library version from Cargo.toml.
const LIB_VERSION: &str = env!("CARGO_PKG_VERSION");

static USER_AGENT: OnceLock<String> = OnceLock::new();

/// Returns the User-Agent string for API requests.
///
/// Format: `ancine-query/0.1.0 (rust/1.92; linux/x86_64)`
///
/// Computed once and cached.
pub fn user_agent() -> &'static str {
    USER_AGENT.get_or_init(|| {
        format!(
            "{}/{} ({}; {}/{})",
            LIB_NAME,
            LIB_VERSION,
            rust_version(),
            os_name(),
            std::env::consts::ARCH,
        )
    })
}

fn rust_version() -> &'static str {
    concat!("rust/", env!("CARGO_PKG_RUST_VERSION"))
}

fn os_name() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        os => os,
    }
}
