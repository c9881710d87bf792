use env_logger::{Builder, WriteStyle};
use log::{info, warn, LevelFilter};

/// Initialize the logging system for binaries embedding this crate
pub fn initialize_logging() -> Result<(), Box<dyn std::error::Error>> {
    // Configure the logging system
    Builder::new()
        // Set default log level
        .filter_level(LevelFilter::Info)
        // Enable timestamps
        .format_timestamp_secs()
        // Enable module path in logs
        .format_module_path(true)
        // Set colored output for console
        .write_style(WriteStyle::Auto)
        // Allow RUST_LOG to override the defaults
        .parse_default_env()
        .try_init()?;

    info!("Logging system initialized");
    Ok(())
}

/// Helper function to mask identifiers before they reach the log.
/// Counts characters, not bytes, so non-ASCII emails are safe to mask.
fn format_sensitive(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count <= 4 {
        return "*".repeat(char_count);
    }
    let prefix: String = text.chars().take(2).collect();
    let suffix: String = text.chars().skip(char_count - 2).collect();
    format!("{}***{}", prefix, suffix)
}

/// Add structured logging for authentication events
pub fn log_auth_event(event_type: &str, email: &str, success: bool, details: Option<&str>) {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    if success {
        info!(
            "Auth event: type={}, user={}, success=true, timestamp={}, details={:?}",
            event_type,
            format_sensitive(email),
            timestamp,
            details
        );
    } else {
        warn!(
            "Auth event: type={}, user={}, success=false, timestamp={}, details={:?}",
            event_type,
            format_sensitive(email),
            timestamp,
            details
        );
    }
}
