//! Infrastructure layer constants
//!
//! Dispatch, recovery and scheduling defaults live in
//! `acey_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "acey.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "acey";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "ACEY";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "ACEY_LOG";

/// File stem used when the log file path has none
pub const LOG_FILE_FALLBACK_STEM: &str = "acey";

// ============================================================================
// EVENT BUS CONSTANTS
// ============================================================================

/// Default broadcast channel capacity
pub const EVENT_BUS_DEFAULT_CAPACITY: usize = 1024;
