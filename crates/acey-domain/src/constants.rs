//! Domain layer constants
//!
//! Contains constants that are part of the dispatch, recovery and scheduling
//! rules. Infrastructure-specific constants remain in
//! `acey_infrastructure::constants`.

// ============================================================================
// CAPABILITY CONSTANTS
// ============================================================================

/// Base capability required by every request
pub const CAPABILITY_TEXT_GENERATION: &str = "text_generation";

/// Capability required by code skills
pub const CAPABILITY_CODE_GENERATION: &str = "code_generation";

/// Capability required by security and analysis skills
pub const CAPABILITY_ANALYSIS: &str = "analysis";

/// Capability required by graphics and audio skills
pub const CAPABILITY_MULTIMODAL: &str = "multimodal";

/// Wildcard capability satisfying every requirement
pub const CAPABILITY_ALL: &str = "all";

/// Serialized payload characters per estimated input unit
pub const CHARS_PER_INPUT_UNIT: usize = 4;

// ============================================================================
// EXECUTION CONSTANTS
// ============================================================================

/// Default hard timeout for a backend execution (60 seconds)
pub const EXECUTION_DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Default quality required for an outcome to enter the learning log
pub const QUALITY_LEARNING_THRESHOLD: f64 = 0.7;

/// Executions faster than this earn a quality bonus
pub const QUALITY_FAST_EXECUTION_MS: u64 = 1_000;

/// Executions slower than this incur a quality penalty
pub const QUALITY_SLOW_EXECUTION_MS: u64 = 5_000;

/// Default bound on concurrently running executions
pub const EXECUTION_DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Default learning log capacity
pub const LEARNING_LOG_CAPACITY: usize = 1_000;

// ============================================================================
// RECOVERY CONSTANTS
// ============================================================================

/// Default number of retries attempted by retry-with-backoff
pub const RECOVERY_MAX_RETRIES: u32 = 3;

/// Base backoff delay before the first retry
pub const RECOVERY_BASE_BACKOFF_MS: u64 = 1_000;

/// Upper bound on any single backoff delay
pub const RECOVERY_MAX_BACKOFF_MS: u64 = 30_000;

/// Default number of alternative providers tried by fallback-provider
pub const RECOVERY_MAX_FALLBACKS: usize = 2;

/// Strings are truncated to this many characters by simplify-input
pub const SIMPLIFY_MAX_STRING_CHARS: usize = 100;

/// Structured payloads keep this many entries after simplify-input
pub const SIMPLIFY_MAX_ENTRIES: usize = 3;

/// Default retention window of the outcome cache (1 hour)
pub const OUTCOME_CACHE_RETENTION_SECS: u64 = 3_600;

/// Default capacity of the outcome cache
pub const OUTCOME_CACHE_CAPACITY: u64 = 10_000;

/// Default capacity of the recovery attempt history
pub const RECOVERY_HISTORY_CAPACITY: usize = 500;

/// Strategy name reported when no strategy recovered the failure
pub const STRATEGY_EXHAUSTED: &str = "exhausted";

/// Payload action used when a request carries no `action` field
pub const DEFAULT_ACTION: &str = "default";

// ============================================================================
// SCHEDULER CONSTANTS
// ============================================================================

/// Default interval between cycles (5 minutes)
pub const SCHEDULER_DEFAULT_INTERVAL_MS: u64 = 300_000;

/// Consecutive cycle failures that trigger emergency mode
pub const SCHEDULER_MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Cycle history retention window (24 hours)
pub const SCHEDULER_HISTORY_RETENTION_SECS: u64 = 86_400;

/// Cycle records kept regardless of age
pub const SCHEDULER_HISTORY_CAPACITY: usize = 1_000;

/// Interval between periodic health checks (1 minute)
pub const SCHEDULER_HEALTH_CHECK_INTERVAL_MS: u64 = 60_000;

/// Alerts retained in the ring buffer
pub const ALERT_CAPACITY: usize = 100;

/// Alerts per hour above which the health check warns
pub const ALERT_FREQUENCY_THRESHOLD: usize = 10;
