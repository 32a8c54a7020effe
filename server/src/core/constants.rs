// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Footfall";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "footfall";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "footfall.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "FOOTFALL_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "FOOTFALL_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "FOOTFALL_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "FOOTFALL_LOG";

// =============================================================================
// Environment Variables - Counter Store
// =============================================================================

/// Environment variable for store backend selection (memory or redis)
pub const ENV_STORE_BACKEND: &str = "FOOTFALL_STORE_BACKEND";

/// Environment variable for the Redis-compatible store URL
pub const ENV_REDIS_URL: &str = "FOOTFALL_REDIS_URL";

// =============================================================================
// Environment Variables - Counter Behavior
// =============================================================================

/// Environment variable for read-cache TTL in seconds
pub const ENV_CACHE_TTL_SECS: &str = "FOOTFALL_CACHE_TTL_SECS";

/// Environment variable for write-buffer flush interval in seconds
pub const ENV_FLUSH_INTERVAL_SECS: &str = "FOOTFALL_FLUSH_INTERVAL_SECS";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5180;

// =============================================================================
// Counter Defaults
// =============================================================================

/// Default read-cache TTL in seconds
///
/// Cached counts older than this are treated as stale and re-read from the
/// store on the next request.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 5;

/// Default write-buffer flush interval in seconds
pub const DEFAULT_FLUSH_INTERVAL_SECS: u64 = 30;

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum time to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
