//! Structured logging field name constants.
//!
//! All crates use these names for structured `tracing` fields so log
//! aggregation can query the same keys across the api and db layers.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Request failed because of the gateway, requires attention |
//! | WARN  | Client error (validation, not found), config fallback applied |
//! | INFO  | Lifecycle events (startup, migrations, seeding), writes |
//! | DEBUG | Decision points, tag sync plans, pool metrics |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the `x-request-id` header.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "database"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "products", "product_tags", "seed"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "create", "update", "sync_tags"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Category identity being operated on.
pub const CATEGORY_ID: &str = "category_id";

/// Product identity being operated on.
pub const PRODUCT_ID: &str = "product_id";

/// Tag identity being operated on.
pub const TAG_ID: &str = "tag_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Rows affected by an update or delete.
pub const ROWS_AFFECTED: &str = "rows_affected";

/// Number of junction rows inserted by a tag sync.
pub const TO_ADD: &str = "to_add";

/// Number of junction rows deleted by a tag sync.
pub const TO_REMOVE: &str = "to_remove";

/// Number of rows returned by a list query.
pub const RESULT_COUNT: &str = "result_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
