//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 8;

// =============================================================================
// Authentication
// =============================================================================

/// Minimum token signing secret length (security requirement)
pub const MIN_TOKEN_SECRET_LENGTH: usize = 32;

/// Longest accepted token lifetime (ten years)
pub const MAX_TOKEN_TTL_MINUTES: i64 = 10 * 365 * 24 * 60;

/// Token type identifier returned alongside issued tokens
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// =============================================================================
// Password hashing (Argon2id)
// =============================================================================

/// Default Argon2 memory cost in KiB
pub const DEFAULT_HASH_MEMORY_KIB: u32 = 19_456;

/// Default Argon2 iteration count
pub const DEFAULT_HASH_ITERATIONS: u32 = 2;

/// Default Argon2 lane count
pub const DEFAULT_HASH_PARALLELISM: u32 = 1;
