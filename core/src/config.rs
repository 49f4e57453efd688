//! Default tuning values for indexing, search, and the service.
//!
//! Runtime overrides come from CLI arguments and environment variables in the
//! binaries; these constants are only the defaults.

/// Fuzzy matching edit-distance bound. Kept at 1 so a query costs one linear
/// pass over each field's vocabulary.
pub const FUZZINESS: usize = 1;

/// Contribution of a token equal to the query term.
pub const SCORE_EXACT: f32 = 3.0;

/// Contribution of a token one edit away from the query term.
pub const SCORE_ONE_EDIT: f32 = 1.5;

/// Contribution of a token starting with the query term.
pub const SCORE_PREFIX: f32 = 1.0;

/// Contribution of a token containing the query term.
pub const SCORE_SUBSTRING: f32 = 0.5;

/// Number of products generated when no input file is given.
pub const DEFAULT_TOTAL_PRODUCTS: usize = 300_000;

/// Products indexed per ingestion batch.
pub const DEFAULT_BATCH_SIZE: usize = 1_000;

/// Batches between memory reclamation checkpoints during bulk loads.
pub const DEFAULT_RECLAIM_EVERY_BATCHES: usize = 1;

/// Results returned by `/search` when `limit` is absent.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Upper bound on `limit` accepted by `/search`.
pub const MAX_SEARCH_LIMIT: usize = 1_000;

pub const DEFAULT_HOST: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 8080;

/// Deadline for draining in-flight requests after a shutdown signal.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;
