/// Collection name for persisted report documents.
/// Kept as the original deployment named it so existing data stays reachable.
pub const REPORTS_COLLECTION: &str = "reportes";

/// Key prefix for uploaded report photos in the blob store
pub const PHOTO_KEY_PREFIX: &str = "reportes_hoyos";

/// Minimum report description length
pub const DESCRIPTION_MIN_LEN: usize = 10;

/// Number of description characters shown in a report summary
pub const SUMMARY_DESCRIPTION_LEN: usize = 30;
