use std::io;

/// Failures reading or writing the persisted key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Store file is not a valid preferences document: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("Failed to encode preferences document: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Why a reload produced an empty list.
///
/// None of these reach the host: the provider logs them and publishes an
/// empty generation instead.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("No cached weather data under key '{0}'")]
    Missing(String),
    #[error("Cached weather data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Could not read cached weather data: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IconLookupError {
    #[error("No icon for weather code {code} (day: {is_day})")]
    UnknownCode { code: i32, is_day: bool },
}

/// Reasons a single row could not be rendered normally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Icon lookup failed: {0}")]
    Icon(#[from] IconLookupError),
    #[error("Icon lookup panicked: {0}")]
    IconPanicked(String),
}
