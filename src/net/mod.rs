/// Network plumbing
///
/// This module handles:
/// - The shared HTTP client and byte fetching (fetch.rs)
/// - Best-effort image prefetching (fetch.rs)
/// - Saving photos to disk (download.rs)

pub mod download;
pub mod fetch;
