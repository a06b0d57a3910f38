/// State management module
///
/// This module holds all session state, including:
/// - The loaded collections and their records (data.rs)
/// - Per-tab visibility windows (window.rs) and the sentinel observer (proximity.rs)
/// - Masonry column distribution (columns.rs)
/// - Prefetch bookkeeping (prefetch.rs) and the decoded image cache (cache.rs)
/// - The lightbox state machine (lightbox.rs) and navigational route (route.rs)
/// - The session controller tying it all together (session.rs)

pub mod cache;
pub mod columns;
pub mod data;
pub mod lightbox;
pub mod prefetch;
pub mod proximity;
pub mod route;
pub mod session;
pub mod window;
