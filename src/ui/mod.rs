/// View helpers
///
/// - The tab header, masonry grid and sentinel row (grid.rs)
/// - The lightbox overlay (lightbox.rs)

pub mod grid;
pub mod lightbox;
