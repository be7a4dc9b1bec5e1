//! Asset references, fetching, decoding, fonts and colors.

/// Hex colors used by tint filters.
pub mod color;
/// Raster decoding.
pub mod decode;
/// Font resolution.
pub mod font;
/// Asset references and resolvers.
pub mod resolver;
