// Pagination engine for quotation documents.
// Weight estimation, page allocation with description splitting, A4 geometry.
// Everything here is synchronous and pure; handlers run it on the blocking pool.

pub mod allocator;
pub mod geometry;
pub mod handlers;
pub mod weight;

pub use geometry::PageGeometry;
