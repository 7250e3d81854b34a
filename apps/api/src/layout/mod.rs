// Layout stage: template catalogue, slider-driven geometry, schema certification.
// Everything here is synchronous and CPU-bound; documents are plain values.

pub mod catalogue;
pub mod engine;
pub mod model;
pub mod schema;

pub use catalogue::Catalogue;
