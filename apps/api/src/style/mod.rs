// Style stage: CI palette and option validation, adaptive typography,
// container looks per zone role, accent sizing, contrast checks.

pub mod accents;
pub mod containers;
pub mod contrast;
pub mod options;
pub mod resolver;
pub mod roles;
pub mod typography;
