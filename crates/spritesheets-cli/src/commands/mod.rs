//! CLI command implementations

pub mod doctor;
pub mod inspect;
pub mod plan;
pub mod render;
pub mod validate;

mod summary;
