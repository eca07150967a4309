//! Bridge between the egui thread and the async snapshot repository.

pub mod commands;
pub mod runtime;
