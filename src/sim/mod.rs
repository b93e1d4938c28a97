pub mod builder;
pub mod config;
pub mod falloff;
pub mod result;
pub mod simulation;
pub mod sources;
