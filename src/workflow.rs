pub mod activities;
pub mod engine;
pub mod registries;
pub mod types;
pub mod worker;
