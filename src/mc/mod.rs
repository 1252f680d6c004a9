pub mod engine;
pub mod path;
pub mod payoffs;
pub mod worker;
