// src/services/mod.rs

pub mod aggregator;
pub mod completion;
pub mod grading;
pub mod parser;
pub mod scorer;
