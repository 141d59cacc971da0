// src/models/mod.rs

pub mod criteria;
pub mod record;
pub mod report;
