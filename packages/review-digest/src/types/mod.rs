//! Data types for the review digest pipeline.

pub mod analysis;
pub mod config;
pub mod product;
pub mod record;
pub mod review;
