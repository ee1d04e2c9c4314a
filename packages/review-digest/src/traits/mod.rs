//! Trait seams for the upstream services the pipeline depends on.
//!
//! Production adapters live in [`crate::adapters`]; mocks in [`crate::testing`].

pub mod backend;
pub mod catalog;
pub mod feedback;
pub mod ledger;
