//! Common types and utilities for populators.
//!
//! This crate provides the argument types shared by every
//! `docstore-datagen populate <backend>` command.

pub mod args;

pub use args::{CommonPopulateArgs, FailurePolicyArg, DEFAULT_ITEM_COUNT, DEFAULT_THROUGHPUT};
