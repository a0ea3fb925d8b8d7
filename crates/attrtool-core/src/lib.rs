//! Core infrastructure for attrtool.
//!
//! This crate provides the language-agnostic parts of the annotation
//! migration engine:
//! - Error types for the migration engine
//! - Docblock comment surgery (pure, line-oriented text processing)
//! - Migration outcome reporting for orchestrators

pub mod docblock;
pub mod error;
pub mod outcome;
