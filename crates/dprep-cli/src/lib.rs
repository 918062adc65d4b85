//! CLI library components for the diabetes preparation pipeline.

#![allow(missing_docs)]

pub mod logging;
pub mod pipeline;
