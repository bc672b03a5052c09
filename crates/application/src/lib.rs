#![forbid(unsafe_code)]

pub mod enrichment;
pub mod poll_pipeline;
pub mod retry;
