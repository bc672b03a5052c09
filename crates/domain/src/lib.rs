#![forbid(unsafe_code)]

pub mod common;
pub mod dedup;
pub mod enrichment;
pub mod event;
pub mod notify;
