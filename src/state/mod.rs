//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `WorkerState`: the lifecycle of a single fetch worker (idle, fetching,
//!   redirecting, extracting, stopped) and its legal transitions

mod worker_state;

pub use worker_state::WorkerState;
