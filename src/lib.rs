//! Bounded priority queue shared by producer and consumer threads, with a
//! simulation driver that measures how the queue behaves under load.

pub mod app;
pub mod core;
pub mod metrics;
pub mod queue;
pub mod worker;
