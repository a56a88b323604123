//! Test modules for the priority queue
//!
//! Tests are organized by functional area: ordering rules, blocking and
//! backpressure, cancellation, and concurrent stress.

mod blocking;
