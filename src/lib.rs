//! Chemical Equipment Parameter Visualizer.
//!
//! Two processes built from one library: `equipment-server` exposes the
//! CSV aggregation endpoint, `equipment-desktop` is the client shell that
//! uploads a file and renders the returned statistics.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
