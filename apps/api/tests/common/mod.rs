//! Common test utilities for API integration tests
//!
//! This module provides shared infrastructure for the integration suites:
//! request builders, response parsing, and GraphQL-driven fixtures.

#![allow(unused_imports)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
