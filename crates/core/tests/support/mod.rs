//! Shared test helpers for `idlerig-core` integration tests.
//!
//! In-memory implementations of every core port. Each mock records the
//! calls it receives so tests can assert on traffic as well as results.

#![allow(dead_code)]

pub mod mocks;
