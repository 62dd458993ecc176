//! Integration test suite for the Ebb preview engine.
//!
//! Drives the consensus and yield crates together through the same paths a
//! preview client takes: snapshot in, cursor and rates out.

pub mod helpers;
