//! Scoring and progression core for an objection-handling sales training simulator.
//!
//! The [`training`] module holds the domain: scenario catalog, phrase scorers, the levelled
//! objection game, and tier unlocking. [`config`], [`error`] and [`telemetry`] are the
//! service plumbing shared with the API binary.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod training;
