//! Outsourcing Cost Engine
//!
//! This crate prices the monthly cost of outsourcing employees under the
//! Brazilian Simples Nacional and presumed/real profit tax regimes: charges,
//! benefits, termination provisions, additional costs, and a closed-form
//! margin and tax solver over a configurable pricing policy.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
