//! services/api/src/lib.rs
//!
//! HTTP backend for the clinic website: appointment requests, newsletter
//! sign-ups and customer questions.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
