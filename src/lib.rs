//! Idea Lens - business idea analysis service
//!
//! Turns a free-text business idea into a validated, internally consistent
//! `Analysis` by prompting a language model, sanitizing and validating its
//! output, correcting what can be corrected and retrying the rest.

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
