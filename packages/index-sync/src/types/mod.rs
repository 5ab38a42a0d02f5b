//! Data types for the synchronization engine.

pub mod action;
pub mod core;
pub mod document;
pub mod event;
