//! # UI Module
//!
//! Styling shared by the recorder window.

pub mod styles;
