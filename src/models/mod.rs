// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod photo;
pub mod vote;

pub use photo::*;
pub use vote::*;
