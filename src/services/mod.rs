// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod photo_service;
pub mod storage_client;
pub mod vote_reconciler;

pub use photo_service::*;
pub use storage_client::*;
pub use vote_reconciler::*;
