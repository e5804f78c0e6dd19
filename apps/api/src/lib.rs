//! Portfolio API Library
//!
//! Backend for a photography portfolio: content CRUD (photos, testimonials,
//! contact inquiries, the about profile) over a document store, and a gateway
//! to pluggable chat, search and image agents.

pub mod agents;
pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
