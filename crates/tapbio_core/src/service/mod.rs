//! Core use-case services.
//!
//! # Responsibility
//! - Combine the in-memory store with persistence (`EditorSession`).
//! - Publish and resolve hosted profiles (`PublishService`).
//! - Keep CLI callers decoupled from storage details.

pub mod editor_session;
pub mod publish_service;
