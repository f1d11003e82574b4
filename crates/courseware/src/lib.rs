//! Course content tree, progress derivation, quiz scoring, activity
//! aggregation, analytics roll-ups and breadcrumb resolution for an LMS.
//!
//! The derivation modules ([`progress`], [`quiz`], [`activity`],
//! [`analytics`], [`navigation`]) are pure functions over in-memory
//! snapshots. Snapshots enter the crate through [`wire`], which turns loosely
//! shaped backend JSON into the strict types of [`content`] and
//! [`enrollment`]. The [`backend`] and [`server`] modules are the only places
//! that perform I/O.

pub mod activity;
pub mod analytics;
pub mod backend;
pub mod config;
pub mod content;
pub mod enrollment;
pub mod error;
pub mod gamification;
pub mod navigation;
pub mod progress;
pub mod quiz;
pub mod server;
pub mod wire;

pub use error::ValidationError;
