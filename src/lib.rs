//! Identity provisioning bridge.
//!
//! Converts the attribute bag of a validated SAML2 assertion into a local
//! application account: a configurable attribute mapping decides which
//! assertion attributes land on which account and profile fields, and the
//! [`services::SamlProvisioningService`] creates, updates, or retrieves the
//! matching account through the storage layer.
//!
//! Assertion parsing, signature validation, and session handling are the job
//! of the surrounding SAML stack; this crate starts where a verified
//! attribute bag ends up.

pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod observability;
pub mod services;
