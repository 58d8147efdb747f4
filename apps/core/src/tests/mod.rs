//! Test Module
//!
//! Cross-module test suites for the health risk core.
//!
//! ## Test Categories
//! - `enricher_tests`: explanation generation, repair and template fallback
//! - `encryption_tests`: AES-256-GCM encryption/decryption and key files
//! - `storage_tests`: encrypted append-only persistence
//! - `preflight_tests`: startup checks
//! - `integration_tests`: full assessment workflow through the service

mod support;
