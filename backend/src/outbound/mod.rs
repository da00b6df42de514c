//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **storage**: local-filesystem document store built on `cap-std`
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations.

pub mod persistence;
pub mod storage;
