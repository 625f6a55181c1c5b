//! Ask a research service one question at a time and get a paragraph back.
//!
//! Each question becomes a uniquely named remote object: submitted, given a
//! fixed head start, fetched, and later deleted in bulk. The
//! [`Coordinator`](coordinator::Coordinator) drives that lifecycle, the
//! [`StoreClient`](store::StoreClient) talks to the service, and every call
//! lands in the [`AuditLog`](audit::AuditLog).

pub mod audit;
pub mod banner;
pub mod clock;
pub mod commands;
pub mod config;
pub mod consts;
pub mod coordinator;
pub mod error;
pub mod registry;
pub mod session;
pub mod spinner;
pub mod store;
pub mod ui;
