//! Domain logic for larder: ingredient catalog, recipe repository, weekly
//! menu planning, and shopping-list aggregation.
//!
//! All store access goes through the [`store::Store`] repository trait, so
//! every service here can run against the PostgreSQL backend or the
//! in-memory [`store::MemStore`] interchangeably.

pub mod catalog;
pub mod menu;
pub mod recipe;
pub mod shopping;
pub mod store;
