//! PostgreSQL storage layer for larder.
//!
//! Three collections back the application: `ingredients` (the catalog),
//! `recipes` (whole-document recipe rows with JSONB ingredient and step
//! lists), and `weekly_plans` (a single document row holding the menu plan
//! and its memo). Query functions live under [`queries`], grouped per table.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
