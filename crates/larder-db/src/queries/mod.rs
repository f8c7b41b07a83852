//! Query functions, one module per table.

pub mod ingredients;
pub mod recipes;
pub mod weekly_plans;
