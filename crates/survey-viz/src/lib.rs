//! survey-viz: synthetic survey data and exploratory charts.
//!
//! This crate provides a seeded synthetic data generator driven by explicit
//! recipes, a wide-to-long reshaper (and its inverse), the small statistics
//! each tutorial chart needs (quartiles, kernel densities, correlations,
//! regression fits), plotly chart builders and an HTML report that strings the
//! charts together into the tutorial document.
pub mod config;
pub mod error;
pub mod generator;
pub mod geo;
pub mod io;
pub mod layout;
pub mod plots;
pub mod preprocessing;
pub mod presets;
pub mod report;
pub mod reshape;
pub mod stats;
pub mod table;
pub mod tips;
