//! Exploratory analysis of Current Population Survey extracts.
//!
//! [`data`] loads and recodes the survey table once per session;
//! [`analysis`] turns the recoded table and a filter selection into the
//! aggregates drawn by the dashboard in [`ui`].

pub mod analysis;
pub mod app;
pub mod color;
pub mod data;
pub mod state;
pub mod ui;
