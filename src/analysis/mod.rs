//! Filter/aggregate pipeline: everything the dashboard shows is derived here
//! from a recoded table and the current filter selection.

pub mod age_group;
pub mod correlation;
pub mod describe;
pub mod frequency;
pub mod histogram;
pub mod pipeline;
pub mod view;
