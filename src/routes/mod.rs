//! API routes

pub mod drilldown;
pub mod health;
pub mod pages;
pub mod report;
pub mod upload;
