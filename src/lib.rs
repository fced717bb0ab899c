//! Terminal text input and data table widgets, plus the demo app that
//! wires them together.

pub mod app;
pub mod config;
pub mod data;
pub mod record;
pub mod theme;
pub mod ui;
