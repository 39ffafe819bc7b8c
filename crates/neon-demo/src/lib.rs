//! Console host for neon-menu.
//!
//! Runs one of the sample menus against an in-process host: the initial
//! message and every edit are printed as JSON, and interactions come from a
//! script instead of a gateway.

pub mod cli;
pub mod config;
pub mod console;
pub mod menus;
pub mod script;
