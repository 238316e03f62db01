/// State management module
///
/// This module handles all application state, including:
/// - Backend data structures (data.rs)
/// - The ordered print selection with per-photo copy counts (selection.rs)

pub mod data;
pub mod selection;
