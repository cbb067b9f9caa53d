// Viewer library - exposes all core modules for testing

// Core modules at root level
pub mod config;
pub mod export;

// Organized modules
pub mod app;
pub mod model;
pub mod primitives;
pub mod search;
pub mod services;
pub mod view;
