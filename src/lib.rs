pub mod app;
pub mod calendar;
pub mod capture;
pub mod components;
pub mod config;
pub mod event;
pub mod logging;
pub mod remote;
pub mod theme;
pub mod tui;
