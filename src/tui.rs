//! Terminal front end: one seat driven from the keyboard, bots on the rest.

pub mod app;
pub mod controller;
mod ui;
