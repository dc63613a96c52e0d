//! reservoir-watch dashboard shell.
//!
//! This crate wires the access layer into a Leptos single-page application
//! and ships a small static-file server for the built bundle.

#![allow(non_snake_case)]

pub mod api;
pub mod app;
#[cfg(feature = "server")]
pub mod config;
pub mod gate;
pub mod pages;
pub mod routes;
pub mod state;
pub mod storage;

/// Mounts the application into the document body.
#[cfg(feature = "csr")]
pub fn mount() {
    use crate::app::App;
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
