//! Embeddable chat widget loader.
//!
//! A host page gets at most one widget instance: a container appended to its
//! body, a shadow root on that container holding the reset stylesheet, and the
//! chat UI mounted inside it. [`loader::WidgetLoader`] owns that lifecycle over
//! any [`dom::HostDocument`]; the browser build wires it to the real DOM and
//! native builds use the kuchiki backend for embed previews. The kuchiki tree
//! is never compiled into the wasm module.

pub mod autoinit;
pub mod bootstrap;
pub mod component;
pub mod dom;
pub mod embed;
pub mod loader;
#[cfg(not(target_arch = "wasm32"))]
pub mod preview;
pub mod style;
pub mod widget;

#[cfg(all(feature = "server", not(target_arch = "wasm32")))]
pub mod api;
#[cfg(all(feature = "server", not(target_arch = "wasm32")))]
pub mod config;
#[cfg(all(feature = "server", not(target_arch = "wasm32")))]
pub mod server;

pub use loader::{LoaderError, LoaderState, WidgetLoader};
pub use widget::{ConfigError, WidgetConfig};
