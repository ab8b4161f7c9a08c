#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Core of the agency site: view routing, background effect selection,
//! the animation engines behind each page and the contact form.
//!
//! Everything outside `wasm` is plain Rust and is tested on the host; the
//! `wasm` module wires it into the browser.

pub mod background;
pub mod config;
pub mod contact;
pub mod effects;
pub mod engine;
pub mod error;
pub mod page;
pub mod particles;
pub mod router;
pub mod shader;

pub use config::SiteConfig;
pub use effects::{effect_for, EffectConfig, ShaderKind};
pub use error::{ContactError, SiteError};
pub use page::PageId;
pub use router::{NavigationState, Router};

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm;
