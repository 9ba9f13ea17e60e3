//! # ZenEdit UI
//!
//! Console frontend: one command per input line, the document redrawn
//! with its surface style after every visible change.
//!
//! ## Architecture
//!
//! The UI follows the Elm architecture (TEA):
//! - **Model**: the `Editor` owned by `App`
//! - **Message**: `AppEvent` (input lines and timer ticks)
//! - **Update**: `App::update` applies one message at a time
//! - **View**: `Renderer` draws the editor's `SurfaceStyle`
//!
//! ## Learning: One Owner, Many Producers
//!
//! Timers and the stdin reader never touch the editor. They post
//! messages into one channel, and the loop that owns the editor handles
//! them in order.

pub mod app;
pub mod render;

pub use app::{App, AppEvent, Flags, run};
pub use render::Renderer;
