//! UI module - handles all TUI rendering
//!
//! Structure:
//! - `draw/` - Screen and overlay drawing
//! - `theme.rs` - Color themes and presets

mod draw;
pub mod theme;

// Re-export main draw function
pub use draw::draw;
