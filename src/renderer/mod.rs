//! WebGPU rendering module
//!
//! The scene is built as flat-colored triangles in pixel space, then mapped to
//! NDC and drawn with a single vertex pipeline.

pub mod hud;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use hud::{HudText, OVERLAY_IDS, format_clock, format_health, option_glyph, overlay_for};
pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
