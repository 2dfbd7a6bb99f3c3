//! Shared numeric constants for the board crate.

// ── Text ────────────────────────────────────────────────────────

/// Font pixel size per unit of element `width` (a width-2 stroke setting
/// yields 20px text).
pub const FONT_PX_PER_WIDTH: f64 = 10.0;

// ── Surface ─────────────────────────────────────────────────────

/// Default surface width in pixels when the host does not specify one.
pub const DEFAULT_SURFACE_WIDTH: u32 = 800;

/// Default surface height in pixels when the host does not specify one.
pub const DEFAULT_SURFACE_HEIGHT: u32 = 600;
