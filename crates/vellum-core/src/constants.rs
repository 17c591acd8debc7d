//! Numeric constants shared across geometry, interaction and export.

/// Extra hit slop added to half the stroke width.
pub const HIT_TOLERANCE: f64 = 2.0;

/// Minimum hit slop for polygon edges.
pub const MIN_POLYGON_HIT_TOLERANCE: f64 = 4.0;

/// Anti-aliasing margin added around shapes in the export bounds.
pub const AA_MARGIN: f64 = 1.0;

/// Starting extents are clamped to at least this before dividing.
pub const MIN_RESIZE_EXTENT: f64 = 2.0;

/// Lower bound for any resize scale factor.
pub const MIN_SCALE_FACTOR: f64 = 0.01;

/// Smallest font size a resize may produce.
pub const MIN_FONT_SIZE: f64 = 1.0;

/// Side length of a selection corner handle.
pub const HANDLE_SIZE: f64 = 8.0;

/// Radius around the first polygon vertex that closes the draft.
pub const POLYGON_CLOSE_RADIUS: f64 = 10.0;

/// Minimum vertices for a committed polygon.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Intrinsic size used when embedded markup has no usable dimensions.
pub const DEFAULT_EMBED_SIZE: f64 = 100.0;

/// Maximum number of undo snapshots kept.
pub const HISTORY_LIMIT: usize = 100;

/// Current document snapshot version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Dash pattern of the selection frame.
pub const SELECTION_DASH: [f32; 2] = [4.0, 4.0];

/// Selection overlay color.
pub const SELECTION_COLOR: &str = "#00aaff";
