//! Color tokens shared by the canvas views.

/// Per-file node palette, indexed by a stable hash of the file path.
pub const PALETTE: &[&str] = &[
	"#3b82f6", "#ef4444", "#22d3ee", "#f97316", "#a855f7", "#84cc16", "#ec4899", "#6b7280",
];

pub const BACKGROUND: &str = "#0f172a";
pub const TEXT: &str = "#ffffff";
pub const TEXT_MUTED: &str = "#9ca3af";

pub const DROPPED_FILL: &str = "#4b5563";
pub const DROPPED_TEXT: &str = "#9ca3af";
pub const DROPPED_SHADOW: &str = "#6b7280";

pub const EDGE: &str = "rgba(148, 163, 184, 0.15)";
pub const EDGE_DROPPED: &str = "rgba(148, 163, 184, 0.05)";

pub const RADIAL_BACKGROUND_INNER: &str = "#1e293b";
pub const RADIAL_SELECTED: &str = "#22d3ee";
pub const RADIAL_DROPPED: &str = "#475569";
pub const RADIAL_DROPPED_HOVER: &str = "#64748b";
pub const RADIAL_FOCUS: &str = "#3b82f6";

/// Stable string hash (`h = h * 31 + unit`) over UTF-16 code units.
pub fn file_hash(file: &str) -> u32 {
	file.encode_utf16()
		.fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as u32))
}

/// Palette entry for a source file. Same path, same color.
pub fn color_for_file(file: &str) -> &'static str {
	PALETTE[file_hash(file) as usize % PALETTE.len()]
}
