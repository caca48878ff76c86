//! Markup tool types and stroke styling.

/// Markup tools available in the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkupTool {
    /// Freehand pen
    #[default]
    Pen,
    /// Square eraser
    Eraser,
    /// Straight line
    Line,
    /// Rectangle outline
    Rect,
    /// Circle outline around the start point
    Circle,
    /// Text label
    Text,
}

impl MarkupTool {
    /// Get the display name for this tool.
    pub fn name(&self) -> &'static str {
        match self {
            MarkupTool::Pen => "Pen",
            MarkupTool::Eraser => "Eraser",
            MarkupTool::Line => "Line",
            MarkupTool::Rect => "Rectangle",
            MarkupTool::Circle => "Circle",
            MarkupTool::Text => "Text",
        }
    }

    /// Get all available markup tools.
    pub fn all() -> &'static [MarkupTool] {
        &[
            MarkupTool::Pen,
            MarkupTool::Eraser,
            MarkupTool::Line,
            MarkupTool::Rect,
            MarkupTool::Circle,
            MarkupTool::Text,
        ]
    }

    /// Whether this tool paints continuously while the pointer moves.
    pub fn is_continuous(&self) -> bool {
        matches!(self, MarkupTool::Pen | MarkupTool::Eraser)
    }
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => Some(Self::new(
                u8::from_str_radix(&digits[0..2], 16).ok()?,
                u8::from_str_radix(&digits[2..4], 16).ok()?,
                u8::from_str_radix(&digits[4..6], 16).ok()?,
            )),
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).map(|v| v * 17);
                Some(Self::new(nibble(0).ok()?, nibble(1).ok()?, nibble(2).ok()?))
            }
            _ => None,
        }
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
