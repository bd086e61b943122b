//! Label measurement.
//!
//! Element bounds may depend on the size of their name. Measuring goes
//! through the [`TextMeasurer`] trait so that layout stays deterministic in
//! tests and headless environments:
//!
//! - [`MonospaceMeasurer`] - display-width based estimate, always available
//! - `FontSystemMeasurer` - shaped measurement through `cosmic-text`, behind
//!   the `system-fonts` feature
//!
//! Labels wrap on explicit line breaks only; there is no word wrapping.
//!
//! # Examples
//!
//! ```
//! # use trellis_core::text::{MonospaceMeasurer, TextDefinition, measure_label};
//! let definition = TextDefinition::default();
//! let one = measure_label(&MonospaceMeasurer, "Order", &definition);
//! let two = measure_label(&MonospaceMeasurer, "Order\nLine", &definition);
//! assert_eq!(one.width(), two.width());
//! assert_eq!(two.height(), one.height() * 2.0);
//! ```

use std::fmt;

use unicode_width::UnicodeWidthStr;

use crate::geometry::{Insets, Size};

/// Conversion factor from points to pixels at standard DPI.
const PT_TO_PX: f32 = 1.33;
/// Line height as a multiple of the pixel font size.
const LINE_HEIGHT_FACTOR: f32 = 1.15;
/// Average glyph advance as a multiple of the pixel font size.
const ADVANCE_FACTOR: f32 = 0.55;

/// Font parameters used to measure a label.
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"Arial"` |
/// | Font size | `15` |
/// | Padding | 10 horizontal, 5 vertical |
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_family: String,
    font_size: u16,
    padding: Insets,
}

impl TextDefinition {
    pub fn new(font_family: &str, font_size: u16) -> Self {
        Self {
            font_family: font_family.to_string(),
            font_size,
            ..Self::default()
        }
    }

    /// Sets the font size in points.
    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    /// Sets the font family name (e.g. "Arial", "monospace").
    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    /// Sets the space kept between the label and the element border.
    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }

    /// Font size converted to pixels.
    pub fn font_size_px(&self) -> f32 {
        self.font_size as f32 * PT_TO_PX
    }

    /// Height of a single rendered line in pixels.
    pub fn line_height(&self) -> f32 {
        self.font_size_px() * LINE_HEIGHT_FACTOR
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 15,
            padding: Insets::new(5.0, 10.0, 5.0, 10.0),
        }
    }
}

/// Measures the rendered extent of text.
///
/// Implementations only need to measure a single line; multi-line handling
/// and padding are provided by [`measure_label`].
pub trait TextMeasurer: fmt::Debug + Send + Sync {
    /// Width in pixels of one line of text (no line breaks).
    fn line_width(&self, line: &str, definition: &TextDefinition) -> f32;

    /// Height in pixels of one line of text.
    fn line_height(&self, definition: &TextDefinition) -> f32 {
        definition.line_height()
    }
}

/// Returns the size needed to render `text` without clipping, padding excluded.
///
/// Each `\n` starts a new line. Empty text measures as zero.
pub fn measure_text(measurer: &dyn TextMeasurer, text: &str, definition: &TextDefinition) -> Size {
    if text.is_empty() {
        return Size::default();
    }

    let mut width: f32 = 0.0;
    let mut line_count = 0usize;
    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        width = width.max(measurer.line_width(line, definition));
        line_count += 1;
    }

    Size::new(width, measurer.line_height(definition) * line_count as f32)
}

/// Returns the minimum size of a label including the definition's padding.
///
/// Empty text has no label and measures as zero, padding included.
pub fn measure_label(measurer: &dyn TextMeasurer, text: &str, definition: &TextDefinition) -> Size {
    if text.is_empty() {
        return Size::default();
    }
    measure_text(measurer, text, definition).add_padding(definition.padding())
}

/// Deterministic measurer based on terminal display width.
///
/// Each display column advances by a fixed fraction of the pixel font size,
/// so wide (CJK) characters count double.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMeasurer;

impl TextMeasurer for MonospaceMeasurer {
    fn line_width(&self, line: &str, definition: &TextDefinition) -> f32 {
        line.width() as f32 * definition.font_size_px() * ADVANCE_FACTOR
    }
}

#[cfg(feature = "system-fonts")]
pub use font_system::FontSystemMeasurer;

#[cfg(feature = "system-fonts")]
mod font_system {
    use std::sync::{Mutex, PoisonError};

    use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
    use log::info;

    use super::{ADVANCE_FACTOR, TextDefinition, TextMeasurer};

    /// Shaped text measurement using the fonts installed on the system.
    ///
    /// Creating a `FontSystem` scans the installed fonts, so build one
    /// measurer and share it.
    pub struct FontSystemMeasurer {
        font_system: Mutex<FontSystem>,
    }

    impl std::fmt::Debug for FontSystemMeasurer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("FontSystemMeasurer").finish_non_exhaustive()
        }
    }

    impl Default for FontSystemMeasurer {
        fn default() -> Self {
            Self::new()
        }
    }

    impl FontSystemMeasurer {
        pub fn new() -> Self {
            info!("Initializing FontSystem");
            Self {
                font_system: Mutex::new(FontSystem::new()),
            }
        }
    }

    impl TextMeasurer for FontSystemMeasurer {
        fn line_width(&self, line: &str, definition: &TextDefinition) -> f32 {
            if line.is_empty() {
                return 0.0;
            }

            let mut font_system = self
                .font_system
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            let font_size_px = definition.font_size_px();
            let metrics = Metrics::new(font_size_px, definition.line_height());

            let mut buffer = Buffer::new(&mut font_system, metrics);
            let mut buffer = buffer.borrow_with(&mut font_system);
            let attrs = Attrs::new().family(Family::Name(definition.font_family()));

            buffer.set_size(None, None);
            buffer.set_text(line, &attrs, Shaping::Advanced, None);
            buffer.shape_until_scroll(true);

            let width = buffer
                .layout_runs()
                .filter_map(|run| run.glyphs.last().map(|glyph| glyph.x + glyph.w))
                .fold(None, |acc: Option<f32>, w| Some(acc.map_or(w, |a| a.max(w))));

            // No layout runs means no usable font was found.
            width.unwrap_or(line.chars().count() as f32 * font_size_px * ADVANCE_FACTOR)
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_text_definition_default() {
        let def = TextDefinition::default();
        assert_eq!(def.font_family(), "Arial");
        assert_eq!(def.font_size(), 15);
        assert_approx_eq!(f32, def.padding().horizontal_sum(), 20.0);
        assert_approx_eq!(f32, def.padding().vertical_sum(), 10.0);
    }

    #[test]
    fn test_text_definition_setters() {
        let mut def = TextDefinition::new("Helvetica", 12);
        def.set_font_size(20);
        def.set_font_family("monospace");
        def.set_padding(Insets::uniform(0.0));

        assert_eq!(def.font_size(), 20);
        assert_eq!(def.font_family(), "monospace");
        assert_eq!(def.padding(), Insets::uniform(0.0));
        assert_approx_eq!(f32, def.font_size_px(), 26.6);
    }

    #[test]
    fn test_empty_text_is_zero() {
        let def = TextDefinition::default();
        assert_eq!(measure_text(&MonospaceMeasurer, "", &def), Size::default());
        assert_eq!(measure_label(&MonospaceMeasurer, "", &def), Size::default());
    }

    #[test]
    fn test_monospace_single_line() {
        let def = TextDefinition::default();
        let size = measure_text(&MonospaceMeasurer, "abcd", &def);
        assert_approx_eq!(f32, size.width(), 4.0 * 15.0 * 1.33 * 0.55);
        assert_approx_eq!(f32, size.height(), 15.0 * 1.33 * 1.15);
    }

    #[test]
    fn test_multiline_takes_widest_line() {
        let def = TextDefinition::default();
        let wide = measure_text(&MonospaceMeasurer, "longest line", &def);
        let multi = measure_text(&MonospaceMeasurer, "short\nlongest line\r\nmid", &def);

        assert_approx_eq!(f32, multi.width(), wide.width());
        assert_approx_eq!(f32, multi.height(), wide.height() * 3.0);
    }

    #[test]
    fn test_trailing_newline_adds_line() {
        let def = TextDefinition::default();
        let single = measure_text(&MonospaceMeasurer, "name", &def);
        let trailing = measure_text(&MonospaceMeasurer, "name\n", &def);
        assert_approx_eq!(f32, trailing.height(), single.height() * 2.0);
    }

    #[test]
    fn test_wide_characters_count_double() {
        let def = TextDefinition::default();
        let ascii = measure_text(&MonospaceMeasurer, "ab", &def);
        let cjk = measure_text(&MonospaceMeasurer, "図", &def);
        assert_approx_eq!(f32, cjk.width(), ascii.width());
    }

    #[test]
    fn test_label_includes_padding() {
        let def = TextDefinition::default();
        let text = measure_text(&MonospaceMeasurer, "Task", &def);
        let label = measure_label(&MonospaceMeasurer, "Task", &def);
        assert_approx_eq!(f32, label.width(), text.width() + 20.0);
        assert_approx_eq!(f32, label.height(), text.height() + 10.0);
    }
}
