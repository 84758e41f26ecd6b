//! Axis scaling and text estimation shared by the two layout families.
//!
//! Everything scales off a fixed design size per orientation; width and
//! height scale independently so off-aspect canvases stretch gracefully,
//! while unit and font sizes follow the smaller axis.

/// Portrait design size the portrait constants were authored against.
pub const PORTRAIT_DESIGN_WIDTH: f64 = 1080.0;
pub const PORTRAIT_DESIGN_HEIGHT: f64 = 1920.0;

/// Landscape design size.
pub const LANDSCAPE_DESIGN_WIDTH: f64 = 1200.0;
pub const LANDSCAPE_DESIGN_HEIGHT: f64 = 675.0;

#[derive(Clone, Copy, Debug)]
pub struct AxisScales {
    pub x: f64,
    pub y: f64,
}

impl AxisScales {
    pub fn new(canvas_width: f64, canvas_height: f64, design_width: f64, design_height: f64) -> Self {
        Self {
            x: canvas_width / design_width,
            y: canvas_height / design_height,
        }
    }

    /// Uniform scale for sizes that must not stretch with one axis.
    pub fn unit(self) -> f64 {
        self.x.min(self.y)
    }
}

/// Two-decimal rounding applied to scaled lengths so equal inputs produce
/// bit-identical plans.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Estimated width of a run of text at a font size, without shaping. Wide
/// enough for the heavy weights the composition uses; pills and badges size
/// themselves from this.
pub fn approx_text_width(text: &str, font_size: f64) -> f64 {
    let mut units = 0.0;
    for ch in text.chars() {
        units += match ch {
            ' ' | 'i' | 'l' | 'j' | '.' | ',' | ':' | '\'' | '|' | '!' => 0.34,
            'm' | 'w' | 'M' | 'W' | '@' => 0.92,
            c if c.is_ascii_uppercase() || c.is_ascii_digit() => 0.68,
            c if c.is_ascii() => 0.56,
            // Emoji and CJK render roughly square.
            _ => 1.0,
        };
    }
    units * font_size
}

/// Shrinks a font size when the text runs past a character budget, never
/// below the floor. Mirrors how the header scales down long titles.
pub fn shrink_to_fit(base: f64, floor: f64, len: usize, max_chars: usize) -> f64 {
    if len <= max_chars {
        return base;
    }
    floor.max((base * max_chars as f64 / len as f64).round())
}

/// Estimated line count against a characters-per-line budget, clamped to the
/// header's three-line maximum.
pub fn line_count(len: usize, chars_per_line: usize) -> u32 {
    let cpl = chars_per_line.max(1);
    (len.div_ceil(cpl)).clamp(1, 3) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_takes_the_smaller_axis() {
        let s = AxisScales::new(540.0, 1920.0, PORTRAIT_DESIGN_WIDTH, PORTRAIT_DESIGN_HEIGHT);
        assert_eq!(s.x, 0.5);
        assert_eq!(s.y, 1.0);
        assert_eq!(s.unit(), 0.5);
    }

    #[test]
    fn shrink_only_past_the_budget() {
        assert_eq!(shrink_to_fit(56.0, 28.0, 10, 72), 56.0);
        assert_eq!(shrink_to_fit(56.0, 28.0, 72, 72), 56.0);
        // 56 * 72 / 144 = 28, exactly the floor.
        assert_eq!(shrink_to_fit(56.0, 28.0, 144, 72), 28.0);
        // Far past the budget the floor holds.
        assert_eq!(shrink_to_fit(56.0, 28.0, 1000, 72), 28.0);
    }

    #[test]
    fn line_count_clamps_to_three() {
        assert_eq!(line_count(0, 24), 1);
        assert_eq!(line_count(24, 24), 1);
        assert_eq!(line_count(25, 24), 2);
        assert_eq!(line_count(500, 24), 3);
    }

    #[test]
    fn wider_text_measures_wider() {
        let narrow = approx_text_width("ill", 20.0);
        let wide = approx_text_width("WMW", 20.0);
        assert!(narrow < wide);
        assert!(approx_text_width("", 20.0) == 0.0);
    }
}
