//! Target-language literal formatting for numbers and colors.

use scenecode_core::Rgb;

/// Format a number compactly: at most two decimals, no trailing zeros.
///
/// Non-finite values format as `0`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        let s = format!("{:.2}", rounded);
        s.trim_end_matches('0').to_string()
    }
}

/// CSS color: `#rrggbb` when opaque, `rgba(...)` otherwise.
pub fn css_color(rgb: &Rgb, alpha: f64) -> String {
    if alpha >= 1.0 || !alpha.is_finite() {
        rgb.to_hex()
    } else {
        let (r, g, b) = rgb.to_rgb8();
        format!("rgba({}, {}, {}, {})", r, g, b, format_number(alpha.max(0.0)))
    }
}

/// Flutter `Color(0xAARRGGBB)`.
pub fn flutter_color(rgb: &Rgb, alpha: f64) -> String {
    let a = if alpha.is_finite() {
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
    } else {
        255
    };
    let (r, g, b) = rgb.to_rgb8();
    format!("Color(0x{:02X}{:02X}{:02X}{:02X})", a, r, g, b)
}

/// SwiftUI `Color(red:green:blue:)` with optional opacity.
pub fn swiftui_color(rgb: &Rgb, alpha: f64) -> String {
    let (r, g, b) = rgb.to_rgb8();
    let channel = |c: u8| format_number(f64::from(c) / 255.0);
    let base = format!(
        "Color(red: {}, green: {}, blue: {})",
        channel(r),
        channel(g),
        channel(b)
    );
    if alpha < 1.0 && alpha.is_finite() {
        format!("{}.opacity({})", base, format_number(alpha.max(0.0)))
    } else {
        base
    }
}
