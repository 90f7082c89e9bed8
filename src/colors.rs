//! Perceptual color folding: `oklab()`/`oklch()` function calls become the
//! shortest equivalent hex literal.
//!
//! Conversion uses the published OKLab reference matrices (OKLab → LMS →
//! linear sRGB, then gamma encoding). Channels are clamped to [0, 1] and
//! scaled to [0, 255] truncating toward zero. The 3-digit form is used
//! only when every channel survives nybble duplication with error ≤ 10;
//! otherwise the 6-digit form is emitted. An unparseable color is left
//! exactly as written.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::tree::{self, AssetTree};

/// A perceptual color function call, either accepted form.
static COLOR_FN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:oklab|oklch)\([^)]+\)").unwrap());

/// Per-channel error tolerance for the 3-digit short form.
const SHORT_FORM_TOLERANCE: i16 = 10;

/// Fold every color function call in every text file.
pub async fn fold_colors(tree: &AssetTree) -> eyre::Result<()> {
    for path in tree.text_files() {
        let contents = tree::read(path).await?;
        let rewritten = COLOR_FN_REGEX.replace_all(&contents, |caps: &Captures| {
            fold(&caps[0]).unwrap_or_else(|| caps[0].to_string())
        });
        if rewritten != contents {
            tree::write(path, &rewritten).await?;
        }
    }
    Ok(())
}

/// Convert one `oklab(...)`/`oklch(...)` call to a hex literal.
/// Returns `None` when the arguments cannot be parsed.
pub fn fold(call: &str) -> Option<String> {
    let open = call.find('(')?;
    let func = &call[..open];
    let args = call.get(open + 1..call.len().checked_sub(1)?)?;

    // alpha component is dropped, as hex output has no alpha channel
    let args = args.split('/').next()?.trim();
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }

    let l = parse_component(parts[0], 1.0)?;
    let (a, b) = match func {
        "oklab" => (
            parse_component(parts[1], 0.4)?,
            parse_component(parts[2], 0.4)?,
        ),
        "oklch" => {
            let c = parse_component(parts[1], 0.4)?;
            let h = parse_hue(parts[2])?.to_radians();
            (c * h.cos(), c * h.sin())
        }
        _ => return None,
    };

    let (r, g, bl) = oklab_to_srgb(l, a, b);
    let channels = [r, g, bl].map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8);

    let short: Option<String> = channels
        .iter()
        .map(|&c| nybble(c))
        .collect::<Option<Vec<char>>>()
        .map(|nybbles| format!("#{}{}{}", nybbles[0], nybbles[1], nybbles[2]));

    Some(short.unwrap_or_else(|| {
        format!("#{:02x}{:02x}{:02x}", channels[0], channels[1], channels[2])
    }))
}

/// Parse a number or percentage; `percent_scale` is the value 100% maps to.
fn parse_component(s: &str, percent_scale: f64) -> Option<f64> {
    if s == "none" {
        return Some(0.0);
    }
    if let Some(pct) = s.strip_suffix('%') {
        return Some(pct.parse::<f64>().ok()? / 100.0 * percent_scale);
    }
    s.parse().ok()
}

/// Parse a hue in degrees; bare numbers and `deg` are accepted.
fn parse_hue(s: &str) -> Option<f64> {
    if s == "none" {
        return Some(0.0);
    }
    let s = s.strip_suffix("deg").unwrap_or(s);
    s.parse().ok()
}

/// OKLab → gamma-encoded sRGB.
fn oklab_to_srgb(l: f64, a: f64, b: f64) -> (f64, f64, f64) {
    let l_ = l + 0.396_337_777_4 * a + 0.215_803_757_3 * b;
    let m_ = l - 0.105_561_345_8 * a - 0.063_854_172_8 * b;
    let s_ = l - 0.089_484_177_5 * a - 1.291_485_548_0 * b;

    let l3 = l_ * l_ * l_;
    let m3 = m_ * m_ * m_;
    let s3 = s_ * s_ * s_;

    let r = 4.076_741_662_1 * l3 - 3.307_711_591_3 * m3 + 0.230_969_929_2 * s3;
    let g = -1.268_438_004_6 * l3 + 2.609_757_401_1 * m3 - 0.341_319_396_5 * s3;
    let bl = -0.004_196_086_3 * l3 - 0.703_418_614_7 * m3 + 1.707_614_701_0 * s3;

    (gamma(r), gamma(g), gamma(bl))
}

/// Linear → gamma-encoded sRGB channel.
fn gamma(x: f64) -> f64 {
    if x <= 0.003_130_8 {
        12.92 * x
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    }
}

/// The channel's high nybble as a hex digit, if duplicating it
/// reconstructs the byte within tolerance.
fn nybble(value: u8) -> Option<char> {
    let hi = value >> 4;
    let rebuilt = hi * 17;
    if (i16::from(value) - i16::from(rebuilt)).abs() > SHORT_FORM_TOLERANCE {
        None
    } else {
        char::from_digit(u32::from(hi), 16)
    }
}
