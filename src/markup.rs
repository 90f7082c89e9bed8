//! Markup helpers and the HTML compaction pass.
//!
//! Hydration islands carry whitespace-sensitive serialized props and must
//! survive minification byte-for-byte, so they are swapped for opaque
//! placeholder text before the minifier runs and restored afterwards.
//! Inline `<script>` bodies are isolated for separate JS minification;
//! tags with a `src` attribute are never touched.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::minify;
use crate::tree::{self, AssetTree};

/// A complete hydration island element.
static ISLAND_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<astro-island\b[^>]*>.*?</astro-island>").unwrap());

/// A script element, attributes and body captured separately.
static SCRIPT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script([^>]*)>(.*?)</script>").unwrap());

/// A `src` attribute inside a script tag's attribute list.
static SRC_ATTR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bsrc\s*="#).unwrap());

/// Replace each island with an opaque placeholder the minifier will pass
/// through untouched. Returns the shielded document and the islands in
/// placeholder order.
pub fn shield_islands(html: &str) -> (String, Vec<String>) {
    let mut islands = Vec::new();
    let shielded = ISLAND_REGEX
        .replace_all(html, |caps: &Captures| {
            let placeholder = format!("__island_slot_{}__", islands.len());
            islands.push(caps[0].to_string());
            placeholder
        })
        .into_owned();
    (shielded, islands)
}

/// Put the shielded islands back, verbatim.
pub fn restore_islands(html: &str, islands: &[String]) -> String {
    let mut out = html.to_string();
    for (i, island) in islands.iter().enumerate() {
        out = out.replacen(&format!("__island_slot_{i}__"), island, 1);
    }
    out
}

/// Minify each inline script body with `minify_fn`, keeping the result
/// only when shorter. Scripts with a `src` attribute stay verbatim.
pub fn minify_inline_scripts(html: &str, minify_fn: impl Fn(&str) -> String) -> String {
    SCRIPT_REGEX
        .replace_all(html, |caps: &Captures| {
            let attrs = &caps[1];
            let body = &caps[2];
            if SRC_ATTR_REGEX.is_match(attrs) || body.trim().is_empty() {
                return caps[0].to_string();
            }
            let minified = minify_fn(body);
            if minified.len() < body.len() {
                format!("<script{attrs}>{minified}</script>")
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// The HTML compaction pass: shield islands, minify, restore, keep the
/// result only if it is shorter than the original document.
pub async fn compact_markup(tree: &AssetTree) -> eyre::Result<()> {
    for path in tree.with_extensions(&["html"]) {
        let html = tree::read(path).await?;
        let (shielded, islands) = shield_islands(&html);
        let compact = minify::html(&shielded);
        let restored = restore_islands(&compact, &islands);
        if restored.len() < html.len() {
            tree::write(path, &restored).await?;
        }
    }
    Ok(())
}
