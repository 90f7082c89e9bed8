//! Font cleanup: prefer woff2 and drop unused font files.
//!
//! Stylesheet references to `.ttf` are rewritten to `.woff2` (the build
//! emits both), then any `.ttf` file whose family is not named by a
//! remaining `@font-face` block is deleted best-effort.

use std::sync::LazyLock;

use regex::Regex;

use crate::tree::{self, AssetTree};

/// An `@font-face` block with a family name and a src url.
static FONT_FACE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)@font-face\s*\{.*?font-family:([^;]+).*?src:url\([^)]+\).*?\}").unwrap()
});

pub async fn clean_fonts(tree: &AssetTree) -> eyre::Result<()> {
    // swap every .ttf reference for its .woff2 sibling
    for path in tree.with_extensions(&["css"]) {
        let contents = tree::read(path).await?;
        let replaced = contents.replace(".ttf", ".woff2");
        if replaced != contents {
            tree::write(path, &replaced).await?;
        }
    }

    // families still declared by some @font-face block
    let mut families: Vec<String> = Vec::new();
    for path in tree.with_extensions(&["css"]) {
        let contents = tree::read(path).await?;
        for caps in FONT_FACE_REGEX.captures_iter(&contents) {
            families.push(format!("{}.ttf", caps[1].trim()));
        }
    }

    for path in tree.with_extensions(&["ttf"]) {
        if families.iter().any(|f| path.as_str().ends_with(f)) {
            continue;
        }
        // best-effort: a font that fails to delete just stays in the tree
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::debug!(%path, error = %e, "could not delete unused font");
        }
    }
    Ok(())
}
