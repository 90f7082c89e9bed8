//! Scoped component class compaction.
//!
//! Build tools emit per-component scoping classes (`svelte-1abc2de`,
//! `astro-xyz123`) that are long and repeated in every matching element.
//! This pass assigns each token seen in a stylesheet a short code and
//! rewrites token occurrences everywhere.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::encode::{NAME_ALPHABET, ShortNamer};
use crate::tree::{self, AssetTree};

/// An autogenerated component-scoping class token.
static SCOPED_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:svelte|astro)-[a-z0-9]+").unwrap());

/// Assign short codes to scoped class tokens found in stylesheets
/// (first-seen order) and rewrite them across every text file.
pub async fn compact_classes(tree: &AssetTree) -> eyre::Result<()> {
    let mut namer = ShortNamer::new(NAME_ALPHABET, "");
    for path in tree.with_extensions(&["css"]) {
        let contents = tree::read(path).await?;
        for m in SCOPED_TOKEN_REGEX.find_iter(&contents) {
            namer.assign(m.as_str());
        }
    }
    if namer.is_empty() {
        return Ok(());
    }
    tracing::debug!(classes = namer.len(), "compacting scoped class tokens");

    for path in tree.text_files() {
        let contents = tree::read(path).await?;
        let rewritten =
            SCOPED_TOKEN_REGEX.replace_all(&contents, |caps: &Captures| {
                match namer.get(&caps[0]) {
                    Some(code) => code.to_string(),
                    None => caps[0].to_string(),
                }
            });
        if rewritten != contents {
            tree::write(path, &rewritten).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;

    #[tokio::test]
    async fn tokens_from_stylesheets_are_rewritten_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        std::fs::write(root.join("a.css"), ".astro-q1w2e3{color:red}").unwrap();
        std::fs::write(
            root.join("b.html"),
            "<div class=\"astro-q1w2e3 svelte-zz9\"></div>",
        )
        .unwrap();

        let tree = AssetTree::scan(root).unwrap();
        compact_classes(&tree).await.unwrap();

        let css = std::fs::read_to_string(root.join("a.css")).unwrap();
        assert_eq!(css, ".A{color:red}");
        // svelte-zz9 never appears in a stylesheet, so it keeps its name
        let html = std::fs::read_to_string(root.join("b.html")).unwrap();
        assert_eq!(html, "<div class=\"A svelte-zz9\"></div>");
    }

    #[tokio::test]
    async fn no_tokens_means_no_writes() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        std::fs::write(root.join("a.css"), "p{margin:0}").unwrap();

        let tree = AssetTree::scan(root).unwrap();
        compact_classes(&tree).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(root.join("a.css")).unwrap(),
            "p{margin:0}"
        );
    }
}
