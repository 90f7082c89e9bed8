//! Script passes: error-message stripping and JS minification.

use std::sync::LazyLock;

use regex::Regex;

use crate::markup;
use crate::minify;
use crate::tree::{self, AssetTree};

/// A `throw new Error(...)` expression with a message argument.
static THROW_ERROR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"throw new Error\([^)]+\)").unwrap());

/// Replace `throw new Error(...)` with a bare `throw""` everywhere.
/// Production bundles never surface these messages to anyone.
pub async fn strip_error_messages(tree: &AssetTree) -> eyre::Result<()> {
    for path in tree.text_files() {
        let contents = tree::read(path).await?;
        let rewritten = THROW_ERROR_REGEX.replace_all(&contents, "throw\"\"");
        if rewritten != contents {
            tree::write(path, &rewritten).await?;
        }
    }
    Ok(())
}

/// Minify every `.js` file, then every inline script in every `.html`
/// file, keeping the shorter text in both cases.
pub async fn minify_scripts(tree: &AssetTree) -> eyre::Result<()> {
    for path in tree.with_extensions(&["js"]) {
        let code = tree::read(path).await?;
        let minified = minify::js(&code);
        if minified.len() < code.len() {
            tree::write(path, &minified).await?;
        }
    }

    for path in tree.with_extensions(&["html"]) {
        let html = tree::read(path).await?;
        let rewritten = markup::minify_inline_scripts(&html, minify::js);
        if rewritten.len() < html.len() {
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
    async fn error_messages_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        std::fs::write(
            root.join("a.js"),
            "if(!x)throw new Error(\"x is required\");f()",
        )
        .unwrap();

        let tree = AssetTree::scan(root).unwrap();
        strip_error_messages(&tree).await.unwrap();

        let js = std::fs::read_to_string(root.join("a.js")).unwrap();
        assert_eq!(js, "if(!x)throw\"\";f()");
    }

    #[tokio::test]
    async fn js_files_and_inline_scripts_are_minified() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let code = "const value = 1 + 2;\nconsole.log( value );\n";
        std::fs::write(root.join("a.js"), code).unwrap();
        std::fs::write(
            root.join("index.html"),
            format!("<body><script>{code}</script></body>"),
        )
        .unwrap();

        let tree = AssetTree::scan(root).unwrap();
        minify_scripts(&tree).await.unwrap();

        let js = std::fs::read_to_string(root.join("a.js")).unwrap();
        assert!(js.len() < code.len());
        let html = std::fs::read_to_string(root.join("index.html")).unwrap();
        assert!(html.len() < format!("<body><script>{code}</script></body>").len());
    }
}
