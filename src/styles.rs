//! Stylesheet minification pass.

use crate::minify;
use crate::tree::{self, AssetTree};

/// Run every `.css` file through the CSS minifier, keeping the shorter of
/// minified and original.
pub async fn minify_stylesheets(tree: &AssetTree) -> eyre::Result<()> {
    for path in tree.with_extensions(&["css"]) {
        let css = tree::read(path).await?;
        let minified = minify::css(&css);
        if minified.len() < css.len() {
            tree::write(path, &minified).await?;
        }
    }
    Ok(())
}
