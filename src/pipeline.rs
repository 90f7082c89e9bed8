//! The sequential pass driver.
//!
//! Passes run strictly in order; each one finishes all of its reads and
//! writes before the next starts, so every pass observes exactly the tree
//! state its predecessor left behind. The tree's path set is gathered once
//! up front; the filename compaction pass runs last because it invalidates
//! old paths.

use camino::Utf8Path;

use crate::tree::{self, AssetTree};
use crate::{classes, colors, fonts, markup, rename, scripts, styles, tokens, vars};

/// Optimize a build output directory in place. Returns bytes saved.
pub async fn optimize(root: &Utf8Path) -> eyre::Result<u64> {
    let before = tree::dir_size(root)?;
    let assets = AssetTree::scan(root)?;
    tracing::info!(files = assets.files().len(), %root, "optimizing build output");

    fonts::clean_fonts(&assets).await?;
    vars::prune_unused(&assets).await?;
    classes::compact_classes(&assets).await?;
    vars::compact_names(&assets).await?;
    colors::fold_colors(&assets).await?;
    styles::minify_stylesheets(&assets).await?;
    scripts::strip_error_messages(&assets).await?;
    markup::compact_markup(&assets).await?;
    tokens::shorten_runtime_tokens(&assets).await?;
    scripts::minify_scripts(&assets).await?;
    rename::compact_file_names(&assets).await?;

    let after = tree::dir_size(root)?;
    let saved = before.saturating_sub(after);
    tracing::info!(
        bytes_before = before,
        bytes_after = after,
        bytes_saved = saved,
        "optimization complete"
    );
    Ok(saved)
}
