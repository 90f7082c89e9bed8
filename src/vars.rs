//! CSS custom property passes: usage analysis, dead-declaration pruning,
//! and short-name compaction.
//!
//! Variable references (`var(--name)`) can live in any text file, not just
//! stylesheets, so both scans cover the whole tree. Rewrites are
//! span-scoped: a single regex pass matches declaration sites (`--name:`)
//! and reference sites (`--name)`) and substitutes via map lookup, so an
//! assigned code can never be re-matched later in the same pass.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use camino::Utf8Path;
use regex::{Captures, Regex};

use crate::encode::{NAME_ALPHABET, ShortNamer};
use crate::tree::{self, AssetTree};

/// A `var(--name)` read, capturing the bare name.
static VAR_REF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"var\((--[A-Za-z0-9_-]+)\)").unwrap());

/// A root-scope declaration block.
static ROOT_BLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":root[^}]*\{[^}]+\}").unwrap());

/// A single `--name: value` declaration inside a block.
static DECL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(--[A-Za-z0-9_-]+)\s*:[^;}]+").unwrap());

/// A rewritable site: the name plus its context suffix (declaration colon
/// or reference closing paren).
static VAR_SITE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(--[A-Za-z0-9_-]+)([:)])").unwrap());

/// Count every `var(--name)` reference across the whole tree.
///
/// Names declared in a root block but never referenced still get a row
/// with count 0 so the pruner can act on them.
pub async fn collect_usage(tree: &AssetTree) -> eyre::Result<HashMap<String, usize>> {
    let mut usage = HashMap::new();
    for path in tree.text_files() {
        let contents = tree::read(path).await?;
        for caps in VAR_REF_REGEX.captures_iter(&contents) {
            *usage.entry(caps[1].to_string()).or_insert(0) += 1;
        }
        for block in ROOT_BLOCK_REGEX.find_iter(&contents) {
            for caps in DECL_REGEX.captures_iter(block.as_str()) {
                usage.entry(caps[1].to_string()).or_insert(0);
            }
        }
    }
    Ok(usage)
}

/// Drop declarations with zero live references from the theme file's root
/// blocks. The theme file is the first file, in tree order, containing a
/// root block; if none exists this pass is a no-op.
pub async fn prune_unused(tree: &AssetTree) -> eyre::Result<()> {
    let usage = collect_usage(tree).await?;

    let mut theme: Option<(&Utf8Path, String)> = None;
    for path in tree.text_files() {
        let contents = tree::read(path).await?;
        if ROOT_BLOCK_REGEX.is_match(&contents) {
            theme = Some((path, contents));
            break;
        }
    }
    let Some((path, contents)) = theme else {
        tracing::debug!("no root declaration block found, skipping variable pruning");
        return Ok(());
    };

    let mut out = String::with_capacity(contents.len());
    let mut last = 0;
    for m in ROOT_BLOCK_REGEX.find_iter(&contents) {
        out.push_str(&contents[last..m.start()]);
        out.push_str(&prune_block(m.as_str(), &usage));
        last = m.end();
    }
    out.push_str(&contents[last..]);

    if out != contents {
        tracing::debug!(%path, "pruned unused custom property declarations");
        tree::write(path, &out).await?;
    }
    Ok(())
}

/// Rewrite one root block keeping only referenced declarations, in their
/// original order, values verbatim.
fn prune_block(block: &str, usage: &HashMap<String, usize>) -> String {
    let Some(brace) = block.find('{') else {
        return block.to_string();
    };
    let kept: Vec<&str> = DECL_REGEX
        .captures_iter(block)
        .filter(|caps| usage.get(&caps[1]).copied().unwrap_or(0) > 0)
        .filter_map(|caps| caps.get(0).map(|m| m.as_str()))
        .collect();
    format!("{}{{{}}}", &block[..brace], kept.join(";"))
}

/// Assign each referenced variable a short code in first-seen order and
/// rewrite every declaration and reference site across the tree.
pub async fn compact_names(tree: &AssetTree) -> eyre::Result<()> {
    let mut namer = ShortNamer::new(NAME_ALPHABET, "--");
    for path in tree.text_files() {
        let contents = tree::read(path).await?;
        for caps in VAR_REF_REGEX.captures_iter(&contents) {
            namer.assign(&caps[1]);
        }
    }
    if namer.is_empty() {
        return Ok(());
    }
    tracing::debug!(variables = namer.len(), "compacting custom property names");

    for path in tree.text_files() {
        let contents = tree::read(path).await?;
        let rewritten = rewrite_sites(&contents, &namer);
        if rewritten != contents {
            tree::write(path, &rewritten).await?;
        }
    }
    Ok(())
}

/// Substitute assigned codes at declaration and reference sites, leaving
/// unmapped names and all other text untouched.
pub fn rewrite_sites<'a>(contents: &'a str, namer: &ShortNamer) -> Cow<'a, str> {
    VAR_SITE_REGEX.replace_all(contents, |caps: &Captures| match namer.get(&caps[1]) {
        Some(code) => format!("{}{}", code, &caps[2]),
        None => caps[0].to_string(),
    })
}
