//! Filename compaction: short basenames for stylesheets and scripts.
//!
//! Markup files keep their names (they are the routes); `.css` and `.js`
//! files get bijective base-36 basenames in discovery order. Every
//! occurrence of an old basename in any text file is rewritten first, in
//! one alternation pass, so relative references of any depth stay valid;
//! only then do the physical renames happen. Renames are two-phase (via a
//! temporary name) so a new short name that coincides with another file's
//! old name can never clobber it.

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use eyre::WrapErr;
use indexmap::IndexMap;
use regex::{Captures, Regex};

use crate::encode::{FILE_ALPHABET, encode};
use crate::tree::{self, AssetTree};

/// Extensions eligible for renaming. Never markup.
const RENAME_EXTENSIONS: &[&str] = &["css", "js"];

pub async fn compact_file_names(tree: &AssetTree) -> eyre::Result<()> {
    let renames = build_rename_set(tree);
    if renames.is_empty() {
        return Ok(());
    }
    tracing::debug!(files = renames.len(), "compacting file names");

    // old basename -> new basename, longest first so the alternation
    // never stops at a name that prefixes a longer one
    let mut pairs: Vec<(&str, &str)> = renames
        .iter()
        .filter_map(|(old, new)| Some((old.file_name()?, new.file_name()?)))
        .collect();
    pairs.sort_by_key(|(old, _)| std::cmp::Reverse(old.len()));
    let pattern = pairs
        .iter()
        .map(|(old, _)| regex::escape(old))
        .collect::<Vec<_>>()
        .join("|");
    let matcher = Regex::new(&pattern).wrap_err("building basename matcher")?;
    let by_old: HashMap<&str, &str> = pairs.iter().copied().collect();

    // rewrite references in every file before any rename happens
    for path in tree.text_files() {
        let contents = tree::read(path).await?;
        let rewritten = matcher.replace_all(&contents, |caps: &Captures| {
            match by_old.get(&caps[0]) {
                Some(new) => (*new).to_string(),
                None => caps[0].to_string(),
            }
        });
        if rewritten != contents {
            tree::write(path, &rewritten).await?;
        }
    }

    // two-phase physical rename
    for (old, new) in &renames {
        tokio::fs::rename(old, staging_path(new))
            .await
            .wrap_err_with(|| format!("renaming {old}"))?;
    }
    for new in renames.values() {
        tokio::fs::rename(staging_path(new), new)
            .await
            .wrap_err_with(|| format!("renaming into place {new}"))?;
    }
    Ok(())
}

/// Assign each eligible file a short basename in discovery order,
/// preserving directory and extension.
fn build_rename_set(tree: &AssetTree) -> IndexMap<Utf8PathBuf, Utf8PathBuf> {
    let mut counter = 0u64;
    let mut renames = IndexMap::new();
    for path in tree.with_extensions(RENAME_EXTENSIONS) {
        let Some(ext) = path.extension() else {
            continue;
        };
        let new_name = format!("{}.{ext}", encode(counter, FILE_ALPHABET));
        counter += 1;
        let new_path = match path.parent() {
            Some(parent) => parent.join(&new_name),
            None => Utf8PathBuf::from(new_name),
        };
        if new_path != path {
            renames.insert(path.to_owned(), new_path);
        }
    }
    renames
}

fn staging_path(path: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{path}.ren-tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn references_are_rewritten_before_renaming() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        std::fs::create_dir(root.join("assets")).unwrap();
        std::fs::write(root.join("assets/index.Abc123.css"), "p{margin:0}").unwrap();
        std::fs::write(
            root.join("assets/hoisted.Zz9.js"),
            "import \"./index.Abc123.css\";",
        )
        .unwrap();
        std::fs::write(
            root.join("index.html"),
            "<link href=\"/assets/index.Abc123.css\"><script src=\"/assets/hoisted.Zz9.js\"></script>",
        )
        .unwrap();

        let tree = AssetTree::scan(root).unwrap();
        compact_file_names(&tree).await.unwrap();

        // discovery order is sorted: hoisted.Zz9.js first, index css second
        assert!(root.join("assets/0.js").exists());
        assert!(root.join("assets/1.css").exists());
        assert!(!root.join("assets/index.Abc123.css").exists());

        let html = std::fs::read_to_string(root.join("index.html")).unwrap();
        assert_eq!(
            html,
            "<link href=\"/assets/1.css\"><script src=\"/assets/0.js\"></script>"
        );
        let js = std::fs::read_to_string(root.join("assets/0.js")).unwrap();
        assert_eq!(js, "import \"./1.css\";");
    }

    #[tokio::test]
    async fn new_name_colliding_with_an_old_name_does_not_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        // sorted order puts "!hero.css" first, so it is assigned "0.css"
        // while a file named "0.css" already exists and is itself renamed
        std::fs::write(root.join("!hero.css"), "first").unwrap();
        std::fs::write(root.join("0.css"), "second").unwrap();

        let tree = AssetTree::scan(root).unwrap();
        compact_file_names(&tree).await.unwrap();

        assert_eq!(std::fs::read_to_string(root.join("0.css")).unwrap(), "first");
        assert_eq!(std::fs::read_to_string(root.join("1.css")).unwrap(), "second");
        assert!(!root.join("!hero.css").exists());
    }

    #[tokio::test]
    async fn no_eligible_files_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        std::fs::write(root.join("index.html"), "<p>hi</p>").unwrap();

        let tree = AssetTree::scan(root).unwrap();
        compact_file_names(&tree).await.unwrap();
        assert!(root.join("index.html").exists());
    }
}
