//! Asset tree scanning and file I/O.
//!
//! The tree is gathered exactly once at pipeline start; every pass observes
//! the same set of paths. Files are read fully into memory per access.

use camino::{Utf8Path, Utf8PathBuf};
use eyre::WrapErr;

/// Extensions the text-rewriting passes operate on by default.
pub const TEXT_EXTENSIONS: &[&str] = &["css", "js", "html"];

/// The full set of files under the output root, in sorted order.
pub struct AssetTree {
    files: Vec<Utf8PathBuf>,
}

impl AssetTree {
    /// Walk the output root and collect every file, sorted for stable
    /// pass-to-pass ordering.
    pub fn scan(root: &Utf8Path) -> eyre::Result<Self> {
        let mut files = Vec::new();
        let walker = ignore::WalkBuilder::new(root)
            .standard_filters(false)
            .build();
        for entry in walker {
            let entry = entry.wrap_err("walking output tree")?;
            if entry.file_type().is_some_and(|t| t.is_file()) {
                let path = Utf8PathBuf::try_from(entry.into_path())
                    .wrap_err("non-UTF-8 path in output tree")?;
                files.push(path);
            }
        }
        files.sort();
        Ok(Self { files })
    }

    /// All files, regardless of extension.
    pub fn files(&self) -> &[Utf8PathBuf] {
        &self.files
    }

    /// Files whose extension is in `exts`, in tree order.
    pub fn with_extensions<'a>(
        &'a self,
        exts: &'a [&'a str],
    ) -> impl Iterator<Item = &'a Utf8Path> + 'a {
        self.files
            .iter()
            .filter(move |p| p.extension().is_some_and(|e| exts.contains(&e)))
            .map(Utf8PathBuf::as_path)
    }

    /// Files the text passes care about (`css`, `js`, `html`).
    pub fn text_files(&self) -> impl Iterator<Item = &Utf8Path> + '_ {
        self.with_extensions(TEXT_EXTENSIONS)
    }
}

/// Read a whole file as UTF-8 text.
pub async fn read(path: &Utf8Path) -> eyre::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("reading {path}"))
}

/// Overwrite a whole file with new text.
pub async fn write(path: &Utf8Path, contents: &str) -> eyre::Result<()> {
    tokio::fs::write(path, contents)
        .await
        .wrap_err_with(|| format!("writing {path}"))
}

/// Total byte size of every file under `root`.
pub fn dir_size(root: &Utf8Path) -> eyre::Result<u64> {
    let mut total = 0u64;
    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .build();
    for entry in walker {
        let entry = entry.wrap_err("walking output tree")?;
        if entry.file_type().is_some_and(|t| t.is_file()) {
            total += entry.metadata().wrap_err("reading file metadata")?.len();
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_sorts_and_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        std::fs::create_dir(root.join("sub")).unwrap();
        std::fs::write(root.join("b.css"), "b").unwrap();
        std::fs::write(root.join("a.html"), "a").unwrap();
        std::fs::write(root.join("sub/c.js"), "c").unwrap();
        std::fs::write(root.join("font.ttf"), "f").unwrap();

        let tree = AssetTree::scan(root).unwrap();
        assert_eq!(tree.files().len(), 4);

        let css: Vec<_> = tree.with_extensions(&["css"]).collect();
        assert_eq!(css.len(), 1);
        assert_eq!(css[0].file_name(), Some("b.css"));

        // .ttf is in the tree but not a text file
        assert_eq!(tree.text_files().count(), 3);
    }

    #[test]
    fn dir_size_sums_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        std::fs::write(root.join("a.txt"), "12345").unwrap();
        std::fs::write(root.join("b.txt"), "123").unwrap();
        assert_eq!(dir_size(root).unwrap(), 8);
    }
}
