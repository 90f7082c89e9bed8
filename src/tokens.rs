//! Runtime token shortening.
//!
//! The framework runtime writes the same handful of long attribute, tag,
//! and event names into every page and into the hydration scripts that
//! read them back. Each distinctive name gets a 1-3 character alias,
//! applied uniformly across all text files so page markup and runtime
//! code stay in agreement. Only hyphenated or namespaced names are
//! shortened; bare dictionary words would collide with unrelated text.

use std::sync::LazyLock;

use regex::Regex;

use crate::tree::{self, AssetTree};

/// Island attribute names and their aliases. Order matters: the
/// empty-value form of an attribute is handled before its bare name.
const ATTRIBUTE_ALIASES: &[(&str, &str)] = &[
    ("component-url", "a"),
    ("component-export=\"\"", "b"),
    ("component-export", "b"),
    ("renderer-url", "c"),
    ("before-hydration-url", "d"),
    ("data-astro-template", "e"),
];

/// Tag and lifecycle-event aliases, applied after attribute cleanup.
const TAG_ALIASES: &[(&str, &str)] = &[
    ("astro-island", "a-i"),
    ("astro-slot", "a-s"),
    ("astro-static-slot", "a-S"),
    ("astro:after-swap", "a:s"),
    ("astro:end", "E"),
    ("astro:hydrate", "a:h"),
    ("astro:load", "a:l"),
    ("astro:unmount", "a:u"),
];

/// A serialized-props revive-table entry for a type the pages never use.
static REVIVER_ENTRY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d:\w=>(?:new )?(?:BigInt|Uint8Array|Uint16Array|Uint32Array|RegExp|Date)\(\w\),")
        .unwrap()
});

/// An island uid attribute; the value is never read after hydration.
static ISLAND_UID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"astro-island\s*uid="[^"]+""#).unwrap());

/// An empty-ish opts attribute.
static OPTS_ATTR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"opts="\{[^}]+\}""#).unwrap());

/// Shorten runtime tokens in every text file.
pub async fn shorten_runtime_tokens(tree: &AssetTree) -> eyre::Result<()> {
    for path in tree.text_files() {
        let contents = tree::read(path).await?;
        let rewritten = shorten(&contents);
        if rewritten != contents {
            tree::write(path, &rewritten).await?;
        }
    }
    Ok(())
}

fn shorten(input: &str) -> String {
    let mut out = input.to_string();
    for (long, short) in ATTRIBUTE_ALIASES {
        out = out.replace(long, short);
    }
    out = REVIVER_ENTRY_REGEX.replace_all(&out, "").into_owned();
    out = ISLAND_UID_REGEX.replace_all(&out, "astro-island").into_owned();
    out = OPTS_ATTR_REGEX.replace_all(&out, "").into_owned();
    out = out.replace("props=\"{}\"", "");
    out = out.replace("await-children=\"\"", "");
    out = out.replace("await-children", "g");
    for (long, short) in TAG_ALIASES {
        out = out.replace(long, short);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn island_markup_is_compacted() {
        let html = r#"<astro-island uid="Z2x" component-url="/c.js" component-export="" renderer-url="/r.js" props="{}" await-children=""><p>x</p></astro-island>"#;
        let out = shorten(html);
        // removed attributes leave their surrounding spaces behind
        assert_eq!(out, r#"<a-i a="/c.js" b c="/r.js"  ><p>x</p></a-i>"#);
    }

    #[test]
    fn lifecycle_event_names_are_aliased() {
        let js = "addEventListener(\"astro:hydrate\",f);dispatch(\"astro:after-swap\")";
        assert_eq!(
            shorten(js),
            "addEventListener(\"a:h\",f);dispatch(\"a:s\")"
        );
    }

    #[test]
    fn unused_reviver_entries_are_dropped() {
        let js = "const revivers={0:v=>new Date(v),1:v=>RegExp(v),2:v=>v};";
        let out = shorten(js);
        assert!(!out.contains("Date"));
        assert!(!out.contains("RegExp"));
        assert!(out.contains("2:v=>v"));
    }

    #[test]
    fn unrelated_text_is_untouched() {
        let text = "<p>astronomy and components</p>";
        assert_eq!(shorten(text), text);
    }
}
