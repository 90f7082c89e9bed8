//! Minifier collaborators.
//!
//! Each wrapper returns the original text when the underlying minifier
//! fails, logging a warning; callers keep the shorter of input and output
//! and never assume minification reduces size.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use minify_html::Cfg;
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions};
use oxc::minifier::{Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

/// Minify an HTML document, including embedded CSS and JS.
///
/// Returns the original document if the result is not valid UTF-8.
pub fn html(input: &str) -> String {
    let mut cfg = Cfg::new();
    cfg.minify_css = true;
    cfg.minify_js = true;
    let out = minify_html::minify(input.as_bytes(), &cfg);
    match String::from_utf8(out) {
        Ok(minified) => minified,
        Err(e) => {
            tracing::warn!("HTML minification produced invalid UTF-8: {e}");
            input.to_string()
        }
    }
}

/// Minify a stylesheet. Returns the original on any parse/print failure.
pub fn css(input: &str) -> String {
    match try_css(input) {
        Ok(minified) => minified,
        Err(e) => {
            tracing::warn!("CSS minification failed: {e}");
            input.to_string()
        }
    }
}

fn try_css(input: &str) -> eyre::Result<String> {
    let mut sheet = StyleSheet::parse(input, ParserOptions::default())
        .map_err(|e| eyre::eyre!(e.to_string()))?;
    sheet
        .minify(MinifyOptions::default())
        .map_err(|e| eyre::eyre!(e.to_string()))?;
    let out = sheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| eyre::eyre!(e.to_string()))?;
    Ok(out.code)
}

/// Minify a script. Returns the original if it fails to parse as a module.
pub fn js(input: &str) -> String {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, input, SourceType::mjs()).parse();
    if !parsed.errors.is_empty() {
        tracing::warn!(
            errors = parsed.errors.len(),
            "JS minification skipped: script did not parse"
        );
        return input.to_string();
    }
    let mut program = parsed.program;
    let minified = Minifier::new(MinifierOptions::default()).minify(&allocator, &mut program);
    Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            ..CodegenOptions::default()
        })
        .with_scoping(minified.scoping)
        .build(&program)
        .code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_collapses_whitespace() {
        let input = "<html>\n  <body>\n    <p>hello   world</p>\n  </body>\n</html>";
        let out = html(input);
        assert!(out.len() < input.len());
        assert!(out.contains("hello world"));
    }

    #[test]
    fn css_shrinks_simple_rule() {
        let out = css(".foo {\n  color: black;\n}\n");
        assert!(out.contains(".foo"));
        assert!(out.len() <= 18);
    }

    #[test]
    fn css_falls_back_on_garbage() {
        let input = "][ not css at all {{{";
        assert_eq!(css(input), input);
    }

    #[test]
    fn js_shrinks_and_falls_back() {
        let input = "const answer = 1 + 2;\nconsole.log( answer );\n";
        let out = js(input);
        assert!(out.len() < input.len());

        let bad = "function {{{ nope";
        assert_eq!(js(bad), bad);
    }
}
