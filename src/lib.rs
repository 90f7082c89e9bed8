//! scalpel - post-build size optimizer for static site output
//!
//! Runs once over a finished build directory and applies a fixed sequence
//! of whole-tree shrinking passes: dead custom-property pruning, scoped
//! class and variable renaming, perceptual-color folding, HTML/CSS/JS
//! minification, and filename compaction with cross-file reference
//! rewriting. The tree is left behaviorally equivalent, just smaller.

pub mod classes;
pub mod colors;
pub mod encode;
pub mod fonts;
pub mod markup;
pub mod minify;
pub mod pipeline;
pub mod rename;
pub mod scripts;
pub mod styles;
pub mod tokens;
pub mod tree;
pub mod vars;
