//! Cross-module test suite for the page builder
//!
//! Unit tests live next to the code they cover; these exercise the tree,
//! rendering, editor and planner together.

#[cfg(test)]
mod tree_tests;
#[cfg(test)]
mod render_tests;
#[cfg(test)]
mod integration;
