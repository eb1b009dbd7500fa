//! Hierarchy and color model
//!
//! - `tree` - aggregation of records into a hierarchy and domain scanning
//! - `scale` - palettes, categorical color registry and continuous color scales

pub mod scale;
pub mod tree;

pub use scale::{ColorRegistry, ColorStrategy};
pub use tree::{linear_domain, tree_builder, TreeNode};
