//! Content loading for component documentation.
//!
//! Content lives under one directory per component slug:
//!
//! ```text
//! <content-root>/<slug>/overview.yml
//! <content-root>/<slug>/anatomy.yml
//! <content-root>/<slug>/index.mdx
//! ```
//!
//! The tree is indexed once with [`ContentIndex::discover`]; after that all
//! reads go through a [`ContentLoader`], which memoizes both hits and misses
//! in a [`ContentCache`].

pub mod cache;
pub mod index;
pub mod loader;
pub mod mdx;
pub mod path;
pub mod source;

pub use cache::ContentCache;
pub use index::ContentIndex;
pub use loader::ContentLoader;
pub use mdx::{Heading, MdxDocument};
pub use source::{ContentSource, FsSource, MemorySource};
