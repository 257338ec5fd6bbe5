//! # Export
//!
//! Serialization of the merged sculpture.

mod stl;

pub use stl::{export_stl, to_stl_space, write_binary_stl, StlExport};
