//! Facade crate for the corpdb workspace.
//!
//! Re-exports the `corpdb-core` API so the demos under `demos/` and quick
//! experiments can depend on a single crate. Applications should depend
//! on `corpdb-core` directly.

pub use corpdb_core::*;
