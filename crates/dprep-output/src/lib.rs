//! Output writers.
//!
//! All files are written atomically: the content goes to a temporary sibling,
//! is synced, then renamed over the destination. A failed write leaves any
//! previous file in place. [`write_all_atomic`] stages every file of a run
//! before renaming any of them.

mod atomic;
mod hash;
mod manifest;
mod writer;

pub use atomic::{write_all_atomic, write_atomic};
pub use hash::{sha256_file, sha256_hex};
pub use manifest::{InputRecord, OutputRecord, RunManifest, RunSettings, render_manifest};
pub use writer::{render_csv, save};
