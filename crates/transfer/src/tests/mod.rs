//! Whole-walk behaviour, driven against [`MemoryEngine`](crate::MemoryEngine)
//! and scratch directories.

mod download;
mod support;
