//! Test support for menus and host adapters.
//!
//! See [`mocks`] for in-memory implementations of the host traits.

pub mod mocks;
