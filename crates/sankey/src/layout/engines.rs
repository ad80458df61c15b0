//! Layout engine implementations.
//!
//! Engines implement [`LayoutEngine`](super::LayoutEngine). The builder
//! picks [`Basic`] unless told otherwise.

pub mod basic;

pub use basic::Engine as Basic;
