//! Sankey Core Types and Definitions
//!
//! This crate provides the foundational types for Sankey flow charts. It
//! includes:
//!
//! - **Flow graph**: Nodes, links and the graph that owns them ([`flow`] module)
//! - **Palettes**: Cyclic default color lists ([`palette::Palette`])
//! - **Color assignment**: Resolving node and link colors ([`colorize`] module)
//! - **Currency formatting**: Value labels ([`currency`] module)
//! - **Colors**: CSS color validation ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)

pub mod color;
pub mod colorize;
pub mod currency;
pub mod flow;
pub mod geometry;
pub mod palette;
