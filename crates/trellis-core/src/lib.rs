//! Trellis Core Types and Algorithms
//!
//! This crate provides the foundational, side-effect free parts of the
//! Trellis diagram model. It includes:
//!
//! - **Geometry**: Points, sizes, rectangles ([`geometry`] module)
//! - **Coordinates**: Screen ↔ diagram transform ([`coordinate::CoordinateSystem`])
//! - **Identifiers**: String-interned entity ids ([`identifier::Id`])
//! - **Colors**: CSS color handling ([`color::Color`])
//! - **Entities**: [`element::Element`] and [`relationship::Relationship`] value types
//! - **Kinds**: Per-kind capabilities and layout strategy ([`kind::KindRegistry`])
//! - **Text**: Label measurement ([`text`] module)
//! - **Layout**: Bounds derivation from labels and children ([`layout::LayoutEngine`])
//! - **Routing**: Orthogonal relationship paths ([`routing`] module)

pub mod color;
pub mod coordinate;
pub mod element;
pub mod geometry;
pub mod identifier;
pub mod kind;
pub mod layout;
pub mod relationship;
pub mod routing;
pub mod text;
