//! # boundvor
//!
//! `boundvor` turns an unbounded planar Voronoi diagram into one whose every region is a
//! finite polygon inside a given boundary. It is designed to be used in Rust as well as
//! compiled to WebAssembly (WASM).
//!
//! ## Features
//!
//! - **Backend agnostic**: Works on any [`RawDiagram`] (sites, vertices, ridges and regions
//!   with [`VERTEX_AT_INFINITY`] for unbounded ends). A `delaunator` based backend is included.
//! - **Arbitrary bounds**: Regions are clipped to any simple polygon that is star-shaped
//!   around its vertex centroid, concave ones included.
//! - **Shared vertices**: Vertices created by clipping are deduplicated within a tolerance
//!   and appended after the raw vertices, whose indices stay valid.
//! - **Parallel**: Sites are processed on `rayon`, with output identical to a serial pass.
//! - **Furthest-site diagrams**: Rays are oriented accordingly when the raw diagram is one.
//!
//! ## Example
//!
//! See `demos/bounded_svg.rs` for usage with SVG plotting.
//!
//! ## Main Interface
//!
//! The primary entry point is the [`BoundedVoronoi`] struct, built either from a
//! [`RawDiagram`] with [`BoundedVoronoi::new`] or directly from sites with
//! [`BoundedVoronoi::from_sites`].

mod bounded;
mod clip;
mod delaunay;
mod diagram;
mod error;
pub mod geometry;
mod ray;
mod sampling;
mod store;
mod wasm;

pub use bounded::BoundedVoronoi;
pub use bounded::BoundingOptions;
pub use bounded::DEFAULT_MARGIN;
pub use bounded::default_bounds;
pub use clip::clip;
pub use clip::sort_polygon;
pub use delaunay::voronoi;
pub use diagram::RawDiagram;
pub use diagram::Ridge;
pub use diagram::VERTEX_AT_INFINITY;
pub use error::BoundingError;
pub use error::Result;
pub use geometry::Point;
pub use geometry::Polygon;
pub use geometry::point_in_polygon;
pub use ray::DEFAULT_SAFETY_FACTOR;
pub use ray::RayExtender;
pub use sampling::random_sites;
pub use store::VertexStore;
pub use wasm::BoundedVoronoi2D;
