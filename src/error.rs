//! Error types for bounding a Voronoi diagram.

use crate::geometry::Point;

/// Errors that can occur while bounding a Voronoi diagram.
///
/// Every variant aborts the whole bounding pass; there are no partial results.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundingError {
    /// Malformed boundary polygon, options or flat coordinate input.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// An input site lies outside the boundary polygon.
    #[error("site {site} at ({}, {}) lies outside the bounds", point[0], point[1])]
    Domain { site: usize, point: Point },

    /// A ray at infinity could not be brought back onto the boundary.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// The raw diagram does not satisfy the sites/vertices/ridges/regions contract.
    #[error("invalid diagram: {0}")]
    InvalidDiagram(String),
}

pub type Result<T> = std::result::Result<T, BoundingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = BoundingError::Domain { site: 3, point: [1.5, -2.0] };
        assert_eq!(err.to_string(), "site 3 at (1.5, -2) lies outside the bounds");

        let err = BoundingError::Configuration("bounds must have at least 3 vertices, got 2".into());
        assert!(err.to_string().starts_with("invalid configuration"));
    }
}
