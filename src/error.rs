//! Error types for trisect.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

use crate::mesh::CellKind;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh construction, refinement and I/O.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no cells.
    #[error("mesh has no cells")]
    EmptyMesh,

    /// A cell references an invalid point index.
    #[error("cell {cell} references invalid point index {point}")]
    InvalidVertexIndex {
        /// The cell index.
        cell: usize,
        /// The invalid point index.
        point: usize,
    },

    /// A cell has repeated point indices or too few points for its kind.
    #[error("cell {cell} is degenerate (repeated or missing points)")]
    DegenerateCell {
        /// The cell index.
        cell: usize,
    },

    /// The target mesh for a refinement generation could not be created.
    #[error("no target mesh available for generation {generation}")]
    NullTarget {
        /// The generation (0-based) that was about to run.
        generation: usize,
    },

    /// A subdivision rule was handed a cell it cannot split.
    #[error("cell {cell} of kind {kind:?} with {points} points is not supported by this rule")]
    UnsupportedCellType {
        /// The cell index.
        cell: usize,
        /// The kind tag of the cell.
        kind: CellKind,
        /// Number of points in the cell.
        points: usize,
    },

    /// An edge of a visited cell is missing from the mesh edge table.
    #[error("cell {cell} has no edge ({v0}, {v1}) in the mesh topology")]
    InconsistentMesh {
        /// The cell being processed.
        cell: usize,
        /// First endpoint of the missing edge.
        v0: usize,
        /// Second endpoint of the missing edge.
        v1: usize,
    },

    /// The selection references a cell that does not exist.
    #[error("selected cell {cell} does not exist in the mesh")]
    UnknownCell {
        /// The missing cell index.
        cell: usize,
    },

    /// The next generation would need more ids than the index type holds.
    #[error("generation {generation} needs {needed} ids but the index type holds {max}")]
    IndexOverflow {
        /// The generation (0-based) that was about to run.
        generation: usize,
        /// Points or cells the generation could produce.
        needed: usize,
        /// Number of ids the index type can address.
        max: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Whether the refinement engine may recover from this error by
    /// carrying the offending cell over unchanged.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MeshError::UnsupportedCellType { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_offending_cell() {
        let err = MeshError::InconsistentMesh { cell: 7, v0: 2, v1: 9 };
        assert_eq!(err.to_string(), "cell 7 has no edge (2, 9) in the mesh topology");

        let err = MeshError::UnknownCell { cell: 42 };
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_recoverable_kinds() {
        let unsupported = MeshError::UnsupportedCellType {
            cell: 0,
            kind: CellKind::Polygon,
            points: 4,
        };
        assert!(unsupported.is_recoverable());
        assert!(!MeshError::NullTarget { generation: 0 }.is_recoverable());
        assert!(!MeshError::InconsistentMesh { cell: 0, v0: 0, v1: 1 }.is_recoverable());
    }

    #[test]
    fn test_invalid_param() {
        let err = MeshError::invalid_param("cells", "a,b", "expected comma-separated integers");
        assert_eq!(
            err.to_string(),
            "invalid parameter: cells = a,b (expected comma-separated integers)"
        );
    }
}
