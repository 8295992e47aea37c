//! Error types for file loading and mesh construction.
//!
//! Rendering itself never fails: degenerate geometry is skipped and
//! out-of-range pixels are dropped. Only the adapters that read external
//! data (mesh files, scene files, settings) report errors.

use thiserror::Error;

/// Rejection reasons for the VTK polydata text format
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshFormatError {
    #[error("line {line}: expected header line {expected:?}, found {found:?}")]
    Header {
        line: usize,
        expected: &'static str,
        found: String,
    },
    #[error("line {line}: malformed {section} line {found:?}")]
    Malformed {
        line: usize,
        section: &'static str,
        found: String,
    },
    #[error("line {line}: {value:?} is not a number")]
    NotANumber { line: usize, value: String },
    #[error("line {line}: polygon references vertex {index} but only {count} exist")]
    IndexOutOfRange {
        line: usize,
        index: usize,
        count: usize,
    },
    #[error("POLYGONS declares {declared} values but the polygon lines hold {actual}")]
    TotalMismatch { declared: usize, actual: usize },
    #[error("unexpected end of file while reading {section}")]
    UnexpectedEof { section: &'static str },
    #[error(transparent)]
    Topology(#[from] MeshError),
}

/// Topology problems found while linking half-edges
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("face {face} has {count} vertices, at least 3 are required")]
    DegenerateFace { face: usize, count: usize },
    #[error("face {face} references vertex {index} but only {count} exist")]
    VertexOutOfRange {
        face: usize,
        index: usize,
        count: usize,
    },
}

/// Rejection reasons for the 2D scene text format
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneFormatError {
    #[error("missing or wrong header line")]
    Header,
    #[error("line {line}: expected key {expected}, found {found:?}")]
    UnexpectedKey {
        line: usize,
        expected: &'static str,
        found: String,
    },
    #[error("line {line}: {key} expects {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        key: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: {value:?} is not a valid number")]
    NotANumber { line: usize, value: String },
    #[error("line {line}: unknown object type {value:?}")]
    UnknownType { line: usize, value: String },
    #[error("line {line}: unknown {selector} code {code}")]
    UnknownSelector {
        line: usize,
        selector: &'static str,
        code: i32,
    },
    #[error("line {line}: {kind} objects need exactly 2 points, found {found}")]
    PointCount {
        line: usize,
        kind: &'static str,
        found: usize,
    },
    #[error("line {line}: duplicate object name {name:?}")]
    DuplicateName { line: usize, name: String },
    #[error("line {line}: object stanza must end with a blank line")]
    MissingTerminator { line: usize },
    #[error("unexpected end of file inside an object stanza")]
    UnexpectedEof,
}

/// Settings file problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be greater than zero")]
    ZeroSize { field: &'static str },
}

/// Top-level error for everything that touches the filesystem
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("mesh file rejected: {0}")]
    Mesh(#[from] MeshFormatError),
    #[error("scene file rejected: {0}")]
    Scene(#[from] SceneFormatError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
