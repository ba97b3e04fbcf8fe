//! Asset loading errors

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a mesh, texture or cubemap. Fatal at startup.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("asset not found: {}", .path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {reason}", .path.display())]
    MalformedObj {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("{} contains no faces", .path.display())]
    EmptyMesh { path: PathBuf },

    #[error("failed to decode texture {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cubemap '{name}' needs 6 faces, manifest lists {count}")]
    CubemapFaces { name: &'static str, count: usize },

    #[error("cubemap '{name}' face {} is {width}x{height}, expected {expected}x{expected}", .face + 1)]
    CubemapFaceSize {
        name: &'static str,
        face: usize,
        width: u32,
        height: u32,
        expected: u32,
    },
}
