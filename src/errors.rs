//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`ProwlError`] covers the failure modes that are
//! allowed to reach a caller:
//! - Mount target validation (fatal to initialization)
//! - Asset fetching and model parsing
//! - Configuration parsing
//! - Windowing (behind the `winit` feature)
//!
//! Failures that the session is expected to survive (a single asset failing
//! to load, an unknown animation name, a load completing after teardown) are
//! never returned as `Err`; they are reported through logging and the load
//! progress channel instead.
//!
//! # Usage
//!
//! ```rust,ignore
//! use prowl::errors::{ProwlError, Result};
//!
//! fn read_config() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum ProwlError {
    // ========================================================================
    // Mounting
    // ========================================================================
    /// No mount target was supplied for the renderer.
    #[error("No mount target available for the renderer")]
    MountTargetMissing,

    /// The mount target exists but has no drawable area.
    #[error("Mount target has no drawable area ({width}x{height})")]
    InvalidMountTarget {
        /// Target width in physical pixels
        width: u32,
        /// Target height in physical pixels
        height: u32,
    },

    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    Gltf(String),

    /// Data URI parsing error.
    #[error("Data URI error: {0}")]
    DataUri(String),

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    // ========================================================================
    // Configuration
    // ========================================================================
    /// Scene configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    // ========================================================================
    // Async & Threading Errors
    // ========================================================================
    /// Task join error (when async tasks fail to complete).
    #[error("Task join error: {0}")]
    TaskJoin(String),

    // ========================================================================
    // Windowing
    // ========================================================================
    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Window creation error.
    #[cfg(feature = "winit")]
    #[error("Window error: {0}")]
    Window(String),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<gltf::Error> for ProwlError {
    fn from(err: gltf::Error) -> Self {
        ProwlError::Gltf(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ProwlError {
    fn from(err: tokio::task::JoinError) -> Self {
        ProwlError::TaskJoin(err.to_string())
    }
}

#[cfg(feature = "winit")]
impl From<winit::error::OsError> for ProwlError {
    fn from(err: winit::error::OsError) -> Self {
        ProwlError::Window(err.to_string())
    }
}

/// Alias for `Result<T, ProwlError>`.
pub type Result<T> = std::result::Result<T, ProwlError>;
