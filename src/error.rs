//! Error types for the confetti engine.
//!
//! Construction-time inputs (colors, custom shapes) fail fast with a
//! descriptive error. Nothing in the per-frame loop returns an error:
//! a degraded frame always beats a halted animation.

use std::fmt;

/// Errors raised while parsing a color value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Hex string has a length other than 3 or 6 digits.
    BadLength(String),
    /// Hex string contains a non-hexadecimal character.
    BadDigit(String),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::BadLength(s) => {
                write!(f, "Hex color '{}' must have 3 or 6 digits", s)
            }
            ColorError::BadDigit(s) => {
                write!(f, "Hex color '{}' contains a non-hex digit", s)
            }
        }
    }
}

impl std::error::Error for ColorError {}

/// Errors raised while constructing a custom shape.
///
/// These fire before any particle exists; once a [`crate::Shape`] is built
/// it can always be drawn.
#[derive(Debug)]
pub enum ShapeError {
    /// Path data contained no drawable segments.
    EmptyPath,
    /// Unsupported or misplaced path command.
    BadCommand(char),
    /// A path command argument was not a number.
    BadNumber(String),
    /// A path command was given too few arguments.
    MissingArgument(char),
    /// Bitmap pixel data did not match the declared dimensions.
    BitmapSize {
        /// Bytes supplied.
        got: usize,
        /// Bytes implied by width × height × 4.
        expected: usize,
    },
    /// Bitmap file could not be decoded.
    ImageLoad(image::ImageError),
    /// Bitmap file could not be read.
    Io(std::io::Error),
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::EmptyPath => write!(f, "Path data contains no drawable segments"),
            ShapeError::BadCommand(c) => write!(f, "Unsupported path command '{}'", c),
            ShapeError::BadNumber(s) => write!(f, "Invalid number '{}' in path data", s),
            ShapeError::MissingArgument(c) => {
                write!(f, "Path command '{}' is missing arguments", c)
            }
            ShapeError::BitmapSize { got, expected } => {
                write!(
                    f,
                    "Bitmap data is {} bytes but dimensions require {}",
                    got, expected
                )
            }
            ShapeError::ImageLoad(e) => write!(f, "Failed to decode bitmap: {}", e),
            ShapeError::Io(e) => write!(f, "Failed to read bitmap file: {}", e),
        }
    }
}

impl std::error::Error for ShapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShapeError::ImageLoad(e) => Some(e),
            ShapeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for ShapeError {
    fn from(e: image::ImageError) -> Self {
        ShapeError::ImageLoad(e)
    }
}

impl From<std::io::Error> for ShapeError {
    fn from(e: std::io::Error) -> Self {
        ShapeError::Io(e)
    }
}

/// Errors that can occur while opening the window viewer.
///
/// The simulation core never produces these; they are confined to
/// [`crate::viewer`] setup.
#[derive(Debug)]
pub enum ViewerError {
    /// Failed to create the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create the window.
    Window(winit::error::OsError),
    /// Failed to create a surface for presentation.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found for presentation.
    NoAdapter,
    /// Failed to create the presentation device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            ViewerError::Window(e) => write!(f, "Failed to create window: {}", e),
            ViewerError::SurfaceCreation(e) => {
                write!(f, "Failed to create presentation surface: {}", e)
            }
            ViewerError::NoAdapter => write!(
                f,
                "No compatible GPU adapter found. The simulation still runs headless; only the window viewer needs one."
            ),
            ViewerError::DeviceCreation(e) => {
                write!(f, "Failed to create presentation device: {}", e)
            }
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::EventLoop(e) => Some(e),
            ViewerError::Window(e) => Some(e),
            ViewerError::SurfaceCreation(e) => Some(e),
            ViewerError::DeviceCreation(e) => Some(e),
            ViewerError::NoAdapter => None,
        }
    }
}

impl From<winit::error::EventLoopError> for ViewerError {
    fn from(e: winit::error::EventLoopError) -> Self {
        ViewerError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for ViewerError {
    fn from(e: winit::error::OsError) -> Self {
        ViewerError::Window(e)
    }
}

impl From<wgpu::CreateSurfaceError> for ViewerError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        ViewerError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for ViewerError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        ViewerError::DeviceCreation(e)
    }
}
