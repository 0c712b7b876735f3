use std::fmt;

/// Camera facing preference when more than one device is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Front camera
    User,
    /// Rear camera
    Environment,
}

/// Constraints passed to a device source when acquiring a stream.
#[derive(Debug, Clone)]
pub struct StreamConstraints {
    pub video: bool,
    pub audio: bool,
    /// Resolution hints; the device picks the closest supported mode
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub facing: Facing,
}

impl StreamConstraints {
    /// Rear camera, no audio
    pub fn photo() -> Self {
        Self {
            video: true,
            audio: false,
            ideal_width: 1280,
            ideal_height: 720,
            facing: Facing::Environment,
        }
    }

    /// Camera plus microphone for video recording
    pub fn recording() -> Self {
        Self {
            video: true,
            audio: true,
            ideal_width: 1280,
            ideal_height: 720,
            facing: Facing::User,
        }
    }
}

/// Why a stream could not be acquired or read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The user denied hardware access
    PermissionDenied,
    /// No device matches the constraints
    NotFound,
    /// Failure while reading from a live stream
    Stream(String),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::PermissionDenied => write!(f, "device permission denied"),
            DeviceError::NotFound => write!(f, "no matching capture device"),
            DeviceError::Stream(msg) => write!(f, "stream error: {msg}"),
        }
    }
}

impl std::error::Error for DeviceError {}

/// A single RGBA frame from a live video track.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    /// Interleaved RGBA, row-major, `width * height * 4` bytes
    pub rgba: Vec<u8>,
}

/// A live device stream.
///
/// `stop` halts every track and must be idempotent; implementations also
/// release hardware on drop so a dropped stream never keeps an indicator lit.
pub trait MediaStream: Send {
    /// Grab the current video frame
    fn grab_frame(&mut self) -> Result<RawFrame, DeviceError>;

    /// Stop every track. Calling this more than once is a no-op.
    fn stop(&mut self);

    /// Whether any track is still live
    fn is_live(&self) -> bool;
}

/// Produces device streams. Real backends wrap a platform capture API;
/// tests use synthetic sources.
pub trait MediaSource: Send + Sync {
    /// Request device access. May be refused by the user or the platform.
    fn acquire(&self, constraints: &StreamConstraints)
        -> Result<Box<dyn MediaStream>, DeviceError>;
}
