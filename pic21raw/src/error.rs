//!
//! # Layout Result and Error Types
//!

// Local Imports
use crate::ser;

/// # [LayoutError] Result Type
pub type LayoutResult<T> = Result<T, LayoutError>;

///
/// # Layout Error Enumeration
///
pub enum LayoutError {
    /// Invalid cell or primitive parameter
    InvalidParam(String),
    /// Port-name collision on a single [crate::Component]
    DuplicatePort { cell: String, port: String },
    /// Instance-name collision on a single [crate::Component]
    DuplicateInstance { cell: String, inst: String },
    /// Reference to a port which does not exist
    PortNotFound { cell: String, port: String },
    /// Connection between ports of incompatible width or layer
    PortMismatch {
        port: String,
        other: String,
        message: String,
    },
    /// Layer name not present in the active PDK
    LayerNotFound(String),
    /// Cross-section name not present in the active PDK
    CrossSectionNotFound(String),
    /// Cell name not present in a catalog
    CellNotFound(String),
    /// Boxed External Errors
    Boxed(Box<dyn std::error::Error + Send + Sync>),
    /// Uncategorized Error, with String Message
    Str(String),
    /// # Cache Locking
    /// Caused by a panic while holding the cell-cache lock.
    /// Generally caused by a [std::sync::PoisonError], which is not forwardable due to lifetime constraints.
    PtrLock,
}
impl LayoutError {
    /// Create a [LayoutError::Str] from anything String-convertible
    pub fn msg(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }
    /// Create an error-variant [Result] of our [LayoutError::Str] variant from anything String-convertible
    pub fn fail<T>(s: impl Into<String>) -> Result<T, Self> {
        Err(Self::msg(s))
    }
    /// Create an error-variant [Result] of our [LayoutError::InvalidParam] variant
    pub fn invalid<T>(s: impl Into<String>) -> Result<T, Self> {
        Err(Self::InvalidParam(s.into()))
    }
}
impl std::fmt::Debug for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LayoutError::InvalidParam(msg) => write!(f, "Invalid Parameter: {}", msg),
            LayoutError::DuplicatePort { cell, port } => {
                write!(f, "Duplicate Port `{}` on Cell `{}`", port, cell)
            }
            LayoutError::DuplicateInstance { cell, inst } => {
                write!(f, "Duplicate Instance `{}` in Cell `{}`", inst, cell)
            }
            LayoutError::PortNotFound { cell, port } => {
                write!(f, "Port `{}` not found on `{}`", port, cell)
            }
            LayoutError::PortMismatch {
                port,
                other,
                message,
            } => write!(
                f,
                "Port Mismatch connecting `{}` to `{}`: {}",
                port, other, message
            ),
            LayoutError::LayerNotFound(name) => write!(f, "Layer `{}` not found", name),
            LayoutError::CrossSectionNotFound(name) => {
                write!(f, "Cross-section `{}` not found", name)
            }
            LayoutError::CellNotFound(name) => write!(f, "Cell `{}` not found", name),
            LayoutError::Boxed(err) => err.fmt(f),
            LayoutError::Str(err) => err.fmt(f),
            LayoutError::PtrLock => write!(f, "[std::sync::PoisonError]"),
        }
    }
}
impl std::fmt::Display for LayoutError {
    /// Display a [LayoutError]
    /// Delegates to the [Debug] implementation
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Boxed(e) => Some(&**e),
            _ => None,
        }
    }
}

impl From<String> for LayoutError {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
impl From<&str> for LayoutError {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}
impl From<std::num::TryFromIntError> for LayoutError {
    fn from(e: std::num::TryFromIntError) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<serde_json::Error> for LayoutError {
    fn from(e: serde_json::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<ser::Error> for LayoutError {
    fn from(e: ser::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl<T> From<std::sync::PoisonError<T>> for LayoutError {
    fn from(_e: std::sync::PoisonError<T>) -> Self {
        Self::PtrLock
    }
}

///
/// # ErrorHelper
///
/// Helper trait for builders which carry their own context to report upon failure,
/// such as the name of the cell under construction.
/// Implementers inject that context in the required `err` method.
/// The `fail` method, provided by default, simply returns the `err` value.
///
pub trait ErrorHelper {
    type Error;

    /// Create and return a [Self::Error] value.
    fn err(&self, msg: impl Into<String>) -> Self::Error;
    /// Return failure
    fn fail<T>(&self, msg: impl Into<String>) -> Result<T, Self::Error> {
        Err(self.err(msg))
    }
    /// Assert a boolean condition. Returns through `self.fail` if it is not satisfied.
    fn assert(&self, b: bool, msg: impl Into<String>) -> Result<(), Self::Error> {
        match b {
            true => Ok(()),
            false => self.fail(msg),
        }
    }
}

///
/// # Unwrapper
///
/// Post-fix application of [`ErrorHelper`] handling
/// when unwrapping [`Option`]s and [`Result`]s.
///
pub trait Unwrapper {
    type Ok;
    fn unwrapper<H>(self, helper: &H, msg: impl Into<String>) -> Result<Self::Ok, H::Error>
    where
        H: ErrorHelper;
}
impl<T> Unwrapper for Option<T> {
    type Ok = T;
    fn unwrapper<H>(self, helper: &H, msg: impl Into<String>) -> Result<Self::Ok, H::Error>
    where
        H: ErrorHelper,
    {
        match self {
            Some(t) => Ok(t),
            None => helper.fail(msg),
        }
    }
}
impl<T, E> Unwrapper for Result<T, E> {
    type Ok = T;
    fn unwrapper<H>(
        self,
        helper: &H,
        msg: impl Into<String>,
    ) -> Result<<Self as Unwrapper>::Ok, H::Error>
    where
        H: ErrorHelper,
    {
        match self {
            Ok(t) => Ok(t),
            Err(_) => helper.fail(msg),
        }
    }
}
