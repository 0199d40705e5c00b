//! Error types for the color core and the palette services.
//!
//! Plumbing code (configuration, storage backends, CLI glue) uses `anyhow`.
//! The public service contract returns these typed errors instead so callers
//! can react to each recoverable condition.

use std::fmt;

/// Error raised by the color math validation gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Input is not a well-formed `#RRGGBB` color.
    InvalidColor {
        /// The rejected input, as given.
        input: String,
        /// Human-readable explanation.
        reason: String,
    },
}

impl ColorError {
    /// Creates an `InvalidColor` error.
    pub fn invalid(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColor {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColor { input, reason } => {
                write!(f, "Invalid color '{input}': {reason}")
            }
        }
    }
}

impl std::error::Error for ColorError {}

/// Error returned by the palette store and the recent colors tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// A color argument failed hex validation.
    InvalidColor(ColorError),
    /// A name or color list failed validation.
    Validation(String),
    /// No palette with the given id exists.
    NotFound {
        /// The id that was looked up.
        id: String,
    },
    /// The palette-count ceiling for the current tier has been reached.
    LimitReached {
        /// Current ceiling.
        limit: usize,
    },
    /// The palette already holds the maximum number of colors.
    ColorLimitReached {
        /// Per-palette color cap.
        limit: usize,
    },
    /// The color is already part of the palette.
    DuplicateColor {
        /// Normalized color that was rejected.
        color: String,
    },
    /// The backing store rejected a read or write.
    PersistenceFailure(String),
}

impl PaletteError {
    /// Wraps a storage error, keeping the whole context chain in the message.
    pub fn persistence(err: &anyhow::Error) -> Self {
        Self::PersistenceFailure(format!("{err:#}"))
    }

    /// Returns true for errors caused by caller input rather than storage.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::PersistenceFailure(_))
    }
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColor(err) => write!(f, "{err}"),
            Self::Validation(message) => write!(f, "{message}"),
            Self::NotFound { id } => write!(f, "Palette '{id}' not found"),
            Self::LimitReached { limit } => write!(
                f,
                "Palette limit reached ({limit}). Delete a palette or upgrade to create more"
            ),
            Self::ColorLimitReached { limit } => {
                write!(f, "Palette already has the maximum of {limit} colors")
            }
            Self::DuplicateColor { color } => {
                write!(f, "Color {color} is already in this palette")
            }
            Self::PersistenceFailure(message) => write!(f, "Failed to persist data: {message}"),
        }
    }
}

impl std::error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidColor(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ColorError> for PaletteError {
    fn from(err: ColorError) -> Self {
        Self::InvalidColor(err)
    }
}
