use thiserror::Error;

/// Errors returned by LPP decoding.
///
/// Every variant aborts the whole payload: once the cursor is misaligned
/// there is no sentinel to resynchronise on. Offsets are absolute byte
/// positions in the input.
///
/// # Examples
/// ```
/// use cayenne_lpp_core::LppError;
///
/// let err = LppError::UnknownSensorType { tag: 255, offset: 4 };
/// assert!(err.to_string().contains("unknown sensor type 255"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LppError {
    #[error("truncated header at offset {offset}: need 2 bytes, got {remaining}")]
    TruncatedHeader { offset: usize, remaining: usize },
    #[error("unknown sensor type {tag} at offset {offset}")]
    UnknownSensorType { tag: u8, offset: usize },
    #[error(
        "truncated body for sensor type {tag} at offset {offset}: need {needed} bytes, got {actual}"
    )]
    TruncatedBody {
        tag: u8,
        offset: usize,
        needed: usize,
        actual: usize,
    },
    #[error("byte value overflow at offset {offset}: {value} does not fit in an octet")]
    ByteOverflow { offset: usize, value: u32 },
    #[error("integer field at offset {offset} is {width} bytes wide, at most {max} supported")]
    IntegerTooWide {
        offset: usize,
        width: usize,
        max: usize,
    },
}

impl LppError {
    /// Byte offset the error refers to.
    pub fn offset(&self) -> usize {
        match self {
            LppError::TruncatedHeader { offset, .. }
            | LppError::UnknownSensorType { offset, .. }
            | LppError::TruncatedBody { offset, .. }
            | LppError::ByteOverflow { offset, .. }
            | LppError::IntegerTooWide { offset, .. } => *offset,
        }
    }

    /// Rebase a slice-relative offset onto the enclosing payload.
    pub(crate) fn shifted(self, base: usize) -> Self {
        match self {
            LppError::TruncatedHeader { offset, remaining } => LppError::TruncatedHeader {
                offset: offset + base,
                remaining,
            },
            LppError::UnknownSensorType { tag, offset } => LppError::UnknownSensorType {
                tag,
                offset: offset + base,
            },
            LppError::TruncatedBody {
                tag,
                offset,
                needed,
                actual,
            } => LppError::TruncatedBody {
                tag,
                offset: offset + base,
                needed,
                actual,
            },
            LppError::ByteOverflow { offset, value } => LppError::ByteOverflow {
                offset: offset + base,
                value,
            },
            LppError::IntegerTooWide { offset, width, max } => LppError::IntegerTooWide {
                offset: offset + base,
                width,
                max,
            },
        }
    }
}
