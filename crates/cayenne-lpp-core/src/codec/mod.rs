//! Cayenne LPP decoding.
//!
//! The codec follows a layered structure:
//! - `layout`: header geometry and sensor type tags (source of truth)
//! - `registry`: per-tag width, signedness and decimal scaling
//! - `reader`: bounded cursor, octet checks and fixed-width integers
//! - `parser`: the decode loop (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Entries are `channel, type, body` with the body width implied by the
//! type. The parser walks entries until the payload is consumed exactly and
//! aborts on the first malformed entry.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod registry;

pub use error::LppError;
pub use parser::{decode, decode_units};
pub use registry::{Span, TypeDescriptor, lookup};
