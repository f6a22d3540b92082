//! Common settings in Cadenza.
use bincode::config::{self, Fixint, LittleEndian};

/// Identifier of a vocabulary term.
pub type TermId = u32;

/// Identifier of a document associated with a completion.
pub type DocId = u32;

/// 0-based position of a completion in the sorted dictionary order.
pub type CompletionId = u32;

/// Maximum number of terms in a single completion.
///
/// The per-record `lcp` and suffix-length fields are stored in one byte
/// each, so this must never exceed 255.
pub const MAX_NUM_TERMS: usize = 64;

/// Reserved all-ones term id. It is never stored in a dictionary and
/// compares greater than every legitimate term id.
pub const INVALID_TERM_ID: TermId = TermId::MAX;

/// Sentinel closing each record of a mapped collection file. The value
/// doubles as [`INVALID_TERM_ID`]; it is stripped before storage.
pub const TERMINATOR: TermId = INVALID_TERM_ID;

/// Default bucket parameter: each bucket groups this many front-coded
/// completions after its uncompressed header.
pub const DEFAULT_BUCKET_SIZE: usize = 16;

/// Gets the common bincode configuration of serialization.
pub const fn bincode_config() -> config::Configuration<LittleEndian, Fixint> {
    config::standard()
        .with_little_endian()
        .with_fixed_int_encoding()
}
