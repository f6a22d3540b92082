//! # Cadenza
//!
//! Cadenza is a front-coded dictionary over sorted sequences of integer
//! term ids, the core store of a query-completion engine. It answers
//! exact lookups, prefix lookups, and prefix lookups whose last token is
//! only known up to a lexicographic range, and reconstructs any stored
//! completion from its id.
//!
//! ## Examples
//!
//! ```
//! use cadenza::dictionary::DictionaryBuilder;
//!
//! let records: &[(&[u32], u32)] = &[
//!     (&[10, 20], 0),
//!     (&[10, 21], 1),
//!     (&[10, 30], 2),
//!     (&[11, 5, 7], 3),
//!     (&[11, 5, 8], 4),
//!     (&[11, 6], 5),
//!     (&[12], 6),
//! ];
//!
//! let mut builder = DictionaryBuilder::new(2).unwrap();
//! for &(terms, doc_id) in records {
//!     builder.push(terms, doc_id).unwrap();
//! }
//! let (dict, doc_ids) = builder.finish().unwrap();
//!
//! assert_eq!(dict.locate(&[10, 21]), Some(1));
//! assert_eq!(dict.locate(&[10, 22]), None);
//!
//! let range = dict.locate_prefix(&[10]);
//! assert_eq!((range.begin, range.end), (0, 2));
//!
//! let mut buf = [0; cadenza::common::MAX_NUM_TERMS];
//! let len = dict.extract(5, &mut buf);
//! assert_eq!(&buf[..len], &[11, 6]);
//!
//! assert_eq!(doc_ids.len(), 7);
//! ```
#![deny(missing_docs)]

#[cfg(target_pointer_width = "16")]
compile_error!("`target_pointer_width` must be larger than or equal to 32");

pub mod common;
pub mod dictionary;
pub mod errors;
mod utils;

#[cfg(test)]
mod tests;

pub use dictionary::{Dictionary, DictionaryBuilder, IdRange};
