//! Front-coded dictionary of query completions.
pub(crate) mod builder;
pub(crate) mod compare;
pub(crate) mod pointers;
pub(crate) mod search;

use std::io::{Read, Write};

use bincode::{Decode, Encode};

use crate::common::{self, CompletionId, TermId, MAX_NUM_TERMS};
use crate::errors::Result;
use crate::utils::FromU32;
use pointers::{PointerStorage, PointerWrapper};

pub use builder::{BuildParams, DictionaryBuilder};
pub use pointers::PointerBacking;

/// Range of completion ids returned by prefix searches.
///
/// [`Dictionary::locate_prefix`] fills it with an inclusive `[begin, end]`
/// pair, where `begin > end` denotes an empty result, while
/// [`Dictionary::locate_prefix_within`] fills it with a half-open
/// `[begin, end)` pair, where `begin >= end` does.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct IdRange {
    /// First id of the range.
    pub begin: u32,

    /// Last id (inclusive convention) or one past it (half-open convention).
    pub end: u32,
}

impl IdRange {
    /// Creates a new instance.
    #[inline(always)]
    pub const fn new(begin: u32, end: u32) -> Self {
        Self { begin, end }
    }
}

/// Inner data of [`Dictionary`].
#[derive(Decode, Encode)]
struct DictionaryInner {
    num_completions: usize,
    bucket_capacity: usize,
    header_offsets: PointerWrapper,
    bucket_offsets: PointerWrapper,
    headers: Vec<TermId>,
    buckets: Vec<u8>,
}

/// Immutable front-coded dictionary over sorted term-id sequences.
///
/// Completions are grouped into buckets; the first completion of each
/// bucket is stored verbatim and the following ones as
/// `(lcp, suffix)` deltas against their predecessor. The structure is
/// sealed once built by a [`DictionaryBuilder`] and is safe to share
/// across threads.
pub struct Dictionary(DictionaryInner);

impl Dictionary {
    /// Returns the number of stored completions.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.num_completions
    }

    /// Checks if the dictionary stores no completions.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.num_completions == 0
    }

    /// Returns the number of buckets.
    #[inline(always)]
    pub fn num_buckets(&self) -> usize {
        self.0.header_offsets.len() - 1
    }

    /// Returns the number of completions grouped in bucket `b`,
    /// including its header.
    ///
    /// # Panics
    ///
    /// When `b >= self.num_buckets()`.
    #[inline]
    pub fn bucket_size(&self, b: usize) -> usize {
        assert!(b < self.num_buckets());
        if b != self.num_buckets() - 1 {
            self.0.bucket_capacity
        } else {
            self.len() - b * self.0.bucket_capacity
        }
    }

    /// Returns the total in-memory footprint in bytes.
    pub fn size_in_bytes(&self) -> usize {
        std::mem::size_of::<usize>() * 2
            + self.0.header_offsets.size_in_bytes()
            + self.0.bucket_offsets.size_in_bytes()
            + self.0.headers.len() * std::mem::size_of::<TermId>()
            + self.0.buckets.len()
    }

    /// Decodes the completion with the given id into `out` and returns
    /// its length in terms.
    ///
    /// No heap allocation is performed.
    ///
    /// # Panics
    ///
    /// When `id >= self.len() as u32`, or when `out` is shorter than
    /// [`MAX_NUM_TERMS`](crate::common::MAX_NUM_TERMS).
    pub fn extract(&self, id: CompletionId, out: &mut [TermId]) -> usize {
        let id = usize::from_u32(id);
        assert!(id < self.len());
        assert!(out.len() >= MAX_NUM_TERMS);
        let bucket_id = id / self.0.bucket_capacity;
        let k = id % self.0.bucket_capacity;
        let header = self.header(bucket_id);
        out[..header.len()].copy_from_slice(header);
        let mut len = header.len();
        let mut pos = self.0.bucket_offsets.get(bucket_id);
        for _ in 0..k {
            let decoded = decode_record(&self.0.buckets, pos, out);
            len = decoded.0;
            pos = decoded.1;
        }
        len
    }

    /// Returns an iterator decoding all completions in id order.
    pub fn iter(&self) -> Completions<'_> {
        Completions {
            dict: self,
            id: 0,
            pos: 0,
            buf: [0; MAX_NUM_TERMS],
            len: 0,
        }
    }

    /// Exports the dictionary data.
    ///
    /// # Errors
    ///
    /// When bincode generates an error, it will be returned as is.
    pub fn write<W>(&self, mut wtr: W) -> Result<usize>
    where
        W: Write,
    {
        let num_bytes =
            bincode::encode_into_std_write(&self.0, &mut wtr, common::bincode_config())?;
        Ok(num_bytes)
    }

    /// Creates a dictionary from a reader over data exported by
    /// [`Dictionary::write()`].
    ///
    /// # Errors
    ///
    /// When bincode generates an error, it will be returned as is.
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let data = bincode::decode_from_std_read(&mut rdr, common::bincode_config())?;
        Ok(Self(data))
    }

    /// Gets the uncompressed head completion of bucket `i`.
    #[inline(always)]
    pub(crate) fn header(&self, i: usize) -> &[TermId] {
        debug_assert!(i < self.num_buckets());
        let begin = self.0.header_offsets.get(i);
        let end = self.0.header_offsets.get(i + 1);
        &self.0.headers[begin..end]
    }

    /// Number of delta records in bucket `b`.
    #[inline(always)]
    pub(crate) fn num_deltas(&self, b: usize) -> usize {
        self.bucket_size(b) - 1
    }

    #[inline(always)]
    pub(crate) fn bucket_capacity(&self) -> usize {
        self.0.bucket_capacity
    }

    pub(crate) fn from_parts(
        num_completions: usize,
        bucket_capacity: usize,
        header_offsets: PointerWrapper,
        bucket_offsets: PointerWrapper,
        headers: Vec<TermId>,
        buckets: Vec<u8>,
    ) -> Self {
        Self(DictionaryInner {
            num_completions,
            bucket_capacity,
            header_offsets,
            bucket_offsets,
            headers,
            buckets,
        })
    }
}

/// Decodes one delta record at byte position `pos`, writing the suffix
/// into `out` past the shared prefix already present there. Returns the
/// decoded completion length and the position of the next record.
#[inline(always)]
pub(crate) fn decode_record(bytes: &[u8], pos: usize, out: &mut [TermId]) -> (usize, usize) {
    let lcp = usize::from(bytes[pos]);
    let suffix_len = usize::from(bytes[pos + 1]);
    let mut p = pos + 2;
    for slot in out[lcp..lcp + suffix_len].iter_mut() {
        *slot = TermId::from_le_bytes([bytes[p], bytes[p + 1], bytes[p + 2], bytes[p + 3]]);
        p += 4;
    }
    (lcp + suffix_len, p)
}

/// Iterator created by [`Dictionary::iter()`].
///
/// Decoding is sequential: each bucket's deltas are replayed once, not
/// once per id.
pub struct Completions<'a> {
    dict: &'a Dictionary,
    id: usize,
    pos: usize,
    buf: [TermId; MAX_NUM_TERMS],
    len: usize,
}

impl Iterator for Completions<'_> {
    type Item = (CompletionId, Vec<TermId>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.id == self.dict.len() {
            return None;
        }
        let bucket_id = self.id / self.dict.bucket_capacity();
        if self.id % self.dict.bucket_capacity() == 0 {
            let header = self.dict.header(bucket_id);
            self.buf[..header.len()].copy_from_slice(header);
            self.len = header.len();
            self.pos = self.dict.0.bucket_offsets.get(bucket_id);
        } else {
            let decoded = decode_record(&self.dict.0.buckets, self.pos, &mut self.buf);
            self.len = decoded.0;
            self.pos = decoded.1;
        }
        let id = self.id as CompletionId;
        self.id += 1;
        Some((id, self.buf[..self.len].to_vec()))
    }
}
