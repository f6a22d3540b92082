//! Construction of dictionaries from sorted completion sources.

use std::fs::File;
use std::io::{prelude::*, BufReader, Read};

use crate::common::{
    DocId, TermId, DEFAULT_BUCKET_SIZE, INVALID_TERM_ID, MAX_NUM_TERMS, TERMINATOR,
};
use crate::dictionary::pointers::{PointerBacking, PointerWrapper};
use crate::dictionary::Dictionary;
use crate::errors::{CadenzaError, Result};

/// Parameters describing a mapped collection to compile.
pub struct BuildParams {
    /// Path prefix of the collection; records are read from
    /// `<collection_basename>.mapped`.
    pub collection_basename: String,

    /// Number of completions the collection declares.
    pub num_completions: usize,

    /// Bucket parameter: each bucket stores this many front-coded
    /// completions after its uncompressed header.
    pub bucket_size: usize,

    /// Storage layout of the offset tables.
    pub pointer_backing: PointerBacking,
}

impl BuildParams {
    /// Creates parameters with the default bucket size and pointer
    /// backing.
    pub fn new<S>(collection_basename: S, num_completions: usize) -> Self
    where
        S: Into<String>,
    {
        Self {
            collection_basename: collection_basename.into(),
            num_completions,
            bucket_size: DEFAULT_BUCKET_SIZE,
            pointer_backing: PointerBacking::default(),
        }
    }
}

/// Streaming builder accumulating sorted completions into the
/// front-coded arrays.
///
/// Completions must be pushed in strictly increasing lexicographic
/// order; [`DictionaryBuilder::finish`] seals the arrays into an
/// immutable [`Dictionary`] and hands back the doc-id sidecar.
pub struct DictionaryBuilder {
    bucket_capacity: usize,
    num: usize,
    header_offsets: Vec<usize>,
    bucket_offsets: Vec<usize>,
    headers: Vec<TermId>,
    buckets: Vec<u8>,
    doc_ids: Vec<DocId>,
    prev: Vec<TermId>,
}

impl DictionaryBuilder {
    /// Creates a new builder with the given bucket parameter.
    ///
    /// # Errors
    ///
    /// [`CadenzaError::InvalidArgument`] is returned when
    /// `bucket_size == 0`.
    pub fn new(bucket_size: usize) -> Result<Self> {
        if bucket_size == 0 {
            return Err(CadenzaError::invalid_argument(
                "bucket_size",
                "bucket_size must not be zero",
            ));
        }
        Ok(Self {
            bucket_capacity: bucket_size + 1,
            num: 0,
            header_offsets: vec![0],
            bucket_offsets: vec![0],
            headers: vec![],
            buckets: vec![],
            doc_ids: vec![],
            prev: vec![],
        })
    }

    /// Appends one completion with its associated doc id.
    ///
    /// # Errors
    ///
    ///  - [`CadenzaError::LengthExceeded`] when `terms` has more than
    ///    [`MAX_NUM_TERMS`](crate::common::MAX_NUM_TERMS) entries.
    ///  - [`CadenzaError::OrderViolation`] when `terms` is not strictly
    ///    greater than the previously pushed completion.
    ///  - [`CadenzaError::InvalidArgument`] when `terms` is empty or
    ///    contains the reserved all-ones id.
    pub fn push(&mut self, terms: &[TermId], doc_id: DocId) -> Result<()> {
        let record_id = u32::try_from(self.num)?;
        if terms.is_empty() {
            return Err(CadenzaError::invalid_argument(
                "terms",
                "a completion must contain at least one term",
            ));
        }
        if terms.len() > MAX_NUM_TERMS {
            return Err(CadenzaError::length_exceeded(record_id, terms.len()));
        }
        if terms.contains(&INVALID_TERM_ID) {
            return Err(CadenzaError::invalid_argument(
                "terms",
                "the all-ones term id is reserved",
            ));
        }

        let mut l = 0;
        if self.num != 0 {
            l = lcp(&self.prev, terms);
            let ordered = if l == terms.len() {
                // Duplicate, or a proper prefix of the predecessor.
                false
            } else if l == self.prev.len() {
                true
            } else {
                terms[l] > self.prev[l]
            };
            if !ordered {
                return Err(CadenzaError::order_violation(record_id));
            }
        }

        if self.num % self.bucket_capacity == 0 {
            if self.num != 0 {
                self.bucket_offsets.push(self.buckets.len());
            }
            self.headers.extend_from_slice(terms);
            self.header_offsets.push(self.headers.len());
        } else {
            self.buckets.push(u8::try_from(l).unwrap());
            self.buckets.push(u8::try_from(terms.len() - l).unwrap());
            for &t in &terms[l..] {
                self.buckets.extend_from_slice(&t.to_le_bytes());
            }
        }

        self.doc_ids.push(doc_id);
        self.prev.clear();
        self.prev.extend_from_slice(terms);
        self.num += 1;
        Ok(())
    }

    /// Seals the builder into a dictionary with plain offset tables,
    /// returning it together with the doc-id sidecar indexed by
    /// completion id.
    ///
    /// # Errors
    ///
    /// [`CadenzaError::InvalidArgument`] is returned when no completion
    /// has been pushed.
    pub fn finish(self) -> Result<(Dictionary, Vec<DocId>)> {
        self.finish_with(PointerBacking::Plain)
    }

    /// Seals the builder into a dictionary with the given offset-table
    /// backing.
    ///
    /// # Errors
    ///
    /// See [`DictionaryBuilder::finish`].
    pub fn finish_with(mut self, backing: PointerBacking) -> Result<(Dictionary, Vec<DocId>)> {
        if self.num == 0 {
            return Err(CadenzaError::invalid_argument(
                "records",
                "at least one completion is required",
            ));
        }
        self.bucket_offsets.push(self.buckets.len());
        let dict = Dictionary::from_parts(
            self.num,
            self.bucket_capacity,
            PointerWrapper::build(self.header_offsets, backing),
            PointerWrapper::build(self.bucket_offsets, backing),
            self.headers,
            self.buckets,
        );
        Ok((dict, self.doc_ids))
    }
}

impl Dictionary {
    /// Creates a dictionary from a mapped-collection reader holding
    /// `num_completions` sorted records.
    ///
    /// Each line carries one record as space-separated decimal fields:
    /// the completion's term ids, the terminator
    /// [`TERMINATOR`](crate::common::TERMINATOR), and the doc id.
    /// Empty lines are skipped. Returns the dictionary and the doc-id
    /// sidecar.
    ///
    /// # Errors
    ///
    ///  - [`CadenzaError::SourceExhausted`] when the reader yields fewer
    ///    than `num_completions` records.
    ///  - [`CadenzaError::InvalidFormat`] or [`CadenzaError::ParseInt`]
    ///    when a line is malformed.
    ///  - Any error of [`DictionaryBuilder::push`].
    pub fn from_reader<R>(
        rdr: R,
        num_completions: usize,
        bucket_size: usize,
        backing: PointerBacking,
    ) -> Result<(Self, Vec<DocId>)>
    where
        R: Read,
    {
        let mut builder = DictionaryBuilder::new(bucket_size)?;
        let reader = BufReader::new(rdr);
        let mut read = 0;
        for line in reader.lines() {
            if read == num_completions {
                break;
            }
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let (terms, doc_id) = parse_record(&line)?;
            builder.push(&terms, doc_id)?;
            read += 1;
        }
        if read != num_completions {
            return Err(CadenzaError::source_exhausted(num_completions, read));
        }
        builder.finish_with(backing)
    }

    /// Creates a dictionary from the mapped collection described by
    /// `params`, reading `<collection_basename>.mapped`.
    ///
    /// # Errors
    ///
    /// See [`Dictionary::from_reader`]; I/O errors opening the file are
    /// returned as is.
    pub fn from_params(params: &BuildParams) -> Result<(Self, Vec<DocId>)> {
        let file = File::open(format!("{}.mapped", params.collection_basename))?;
        Self::from_reader(
            file,
            params.num_completions,
            params.bucket_size,
            params.pointer_backing,
        )
    }
}

fn parse_record(line: &str) -> Result<(Vec<TermId>, DocId)> {
    let cols: Vec<_> = line.split(' ').collect();
    if cols.len() < 3 {
        let msg = format!(
            "A record must consist of at least one term id, the terminator, and a doc id, {line}"
        );
        return Err(CadenzaError::invalid_format("mapped", msg));
    }
    let doc_id = cols[cols.len() - 1].parse()?;
    let terminator: TermId = cols[cols.len() - 2].parse()?;
    if terminator != TERMINATOR {
        let msg = format!("A completion must be closed by {TERMINATOR}, {line}");
        return Err(CadenzaError::invalid_format("mapped", msg));
    }
    let mut terms = Vec::with_capacity(cols.len() - 2);
    for col in &cols[..cols.len() - 2] {
        terms.push(col.parse()?);
    }
    Ok((terms, doc_id))
}

/// Length in terms of the longest common prefix of `a` and `b`.
#[inline(always)]
fn lcp(a: &[TermId], b: &[TermId]) -> usize {
    let n = a.len().min(b.len());
    let mut l = 0;
    while l != n && a[l] == b[l] {
        l += 1;
    }
    l
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disorder() {
        let mut builder = DictionaryBuilder::new(2).unwrap();
        builder.push(&[10, 21], 0).unwrap();
        let e = builder.push(&[10, 20], 1);
        assert!(matches!(e, Err(CadenzaError::OrderViolation(_))));
    }

    #[test]
    fn test_duplicate() {
        let mut builder = DictionaryBuilder::new(2).unwrap();
        builder.push(&[10, 20], 0).unwrap();
        let e = builder.push(&[10, 20], 1);
        assert!(matches!(e, Err(CadenzaError::OrderViolation(_))));
    }

    #[test]
    fn test_prefix_of_predecessor() {
        let mut builder = DictionaryBuilder::new(2).unwrap();
        builder.push(&[10, 20], 0).unwrap();
        let e = builder.push(&[10], 1);
        assert!(matches!(e, Err(CadenzaError::OrderViolation(_))));
    }

    #[test]
    fn test_order_violation_reports_record_id() {
        let mut builder = DictionaryBuilder::new(2).unwrap();
        builder.push(&[10], 0).unwrap();
        builder.push(&[10, 20], 1).unwrap();
        match builder.push(&[9], 2) {
            Err(CadenzaError::OrderViolation(e)) => assert_eq!(e.record_id, 2),
            r => panic!("unexpected result: {r:?}"),
        }
    }

    #[test]
    fn test_max_length_accepted() {
        let long: Vec<u32> = (0..MAX_NUM_TERMS as u32).collect();
        let mut builder = DictionaryBuilder::new(4).unwrap();
        builder.push(&long, 7).unwrap();
        let (dict, doc_ids) = builder.finish().unwrap();
        let mut buf = [0; MAX_NUM_TERMS];
        assert_eq!(dict.extract(0, &mut buf), MAX_NUM_TERMS);
        assert_eq!(&buf[..MAX_NUM_TERMS], long.as_slice());
        assert_eq!(doc_ids, vec![7]);
    }

    #[test]
    fn test_length_exceeded() {
        let long: Vec<u32> = (0..=MAX_NUM_TERMS as u32).collect();
        let mut builder = DictionaryBuilder::new(4).unwrap();
        match builder.push(&long, 0) {
            Err(CadenzaError::LengthExceeded(e)) => {
                assert_eq!(e.record_id, 0);
                assert_eq!(e.num_terms, MAX_NUM_TERMS + 1);
            }
            r => panic!("unexpected result: {r:?}"),
        }
    }

    #[test]
    fn test_empty_completion() {
        let mut builder = DictionaryBuilder::new(2).unwrap();
        let e = builder.push(&[], 0);
        assert!(matches!(e, Err(CadenzaError::InvalidArgument(_))));
    }

    #[test]
    fn test_reserved_term_id() {
        let mut builder = DictionaryBuilder::new(2).unwrap();
        let e = builder.push(&[10, INVALID_TERM_ID], 0);
        assert!(matches!(e, Err(CadenzaError::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_build() {
        let builder = DictionaryBuilder::new(2).unwrap();
        assert!(matches!(
            builder.finish(),
            Err(CadenzaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_bucket_size() {
        assert!(matches!(
            DictionaryBuilder::new(0),
            Err(CadenzaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_reader() {
        let data = "10 20 4294967295 100
10 21 4294967295 101
11 4294967295 102
";
        let (dict, doc_ids) =
            Dictionary::from_reader(data.as_bytes(), 3, 2, PointerBacking::Plain).unwrap();
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.locate(&[10, 21]), Some(1));
        assert_eq!(doc_ids, vec![100, 101, 102]);
    }

    #[test]
    fn test_from_reader_exhausted() {
        let data = "10 20 4294967295 100
10 21 4294967295 101
";
        match Dictionary::from_reader(data.as_bytes(), 3, 2, PointerBacking::Plain) {
            Err(CadenzaError::SourceExhausted(e)) => {
                assert_eq!(e.expected, 3);
                assert_eq!(e.read, 2);
            }
            r => panic!("unexpected result: {:?}", r.map(|_| ())),
        }
    }

    #[test]
    fn test_from_reader_missing_terminator() {
        let data = "10 20 100\n";
        let result = Dictionary::from_reader(data.as_bytes(), 1, 2, PointerBacking::Plain);
        assert!(matches!(result, Err(CadenzaError::InvalidFormat(_))));
    }

    #[test]
    fn test_from_reader_not_a_number() {
        let data = "10 x 4294967295 100\n";
        let result = Dictionary::from_reader(data.as_bytes(), 1, 2, PointerBacking::Plain);
        assert!(matches!(result, Err(CadenzaError::ParseInt(_))));
    }

    #[test]
    fn test_from_reader_short_record() {
        let data = "4294967295 100\n";
        let result = Dictionary::from_reader(data.as_bytes(), 1, 2, PointerBacking::Plain);
        assert!(matches!(result, Err(CadenzaError::InvalidFormat(_))));
    }
}
