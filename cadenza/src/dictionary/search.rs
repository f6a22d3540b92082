//! Bucket binary searches and in-bucket scans.

use std::cmp::Ordering;

use crate::common::{CompletionId, TermId, INVALID_TERM_ID, MAX_NUM_TERMS};
use crate::dictionary::compare::{compare, compare_prefix};
use crate::dictionary::pointers::PointerStorage;
use crate::dictionary::{decode_record, Dictionary, IdRange};

impl Dictionary {
    /// Locates an exact completion and returns its 0-based id, or `None`
    /// when the sequence is not stored.
    pub fn locate(&self, t: &[TermId]) -> Option<CompletionId> {
        let (bucket_id, is_header) = self.locate_bucket(t)?;
        let base = bucket_id * self.bucket_capacity();
        if is_header {
            return Some(base as CompletionId);
        }
        let mut cursor = BucketCursor::new(self, bucket_id);
        for i in 1..=self.num_deltas(bucket_id) {
            cursor.advance();
            match compare(t, cursor.current()) {
                Ordering::Equal => return Some((base + i) as CompletionId),
                Ordering::Less => return None,
                Ordering::Greater => {}
            }
        }
        None
    }

    /// Locates all completions starting with the given prefix and
    /// returns the inclusive id range `[begin, end]`.
    ///
    /// An empty result has `begin > end`. The empty prefix matches every
    /// completion.
    pub fn locate_prefix(&self, p: &[TermId]) -> IdRange {
        let (left, right) = self.locate_buckets(p);
        let mut begin = left * self.bucket_capacity();
        let mut end = right * self.bucket_capacity();
        if compare_prefix(self.header(left), p, p.len()) != Ordering::Equal {
            begin += self.left_locate(p, left);
        }
        end += self.right_locate(p, right);
        IdRange::new(begin as u32, end as u32)
    }

    /// Locates all completions whose leading terms equal `prefix` and
    /// whose next term lies in `lex_range = [a, b]` (both inclusive),
    /// returning the half-open id range `[begin, end)`.
    ///
    /// This serves queries whose last token is not completely specified:
    /// `lex_range` is the lexicographic span of the vocabulary terms the
    /// token may still complete to. `a > b` yields an empty range.
    ///
    /// # Panics
    ///
    /// When `prefix` is longer than
    /// [`MAX_NUM_TERMS`](crate::common::MAX_NUM_TERMS).
    pub fn locate_prefix_within(&self, prefix: &[TermId], lex_range: IdRange) -> IdRange {
        assert!(prefix.len() <= MAX_NUM_TERMS);
        let mut buf = [0; MAX_NUM_TERMS + 2];
        buf[..prefix.len()].copy_from_slice(prefix);

        buf[prefix.len()] = lex_range.begin;
        let query = &buf[..prefix.len() + 1];
        let begin = match self.locate_bucket(query) {
            // The query precedes every header, hence every completion.
            None => 0,
            Some((bucket_id, true)) => bucket_id * self.bucket_capacity(),
            Some((bucket_id, false)) => {
                bucket_id * self.bucket_capacity() + self.left_locate2(query, bucket_id)
            }
        };

        buf[prefix.len()] = lex_range.end;
        let mut query_len = prefix.len() + 1;
        if lex_range.begin == lex_range.end {
            // Force the right scan to step past every completion whose
            // next term equals the single admissible one.
            buf[query_len] = INVALID_TERM_ID;
            query_len += 1;
        }
        let query = &buf[..query_len];
        let end = match self.locate_bucket(query) {
            None => {
                // The query precedes every header; bucket 0 may still
                // hold completions prefix-comparing no greater than it.
                if compare_prefix(self.header(0), query, query.len()) == Ordering::Greater {
                    return IdRange::new(begin as u32, begin as u32);
                }
                self.right_locate(query, 0) + 1
            }
            Some((bucket_id, _)) => {
                bucket_id * self.bucket_capacity() + self.right_locate(query, bucket_id) + 1
            }
        };

        IdRange::new(begin as u32, end as u32)
    }

    /// Three-way binary search over bucket headers.
    ///
    /// Returns `(b, true)` when header `b` equals `t` exactly, and
    /// `(b, false)` with the greatest bucket whose header precedes `t`
    /// otherwise. `None` means `t` precedes every header.
    fn locate_bucket(&self, t: &[TermId]) -> Option<(usize, bool)> {
        let mut lo = 0_isize;
        let mut hi = self.num_buckets() as isize - 1;
        let mut mi = 0_isize;
        let mut cmp = Ordering::Greater;
        while lo <= hi {
            mi = (lo + hi) / 2;
            cmp = compare(self.header(mi as usize), t);
            match cmp {
                Ordering::Greater => hi = mi - 1,
                Ordering::Less => lo = mi + 1,
                Ordering::Equal => return Some((mi as usize, true)),
            }
        }
        if cmp == Ordering::Less {
            Some((mi as usize, false))
        } else if mi == 0 {
            None
        } else {
            Some((mi as usize - 1, false))
        }
    }

    /// Finds the buckets that may hold the first and the last completion
    /// starting with `p`.
    fn locate_buckets(&self, p: &[TermId]) -> (usize, usize) {
        let buckets = self.num_buckets();
        let n = p.len();

        // 1. Locate the left bucket: the lower bound over truncated headers.
        let mut lo = 0_isize;
        let mut hi = buckets as isize - 1;
        while lo <= hi {
            let mi = (lo + hi) / 2;
            if compare_prefix(self.header(mi as usize), p, n) != Ordering::Less {
                hi = mi - 1;
            } else {
                lo = mi + 1;
            }
        }

        if lo as usize == buckets {
            // The prefix lies past the last header; only the last bucket
            // can hold candidates.
            return (buckets - 1, buckets - 1);
        }

        let left = if lo == 0 {
            0
        } else if compare(self.header(lo as usize), p) == Ordering::Equal {
            // The header is the probe itself, so nothing before it can
            // share the prefix.
            lo as usize
        } else {
            // Matches may begin inside the preceding bucket.
            lo as usize - 1
        };

        // 2. If the next header already prefix-compares greater, every
        //    match lies in the left bucket.
        if left == buckets - 1
            || compare_prefix(self.header(left + 1), p, n) == Ordering::Greater
        {
            return (left, left);
        }

        // 3. Locate the right bucket: the upper bound over truncated headers.
        let mut lo = left as isize;
        let mut hi = buckets as isize - 1;
        while lo <= hi {
            let mi = (lo + hi) / 2;
            if compare_prefix(self.header(mi as usize), p, n) != Ordering::Greater {
                lo = mi + 1;
            } else {
                hi = mi - 1;
            }
        }

        (left, hi as usize)
    }

    /// Smallest in-bucket offset whose completion prefix-compares equal
    /// to `p`, or `num_deltas + 1` when none does.
    fn left_locate(&self, p: &[TermId], bucket_id: usize) -> usize {
        let n = self.num_deltas(bucket_id);
        let mut cursor = BucketCursor::new(self, bucket_id);
        for i in 1..=n {
            cursor.advance();
            if compare_prefix(cursor.current(), p, p.len()) == Ordering::Equal {
                return i;
            }
        }
        n + 1
    }

    /// Smallest in-bucket offset whose completion prefix-compares
    /// greater than or equal to `p`, or `num_deltas + 1` when none does.
    fn left_locate2(&self, p: &[TermId], bucket_id: usize) -> usize {
        let n = self.num_deltas(bucket_id);
        let mut cursor = BucketCursor::new(self, bucket_id);
        for i in 1..=n {
            cursor.advance();
            if compare_prefix(cursor.current(), p, p.len()) != Ordering::Less {
                return i;
            }
        }
        n + 1
    }

    /// Largest in-bucket offset (0 being the header) whose completion
    /// prefix-compares no greater than `p`.
    fn right_locate(&self, p: &[TermId], bucket_id: usize) -> usize {
        let n = self.num_deltas(bucket_id);
        let mut cursor = BucketCursor::new(self, bucket_id);
        for i in 1..=n {
            cursor.advance();
            if compare_prefix(cursor.current(), p, p.len()) == Ordering::Greater {
                return i - 1;
            }
        }
        n
    }
}

/// Sequential decoder over one bucket, seeded with its header.
///
/// The scratch lives on the stack so concurrent readers never share
/// decode state.
struct BucketCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    buf: [TermId; MAX_NUM_TERMS],
    len: usize,
}

impl<'a> BucketCursor<'a> {
    fn new(dict: &'a Dictionary, bucket_id: usize) -> Self {
        let header = dict.header(bucket_id);
        let mut buf = [0; MAX_NUM_TERMS];
        buf[..header.len()].copy_from_slice(header);
        Self {
            bytes: &dict.0.buckets,
            pos: dict.0.bucket_offsets.get(bucket_id),
            buf,
            len: header.len(),
        }
    }

    #[inline(always)]
    fn advance(&mut self) {
        let decoded = decode_record(self.bytes, self.pos, &mut self.buf);
        self.len = decoded.0;
        self.pos = decoded.1;
    }

    #[inline(always)]
    fn current(&self) -> &[TermId] {
        &self.buf[..self.len]
    }
}
