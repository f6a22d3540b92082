//! Monotone offset tables delimiting headers and bucket byte spans.

use bincode::{Decode, Encode};

/// Random access over a non-decreasing sequence of array offsets.
pub trait PointerStorage {
    /// Gets the offset at position `i`.
    fn get(&self, i: usize) -> usize;

    /// Returns the number of stored offsets.
    fn len(&self) -> usize;

    /// Returns the in-memory footprint in bytes.
    fn size_in_bytes(&self) -> usize;
}

/// Storage layout for the offset tables of a dictionary.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum PointerBacking {
    /// One machine word per offset.
    Plain,
    /// Fixed-width bit packing sized by the largest offset.
    Compact,
}

impl Default for PointerBacking {
    fn default() -> Self {
        Self::Plain
    }
}

/// Uncompressed offsets.
#[derive(Decode, Encode)]
pub struct PlainPointers {
    offsets: Vec<usize>,
}

impl PlainPointers {
    pub fn from_offsets(offsets: Vec<usize>) -> Self {
        Self { offsets }
    }
}

impl PointerStorage for PlainPointers {
    #[inline(always)]
    fn get(&self, i: usize) -> usize {
        self.offsets[i]
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.offsets.len()
    }

    fn size_in_bytes(&self) -> usize {
        self.offsets.len() * std::mem::size_of::<usize>()
    }
}

/// Offsets packed at a fixed bit width chosen from the largest value.
///
/// The sequences stored here are non-decreasing, so the width of the last
/// offset accommodates every entry.
#[derive(Decode, Encode)]
pub struct CompactPointers {
    words: Vec<u64>,
    width: usize,
    len: usize,
}

impl CompactPointers {
    pub fn from_offsets(offsets: &[usize]) -> Self {
        let width = offsets
            .last()
            .map_or(1, |&max| (64 - (max as u64).leading_zeros()).max(1) as usize);
        let mut words = vec![0u64; (offsets.len() * width + 63) / 64];
        for (i, &v) in offsets.iter().enumerate() {
            let v = v as u64;
            let pos = i * width;
            let (w, shift) = (pos / 64, pos % 64);
            words[w] |= v << shift;
            if shift + width > 64 {
                words[w + 1] = v >> (64 - shift);
            }
        }
        Self {
            words,
            width,
            len: offsets.len(),
        }
    }
}

impl PointerStorage for CompactPointers {
    #[inline(always)]
    fn get(&self, i: usize) -> usize {
        debug_assert!(i < self.len);
        let mask = u64::MAX >> (64 - self.width);
        let pos = i * self.width;
        let (w, shift) = (pos / 64, pos % 64);
        let mut v = self.words[w] >> shift;
        if shift + self.width > 64 {
            v |= self.words[w + 1] << (64 - shift);
        }
        (v & mask) as usize
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.len
    }

    fn size_in_bytes(&self) -> usize {
        self.words.len() * std::mem::size_of::<u64>() + 2 * std::mem::size_of::<usize>()
    }
}

/// Offset table stored in a sealed dictionary.
#[derive(Decode, Encode)]
pub enum PointerWrapper {
    Plain(PlainPointers),
    Compact(CompactPointers),
}

impl PointerWrapper {
    pub fn build(offsets: Vec<usize>, backing: PointerBacking) -> Self {
        match backing {
            PointerBacking::Plain => Self::Plain(PlainPointers::from_offsets(offsets)),
            PointerBacking::Compact => Self::Compact(CompactPointers::from_offsets(&offsets)),
        }
    }
}

impl PointerStorage for PointerWrapper {
    #[inline(always)]
    fn get(&self, i: usize) -> usize {
        match self {
            Self::Plain(p) => p.get(i),
            Self::Compact(p) => p.get(i),
        }
    }

    #[inline(always)]
    fn len(&self) -> usize {
        match self {
            Self::Plain(p) => p.len(),
            Self::Compact(p) => p.len(),
        }
    }

    #[inline(always)]
    fn size_in_bytes(&self) -> usize {
        match self {
            Self::Plain(p) => p.size_in_bytes(),
            Self::Compact(p) => p.size_in_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_roundtrip() {
        let offsets = vec![0, 0, 3, 7, 7, 120, 4096, 70000];
        let compact = CompactPointers::from_offsets(&offsets);
        assert_eq!(compact.len(), offsets.len());
        for (i, &v) in offsets.iter().enumerate() {
            assert_eq!(compact.get(i), v);
        }
    }

    #[test]
    fn test_compact_crosses_word_boundaries() {
        // Width 17 makes entries straddle 64-bit words.
        let offsets: Vec<usize> = (0..64).map(|i| i * 2000).collect();
        let compact = CompactPointers::from_offsets(&offsets);
        for (i, &v) in offsets.iter().enumerate() {
            assert_eq!(compact.get(i), v);
        }
    }

    #[test]
    fn test_compact_all_zero() {
        let offsets = vec![0, 0, 0];
        let compact = CompactPointers::from_offsets(&offsets);
        for i in 0..3 {
            assert_eq!(compact.get(i), 0);
        }
    }

    #[test]
    fn test_wrappers_agree() {
        let offsets = vec![0, 5, 9, 9, 33];
        let plain = PointerWrapper::build(offsets.clone(), PointerBacking::Plain);
        let compact = PointerWrapper::build(offsets.clone(), PointerBacking::Compact);
        assert_eq!(plain.len(), compact.len());
        for i in 0..offsets.len() {
            assert_eq!(plain.get(i), compact.get(i));
        }
        assert!(compact.size_in_bytes() <= plain.size_in_bytes());
    }
}
