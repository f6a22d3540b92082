use crate::common::{CompletionId, TermId, MAX_NUM_TERMS};
use crate::dictionary::{Dictionary, DictionaryBuilder, IdRange, PointerBacking};

const CORPUS: &[&[TermId]] = &[
    &[10, 20],
    &[10, 21],
    &[10, 30],
    &[11, 5, 7],
    &[11, 5, 8],
    &[11, 6],
    &[12],
];

fn build(backing: PointerBacking) -> Dictionary {
    let mut builder = DictionaryBuilder::new(2).unwrap();
    for (i, terms) in CORPUS.iter().enumerate() {
        builder.push(terms, i as u32).unwrap();
    }
    builder.finish_with(backing).unwrap().0
}

#[test]
fn test_write_read_roundtrip() {
    for backing in [PointerBacking::Plain, PointerBacking::Compact] {
        let dict = build(backing);
        let mut data = vec![];
        let num_bytes = dict.write(&mut data).unwrap();
        assert_eq!(num_bytes, data.len());

        let other = Dictionary::read(data.as_slice()).unwrap();
        assert_eq!(other.len(), dict.len());
        assert_eq!(other.num_buckets(), dict.num_buckets());
        let mut buf = [0; MAX_NUM_TERMS];
        for (i, terms) in CORPUS.iter().enumerate() {
            assert_eq!(other.locate(terms), Some(i as CompletionId));
            let len = other.extract(i as CompletionId, &mut buf);
            assert_eq!(&buf[..len], *terms);
        }
        assert_eq!(other.locate_prefix(&[11]), IdRange::new(3, 5));
    }
}

#[test]
fn test_write_is_deterministic() {
    let dict = build(PointerBacking::Plain);
    let mut first = vec![];
    let mut second = vec![];
    dict.write(&mut first).unwrap();
    dict.write(&mut second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_read_garbage_fails() {
    let data = [0xff_u8; 16];
    assert!(Dictionary::read(data.as_slice()).is_err());
}

#[test]
fn test_size_in_bytes() {
    let plain = build(PointerBacking::Plain);
    let compact = build(PointerBacking::Compact);
    assert!(plain.size_in_bytes() > 0);
    assert!(compact.size_in_bytes() <= plain.size_in_bytes());
}

#[test]
#[should_panic]
fn test_extract_out_of_bounds() {
    let dict = build(PointerBacking::Plain);
    let mut buf = [0; MAX_NUM_TERMS];
    dict.extract(7, &mut buf);
}

#[test]
#[should_panic]
fn test_extract_short_buffer() {
    let dict = build(PointerBacking::Plain);
    let mut buf = [0; 2];
    dict.extract(0, &mut buf);
}

#[test]
#[should_panic]
fn test_bucket_size_out_of_bounds() {
    let dict = build(PointerBacking::Plain);
    dict.bucket_size(3);
}
