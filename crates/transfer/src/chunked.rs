use crate::DEFAULT_CHUNK_SIZE;

/// One APPEND segment: a borrowed slice of the media buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Zero-based segment index sent as `segment_index`.
    pub index: u32,
    /// Byte offset of `data` within the media buffer.
    pub offset: usize,
    pub data: &'a [u8],
}

/// Number of segments needed for `total_bytes` at `chunk_size`.
pub fn segment_count(total_bytes: usize, chunk_size: usize) -> u32 {
    let chunk_size = effective_chunk_size(chunk_size);
    total_bytes.div_ceil(chunk_size) as u32
}

fn effective_chunk_size(chunk_size: usize) -> usize {
    if chunk_size == 0 {
        DEFAULT_CHUNK_SIZE
    } else {
        chunk_size
    }
}

// ---------------------------------------------------------------------------
// SegmentReader
// ---------------------------------------------------------------------------

/// Splits an in-memory buffer into sequential segments of at most
/// `chunk_size` bytes; only the last one may be shorter.
pub struct SegmentReader<'a> {
    data: &'a [u8],
    chunk_size: usize,
    offset: usize,
    next_index: u32,
}

impl<'a> SegmentReader<'a> {
    /// If `chunk_size` is 0, [`DEFAULT_CHUNK_SIZE`] is used.
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            data,
            chunk_size: effective_chunk_size(chunk_size),
            offset: 0,
            next_index: 0,
        }
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl<'a> Iterator for SegmentReader<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        if self.remaining() == 0 {
            return None;
        }
        let len = self.remaining().min(self.chunk_size);
        let segment = Segment {
            index: self.next_index,
            offset: self.offset,
            data: &self.data[self.offset..self.offset + len],
        };
        self.offset += len;
        self.next_index += 1;
        Some(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_two_and_a_half_megabytes_into_three() {
        let data = vec![7u8; 2_500_000];
        let segments: Vec<_> = SegmentReader::new(&data, DEFAULT_CHUNK_SIZE).collect();

        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments.iter().map(|s| s.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(
            segments.iter().map(|s| s.data.len()).collect::<Vec<_>>(),
            vec![1_000_000, 1_000_000, 500_000]
        );
        assert_eq!(segments[2].offset, 2_000_000);
        assert_eq!(segment_count(data.len(), DEFAULT_CHUNK_SIZE), 3);
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        let data = b"AABBCCDD";
        let segments: Vec<_> = SegmentReader::new(data, 4).collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].data, b"AABB");
        assert_eq!(segments[1].data, b"CCDD");
        assert_eq!(segment_count(8, 4), 2);
    }

    #[test]
    fn short_tail() {
        let mut reader = SegmentReader::new(b"AABBCCDDEE", 4);
        assert_eq!(reader.remaining(), 10);
        assert_eq!(reader.next().unwrap().data, b"AABB");
        assert_eq!(reader.next().unwrap().data, b"CCDD");
        let last = reader.next().unwrap();
        assert_eq!(last.data, b"EE");
        assert_eq!(last.index, 2);
        assert_eq!(last.offset, 8);
        assert!(reader.next().is_none());
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn empty_buffer_has_no_segments() {
        assert_eq!(SegmentReader::new(&[], 4).count(), 0);
        assert_eq!(segment_count(0, 4), 0);
    }

    #[test]
    fn zero_chunk_size_uses_default() {
        let reader = SegmentReader::new(b"x", 0);
        assert_eq!(reader.chunk_size(), DEFAULT_CHUNK_SIZE);
        assert_eq!(segment_count(1, 0), 1);
    }
}
