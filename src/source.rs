/// A random-access, in-memory byte source. PDF parsing is inherently
/// non-sequential (the trailer and xref table are anchored to the end of
/// the file, and every indirect reference is a seek to an arbitrary
/// offset), so the whole document is read into memory once and every
/// subsequent operation works against byte offsets into this buffer —
/// the same strategy lopdf itself uses internally.
#[derive(Debug, Clone)]
pub struct ByteSource {
    buffer: Vec<u8>,
}

impl ByteSource {
    pub fn new(buffer: Vec<u8>) -> Self {
        ByteSource { buffer }
    }

    pub fn from_reader<R: std::io::Read>(mut reader: R) -> std::io::Result<Self> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Ok(ByteSource { buffer })
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Find the last occurrence of `pattern` at or after `start_pos`.
    /// Used to locate `startxref`/`%%EOF` by scanning backward from a
    /// small trailing window near the end of the file.
    pub fn rfind_from(&self, pattern: &[u8], start_pos: usize) -> Option<usize> {
        self.buffer
            .get(start_pos..)?
            .windows(pattern.len().max(1))
            .rposition(|window| window == pattern)
            .map(|pos| start_pos + pos)
    }
}
