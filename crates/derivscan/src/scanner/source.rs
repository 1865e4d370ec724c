use std::io::{ErrorKind, Read};

const CHUNK: usize = 4096;

/// A character source decoding UTF-8 from a byte stream.
///
/// Invalid sequences decode to U+FFFD. A read error ends the source: it is
/// logged and reported to the scanner as end of input, like exhaustion.
pub struct ReaderSource<R> {
    reader: R,
    bytes: Vec<u8>,
    start: usize,
    eof: bool,
}

impl<R: Read> ReaderSource<R> {
    /// Wraps `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            bytes: Vec::new(),
            start: 0,
            eof: false,
        }
    }

    fn refill(&mut self) {
        self.bytes.drain(..self.start);
        self.start = 0;
        let filled = self.bytes.len();
        self.bytes.resize(filled + CHUNK, 0);
        let read = loop {
            match self.reader.read(&mut self.bytes[filled..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    log::warn!("read error, treating as end of input: {e}");
                    break 0;
                }
            }
        };
        if read == 0 {
            self.eof = true;
        }
        self.bytes.truncate(filled + read);
    }
}

impl<R: Read> Iterator for ReaderSource<R> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            let pending = &self.bytes[self.start..];
            if pending.is_empty() {
                if self.eof {
                    return None;
                }
                self.refill();
                continue;
            }
            let (ch, len) = bstr::decode_utf8(pending);
            // A sequence cut off by the end of a chunk may complete with the
            // next read.
            if ch.is_none() && len == pending.len() && !self.eof {
                self.refill();
                continue;
            }
            self.start += len.max(1);
            return Some(ch.unwrap_or('\u{FFFD}'));
        }
    }
}
