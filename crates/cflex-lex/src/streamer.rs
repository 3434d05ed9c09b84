//! A buffered, seekable byte streamer over a file — the raw byte source
//! every later phase rides on top of. An 8192-byte sliding window refilled
//! from an absolute file offset, plus a bounded pushback stack that
//! remembers the exact `(line, column)` a popped-back byte was read at.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::rc::Rc;

use cflex_util::Position;

use crate::error::{StreamerError, StreamerResult};

pub const BUFFER_SIZE: usize = 8192;
pub const PUSHBACK_DEPTH: usize = 8;

/// `peek`/`next` sentinel for "no byte here" (EOF or out-of-range blob
/// cell), following the usual C `int`-return convention for byte streams.
pub const EOF: i32 = -1;

#[derive(Clone, Copy)]
struct Pushback {
    byte: u8,
    line: u32,
    column: u32,
}

/// The 5-byte lookahead window around the current position: `cache[2]` is
/// the byte at the current position, `cache[0..=1]` the two before it, and
/// `cache[3..=4]` the two after. Cells outside `[0, len)` are zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Blob {
    pub cache: [u8; 5],
}

impl Blob {
    pub fn current(&self) -> u8 {
        self.cache[2]
    }

    pub fn at(&self, rel: i32) -> u8 {
        self.cache[(2 + rel) as usize]
    }
}

pub struct Streamer {
    filename: Rc<str>,
    file: File,
    file_len: u64,

    buffer: Box<[u8; BUFFER_SIZE]>,
    buffer_start: u64,
    buffer_len: usize,
    buffer_pos: usize,

    absolute_pos: u64,
    line: u32,
    column: u32,
    prev_line: u32,
    prev_column: u32,
    last_char: u8,

    pushback: [Pushback; PUSHBACK_DEPTH],
    pushback_len: usize,
}

impl Streamer {
    pub fn open(path: &str) -> StreamerResult<Self> {
        let mut file = File::open(path).map_err(|source| StreamerError::Open {
            path: path.to_string(),
            source,
        })?;
        let file_len = file
            .seek(SeekFrom::End(0))
            .map_err(|source| StreamerError::Read {
                path: path.to_string(),
                source,
            })?;
        file.seek(SeekFrom::Start(0))
            .map_err(|source| StreamerError::Read {
                path: path.to_string(),
                source,
            })?;

        let mut s = Self {
            filename: Rc::from(path),
            file,
            file_len,
            buffer: Box::new([0u8; BUFFER_SIZE]),
            buffer_start: 0,
            buffer_len: 0,
            buffer_pos: 0,
            absolute_pos: 0,
            line: 1,
            column: 1,
            prev_line: 1,
            prev_column: 1,
            last_char: 0,
            pushback: [Pushback { byte: 0, line: 1, column: 1 }; PUSHBACK_DEPTH],
            pushback_len: 0,
        };
        s.refill_buffer()?;
        Ok(s)
    }

    pub fn filename(&self) -> Rc<str> {
        self.filename.clone()
    }

    pub fn len(&self) -> u64 {
        self.file_len
    }

    fn refill_buffer(&mut self) -> StreamerResult<()> {
        self.file
            .seek(SeekFrom::Start(self.buffer_start))
            .map_err(|source| StreamerError::Read {
                path: self.filename.to_string(),
                source,
            })?;
        let mut total = 0;
        loop {
            let n = self
                .file
                .read(&mut self.buffer[total..])
                .map_err(|source| StreamerError::Read {
                    path: self.filename.to_string(),
                    source,
                })?;
            if n == 0 {
                break;
            }
            total += n;
            if total == self.buffer.len() {
                break;
            }
        }
        self.buffer_len = total;
        let rel = self.absolute_pos.saturating_sub(self.buffer_start);
        self.buffer_pos = (rel as usize).min(self.buffer_len);
        Ok(())
    }

    /// Ensures the sliding window covers `self.absolute_pos`, refilling if
    /// it has drifted outside `[buffer_start, buffer_start + buffer_len)`.
    fn ensure_window(&mut self) -> StreamerResult<()> {
        if self.buffer_pos < self.buffer_len || self.absolute_pos >= self.file_len {
            return Ok(());
        }
        self.buffer_start = self.absolute_pos - (self.absolute_pos % BUFFER_SIZE as u64);
        self.refill_buffer()
    }

    pub fn eof(&self) -> bool {
        self.pushback_len == 0 && self.absolute_pos >= self.file_len
    }

    pub fn position(&self) -> Position {
        Position::new(self.filename.clone(), self.line, self.column, self.absolute_pos as u32)
    }

    /// Returns the byte at the current position without advancing, or
    /// [`EOF`].
    pub fn peek(&mut self) -> i32 {
        if self.pushback_len > 0 {
            return self.pushback[self.pushback_len - 1].byte as i32;
        }
        if self.absolute_pos >= self.file_len {
            return EOF;
        }
        if self.ensure_window().is_err() {
            return EOF;
        }
        if self.buffer_pos >= self.buffer_len {
            return EOF;
        }
        self.buffer[self.buffer_pos] as i32
    }

    /// Returns `peek()` and advances by one byte, updating line/column.
    pub fn next(&mut self) -> i32 {
        if self.pushback_len > 0 {
            self.pushback_len -= 1;
            let pb = self.pushback[self.pushback_len];
            self.prev_line = self.line;
            self.prev_column = self.column;
            self.line = pb.line;
            self.column = pb.column;
            self.absolute_pos += 1;
            self.buffer_pos += 1;
            self.last_char = pb.byte;
            return pb.byte as i32;
        }

        let ci = self.peek();
        if ci < 0 {
            return EOF;
        }
        let c = ci as u8;

        self.prev_line = self.line;
        self.prev_column = self.column;

        self.absolute_pos += 1;
        self.buffer_pos += 1;
        self.last_char = c;

        if c == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        ci
    }

    /// Pushes the last-consumed byte back onto the stream. Fails at the
    /// start of the file or once the pushback stack is full — callers must
    /// check the `bool` result.
    pub fn unget(&mut self) -> bool {
        if self.absolute_pos == 0 || self.pushback_len >= PUSHBACK_DEPTH {
            return false;
        }
        self.absolute_pos -= 1;
        if self.buffer_pos > 0 {
            self.buffer_pos -= 1;
        } else {
            self.buffer_start = self.absolute_pos - (self.absolute_pos % BUFFER_SIZE as u64);
            if self.refill_buffer().is_err() {
                return false;
            }
            self.buffer_pos = (self.absolute_pos - self.buffer_start) as usize;
        }

        self.pushback[self.pushback_len] = Pushback {
            byte: self.last_char,
            line: self.line,
            column: self.column,
        };
        self.pushback_len += 1;
        // Restore the position as it stood before the `next()` this undoes —
        // the pushback entry above keeps the post-read coordinates so the
        // matching `next()` that re-consumes this byte lands back on them.
        self.line = self.prev_line;
        self.column = self.prev_column;
        true
    }

    /// Absolute seek. Clears pushback and re-walks from the start to
    /// recompute line/column rather than trying to derive coordinates
    /// analytically — simpler and cheap enough given how rarely seeks
    /// happen relative to ordinary forward scanning.
    pub fn seek(&mut self, offset: u64) -> StreamerResult<()> {
        if offset > self.file_len {
            return Err(StreamerError::SeekOutOfBounds {
                offset,
                len: self.file_len,
            });
        }
        self.absolute_pos = 0;
        self.buffer_start = 0;
        self.buffer_len = 0;
        self.buffer_pos = 0;
        self.line = 1;
        self.column = 1;
        self.pushback_len = 0;
        self.refill_buffer()?;

        while self.absolute_pos < offset {
            if self.next() < 0 {
                break;
            }
        }
        Ok(())
    }

    /// Resets the column counter, used by the lexer's UTF-8 BOM handling:
    /// the three BOM bytes are logically zero-width.
    pub fn reset_column(&mut self, column: u32) {
        self.column = column;
    }

    /// The 5-byte lookahead window around the current position.
    pub fn get_blob(&mut self) -> Blob {
        let mut cache = [0u8; 5];
        let start = self.absolute_pos as i64 - 2;

        for (i, slot) in cache.iter_mut().enumerate() {
            let abs = start + i as i64;
            if abs < 0 || abs as u64 >= self.file_len {
                continue;
            }
            *slot = self.byte_at(abs as u64);
        }
        Blob { cache }
    }

    /// Best-effort out-of-band read of a single absolute byte offset, used
    /// only by `get_blob` for the one or two positions that may fall
    /// outside both the buffer window and the pushback stack.
    fn byte_at(&mut self, abs: u64) -> u8 {
        // Check pushback first: a pushed-back byte sits "before" the
        // current absolute_pos from the buffer's point of view.
        if abs < self.absolute_pos {
            let behind = (self.absolute_pos - abs) as usize;
            if behind <= self.pushback_len {
                return self.pushback[self.pushback_len - behind].byte;
            }
        }
        if abs >= self.buffer_start && abs < self.buffer_start + self.buffer_len as u64 {
            return self.buffer[(abs - self.buffer_start) as usize];
        }
        // Outside the current window: a tiny out-of-band seek+read,
        // restoring the file cursor afterwards.
        let saved = self.file.stream_position().unwrap_or(0);
        let mut byte = [0u8; 1];
        let value = if self.file.seek(SeekFrom::Start(abs)).is_ok()
            && self.file.read_exact(&mut byte).is_ok()
        {
            byte[0]
        } else {
            0
        };
        let _ = self.file.seek(SeekFrom::Start(saved));
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn streamer_with(contents: &[u8]) -> (Streamer, tempfile::NamedTempFile) {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents).unwrap();
        f.flush().unwrap();
        let s = Streamer::open(f.path().to_str().unwrap()).unwrap();
        (s, f)
    }

    #[test]
    fn peek_then_next_agree() {
        let (mut s, _f) = streamer_with(b"ab");
        assert_eq!(s.peek(), b'a' as i32);
        assert_eq!(s.next(), b'a' as i32);
        assert_eq!(s.peek(), b'b' as i32);
    }

    #[test]
    fn unget_restores_position_and_column() {
        let (mut s, _f) = streamer_with(b"ab");
        s.next();
        let col_before_b = s.position().column;
        s.next();
        assert!(s.unget());
        assert_eq!(s.position().column, col_before_b);
        assert_eq!(s.next(), b'b' as i32);
    }

    #[test]
    fn unget_fails_at_start_of_file() {
        let (mut s, _f) = streamer_with(b"a");
        assert!(!s.unget());
    }

    #[test]
    fn newline_resets_column_and_bumps_line() {
        let (mut s, _f) = streamer_with(b"a\nb");
        s.next();
        s.next();
        assert_eq!(s.position().line, 2);
        assert_eq!(s.position().column, 1);
    }

    #[test]
    fn eof_when_exhausted() {
        let (mut s, _f) = streamer_with(b"a");
        assert!(!s.eof());
        s.next();
        assert!(s.eof());
        assert_eq!(s.peek(), EOF);
    }

    #[test]
    fn blob_window_zero_pads_out_of_range() {
        let (mut s, _f) = streamer_with(b"abc");
        let blob = s.get_blob();
        assert_eq!(blob.cache, [0, 0, b'a', b'b', b'c']);
    }

    #[test]
    fn seek_recomputes_line_column() {
        let (mut s, _f) = streamer_with(b"ab\ncd\nef");
        s.seek(6).unwrap();
        assert_eq!(s.position().line, 3);
        assert_eq!(s.position().column, 1);
    }

    #[test]
    fn seek_out_of_bounds_errors() {
        let (mut s, _f) = streamer_with(b"ab");
        assert!(s.seek(100).is_err());
    }

    #[test]
    fn buffer_refill_across_window_boundary() {
        let mut data = vec![0u8; BUFFER_SIZE + 16];
        for (i, b) in data.iter_mut().enumerate() {
            *b = b'a' + (i % 26) as u8;
        }
        let (mut s, _f) = streamer_with(&data);
        for &expected in &data {
            assert_eq!(s.next(), expected as i32);
        }
        assert!(s.eof());
    }

    #[test]
    fn pushback_depth_is_bounded() {
        let (mut s, _f) = streamer_with(b"abcdefghij");
        for _ in 0..9 {
            s.next();
        }
        let mut ok_count = 0;
        for _ in 0..PUSHBACK_DEPTH + 2 {
            if s.unget() {
                ok_count += 1;
            }
        }
        assert!(ok_count <= PUSHBACK_DEPTH);
    }
}
