//! Incremental UTF-8 decoding across chunk boundaries.

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes byte chunks to text, carrying an incomplete trailing code point
/// over to the next call.
///
/// A byte order mark at the very start of the stream is dropped. Invalid
/// sequences become U+FFFD; decoding never fails.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
    /// Set once the first three bytes have been checked for a BOM
    bom_checked: bool,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        if !self.bom_checked {
            if bytes.len() < UTF8_BOM.len() && UTF8_BOM.starts_with(&bytes) {
                self.pending = bytes;
                return String::new();
            }
            self.bom_checked = true;
            if bytes.starts_with(UTF8_BOM) {
                bytes.drain(..UTF8_BOM.len());
            }
        }

        let mut out = String::with_capacity(bytes.len());
        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    // Safe: from_utf8 just validated this prefix
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush a dangling partial sequence at end of input.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let pending = std::mem::take(&mut self.pending);
        String::from_utf8_lossy(&pending).into_owned()
    }

    /// Number of bytes waiting for the rest of their code point.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
