//! Response body plumbing.
//!
//! Every handler returns the same boxed body type so empty bodies, small
//! fixed payloads, and chunked file streams can share one response type.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::{Stream, TryStreamExt};
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use tokio::fs::File;
use tokio::io::{AsyncRead, ReadBuf};

/// Body type shared by all responses.
pub type Body = BoxBody<Bytes, io::Error>;

/// Empty body (304, 416, HEAD).
pub fn empty() -> Body {
    Full::new(Bytes::new()).map_err(|e| match e {}).boxed()
}

/// In-memory body for small fixed payloads (error pages, redirects).
pub fn full(data: Bytes) -> Body {
    Full::new(data).map_err(|e| match e {}).boxed()
}

/// Streaming body over an open file, bounded to `len` bytes from the
/// file's current position.
pub fn file_stream(file: File, len: u64, chunk_size: usize) -> Body {
    StreamBody::new(FileChunkStream::new(file, len, chunk_size).map_ok(Frame::data)).boxed()
}

/// Pull-based chunk reader over an open file.
///
/// Yields chunks of exactly `chunk_size` bytes (the final one may be
/// shorter) until `len` bytes have been produced, so a file of N bytes
/// becomes ceil(N / chunk_size) chunks. The handle is dropped the moment
/// the stream ends, fails, or is abandoned mid-transfer, which closes it
/// exactly once on every exit path.
pub struct FileChunkStream {
    file: Option<File>,
    buf: Box<[u8]>,
    filled: usize,
    remaining: u64,
}

impl FileChunkStream {
    pub fn new(file: File, len: u64, chunk_size: usize) -> Self {
        Self {
            file: Some(file),
            buf: vec![0; chunk_size.max(1)].into_boxed_slice(),
            filled: 0,
            remaining: len,
        }
    }
}

impl Stream for FileChunkStream {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(mut file) = this.file.take() else {
            return Poll::Ready(None);
        };
        if this.remaining == 0 {
            return Poll::Ready(None);
        }

        let target = this
            .buf
            .len()
            .min(usize::try_from(this.remaining).unwrap_or(usize::MAX));

        // A short read does not end the chunk; keep filling so every chunk
        // except the last covers the full chunk size.
        let mut eof = false;
        while this.filled < target {
            let mut read_buf = ReadBuf::new(&mut this.buf[this.filled..target]);
            match Pin::new(&mut file).poll_read(cx, &mut read_buf) {
                Poll::Pending => {
                    this.file = Some(file);
                    return Poll::Pending;
                }
                Poll::Ready(Err(e)) => return Poll::Ready(Some(Err(e))),
                Poll::Ready(Ok(())) => {
                    let n = read_buf.filled().len();
                    if n == 0 {
                        eof = true;
                        break;
                    }
                    this.filled += n;
                }
            }
        }

        if this.filled == 0 {
            // File ended before the promised length.
            return Poll::Ready(None);
        }

        let chunk = Bytes::copy_from_slice(&this.buf[..this.filled]);
        this.remaining -= this.filled as u64;
        this.filled = 0;
        if this.remaining > 0 && !eof {
            this.file = Some(file);
        }
        Poll::Ready(Some(Ok(chunk)))
    }
}
