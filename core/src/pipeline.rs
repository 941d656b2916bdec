//! Linear byte pipelines: one source, an optional transform, one sink.
//!
//! Copy, hash, compress and decompress are all the same chain with a
//! different transform or sink. The chain is driven to completion as a
//! single unit; the first stage error aborts it and every handle is dropped.

use async_compression::tokio::bufread::{BrotliDecoder, BrotliEncoder};
use async_compression::Level;
use sha2::{Digest, Sha256};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Middle stage of a pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub enum Transform {
    #[default]
    Passthrough,
    BrotliCompress(Level),
    BrotliDecompress,
}

pub struct Pipeline<W> {
    source: File,
    transform: Transform,
    sink: W,
    buffer_size: usize,
}

impl<W> Pipeline<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(source: File, sink: W) -> Self {
        Self {
            source,
            transform: Transform::Passthrough,
            sink,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    #[must_use]
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Runs the chain and hands the sink back with the number of bytes it received.
    pub async fn run(self) -> io::Result<(u64, W)> {
        let reader = BufReader::with_capacity(self.buffer_size, self.source);
        let mut stage: Pin<Box<dyn AsyncRead>> = match self.transform {
            Transform::Passthrough => Box::pin(reader),
            Transform::BrotliCompress(level) => {
                Box::pin(BrotliEncoder::with_quality(reader, level))
            }
            Transform::BrotliDecompress => Box::pin(BrotliDecoder::new(reader)),
        };

        let mut sink = self.sink;
        let written = tokio::io::copy(&mut stage, &mut sink).await?;
        sink.shutdown().await?;
        Ok((written, sink))
    }
}

/// Sink that feeds everything written to it into a SHA-256 accumulator.
#[derive(Default)]
pub struct DigestSink {
    hasher: Sha256,
}

impl DigestSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowercase hex digest of everything written so far.
    #[must_use]
    pub fn hex_digest(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

impl AsyncWrite for DigestSink {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.get_mut().hasher.update(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn source_with(temp: &TempDir, name: &str, data: &[u8]) -> File {
        let path = temp.path().join(name);
        tokio::fs::write(&path, data).await.unwrap();
        File::open(&path).await.unwrap()
    }

    #[tokio::test]
    async fn passthrough_into_buffer() {
        let temp = TempDir::new().unwrap();
        let source = source_with(&temp, "in.txt", b"hello pipeline").await;

        let (written, sink) = Pipeline::new(source, Vec::new()).run().await.unwrap();
        assert_eq!(written, 14);
        assert_eq!(sink, b"hello pipeline");
    }

    #[tokio::test]
    async fn digest_sink_matches_known_sha256() {
        let temp = TempDir::new().unwrap();
        let source = source_with(&temp, "abc.txt", b"abc").await;

        let (_, sink) = Pipeline::new(source, DigestSink::new())
            .buffer_size(1)
            .run()
            .await
            .unwrap();
        assert_eq!(
            sink.hex_digest(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn brotli_stages_round_trip() {
        let temp = TempDir::new().unwrap();
        let original: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        let source = source_with(&temp, "raw.bin", &original).await;

        let (_, compressed) = Pipeline::new(source, Vec::new())
            .transform(Transform::BrotliCompress(Level::Default))
            .run()
            .await
            .unwrap();
        assert!(compressed.len() < original.len());

        let packed = source_with(&temp, "raw.bin.br", &compressed).await;
        let (_, restored) = Pipeline::new(packed, Vec::new())
            .transform(Transform::BrotliDecompress)
            .run()
            .await
            .unwrap();
        assert_eq!(restored, original);
    }

    #[tokio::test]
    async fn corrupt_input_aborts_decompression() {
        let temp = TempDir::new().unwrap();
        let source = source_with(&temp, "junk.br", b"definitely not brotli").await;

        let result = Pipeline::new(source, Vec::new())
            .transform(Transform::BrotliDecompress)
            .run()
            .await;
        assert!(result.is_err());
    }
}
