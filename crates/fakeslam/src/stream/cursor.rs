use crate::{Artifact, ArtifactSize, ChunkStatus, Error, Result};
use bytes::Bytes;
use core::fmt;
use core::num::NonZeroUsize;
use futures::Stream;
use tokio_util::sync::CancellationToken;

/// Default chunk size for streamed maps (1 MiB).
pub const CHUNK_SIZE_BYTES: NonZeroUsize = NonZeroUsize::new(1024 * 1024).unwrap();

/// A pull-based, finite, non-restartable cursor over one [`Artifact`].
///
/// Each call to [`next_chunk`] returns the next `chunk_size` bytes (the final
/// chunk may be shorter) and advances the cursor by exactly the number of
/// bytes returned. Once the end is reached every further call returns
/// [`ChunkStatus::Exhausted`].
///
/// Chunks are zero-copy slices of the artifact, so a slow caller holds no
/// more than the chunks it has not yet dropped.
///
/// The cursor is meant for one caller sequence: pulls take `&mut self`, so
/// concurrent use would need an external lock, and nothing is shared between
/// cursors opened on the same artifact.
///
/// [`next_chunk`]: Self::next_chunk
pub struct ChunkStream {
    size: ArtifactSize,
    bytes: Bytes,
    chunk_size: NonZeroUsize,
    offset: usize,
}

impl ChunkStream {
    /// Binds a cursor to `artifact` using [`CHUNK_SIZE_BYTES`].
    pub fn new(artifact: Artifact) -> Self {
        Self::with_chunk_size(artifact, CHUNK_SIZE_BYTES)
    }

    /// Binds a cursor to `artifact` using a custom chunk size.
    pub fn with_chunk_size(artifact: Artifact, chunk_size: NonZeroUsize) -> Self {
        Self {
            size: artifact.size(),
            bytes: artifact.bytes(),
            chunk_size,
            offset: 0,
        }
    }

    /// Produces the next chunk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if `ctx` was cancelled before the pull.
    /// An exhausted cursor reports [`ChunkStatus::Exhausted`] even when `ctx`
    /// is cancelled, since there is nothing left to abort.
    pub fn next_chunk(&mut self, ctx: &CancellationToken) -> Result<ChunkStatus> {
        if self.offset >= self.bytes.len() {
            return Ok(ChunkStatus::Exhausted);
        }
        if ctx.is_cancelled() {
            tracing::debug!(
                artifact = %self.size,
                offset = self.offset,
                "Chunk pull cancelled"
            );
            return Err(Error::Cancelled);
        }

        let end = self
            .offset
            .saturating_add(self.chunk_size.get())
            .min(self.bytes.len());
        let chunk = self.bytes.slice(self.offset..end);
        self.offset = end;

        if self.offset == self.bytes.len() {
            tracing::trace!(artifact = %self.size, total = self.offset, "Final chunk produced");
        }

        Ok(ChunkStatus::Ready { chunk })
    }

    /// Adapts the cursor into an async stream for transports that consume
    /// [`Stream`]s.
    ///
    /// The stream ends at exhaustion. If `ctx` is cancelled mid-way it yields a
    /// single [`Error::Cancelled`] and then ends.
    pub fn into_stream(self, ctx: CancellationToken) -> impl Stream<Item = Result<Bytes>> + Send {
        futures::stream::unfold(Some(self), move |state| {
            let ctx = ctx.clone();
            async move {
                let Some(mut cursor) = state else {
                    return None;
                };
                match cursor.next_chunk(&ctx) {
                    Ok(ChunkStatus::Ready { chunk }) => Some((Ok(chunk), Some(cursor))),
                    Ok(ChunkStatus::Exhausted) => None,
                    Err(e) => Some((Err(e), None)),
                }
            }
        })
    }

    pub const fn artifact_size(&self) -> ArtifactSize {
        self.size
    }

    pub const fn chunk_size(&self) -> NonZeroUsize {
        self.chunk_size
    }

    /// Number of bytes already returned.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes not yet returned.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Total length of the bound artifact.
    pub fn total_len(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for ChunkStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkStream")
            .field("artifact", &self.size)
            .field("chunk_size", &self.chunk_size)
            .field("offset", &self.offset)
            .field("len", &self.bytes.len())
            .finish()
    }
}
