use bytes::Bytes;

/// Represents the result of pulling the next chunk from a [`ChunkStream`].
///
/// This type models the outcome of [`ChunkStream::next_chunk`]:
///
/// - [`ChunkStatus::Ready`] carries the next slice of the artifact.
/// - [`ChunkStatus::Exhausted`] means every byte has already been returned.
///   It is a terminal state: further pulls keep returning it.
///
/// Exhaustion is a normal end of sequence and is kept apart from genuine
/// failures, which travel through the `Err` side of the surrounding
/// [`Result`](crate::Result).
///
/// # Example
///
/// ```
/// use fakeslam::{Artifact, ArtifactSize, ChunkStatus, ChunkStream};
/// use tokio_util::sync::CancellationToken;
///
/// let artifact = Artifact::new(ArtifactSize::Small, bytes::Bytes::from_static(b"abc"));
/// let mut stream = ChunkStream::new(artifact);
/// let ctx = CancellationToken::new();
///
/// loop {
///     match stream.next_chunk(&ctx).unwrap() {
///         ChunkStatus::Ready { chunk } => println!("got {} bytes", chunk.len()),
///         ChunkStatus::Exhausted => break,
///     }
/// }
/// ```
///
/// [`ChunkStream`]: crate::ChunkStream
/// [`ChunkStream::next_chunk`]: crate::ChunkStream::next_chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkStatus {
    /// The next chunk of the artifact.
    Ready {
        /// Between one and `chunk_size` bytes. Only the final chunk may be
        /// shorter than `chunk_size`.
        chunk: Bytes,
    },
    /// The cursor reached the end of the artifact.
    Exhausted,
}

impl ChunkStatus {
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Returns the chunk, or `None` once the stream is exhausted.
    pub fn into_chunk(self) -> Option<Bytes> {
        match self {
            Self::Ready { chunk } => Some(chunk),
            Self::Exhausted => None,
        }
    }
}
