use crate::{Artifact, ArtifactSize, ArtifactStore, ChunkStatus, ChunkStream, Error};
use bytes::Bytes;
use core::num::NonZeroUsize;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

fn patterned(len: usize) -> Artifact {
    let bytes: Vec<u8> = (0..len).map(|i| (i * 31 + 7) as u8).collect();
    Artifact::new(ArtifactSize::Large, Bytes::from(bytes))
}

fn chunk_size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

/// Pulls until exhaustion, returning every chunk in order.
fn drain(stream: &mut ChunkStream) -> Vec<Bytes> {
    let ctx = CancellationToken::new();
    let mut chunks = Vec::new();
    loop {
        match stream.next_chunk(&ctx).unwrap() {
            ChunkStatus::Ready { chunk } => chunks.push(chunk),
            ChunkStatus::Exhausted => break,
        }
    }
    chunks
}

fn run_concatenation_matches_artifact(len: usize, size: usize) {
    let artifact = patterned(len);
    let mut stream = ChunkStream::with_chunk_size(artifact.clone(), chunk_size(size));

    let chunks = drain(&mut stream);
    let joined: Vec<u8> = chunks.iter().flat_map(|c| c.iter().copied()).collect();

    assert_eq!(joined, artifact.bytes(), "len={len} chunk={size}");
    assert_eq!(stream.offset(), len);
    assert_eq!(stream.remaining(), 0);
}

fn run_chunk_count_and_sizes(len: usize, size: usize) {
    let mut stream = ChunkStream::with_chunk_size(patterned(len), chunk_size(size));
    let chunks = drain(&mut stream);

    assert_eq!(chunks.len(), len.div_ceil(size), "len={len} chunk={size}");

    if let Some((last, init)) = chunks.split_last() {
        for chunk in init {
            assert_eq!(chunk.len(), size);
        }
        let expected_last = if len % size == 0 { size } else { len % size };
        assert_eq!(last.len(), expected_last);
    }
}

const LENGTHS: [usize; 9] = [0, 1, 2, 7, 64, 100, 1023, 1024, 4097];
const CHUNK_SIZES: [usize; 6] = [1, 3, 64, 100, 1024, 8192];

#[test]
fn concatenation_matches_artifact_for_all_shapes() {
    for len in LENGTHS {
        for size in CHUNK_SIZES {
            run_concatenation_matches_artifact(len, size);
        }
    }
}

#[test]
fn pull_count_is_ceil_of_len_over_chunk_size() {
    for len in LENGTHS {
        for size in CHUNK_SIZES {
            run_chunk_count_and_sizes(len, size);
        }
    }
}

#[test]
fn exhaustion_is_idempotent() {
    let mut stream = ChunkStream::with_chunk_size(patterned(10), chunk_size(4));
    let ctx = CancellationToken::new();
    drain(&mut stream);

    for _ in 0..5 {
        assert_eq!(stream.next_chunk(&ctx), Ok(ChunkStatus::Exhausted));
    }
    assert_eq!(stream.offset(), 10);
}

#[test]
fn empty_artifact_is_immediately_exhausted() {
    let mut stream = ChunkStream::new(patterned(0));
    let ctx = CancellationToken::new();
    assert!(stream.next_chunk(&ctx).unwrap().is_exhausted());
}

#[test]
fn cursor_advances_by_bytes_returned() {
    let mut stream = ChunkStream::with_chunk_size(patterned(10), chunk_size(4));
    let ctx = CancellationToken::new();

    let offsets: Vec<usize> = core::iter::from_fn(|| {
        stream
            .next_chunk(&ctx)
            .unwrap()
            .into_chunk()
            .map(|_| stream.offset())
    })
    .collect();

    assert_eq!(offsets, vec![4, 8, 10]);
}

#[test]
fn cancelled_context_aborts_pull_without_advancing() {
    let mut stream = ChunkStream::with_chunk_size(patterned(10), chunk_size(4));
    let ctx = CancellationToken::new();
    stream.next_chunk(&ctx).unwrap();

    ctx.cancel();
    assert_eq!(stream.next_chunk(&ctx), Err(Error::Cancelled));
    assert_eq!(stream.offset(), 4);

    // A fresh context resumes where the cursor stopped.
    let resumed = stream.next_chunk(&CancellationToken::new()).unwrap();
    assert_eq!(resumed.into_chunk().unwrap(), patterned(10).bytes().slice(4..8));
}

#[test]
fn exhausted_cursor_reports_exhaustion_even_when_cancelled() {
    let mut stream = ChunkStream::with_chunk_size(patterned(3), chunk_size(4));
    drain(&mut stream);

    let ctx = CancellationToken::new();
    ctx.cancel();
    assert_eq!(stream.next_chunk(&ctx), Ok(ChunkStatus::Exhausted));
}

#[test]
fn independent_cursors_do_not_share_position() {
    let artifact = patterned(9);
    let mut first = ChunkStream::with_chunk_size(artifact.clone(), chunk_size(3));
    let mut second = ChunkStream::with_chunk_size(artifact, chunk_size(3));
    let ctx = CancellationToken::new();

    first.next_chunk(&ctx).unwrap();
    first.next_chunk(&ctx).unwrap();

    let head = second.next_chunk(&ctx).unwrap().into_chunk().unwrap();
    assert_eq!(head, patterned(9).bytes().slice(0..3));
    assert_eq!(first.offset(), 6);
    assert_eq!(second.offset(), 3);
}

#[test]
fn default_chunk_size_streams_embedded_large_map() {
    let artifact = ArtifactStore::global().select(true);
    let mut stream = ChunkStream::new(artifact.clone());
    let chunks = drain(&mut stream);

    let size = crate::CHUNK_SIZE_BYTES.get();
    assert_eq!(chunks.len(), artifact.len().div_ceil(size));
    assert!(chunks[..chunks.len() - 1].iter().all(|c| c.len() == size));
    assert_eq!(chunks.iter().map(Bytes::len).sum::<usize>(), artifact.len());
}

#[tokio::test]
async fn async_stream_yields_all_chunks_then_ends() {
    let artifact = patterned(10);
    let stream = ChunkStream::with_chunk_size(artifact.clone(), chunk_size(4));

    let chunks: Vec<_> = stream.into_stream(CancellationToken::new()).collect().await;
    let joined: Vec<u8> = chunks
        .into_iter()
        .map(Result::unwrap)
        .flat_map(|c| c.to_vec())
        .collect();

    assert_eq!(joined, artifact.bytes());
}

#[tokio::test]
async fn async_stream_ends_after_single_cancellation_error() {
    let ctx = CancellationToken::new();
    let stream = ChunkStream::with_chunk_size(patterned(10), chunk_size(4));
    let mut stream = Box::pin(stream.into_stream(ctx.clone()));

    assert_eq!(stream.next().await.unwrap().unwrap().len(), 4);
    ctx.cancel();
    assert_eq!(stream.next().await, Some(Err(Error::Cancelled)));
    assert_eq!(stream.next().await, None);
}
