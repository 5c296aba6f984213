//! Record and blob resolution.

use bytes::{Bytes, BytesMut};
use serde_json::Value;

use ssb_fetch_backend::{Backend, BackendError, BackendExt};
use ssb_fetch_core::{ByteRange, Identifier};

use crate::error::{FetchError, Result};
use crate::response::ResolvedPayload;

/// Resolve a message id to its stored record.
pub async fn resolve_record<B: Backend + ?Sized>(backend: &B, id: &Identifier) -> Result<Value> {
    backend
        .get_record(id)
        .await?
        .ok_or_else(|| FetchError::NotFound(id.sigil()))
}

/// Resolve a blob id to its bytes, or to the concatenation of `ranges`.
///
/// Ranges are read one at a time in request order; overlaps and
/// out-of-order ranges are served as given. An empty or absent range list
/// means the whole blob. When `want_missing` is set and the blob is not
/// stored locally, peers are asked exactly once.
pub async fn resolve_blob<B: Backend + ?Sized>(
    backend: &B,
    id: &Identifier,
    ranges: Option<&[ByteRange]>,
    want_missing: bool,
) -> Result<ResolvedPayload> {
    let available = if want_missing {
        backend.ensure_blob(id).await
    } else {
        backend.has_blob(id).await
    };
    match available {
        Ok(true) => {}
        Ok(false) | Err(BackendError::Timeout(_)) => {
            return Err(FetchError::BlobNotFound(id.sigil()))
        }
        Err(err) => return Err(err.into()),
    }

    let missing = || FetchError::BlobNotFound(id.sigil());

    let ranges = match ranges {
        Some(ranges) if !ranges.is_empty() => ranges,
        _ => {
            let bytes = backend.get_blob(id).await?.ok_or_else(missing)?;
            let total_size = Some(bytes.len() as u64);
            return Ok(ResolvedPayload::Blob {
                id: id.clone(),
                bytes,
                is_partial: false,
                total_size,
            });
        }
    };

    let bytes = if let [range] = ranges {
        read_range(backend, id, range).await?.ok_or_else(missing)?
    } else {
        let mut body = BytesMut::new();
        for range in ranges {
            let slice = read_range(backend, id, range).await?.ok_or_else(missing)?;
            body.extend_from_slice(&slice);
        }
        body.freeze()
    };
    let total_size = backend.blob_size(id).await?;

    tracing::debug!(blob = %id, ranges = ranges.len(), len = bytes.len(), "served partial blob");
    Ok(ResolvedPayload::Blob {
        id: id.clone(),
        bytes,
        is_partial: true,
        total_size,
    })
}

async fn read_range<B: Backend + ?Sized>(
    backend: &B,
    id: &Identifier,
    range: &ByteRange,
) -> Result<Option<Bytes>> {
    Ok(backend
        .get_blob_slice(id, range.start, range.exclusive_end())
        .await?)
}
