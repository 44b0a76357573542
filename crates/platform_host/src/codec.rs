//! Binary payload encode/decode contract with chunked transfer.
//!
//! Encoding runs off the UI context in real hosts, so the contract is request/response shaped and
//! large payloads cross the boundary as numbered [`PayloadChunk`]s that a [`ChunkAssembler`]
//! reassembles on the receiving side.

use std::{future::Future, pin::Pin};

use serde::{Deserialize, Serialize};

/// Default upper bound on the payload length carried by a single chunk.
pub const DEFAULT_MAX_CHUNK_LEN: usize = 64 * 1024;

/// Object-safe boxed future used by [`PayloadCodecService`] async methods.
pub type PayloadCodecFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One encode or decode request.
pub struct CodecRequest {
    /// Caller-chosen id echoed by the response and by every chunk.
    pub request_id: u64,
    /// Input payload.
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Result of a successful encode or decode.
pub struct CodecResponse {
    /// Id of the request this answers.
    pub request_id: u64,
    /// Output payload.
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One slice of a payload in transit.
pub struct PayloadChunk {
    /// Request this chunk belongs to.
    pub request_id: u64,
    /// Zero-based position of this chunk.
    pub index: usize,
    /// Number of chunks making up the payload.
    pub total: usize,
    /// Slice of the payload.
    pub data: String,
}

/// Splits `payload` into chunks of at most `max_chunk_len` bytes, cutting on char boundaries.
///
/// An empty payload still produces one (empty) chunk. A `max_chunk_len` smaller than a single
/// character yields one character per chunk.
pub fn split_into_chunks(request_id: u64, payload: &str, max_chunk_len: usize) -> Vec<PayloadChunk> {
    let max_chunk_len = max_chunk_len.max(1);
    let mut slices = Vec::new();
    let mut rest = payload;
    while !rest.is_empty() {
        let mut cut = rest.len().min(max_chunk_len);
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if cut == 0 {
            cut = rest.chars().next().map(char::len_utf8).unwrap_or(rest.len());
        }
        let (head, tail) = rest.split_at(cut);
        slices.push(head);
        rest = tail;
    }
    if slices.is_empty() {
        slices.push("");
    }

    let total = slices.len();
    slices
        .into_iter()
        .enumerate()
        .map(|(index, data)| PayloadChunk {
            request_id,
            index,
            total,
            data: data.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
/// Reassembles chunks for a single request, in any arrival order.
pub struct ChunkAssembler {
    request_id: Option<u64>,
    parts: Vec<Option<String>>,
}

impl ChunkAssembler {
    /// Creates an empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts one chunk, returning the full payload once every chunk has arrived.
    ///
    /// # Errors
    ///
    /// Returns an error when the chunk belongs to another request, disagrees on the chunk total,
    /// is out of range, or repeats an index already received.
    pub fn push(&mut self, chunk: PayloadChunk) -> Result<Option<String>, String> {
        if chunk.total == 0 || chunk.index >= chunk.total {
            return Err(format!(
                "chunk {} out of range for total {}",
                chunk.index, chunk.total
            ));
        }
        match self.request_id {
            None => {
                self.request_id = Some(chunk.request_id);
                self.parts = vec![None; chunk.total];
            }
            Some(id) if id != chunk.request_id => {
                return Err(format!(
                    "chunk for request {} pushed into assembler for request {id}",
                    chunk.request_id
                ));
            }
            Some(_) if self.parts.len() != chunk.total => {
                return Err(format!(
                    "chunk total changed from {} to {}",
                    self.parts.len(),
                    chunk.total
                ));
            }
            Some(_) => {}
        }

        let slot = &mut self.parts[chunk.index];
        if slot.is_some() {
            return Err(format!("duplicate chunk {}", chunk.index));
        }
        *slot = Some(chunk.data);

        if self.parts.iter().all(Option::is_some) {
            let payload = self.parts.drain(..).flatten().collect::<String>();
            self.request_id = None;
            return Ok(Some(payload));
        }
        Ok(None)
    }
}

/// Host service that encodes and decodes binary payload markers.
pub trait PayloadCodecService {
    /// Encodes `request.payload`.
    fn encode<'a>(
        &'a self,
        request: CodecRequest,
    ) -> PayloadCodecFuture<'a, Result<CodecResponse, String>>;

    /// Decodes `request.payload`.
    fn decode<'a>(
        &'a self,
        request: CodecRequest,
    ) -> PayloadCodecFuture<'a, Result<CodecResponse, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Codec for hosts without an encoder; every call fails.
pub struct NoopPayloadCodecService;

impl PayloadCodecService for NoopPayloadCodecService {
    fn encode<'a>(
        &'a self,
        _request: CodecRequest,
    ) -> PayloadCodecFuture<'a, Result<CodecResponse, String>> {
        Box::pin(async { Err("payload encoding unavailable".to_string()) })
    }

    fn decode<'a>(
        &'a self,
        _request: CodecRequest,
    ) -> PayloadCodecFuture<'a, Result<CodecResponse, String>> {
        Box::pin(async { Err("payload decoding unavailable".to_string()) })
    }
}

#[derive(Debug, Clone, Copy)]
/// Codec that ships the payload through the chunked transfer path unchanged.
pub struct PassthroughPayloadCodecService {
    /// Chunk size used for the transfer.
    pub max_chunk_len: usize,
}

impl Default for PassthroughPayloadCodecService {
    fn default() -> Self {
        Self {
            max_chunk_len: DEFAULT_MAX_CHUNK_LEN,
        }
    }
}

impl PassthroughPayloadCodecService {
    fn transfer(&self, request: CodecRequest) -> Result<CodecResponse, String> {
        let mut assembler = ChunkAssembler::new();
        for chunk in split_into_chunks(request.request_id, &request.payload, self.max_chunk_len) {
            if let Some(payload) = assembler.push(chunk)? {
                return Ok(CodecResponse {
                    request_id: request.request_id,
                    payload,
                });
            }
        }
        Err(format!("request {} never completed", request.request_id))
    }
}

impl PayloadCodecService for PassthroughPayloadCodecService {
    fn encode<'a>(
        &'a self,
        request: CodecRequest,
    ) -> PayloadCodecFuture<'a, Result<CodecResponse, String>> {
        Box::pin(async move { self.transfer(request) })
    }

    fn decode<'a>(
        &'a self,
        request: CodecRequest,
    ) -> PayloadCodecFuture<'a, Result<CodecResponse, String>> {
        Box::pin(async move { self.transfer(request) })
    }
}
