use std::thread::ThreadId;

use thiserror::Error;

use crate::codec::number::NumberError;

pub type ShardResult<T> = Result<T, ShardError>;

#[derive(Debug, Error)]
pub enum ShardError {
    #[error("key at index {index} cannot be encoded: {source}")]
    EncodingOverflow {
        index: usize,
        #[source]
        source: NumberError,
    },

    #[error("fingerprint capacity of {capacity} bytes exhausted at key index {index}")]
    BufferExhausted { index: usize, capacity: usize },

    #[error("encoding context initialization failed: {reason}")]
    ContextInit { reason: &'static str },

    #[error("error handle allocation failed for thread {thread:?}")]
    HandleAlloc { thread: ThreadId },

    #[error("expected between 1 and 3 keys, got {count}")]
    InvalidKeyCount { count: usize },
}
