//! 响应缓存模块：基于 TTL 的内存缓存，避免对同一内容重复调用 AI 端点。
//!
//! # Response Caching Module
//!
//! Content-addressed caching of analysis results, keyed by a hash of the
//! operation and input. Repeated requests for the same content are served
//! from memory without touching the gate, the retry machinery or the
//! network.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ResponseCache`] | TTL-bound in-memory store with lazy expiry |
//! | [`CacheKey`] | Hex-encoded SHA-256 digest of a request |
//! | [`request_key`] | Key derivation from an [`OperationRequest`](crate::types::OperationRequest) |
//! | [`CacheStats`] | Internal hit/miss/insert counters |

mod key;
mod store;

pub use key::{request_key, CacheKey};
pub use store::{CacheStats, ResponseCache};
