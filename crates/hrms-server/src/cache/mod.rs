//! Two-tier caching system for horizontal scaling.
//!
//! ## Architecture
//!
//! - **L1 Cache (DashMap)**: In-memory, microsecond latency, per-instance
//! - **L2 Cache (Redis)**: Network, millisecond latency, shared across instances
//! - **Pub/Sub**: Cross-instance cache invalidation
//!
//! ## Cache Hierarchy
//!
//! ```text
//! GET request → L1 (DashMap) → L2 (Redis) → Source (PostgreSQL)
//!                   ↓                ↓            ↓
//!               <1µs latency    ~5ms latency  ~50ms latency
//! ```
//!
//! ## Graceful Degradation
//!
//! If Redis is unavailable or disabled, the system automatically falls back
//! to L1-only mode (local cache per instance).

pub mod backend;
pub mod keys;
pub mod pubsub;
pub mod store;

pub use backend::{CacheBackend, CacheStats, CachedEntry};
pub use pubsub::{CacheInvalidationListener, publish_invalidation};
pub use store::CacheStore;
