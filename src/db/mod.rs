pub mod cache;
pub mod memory;
pub mod redis;

mod macros;

pub use cache::{Cache, CacheKey, CacheStore};
pub use memory::MemoryStore;
pub use self::redis::{create_redis_client, CacheWriterHandle, RedisStore};
