/// Lookup-or-compute caching.
///
/// Returns the cached value for `$key` if present. Otherwise awaits `$block`
/// (which must yield an `AppResult`), stores the computed value with `$ttl`
/// and returns it. Errors from `$block` propagate and are never cached.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache, key, self.cache.ttl(), async move {
///     fetch_from_upstream().await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_from_cache(&key).await {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.store(&key, &value, $ttl).await;
            Ok(value)
        }
    }};
}
