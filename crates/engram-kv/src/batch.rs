//! Adaptive batch splitting.
//!
//! Backends bound the payload of a single request, and the bound is not
//! known up front. These helpers submit a batch optimistically and, when the
//! backend rejects it with [`KvError::SizeLimitExceeded`], bisect the input
//! and recurse on each half. Splitting terminates at single-key granularity;
//! a single-key failure propagates. Results preserve input order and length.
//!
//! Any error other than the size-limit rejection propagates unchanged.

use tracing::debug;

use crate::client::KvClient;
use crate::error::{KvError, KvResult};

/// Batched get with transparent splitting on backend size limits.
pub fn get_many_split<C: KvClient + ?Sized>(
    client: &C,
    keys: &[String],
) -> KvResult<Vec<Option<String>>> {
    match client.get_many(keys) {
        Err(KvError::SizeLimitExceeded { .. }) if keys.len() > 1 => {
            let mid = keys.len() / 2;
            debug!(total = keys.len(), "splitting oversize get_many batch");
            let mut values = get_many_split(client, &keys[..mid])?;
            values.extend(get_many_split(client, &keys[mid..])?);
            Ok(values)
        }
        result => result,
    }
}

/// Batched set with transparent splitting on backend size limits.
pub fn set_many_split<C: KvClient + ?Sized>(
    client: &C,
    entries: &[(String, String)],
) -> KvResult<()> {
    match client.set_many(entries) {
        Err(KvError::SizeLimitExceeded { .. }) if entries.len() > 1 => {
            let mid = entries.len() / 2;
            debug!(total = entries.len(), "splitting oversize set_many batch");
            set_many_split(client, &entries[..mid])?;
            set_many_split(client, &entries[mid..])
        }
        result => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryKv;

    fn entries(n: usize) -> Vec<(String, String)> {
        (0..n).map(|i| (format!("k{i}"), format!("v{i}"))).collect()
    }

    #[test]
    fn large_set_succeeds_through_splitting() {
        let kv = MemoryKv::with_max_batch(4);
        set_many_split(&kv, &entries(100)).unwrap();

        assert_eq!(kv.len().unwrap(), 100);
        assert!(kv.rejected_batches() > 0);
    }

    #[test]
    fn large_get_preserves_order_and_length() {
        let kv = MemoryKv::with_max_batch(3);
        set_many_split(&kv, &entries(20)).unwrap();

        let mut keys: Vec<String> = (0..20).map(|i| format!("k{i}")).collect();
        keys.push("missing".to_string());
        keys.push("k0".to_string());

        let values = get_many_split(&kv, &keys).unwrap();
        assert_eq!(values.len(), keys.len());
        for i in 0..20 {
            assert_eq!(values[i], Some(format!("v{i}")));
        }
        assert_eq!(values[20], None);
        assert_eq!(values[21], Some("v0".to_string()));
    }

    #[test]
    fn splitting_reaches_single_key_granularity() {
        let kv = MemoryKv::with_max_batch(1);
        set_many_split(&kv, &entries(9)).unwrap();
        assert_eq!(kv.len().unwrap(), 9);

        let keys: Vec<String> = (0..9).map(|i| format!("k{i}")).collect();
        let values = get_many_split(&kv, &keys).unwrap();
        assert!(values.iter().all(Option::is_some));
    }

    #[test]
    fn small_batches_pass_through_without_splitting() {
        let kv = MemoryKv::with_max_batch(64);
        set_many_split(&kv, &entries(10)).unwrap();
        assert_eq!(kv.rejected_batches(), 0);
    }
}
