#![no_main]

use libfuzzer_sys::fuzz_target;
use lrukit::LruCache;

// Fuzz get/put sequences on LruCache
//
// The first byte picks the capacity (0..=15); the rest are (op, key) pairs.
fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(first % 16);
    let mut cache: LruCache<u8, u32> = LruCache::new(capacity);

    for (step, pair) in rest.chunks_exact(2).enumerate() {
        let key = pair[1] % 32;
        let value = step as u32;
        match pair[0] % 3 {
            0 => {
                cache.put(key, value);
                if capacity > 0 {
                    assert_eq!(cache.peek_mru(), Some((&key, &value)));
                }
            },
            1 => {
                let before = cache.len();
                if cache.get(&key).is_some() {
                    assert_eq!(cache.peek_mru().map(|(k, _)| *k), Some(key));
                }
                assert_eq!(cache.len(), before);
            },
            2 => {
                let _ = cache.peek(&key);
            },
            _ => unreachable!(),
        }

        assert!(cache.len() <= capacity);
        assert!(cache.check_invariants().is_ok());
    }
});
