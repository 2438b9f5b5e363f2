#![no_main]

use libfuzzer_sys::fuzz_target;
use lrukit::ds::RecencyList;

// Fuzz arbitrary operation sequences on RecencyList
//
// Covers push_front, detach (twice) + prepend, move_to_front and evict_tail,
// and validates the link structure after every step.
fuzz_target!(|data: &[u8]| {
    let mut list: RecencyList<u8, u32> = RecencyList::new();
    let mut ids = Vec::new();

    for pair in data.chunks_exact(2) {
        let op = pair[0] % 5;
        let arg = pair[1];

        match op {
            0 => {
                let id = list.push_front(arg, u32::from(arg));
                ids.push(id);
                assert_eq!(list.front_id(), Some(id));
            },
            1 => {
                if !ids.is_empty() {
                    let id = ids[arg as usize % ids.len()];
                    if list.detach(id) {
                        assert!(!list.detach(id));
                        assert!(list.prepend(id));
                        assert_eq!(list.front_id(), Some(id));
                    }
                }
            },
            2 => {
                if !ids.is_empty() {
                    let id = ids[arg as usize % ids.len()];
                    if list.move_to_front(id) {
                        assert_eq!(list.front_id(), Some(id));
                    }
                }
            },
            3 => {
                let old_len = list.len();
                let tail = list.back_id();
                match list.evict_tail() {
                    Some(_) => {
                        assert_eq!(list.len(), old_len - 1);
                        if let Some(id) = tail {
                            assert!(!list.contains(id));
                            ids.retain(|&x| x != id);
                        }
                    },
                    None => assert_eq!(old_len, 0),
                }
            },
            4 => {
                assert_eq!(list.iter().count(), list.len());
            },
            _ => unreachable!(),
        }

        list.debug_validate_invariants();
    }
});
