//! Property-based tests for the layout generator.
//!
//! Uses `proptest` to verify structural invariants of generated layouts
//! under arbitrary seeds and room counts: connectivity, the single exit,
//! key reachability, and deterministic reproducibility.

use proptest::prelude::*;

use delve_core::config::LayoutConfig;
use delve_core::layout::LayoutGenerator;
use delve_core::types::Coordinate;

fn generate(seed: u64, min_rooms: usize) -> delve_core::layout::Layout {
    let config = LayoutConfig {
        min_rooms,
        ..LayoutConfig::default()
    };
    LayoutGenerator::new(config, seed).generate(Coordinate::ORIGIN)
}

// ---------------------------------------------------------------------------
// Property: every cell's parent chain reaches the start
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn every_cell_connects_back_to_the_start(seed in any::<u64>(), min_rooms in 2usize..40) {
        let layout = generate(seed, min_rooms);
        for coord in layout.cells.keys() {
            let chain = layout.parent_chain(*coord);
            prop_assert!(!chain.is_empty());
            prop_assert_eq!(*chain.last().expect("non-empty"), layout.start);
            // Every parent edge has a matching connection, except the root.
            for pair in chain.windows(2) {
                prop_assert!(layout.connection_between(pair[0], pair[1]).is_some());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property: exactly one exit, and never the start
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn single_exit_distinct_from_start(seed in any::<u64>(), min_rooms in 2usize..40) {
        let layout = generate(seed, min_rooms);
        let flagged: Vec<_> = layout.cells.values().filter(|c| c.is_exit).collect();
        prop_assert_eq!(flagged.len(), 1);
        let exit = layout.exit.expect("exit chosen");
        prop_assert_eq!(flagged[0].coord, exit);
        prop_assert_ne!(exit, layout.start);
    }
}

// ---------------------------------------------------------------------------
// Property: keys are reachable without passing their own door
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn keys_never_lie_beyond_their_own_door(seed in any::<u64>(), min_rooms in 2usize..60) {
        let layout = generate(seed, min_rooms);
        for key in &layout.keys {
            // Walking from the key back to the start never crosses the
            // door's far side, so the key is on the near side of its door.
            let chain = layout.parent_chain(key.coord);
            prop_assert!(!chain.is_empty());
            for pair in chain.windows(2) {
                let crosses = pair[0] == key.door.other && pair[1] == key.door.coord;
                prop_assert!(!crosses);
            }
            prop_assert_ne!(key.coord, key.door.other);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: at most one connection per unordered cell pair
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn connections_are_unique_per_pair(seed in any::<u64>(), min_rooms in 2usize..40) {
        let layout = generate(seed, min_rooms);
        for (i, a) in layout.connections.iter().enumerate() {
            for b in &layout.connections[i + 1..] {
                prop_assert!(!b.joins(a.coord, a.other));
            }
            // Connections only ever join axis-adjacent cells that exist.
            prop_assert_eq!(a.coord.manhattan(a.other), 1);
            prop_assert!(layout.cells.contains_key(&a.coord));
            prop_assert!(layout.cells.contains_key(&a.other));
        }
    }
}

// ---------------------------------------------------------------------------
// Property: same seed, same layout
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn generation_is_deterministic(seed in any::<u64>(), min_rooms in 2usize..40) {
        let first = generate(seed, min_rooms);
        let second = generate(seed, min_rooms);
        prop_assert_eq!(first, second);
    }
}

// ---------------------------------------------------------------------------
// Property: locked doors always have a matching key
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn locked_doors_are_keyed_or_unlocked(seed in any::<u64>(), min_rooms in 2usize..60) {
        let layout = generate(seed, min_rooms);
        let locked: Vec<_> = layout.connections.iter().filter(|c| c.locked).collect();
        for door in &locked {
            let code = door.key_code.expect("locked doors carry a code");
            prop_assert!(layout.keys.iter().any(|k| k.code == code));
        }
        // Key placement failure unlocks the door, so keys and locked doors
        // stay in one-to-one correspondence.
        prop_assert_eq!(layout.keys.len(), locked.len());
    }
}
