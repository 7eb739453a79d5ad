//! Trick counts of random endings stay in range and agree between sides

use dds_engine::types::is_ns;
use dds_engine::{CacheConfig, Cards, CutoffTable, Hands, Position, Solver, TranspositionCache, NOTRUMP, NUM_SEATS};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// `size` random cards for every seat
fn random_ending(rng: &mut Xoshiro256PlusPlus, size: usize) -> Hands {
    let mut deck: Vec<usize> = (0..52).collect();
    deck.shuffle(rng);
    let mut hands = Hands::new();
    for (seat, cards) in deck.chunks(size).take(NUM_SEATS).enumerate() {
        hands[seat] = cards.iter().fold(Cards::new(), |mut hand, &card| {
            hand.add(card);
            hand
        });
    }
    hands
}

/// The same cards, each hand moved one seat clockwise
fn rotate(hands: &Hands) -> Hands {
    let mut rotated = Hands::new();
    for seat in 0..NUM_SEATS {
        rotated[(seat + 1) % NUM_SEATS] = hands[seat];
    }
    rotated
}

#[test]
fn test_random_ending_tables() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x5eed);
    for _ in 0..12 {
        let size = rng.random_range(1..=5);
        let hands = random_ending(&mut rng, size);
        for trump in 0..=NOTRUMP {
            for leader in 0..NUM_SEATS {
                let position = Position::new(hands, trump, leader).unwrap();
                let mut cache = TranspositionCache::new(CacheConfig::default());
                let mut cutoffs = CutoffTable::default();
                let solver = Solver::new(position);
                let outcome = solver.solve_with_caches(&mut cache, &mut cutoffs);
                let pbn = hands.to_pbn(0);
                assert!(outcome.ns_tricks as usize <= size, "{pbn} trump {trump} leader {leader}");
                assert_eq!(outcome.ns_tricks as usize + outcome.ew_tricks as usize, size, "{pbn}");

                // The other side holding the same cards with the same leader
                let swapped = Position::new(rotate(&hands), trump, (leader + 1) % NUM_SEATS).unwrap();
                assert_eq!(Solver::new(swapped).solve(), outcome.ew_tricks, "{pbn} trump {trump} leader {leader}");

                // The leader picks the best of its leads
                let values = solver.analyze_moves(&mut cache, &mut cutoffs).unwrap();
                assert_eq!(values.len(), size);
                let tricks = values.iter().map(|value| value.ns_tricks);
                let best = if is_ns(leader) { tricks.max() } else { tricks.min() };
                assert_eq!(best, Some(outcome.ns_tricks), "{pbn} trump {trump} leader {leader}");
                assert!(values.iter().all(|value| value.ns_tricks as usize <= size));
            }
        }
    }
}
