//! Property-based tests for u-turret
//!
//! Uses proptest to check the laws of circular search, scoring and the
//! genetic operators.

use proptest::prelude::*;
use proptest::sample::Index;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use u_turret::ga::operators::{crossover_at, mutate, repair, single_point_crossover};
use u_turret::models::{Distribution, ToolId, ToolLife, ToolLifeTable, Turret};

fn life_table(max_id: ToolId, life: u32) -> ToolLifeTable {
    (1..=max_id).map(|id| (id, ToolLife::Finite(life))).collect()
}

/// A layout where every tool id appears exactly once.
fn distinct_layout() -> impl Strategy<Value = Vec<ToolId>> {
    (1u32..10).prop_flat_map(|n| Just((1..=n).collect::<Vec<_>>()).prop_shuffle())
}

proptest! {
    // ==================== Circular search ====================

    #[test]
    fn find_single_occurrence_is_within_half_turn(
        size in 1usize..40,
        slot_pick in any::<Index>(),
        start_pick in any::<Index>(),
    ) {
        let slot = slot_pick.index(size);
        let start = start_pick.index(size);
        let mut slots = vec![2; size];
        slots[slot] = 1;
        let turret = Turret::new(&slots, &life_table(2, 10)).unwrap();

        let hits = turret.find(1, start);
        prop_assert_eq!(hits.len(), 1);
        let (index, distance) = hits[0];
        prop_assert_eq!(index, slot);
        prop_assert!(distance.unsigned_abs() as usize <= size / 2);
    }

    #[test]
    fn find_distances_land_on_their_slot(
        slots in prop::collection::vec(1u32..=3, 1..30),
        tool_id in 1u32..=3,
        start_pick in any::<Index>(),
    ) {
        let size = slots.len();
        let start = start_pick.index(size);
        let turret = Turret::new(&slots, &life_table(3, 10)).unwrap();

        let hits = turret.find(tool_id, start);
        let occurrences = slots.iter().filter(|&&id| id == tool_id).count();
        prop_assert_eq!(hits.len(), occurrences);

        for (index, distance) in hits {
            let magnitude = distance.unsigned_abs() as usize;
            let landed = if distance >= 0 {
                (start + magnitude) % size
            } else {
                (start + size - magnitude) % size
            };
            prop_assert_eq!(landed, index);
            prop_assert_eq!(slots[index], tool_id);
        }
    }

    #[test]
    fn find_prefers_clockwise_on_ties(
        size in 3usize..30,
        start_pick in any::<Index>(),
        offset_pick in any::<Index>(),
    ) {
        let start = start_pick.index(size);
        let k = 1 + offset_pick.index((size - 1) / 2);
        let mut slots = vec![2; size];
        slots[(start + k) % size] = 1;
        slots[(start + size - k) % size] = 1;
        let turret = Turret::new(&slots, &life_table(2, 10)).unwrap();

        let mut hits = turret.find(1, start);
        hits.sort_by_key(|&(_, d)| d.abs());
        prop_assert_eq!(hits.len(), 2);
        prop_assert_eq!(hits[0], ((start + k) % size, k as i64));
        prop_assert_eq!(hits[1], ((start + size - k) % size, -(k as i64)));
    }

    // ==================== Scoring ====================

    #[test]
    fn rescoring_never_scores_higher(
        slots in distinct_layout(),
        lives in prop::collection::vec(1u32..20, 9),
        op_picks in prop::collection::vec(any::<Index>(), 1..8),
        point_pick in any::<Index>(),
        parts in 1usize..40,
    ) {
        let point = point_pick.index(slots.len());
        let mut ops: Vec<ToolId> = op_picks.iter().map(|i| slots[i.index(slots.len())]).collect();
        ops[0] = slots[point];

        // The starting tool never wears out, so the second run can always start
        let mut table: ToolLifeTable = (1..=9)
            .zip(lives)
            .map(|(id, life)| (id, ToolLife::Finite(life)))
            .collect();
        table.insert(ops[0], ToolLife::Unbounded);

        let mut turret = Turret::new(&slots, &table).unwrap();
        let first = turret.score(parts, &ops, point).unwrap();
        let second = turret.score(parts, &ops, point).unwrap();
        prop_assert!(second.score <= first.score);
        prop_assert!(second.parts_completed <= first.parts_completed);
    }

    // ==================== Operators ====================

    #[test]
    fn repair_matches_distribution(
        (slots, target) in (1usize..20).prop_flat_map(|n| (
            prop::collection::vec(1u32..=5, n),
            prop::collection::vec(1u32..=5, n),
        )),
    ) {
        let table = life_table(5, 10);
        let mut distribution = Distribution::new();
        for id in &target {
            *distribution.entry(*id).or_insert(0) += 1;
        }
        let mut turret = Turret::new(&slots, &table).unwrap();

        repair(&mut turret, &distribution, &table).unwrap();
        prop_assert_eq!(turret.size(), slots.len());
        prop_assert_eq!(turret.counts(), distribution);
    }

    #[test]
    fn crossover_splices_parents_at_cut(
        (ids1, ids2) in (2usize..20).prop_flat_map(|n| (
            prop::collection::vec(1u32..=5, n),
            prop::collection::vec(1u32..=5, n),
        )),
        cut_pick in any::<Index>(),
        seed in any::<u64>(),
    ) {
        let table = life_table(5, 10);
        let p1 = Turret::new(&ids1, &table).unwrap();
        let p2 = Turret::new(&ids2, &table).unwrap();
        let size = ids1.len();

        let cut = 1 + cut_pick.index(size - 1);
        let child = crossover_at(&p1, &p2, cut).unwrap().slot_ids();
        prop_assert_eq!(child.len(), size);
        prop_assert_eq!(&child[..cut], &ids1[..cut]);
        prop_assert_eq!(&child[cut..], &ids2[cut..]);

        let mut rng = SmallRng::seed_from_u64(seed);
        let child = single_point_crossover(&p1, &p2, &mut rng).unwrap();
        prop_assert_eq!(child.size(), size);
        prop_assert_eq!(child.slot_ids()[0], ids1[0]);
        prop_assert_eq!(child.slot_ids()[size - 1], ids2[size - 1]);
    }

    #[test]
    fn zero_rate_mutation_keeps_ids(
        slots in prop::collection::vec(1u32..=5, 1..20),
        seed in any::<u64>(),
    ) {
        let table = life_table(5, 10);
        let mut turret = Turret::new(&slots, &table).unwrap();
        let ops = [slots[0]];
        turret.score(3, &ops, 0).unwrap();

        let mut rng = SmallRng::seed_from_u64(seed);
        let mutated = mutate(&turret, 0.0, &table, &mut rng).unwrap();
        prop_assert_eq!(mutated.slot_ids(), turret.slot_ids());
        prop_assert!(mutated.tools().iter().all(|t| t.life == ToolLife::Finite(10)));
    }
}
