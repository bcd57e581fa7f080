//! Trail ordering properties.

use std::cmp::Ordering;

use proptest::prelude::*;
use refrain::{Location, Trail};

/// 1-6 distinct chapter ids in a random order.
fn order_strategy() -> impl Strategy<Value = Vec<String>> {
    Just((0..6).map(|i| format!("ch{}", i)).collect::<Vec<_>>())
        .prop_shuffle()
        .prop_flat_map(|ids| (1..=ids.len()).prop_map(move |n| ids[..n].to_vec()))
}

/// Locations drawn from the trail's chapters plus one chapter it lacks.
fn location_strategy() -> impl Strategy<Value = Location> {
    (0usize..7, 0usize..5).prop_map(|(chapter, index)| {
        let chapter = if chapter == 6 { "stray".to_string() } else { format!("ch{}", chapter) };
        Location::new(chapter, index)
    })
}

proptest! {
    /// Exactly one of a < b, a == b, a > b, and equality means same location.
    #[test]
    fn compare_is_antisymmetric(
        order in order_strategy(),
        a in location_strategy(),
        b in location_strategy(),
    ) {
        let trail = Trail::from_order(order).unwrap();
        let forward = trail.compare(&a, &b);
        prop_assert_eq!(forward, trail.compare(&b, &a).reverse());
        prop_assert_eq!(forward == Ordering::Equal, a == b);
    }

    #[test]
    fn compare_is_transitive(
        order in order_strategy(),
        a in location_strategy(),
        b in location_strategy(),
        c in location_strategy(),
    ) {
        let trail = Trail::from_order(order).unwrap();
        if trail.compare(&a, &b).is_le() && trail.compare(&b, &c).is_le() {
            prop_assert!(trail.compare(&a, &c).is_le());
        }
    }

    /// Declared chapters order by rank, then by word index.
    #[test]
    fn compare_follows_rank_then_index(
        order in order_strategy(),
        a in location_strategy(),
        b in location_strategy(),
    ) {
        let trail = Trail::from_order(order).unwrap();
        if let (Some(ra), Some(rb)) = (trail.rank(&a.chapter), trail.rank(&b.chapter)) {
            let expected = ra.cmp(&rb).then(a.index.cmp(&b.index));
            prop_assert_eq!(trail.compare(&a, &b), expected);
        } else if trail.contains(&a.chapter) {
            prop_assert_eq!(trail.compare(&a, &b), Ordering::Less);
        }
    }

    /// Successor and predecessor walk the ring in declared order.
    #[test]
    fn ring_visits_every_chapter(order in order_strategy()) {
        let trail = Trail::from_order(order.clone()).unwrap();
        let start = trail.iter().next().unwrap().clone();

        let mut visited = vec![start.clone()];
        let mut at = trail.successor(&start).unwrap();
        while *at != start {
            visited.push(at.clone());
            at = trail.successor(at).unwrap();
        }
        let names: Vec<&str> = visited.iter().map(|id| id.as_str()).collect();
        prop_assert_eq!(names, order.iter().map(String::as_str).collect::<Vec<_>>());

        for id in trail.iter() {
            let next = trail.successor(id).unwrap();
            prop_assert_eq!(trail.predecessor(next), Some(id));
        }
    }
}

#[test]
fn duplicate_chapter_is_rejected() {
    assert!(Trail::from_order(["a", "b", "a"]).is_err());
}
