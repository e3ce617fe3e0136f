//! Property tests for the category rotation engine

use chrono::Utc;
use proptest::prelude::*;

use zapofertas::models::RotationState;
use zapofertas::services::rotation::{self, RotationPolicy};

fn category_lists() -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::hash_set(100_000i64..200_000, 2..6)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
}

proptest! {
    /// After every category has exhausted its empty-result threshold once,
    /// the cursor is back at the category it started from.
    #[test]
    fn exhausting_every_category_closes_the_cycle(
        categories in category_lists(),
        threshold in 1u32..4,
    ) {
        let policy = RotationPolicy {
            enabled: true,
            empty_threshold: threshold,
            cooldown_minutes: 60,
        };
        let mut state = RotationState::default();
        let now = Utc::now();

        let start = rotation::cursor(&policy, &categories, &mut state, now).category_id;

        for _ in 0..categories.len() {
            for _ in 0..threshold {
                rotation::record_empty(&policy, &categories, &mut state, now);
            }
        }

        prop_assert_eq!(state.category_id, start);
    }

    /// A successful cycle never moves the cursor: category and page are
    /// preserved, only the empty counter resets.
    #[test]
    fn a_match_never_resets_pagination(
        categories in category_lists(),
        empties in 0u32..2,
    ) {
        let policy = RotationPolicy {
            enabled: true,
            empty_threshold: 3,
            cooldown_minutes: 15,
        };
        let mut state = RotationState::default();
        let now = Utc::now();

        rotation::cursor(&policy, &categories, &mut state, now);
        for _ in 0..empties {
            rotation::record_empty(&policy, &categories, &mut state, now);
        }

        let category_before = state.category_id;
        let page_before = state.page;

        rotation::record_match(&mut state);

        prop_assert_eq!(state.category_id, category_before);
        prop_assert_eq!(state.page, page_before);
        prop_assert_eq!(state.empty_count, 0);
    }

    /// The cursor always points at a configured category and a page >= 1.
    #[test]
    fn cursor_stays_within_the_configured_list(
        categories in category_lists(),
        empties in 0u32..20,
    ) {
        let policy = RotationPolicy {
            enabled: true,
            empty_threshold: 3,
            cooldown_minutes: 15,
        };
        let mut state = RotationState::default();
        let now = Utc::now();

        for _ in 0..empties {
            rotation::cursor(&policy, &categories, &mut state, now);
            rotation::record_empty(&policy, &categories, &mut state, now);
        }

        let cursor = rotation::cursor(&policy, &categories, &mut state, now);
        let category = cursor.category_id.unwrap();
        prop_assert!(categories.contains(&category));
        prop_assert!(cursor.page >= 1);
    }
}
