//! Property tests for hand invariants and deferred consumption.

use proptest::prelude::*;

use quiz_cards::{
    CardId, DeferredStateCache, HandManager, HandRules, HealthLedger, PlayerId,
};

#[derive(Clone, Debug)]
enum Op {
    Add(u8, u32),
    Remove(u8, u32),
    Transfer(u8, u8, u32),
    Replace(u8, Vec<u32>),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..3, 0u32..6).prop_map(|(p, c)| Op::Add(p, c)),
        (0u8..3, 0u32..6).prop_map(|(p, c)| Op::Remove(p, c)),
        (0u8..3, 0u8..3, 0u32..6).prop_map(|(a, b, c)| Op::Transfer(a, b, c)),
        (0u8..3, prop::collection::vec(0u32..6, 0..8)).prop_map(|(p, cs)| Op::Replace(p, cs)),
    ]
}

fn rules() -> impl Strategy<Value = HandRules> {
    (1usize..6, 1usize..4, any::<bool>()).prop_map(|(max, same, dupes)| {
        let rules = HandRules::default()
            .with_max_hand_size(max)
            .with_max_same_card(same)
            .with_banned(CardId::new(5));
        if dupes {
            rules
        } else {
            rules.without_duplicates()
        }
    })
}

fn pid(n: u8) -> PlayerId {
    PlayerId::new(u32::from(n))
}

fn check_invariants(hands: &HandManager) -> Result<(), TestCaseError> {
    let rules = hands.rules();
    for player in hands.players() {
        let cards = hands.cards(player);
        prop_assert!(cards.len() <= rules.max_hand_size);
        for &card in cards {
            prop_assert!(!card.is_wildcard());
            prop_assert!(!rules.is_banned(card));
            let copies = cards.iter().filter(|&&c| c == card).count();
            prop_assert!(copies <= rules.max_same_card_in_hand);
            if !rules.allow_duplicates {
                prop_assert_eq!(copies, 1);
            }
        }
    }
    Ok(())
}

proptest! {
    /// No sequence of operations breaks the hand rules.
    #[test]
    fn test_hand_rules_hold(rules in rules(), ops in prop::collection::vec(op(), 0..60)) {
        let mut hands = HandManager::new(rules);
        let mut health = HealthLedger::new(3);
        for n in 0..3 {
            hands.register(pid(n), "");
            health.add_player(pid(n));
        }

        for op in ops {
            match op {
                Op::Add(p, c) => {
                    hands.add_card(pid(p), CardId::new(c));
                }
                Op::Remove(p, c) => {
                    hands.remove_card(pid(p), CardId::new(c));
                }
                Op::Transfer(a, b, c) => {
                    hands.transfer(pid(a), pid(b), CardId::new(c), &health);
                }
                Op::Replace(p, cs) => {
                    let cards: Vec<CardId> = cs.into_iter().map(CardId::new).collect();
                    hands.replace_hand(pid(p), &cards);
                }
            }
            check_invariants(&hands)?;
        }
    }

    /// A transfer either moves exactly one card or changes nothing.
    #[test]
    fn test_transfer_atomic(
        rules in rules(),
        from_cards in prop::collection::vec(1u32..6, 0..6),
        to_cards in prop::collection::vec(1u32..6, 0..6),
        card in 0u32..6,
        same_player in any::<bool>(),
    ) {
        let mut hands = HandManager::new(rules);
        let mut health = HealthLedger::new(3);
        for n in 0..2 {
            hands.register(pid(n), "");
            health.add_player(pid(n));
        }
        let from_cards: Vec<CardId> = from_cards.into_iter().map(CardId::new).collect();
        let to_cards: Vec<CardId> = to_cards.into_iter().map(CardId::new).collect();
        hands.replace_hand(pid(0), &from_cards);
        hands.replace_hand(pid(1), &to_cards);

        let from = pid(0);
        let to = if same_player { pid(0) } else { pid(1) };
        let card = CardId::new(card);
        let before_from = hands.cards(from).to_vec();
        let before_to = hands.cards(pid(1)).to_vec();

        if hands.transfer(from, to, card, &health) {
            prop_assert!(!same_player);
            prop_assert_eq!(hands.count(from), before_from.len() - 1);
            prop_assert_eq!(hands.count(to), before_to.len() + 1);
            prop_assert_eq!(hands.cards(to).last().copied(), Some(card));
        } else {
            prop_assert_eq!(hands.cards(from), before_from.as_slice());
            prop_assert_eq!(hands.cards(pid(1)), before_to.as_slice());
        }
    }

    /// The damage multiplier applies to exactly one calculation.
    #[test]
    fn test_multiplier_applies_once(multiplier in 0.5f32..4.0, raw in 0i32..100) {
        let mut cache = DeferredStateCache::new();
        cache.set_damage_multiplier(multiplier);

        let first = cache.on_damage_calculating(raw);
        prop_assert_eq!(first, (raw as f32 * multiplier).round() as i32);
        prop_assert_eq!(cache.on_damage_calculating(raw), raw);
    }

    /// Timer adjustments are consumed by the first timer.
    #[test]
    fn test_timer_adjustment_consumed(
        bonus in prop::option::of(0.0f32..10.0),
        penalty in prop::option::of(0.0f32..10.0),
        base in 5.0f32..60.0,
    ) {
        let mut cache = DeferredStateCache::new();
        let player = PlayerId::new(1);
        if let Some(bonus) = bonus {
            cache.set_time_bonus(player, bonus);
        }
        if let Some(penalty) = penalty {
            cache.set_time_penalty(player, penalty);
        }

        let expected = base + bonus.unwrap_or(0.0) - penalty.unwrap_or(0.0);
        prop_assert_eq!(cache.on_timer_starting(player, base), expected);
        prop_assert_eq!(cache.on_timer_starting(player, base), base);
        prop_assert!(cache.is_empty());
    }
}
