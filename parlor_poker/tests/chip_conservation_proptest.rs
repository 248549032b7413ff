/// Property-based tests for chip conservation through whole hands
///
/// Random stacks, buttons and decisions drawn from each seat's legal
/// choices. No chip is ever created or lost, and every hand terminates
/// with an empty pot.
use parlor_poker::game::{
    Hand, Phase,
    entities::{Action, ActionChoices, Blinds, Deck, Player, User, Usd},
};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

const BLINDS: Blinds = Blinds { small: 5, big: 10 };
const MAX_STEPS: usize = 2000;

fn players(stacks: &[Usd]) -> Vec<Player> {
    stacks
        .iter()
        .enumerate()
        .map(|(i, &money)| Player::new(User::new(&format!("p{i}"), money), false))
        .collect()
}

/// Map a random byte onto one of the seat's legal actions.
fn pick(choices: &ActionChoices, selector: u8) -> Action {
    match selector % 8 {
        0 => Action::Fold,
        1..=3 => choices.passive(),
        4 => choices
            .raise_range
            .and_then(|r| choices.bet_or_raise_to(r.min_to))
            .unwrap_or_else(|| choices.passive()),
        5 => choices
            .raise_range
            .and_then(|r| choices.bet_or_raise_to((r.min_to + r.max_to) / 2))
            .unwrap_or_else(|| choices.passive()),
        6 => choices
            .raise_range
            .and_then(|r| choices.bet_or_raise_to(r.max_to))
            .unwrap_or_else(|| choices.passive()),
        _ => {
            if choices.can_check {
                Action::Check
            } else {
                Action::Fold
            }
        }
    }
}

fn hand_strategy() -> impl Strategy<Value = (Vec<Usd>, usize, u64, Vec<u8>)> {
    (
        prop::collection::vec(0u32..=1000, 2..=10),
        0usize..10,
        any::<u64>(),
        prop::collection::vec(any::<u8>(), 1..=64),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_random_hands_conserve_chips((stacks, button, seed, selectors) in hand_strategy()) {
        prop_assume!(stacks.iter().filter(|&&s| s > 0).count() >= 2);
        let total: Usd = stacks.iter().sum();
        let button = button % stacks.len();
        let deck = Deck::shuffled(1, &mut StdRng::seed_from_u64(seed));

        let mut hand = Hand::start(players(&stacks), button, BLINDS, deck).unwrap();
        prop_assert_eq!(hand.state().chips_in_play(), total);

        let mut steps = 0;
        while !hand.is_complete() {
            prop_assert!(steps < MAX_STEPS, "hand didn't terminate");
            if hand.phase() == Phase::Showdown {
                hand.resolve_showdown().unwrap();
                continue;
            }
            let seat = hand.active_seat().unwrap();
            let choices = hand.action_choices(seat).unwrap();
            let action = pick(&choices, selectors[steps % selectors.len()]);
            prop_assert!(hand.is_legal(seat, &action), "{} not legal with {}", action, choices);
            hand.submit_action(seat, action).unwrap();
            prop_assert_eq!(hand.state().chips_in_play(), total);
            steps += 1;
        }

        prop_assert_eq!(hand.pot_total(), 0);
        let final_stacks: Usd = hand.players().iter().map(|p| p.user.money).sum();
        prop_assert_eq!(final_stacks, total);

        // Winners never collect more than everyone put in.
        let won: Usd = hand.payouts().iter().map(|p| p.amount_won).sum();
        let committed: Usd = hand.players().iter().map(|p| p.total_committed).sum();
        prop_assert_eq!(won, committed);
    }

    #[test]
    fn test_broke_seats_sit_out(
        stacks in prop::collection::vec(0u32..=300, 3..=8),
        seed in any::<u64>(),
    ) {
        prop_assume!(stacks.iter().filter(|&&s| s > 0).count() >= 2);
        let deck = Deck::shuffled(1, &mut StdRng::seed_from_u64(seed));
        let hand = Hand::start(players(&stacks), 0, BLINDS, deck).unwrap();

        for (player, &stack) in hand.players().iter().zip(&stacks) {
            if stack == 0 {
                prop_assert!(player.folded);
                prop_assert!(player.cards.is_empty());
                prop_assert_eq!(player.total_committed, 0);
            } else {
                prop_assert_eq!(player.cards.len(), 2);
            }
        }
        if let Some(seat) = hand.active_seat() {
            prop_assert!(stacks[seat] > 0);
        }
    }

    #[test]
    fn test_folding_everyone_pays_last_seat(
        stacks in prop::collection::vec(20u32..=500, 2..=10),
        button in 0usize..10,
    ) {
        let total: Usd = stacks.iter().sum();
        let button = button % stacks.len();
        let mut hand = Hand::start(players(&stacks), button, BLINDS, Deck::ordered(1)).unwrap();

        while let Some(seat) = hand.active_seat() {
            hand.submit_action(seat, Action::Fold).unwrap();
        }

        prop_assert!(hand.is_complete());
        prop_assert_eq!(hand.payouts().len(), 1);
        let winner = hand.payouts()[0].seat;
        prop_assert_eq!(winner, hand.positions().big_blind);
        prop_assert_eq!(hand.payouts()[0].amount_won, 15);
        let final_stacks: Usd = hand.players().iter().map(|p| p.user.money).sum();
        prop_assert_eq!(final_stacks, total);
    }
}
