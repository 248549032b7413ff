use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Deserializer, Serialize};
use std::{
    borrow::Borrow,
    fmt,
    hash::{Hash, Hasher},
};

use super::{constants, errors::GameError};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Spade, Suit::Diamond, Suit::Heart];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

pub const ACE: Value = 14;
pub const KING: Value = 13;
pub const QUEEN: Value = 12;
pub const JACK: Value = 11;

/// A card is a tuple of a value (two=2u8 ... ace=14u8) and a suit.
/// Cards sort by value first, so a descending sort puts aces in front.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl Card {
    #[must_use]
    pub fn value(&self) -> Value {
        self.0
    }

    #[must_use]
    pub fn suit(&self) -> Suit {
        self.1
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            ACE => "A",
            KING => "K",
            QUEEN => "Q",
            JACK => "J",
            v => &v.to_string(),
        };
        let repr = format!("{value}/{}", self.1);
        write!(f, "{repr:>4}")
    }
}

/// An ordered draw sequence built from one or more standard 52-card sets.
///
/// Cards are drawn from the top (index 0) forward. The deck is never
/// reshuffled while it's in use; the table builds a fresh one per hand.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
    // Next card to draw.
    deck_idx: usize,
}

impl Deck {
    /// Build `num_sets` ordered 52-card sets and Fisher-Yates shuffle them
    /// with the given RNG.
    pub fn shuffled<R: Rng + ?Sized>(num_sets: usize, rng: &mut R) -> Self {
        let mut deck = Self::ordered(num_sets);
        deck.shuffle(rng);
        deck
    }

    /// Same as [`Deck::shuffled`] but seeded from the thread-local RNG.
    #[must_use]
    pub fn new_shuffled(num_sets: usize) -> Self {
        Self::shuffled(num_sets, &mut rand::rng())
    }

    /// Unshuffled sets in value-then-suit order.
    #[must_use]
    pub fn ordered(num_sets: usize) -> Self {
        let mut cards = Vec::with_capacity(constants::CARDS_PER_SET * num_sets.max(1));
        for _ in 0..num_sets.max(1) {
            for value in 2..=ACE {
                for suit in Suit::ALL {
                    cards.push(Card(value, suit));
                }
            }
        }
        Self { cards, deck_idx: 0 }
    }

    /// A stacked deck that deals `cards` in order, top first.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards, deck_idx: 0 }
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        let card = *self
            .cards
            .get(self.deck_idx)
            .ok_or(GameError::DeckExhausted)?;
        self.deck_idx += 1;
        Ok(card)
    }

    /// Reshuffle every card back into the draw sequence.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.deck_idx = 0;
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.deck_idx)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::ordered(1)
    }
}

/// Type alias for whole chips. All bets and player stacks are represented
/// as whole chips; stakes presets are scaled so no blind needs a fraction.
pub type Usd = u32;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Self {
        let mut username: String = s
            .trim()
            .chars()
            .map(|c| if c.is_ascii_whitespace() { '_' } else { c })
            .collect();
        if let Some((idx, _)) = username.char_indices().nth(constants::MAX_USERNAME_LENGTH) {
            username.truncate(idx);
        }
        Self(username)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Type alias for seat positions during the game. Seats are numbered
/// clockwise in the order they were handed to the hand.
pub type SeatIndex = usize;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Blinds {
    pub small: Usd,
    pub big: Usd,
}

impl Blinds {
    #[must_use]
    pub fn new(small: Usd, big: Usd) -> Self {
        Self { small, big }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.big > 0 && self.small <= self.big
    }
}

impl fmt::Display for Blinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = format!("${}/{}", self.small, self.big);
        write!(f, "{repr}")
    }
}

#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct User {
    pub name: Username,
    pub money: Usd,
}

impl User {
    #[must_use]
    pub fn new(name: &str, money: Usd) -> Self {
        Self {
            name: Username::new(name),
            money,
        }
    }
}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Borrow<Username> for User {
    fn borrow(&self) -> &Username {
        &self.name
    }
}

/// A voluntary betting action. `Bet` and `Raise` carry the seat's total
/// for the round after the action, not the increment.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet(Usd),
    Raise(Usd),
}

impl Action {
    /// Bets and raises; used for aggression and PFR accounting.
    #[must_use]
    pub fn is_aggressive(&self) -> bool {
        matches!(self, Self::Bet(_) | Self::Raise(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Fold => "folds",
            Self::Check => "checks",
            Self::Call => "calls",
            Self::Bet(amount) => &format!("bets ${amount}"),
            Self::Raise(amount) => &format!("raises to ${amount}"),
        };
        write!(f, "{repr}")
    }
}

/// Inclusive range of legal totals for a bet or raise.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RaiseRange {
    /// Whether this opens the betting (`Bet`) or raises a live bet (`Raise`).
    pub opens: bool,
    pub min_to: Usd,
    pub max_to: Usd,
}

/// Everything a seat may legally do right now.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActionChoices {
    /// Chips owed to match the current bet (may exceed the stack).
    pub to_call: Usd,
    /// Chips a call actually moves (capped by the stack).
    pub call_amount: Usd,
    pub can_check: bool,
    pub raise_range: Option<RaiseRange>,
}

impl ActionChoices {
    /// The passive option: check when matched, otherwise call.
    #[must_use]
    pub fn passive(&self) -> Action {
        if self.can_check {
            Action::Check
        } else {
            Action::Call
        }
    }

    /// Clamp a desired total into the legal bet/raise range. Returns `None`
    /// when the seat can't bet or raise at all.
    #[must_use]
    pub fn bet_or_raise_to(&self, desired_to: Usd) -> Option<Action> {
        let range = self.raise_range?;
        let to = desired_to.max(range.min_to).min(range.max_to);
        Some(if range.opens {
            Action::Bet(to)
        } else {
            Action::Raise(to)
        })
    }
}

impl fmt::Display for ActionChoices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut options = Vec::with_capacity(4);
        if self.can_check {
            options.push("check".to_string());
        } else {
            options.push(format!("call (== ${})", self.call_amount));
        }
        if let Some(range) = self.raise_range {
            let verb = if range.opens { "bet" } else { "raise" };
            options.push(format!("{verb} (${}..=${})", range.min_to, range.max_to));
        }
        options.push("fold".to_string());
        let last = options.pop().unwrap_or_default();
        match options.len() {
            1 => write!(f, "{} or {last}", options[0]),
            _ => write!(f, "{}, or {last}", options.join(", ")),
        }
    }
}

/// A seat's state within one hand.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Player {
    pub user: User,
    pub is_human: bool,
    pub cards: Vec<Card>,
    /// Chips put in during the current betting round.
    pub amount_in_pot: Usd,
    /// Chips put in over the whole hand.
    pub total_committed: Usd,
    pub folded: bool,
    pub all_in: bool,
    pub last_action: Option<Action>,
    /// Cleared once the seat acts; set again when a full raise reopens
    /// the betting.
    pub(crate) raise_option: bool,
}

impl Player {
    #[must_use]
    pub fn new(user: User, is_human: bool) -> Self {
        Self {
            user,
            is_human,
            cards: Vec::with_capacity(constants::HOLE_CARDS),
            amount_in_pot: 0,
            total_committed: 0,
            folded: false,
            all_in: false,
            last_action: None,
            raise_option: true,
        }
    }

    pub fn reset(&mut self) {
        self.cards.clear();
        self.amount_in_pot = 0;
        self.total_committed = 0;
        self.folded = false;
        self.all_in = false;
        self.last_action = None;
        self.raise_option = true;
    }

    /// Still contesting the pot.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.folded
    }

    /// Still able to make betting decisions.
    #[must_use]
    pub fn can_act(&self) -> bool {
        !self.folded && !self.all_in
    }

    /// Move up to `amount` chips from the stack into the pot and return how
    /// many actually moved.
    pub(crate) fn commit(&mut self, amount: Usd) -> Usd {
        let moved = amount.min(self.user.money);
        self.user.money -= moved;
        self.amount_in_pot += moved;
        self.total_committed += moved;
        if self.user.money == 0 {
            self.all_in = true;
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::BTreeSet;

    // === Card Tests ===

    #[test]
    fn test_card_display() {
        assert_eq!(Card(ACE, Suit::Spade).to_string(), " A/♠");
        assert_eq!(Card(10, Suit::Heart).to_string(), "10/♥");
    }

    #[test]
    fn test_cards_order_by_value_first() {
        assert!(Card(ACE, Suit::Club) > Card(KING, Suit::Heart));
        assert!(Card(2, Suit::Heart) < Card(3, Suit::Club));
    }

    // === Deck Tests ===

    #[test]
    fn test_deck_initialization() {
        let deck = Deck::default();
        assert_eq!(deck.len(), 52);
        let unique: BTreeSet<_> = deck.cards.iter().collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn test_multi_set_deck() {
        let deck = Deck::new_shuffled(2);
        assert_eq!(deck.len(), 104);
        assert_eq!(deck.remaining(), 104);
    }

    #[test]
    fn test_deck_shuffle_is_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = Deck::shuffled(1, &mut rng);
        let mut shuffled = deck.cards.clone();
        shuffled.sort();
        let mut ordered = Deck::ordered(1).cards;
        ordered.sort();
        assert_eq!(shuffled, ordered);
    }

    #[test]
    fn test_seeded_shuffles_repeat() {
        let a = Deck::shuffled(1, &mut StdRng::seed_from_u64(42));
        let b = Deck::shuffled(1, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.cards, b.cards);
    }

    #[test]
    fn test_deck_draw_until_exhausted() {
        let mut deck = Deck::from_cards(vec![Card(2, Suit::Club), Card(3, Suit::Club)]);
        assert_eq!(deck.draw(), Ok(Card(2, Suit::Club)));
        assert_eq!(deck.draw(), Ok(Card(3, Suit::Club)));
        assert!(deck.is_empty());
        assert_eq!(deck.draw(), Err(GameError::DeckExhausted));
        // A failed draw doesn't move past the end.
        assert_eq!(deck.remaining(), 0);
        assert_eq!(deck.draw(), Err(GameError::DeckExhausted));
        assert_eq!(deck.remaining(), 0);
    }

    // === Username Tests ===

    #[test]
    fn test_username_sanitized() {
        assert_eq!(Username::new(" Alex Chen ").as_str(), "Alex_Chen");
        assert_eq!(
            Username::new("a_very_long_display_name").as_str().len(),
            constants::MAX_USERNAME_LENGTH
        );
    }

    // === Action Tests ===

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Call.to_string(), "calls");
        assert_eq!(Action::Raise(40).to_string(), "raises to $40");
    }

    #[test]
    fn test_choices_clamp_into_range() {
        let choices = ActionChoices {
            to_call: 10,
            call_amount: 10,
            can_check: false,
            raise_range: Some(RaiseRange {
                opens: false,
                min_to: 20,
                max_to: 100,
            }),
        };
        assert_eq!(choices.bet_or_raise_to(5), Some(Action::Raise(20)));
        assert_eq!(choices.bet_or_raise_to(500), Some(Action::Raise(100)));
        assert_eq!(choices.passive(), Action::Call);
    }

    #[test]
    fn test_choices_display() {
        let choices = ActionChoices {
            to_call: 0,
            call_amount: 0,
            can_check: true,
            raise_range: Some(RaiseRange {
                opens: true,
                min_to: 2,
                max_to: 50,
            }),
        };
        assert_eq!(choices.to_string(), "check, bet ($2..=$50), or fold");
    }

    // === Player Tests ===

    #[test]
    fn test_commit_caps_at_stack() {
        let mut player = Player::new(User::new("short", 30), false);
        assert_eq!(player.commit(50), 30);
        assert!(player.all_in);
        assert_eq!(player.amount_in_pot, 30);
        assert_eq!(player.total_committed, 30);
    }

    #[test]
    fn test_player_reset() {
        let mut player = Player::new(User::new("p", 100), true);
        player.commit(10);
        player.folded = true;
        player.last_action = Some(Action::Fold);
        player.reset();
        assert!(player.can_act());
        assert_eq!(player.amount_in_pot, 0);
        assert_eq!(player.last_action, None);
        assert_eq!(player.user.money, 90);
    }
}
