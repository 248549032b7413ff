//! Bot decision-making logic driven by play-style profiles.

use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;

use super::models::{BotProfile, Position};
use crate::game::{
    GameError,
    constants::BOARD_CARDS,
    entities::{ACE, Action, ActionChoices, Card, KING, Usd},
    functional::{Category, HandEvaluation, evaluate},
};

// === Hand Strength Base Values ===
// These represent the baseline strength for each made-hand category

/// Hand strength for high card (weakest hand: 10%)
const STRENGTH_HIGH_CARD: f32 = 0.1;

/// Hand strength for one pair (25% = beats high card)
const STRENGTH_ONE_PAIR: f32 = 0.25;

/// Hand strength for two pair (40%)
const STRENGTH_TWO_PAIR: f32 = 0.40;

/// Hand strength for three of a kind (55%)
const STRENGTH_THREE_OF_A_KIND: f32 = 0.55;

/// Hand strength for straight (70%)
const STRENGTH_STRAIGHT: f32 = 0.70;

/// Hand strength for flush (75%)
const STRENGTH_FLUSH: f32 = 0.75;

/// Hand strength for full house (85%)
const STRENGTH_FULL_HOUSE: f32 = 0.85;

/// Hand strength for four of a kind (95%)
const STRENGTH_FOUR_OF_A_KIND: f32 = 0.95;

/// Hand strength for straight flush (99% = nearly unbeatable)
const STRENGTH_STRAIGHT_FLUSH: f32 = 0.99;

/// Errors from malformed decision inputs. The table treats any of these as
/// a policy failure and folds the seat.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum BotError {
    #[error("expected 2 hole cards, got {0}")]
    MissingHoleCards(usize),
    #[error("a board can't have {0} cards")]
    InvalidBoard(usize),
    #[error("no legal actions to choose from")]
    NoLegalActions,
    #[error(transparent)]
    Evaluation(#[from] GameError),
}

/// Bet sizing intent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sizing {
    Value,
    Bluff,
    SemiBluff,
}

/// Drawing hands detected from hole and board cards.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Draw {
    Flush,
    Straight,
    Both,
}

impl Draw {
    /// Rough count of cards that complete the draw.
    #[must_use]
    pub fn outs(self) -> u32 {
        match self {
            Self::Flush => 9,
            Self::Straight => 8,
            Self::Both => 15,
        }
    }
}

/// Configuration for bot decision-making thresholds and multipliers.
///
/// Strength values are floats in `[0.0, 1.0]`; frequencies are multiplied
/// by a profile knob (aggression or bluff frequency) before the coin flip.
///
/// # Examples
///
/// ```
/// use parlor_poker::bot::decision::BotDecisionConfig;
///
/// let config = BotDecisionConfig::default();
/// assert_eq!(config.premium_strength, 0.8);
/// assert_eq!(config.max_equity, 0.95);
/// ```
#[derive(Clone, Debug)]
pub struct BotDecisionConfig {
    /// Margin over the positional threshold that makes an unopened preflop
    /// hand a value bet.
    ///
    /// **Range**: 0.1-0.3 (typical: 0.2)
    /// **Higher** = fewer value opens
    pub value_margin: f32,

    /// Aggression multiplier for opening marginal hands for balance.
    ///
    /// **Effect**: 0.3 with aggression 0.7 = opens 21% of marginal hands
    pub marginal_open_factor: f32,

    /// Preflop strength that always continues against a bet.
    ///
    /// **Range**: 0.75-0.9 (typical: 0.8)
    pub premium_strength: f32,

    /// Aggression multiplier for raising good hands from the button.
    pub late_raise_factor: f32,

    /// Fraction of the threshold a marginal hand needs to call with a cheap
    /// price.
    ///
    /// **Effect**: 0.7 = calls with 70% of the threshold strength
    pub marginal_call_factor: f32,

    /// Pot odds below which marginal preflop hands call.
    pub marginal_pot_odds: f32,

    /// Bluff-frequency multiplier for preflop steals from late position.
    pub late_bluff_factor: f32,

    /// Postflop strength that raises rather than calls a bet.
    ///
    /// **Range**: 0.6-0.8 (typical: 0.7, two pair with top kicker or better)
    pub strong_made_hand: f32,

    /// Aggression multiplier for raising strong made hands.
    pub made_raise_factor: f32,

    /// Aggression multiplier for semi-bluffing draws.
    pub semibluff_factor: f32,

    /// Equity lost per extra opponent.
    ///
    /// **Effect**: 0.85 = each opponent beyond the first costs 15%
    pub opponent_discount: f32,

    /// Cap on any equity estimate.
    pub max_equity: f32,
}

impl Default for BotDecisionConfig {
    fn default() -> Self {
        Self {
            // Preflop
            value_margin: 0.2,
            marginal_open_factor: 0.3,
            premium_strength: 0.8,
            late_raise_factor: 0.6,
            marginal_call_factor: 0.7,
            marginal_pot_odds: 0.3,
            late_bluff_factor: 0.3,
            // Postflop
            strong_made_hand: 0.7,
            made_raise_factor: 0.7,
            semibluff_factor: 0.4,
            // Equity
            opponent_discount: 0.85,
            max_equity: 0.95,
        }
    }
}

/// Context for bot decision making
///
/// Encapsulates all information needed to make a poker decision,
/// reducing parameter count and improving testability.
#[derive(Clone, Debug)]
pub struct BotDecisionContext<'a> {
    /// Bot's hole cards
    pub hole_cards: &'a [Card],

    /// Community board cards
    pub board_cards: &'a [Card],

    /// Chips in every pot right now
    pub pot_size: Usd,

    /// Highest round total so far
    pub current_bet: Usd,

    /// Legal options; `None` when it isn't the bot's turn
    pub choices: Option<ActionChoices>,

    /// Bot's position relative to the button
    pub position: Position,

    /// Other seats still contesting the pot
    pub opponents: usize,
}

/// Bot decision maker
#[derive(Debug)]
pub struct BotDecisionMaker {
    /// Random number generator
    rng: StdRng,
    /// Configuration for decision-making
    config: BotDecisionConfig,
}

impl BotDecisionMaker {
    /// Create a new decision maker with default config
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BotDecisionConfig::default())
    }

    /// Create a new decision maker with custom config
    #[must_use]
    pub fn with_config(config: BotDecisionConfig) -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            config,
        }
    }

    /// Deterministic decision maker for tests and replays.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config: BotDecisionConfig::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &BotDecisionConfig {
        &self.config
    }

    /// Decide the bot's action for the current spot.
    ///
    /// # Arguments
    ///
    /// * `profile` - Style knobs for this bot
    /// * `ctx` - Decision context with game state
    ///
    /// # Returns
    ///
    /// * `Action` - Always inside `ctx.choices`, so it is legal as given
    ///
    /// # Errors
    ///
    /// Returns a [`BotError`] when the context is malformed.
    pub fn decide(
        &mut self,
        profile: &BotProfile,
        ctx: &BotDecisionContext,
    ) -> Result<Action, BotError> {
        let choices = ctx.choices.ok_or(BotError::NoLegalActions)?;
        if ctx.hole_cards.len() != 2 {
            return Err(BotError::MissingHoleCards(ctx.hole_cards.len()));
        }
        let action = match ctx.board_cards.len() {
            0 => self.decide_preflop(profile, ctx, &choices),
            3..=BOARD_CARDS => self.decide_postflop(profile, ctx, &choices)?,
            n => return Err(BotError::InvalidBoard(n)),
        };
        debug!("bot in {} {action}", ctx.position);
        Ok(action)
    }

    fn decide_preflop(
        &mut self,
        profile: &BotProfile,
        ctx: &BotDecisionContext,
        choices: &ActionChoices,
    ) -> Action {
        let strength = preflop_strength(ctx.hole_cards[0], ctx.hole_cards[1]);
        let threshold = ctx.position.preflop_threshold() * profile.tightness;
        let to_call = choices.to_call;

        if to_call == 0 {
            if strength > threshold + self.config.value_margin {
                let size = raise_size(ctx.pot_size, Sizing::Value, strength, profile.aggression);
                return aggressive(ctx, choices, size);
            }
            if strength > threshold
                && self.chance(profile.aggression * self.config.marginal_open_factor)
            {
                let size = raise_size(ctx.pot_size, Sizing::Bluff, strength, profile.aggression);
                return aggressive(ctx, choices, size);
            }
            return Action::Check;
        }

        let facing_pot = ctx.pot_size + to_call;
        if strength > self.config.premium_strength {
            if self.chance(profile.aggression) {
                let size = raise_size(facing_pot, Sizing::Value, strength, profile.aggression);
                return aggressive(ctx, choices, size);
            }
            return Action::Call;
        }
        if strength > threshold {
            if ctx.position == Position::Button
                && self.chance(profile.aggression * self.config.late_raise_factor)
            {
                let size = raise_size(facing_pot, Sizing::Value, strength, profile.aggression);
                return aggressive(ctx, choices, size);
            }
            return Action::Call;
        }
        let pot_odds = calculate_pot_odds(ctx.pot_size, to_call);
        if strength > threshold * self.config.marginal_call_factor
            && pot_odds < self.config.marginal_pot_odds
        {
            return Action::Call;
        }
        if ctx.position.is_late()
            && self.chance(profile.bluff_frequency * self.config.late_bluff_factor)
        {
            let size = raise_size(facing_pot, Sizing::Bluff, strength, profile.aggression);
            return aggressive(ctx, choices, size);
        }
        Action::Fold
    }

    fn decide_postflop(
        &mut self,
        profile: &BotProfile,
        ctx: &BotDecisionContext,
        choices: &ActionChoices,
    ) -> Result<Action, BotError> {
        let mut cards = Vec::with_capacity(ctx.hole_cards.len() + ctx.board_cards.len());
        cards.extend_from_slice(ctx.hole_cards);
        cards.extend_from_slice(ctx.board_cards);
        let evaluation = evaluate(&cards)?;

        let strength = made_hand_strength(&evaluation);
        let draw = detect_draw(&cards);
        let equity = self.estimate_equity(strength, draw, ctx.board_cards.len(), ctx.opponents);
        let to_call = choices.to_call;
        let pot_odds = calculate_pot_odds(ctx.pot_size, to_call);
        let facing_pot = ctx.pot_size + to_call;

        if evaluation.category >= Category::OnePair {
            if to_call == 0 {
                if self.chance(profile.aggression) {
                    let size = bet_size(ctx.pot_size, Sizing::Value, strength, profile.aggression);
                    return Ok(aggressive(ctx, choices, size));
                }
                return Ok(Action::Check);
            }
            if strength > self.config.strong_made_hand {
                if self.chance(profile.aggression * self.config.made_raise_factor) {
                    let size = raise_size(facing_pot, Sizing::Value, strength, profile.aggression);
                    return Ok(aggressive(ctx, choices, size));
                }
                return Ok(Action::Call);
            }
            if equity > pot_odds {
                return Ok(Action::Call);
            }
        }

        if draw.is_some() && equity > pot_odds {
            if to_call > 0 {
                return Ok(Action::Call);
            }
            if self.chance(profile.aggression * self.config.semibluff_factor) {
                let size = bet_size(ctx.pot_size, Sizing::SemiBluff, strength, profile.aggression);
                return Ok(aggressive(ctx, choices, size));
            }
            return Ok(Action::Check);
        }

        if to_call == 0 {
            if ctx.position.is_late() && self.chance(profile.bluff_frequency) {
                let size = bet_size(ctx.pot_size, Sizing::Bluff, strength, profile.aggression);
                return Ok(aggressive(ctx, choices, size));
            }
            return Ok(Action::Check);
        }
        Ok(Action::Fold)
    }

    /// Estimate equity against the remaining field.
    ///
    /// Made hands are discounted per extra opponent; draws use the rule of
    /// 4 and 2 on their outs. The better of the two wins.
    ///
    /// # Arguments
    ///
    /// * `strength` - Made-hand strength (0.0 to 1.0)
    /// * `draw` - Detected draw, if any
    /// * `board_len` - Community cards dealt so far
    /// * `opponents` - Other live seats
    ///
    /// # Returns
    ///
    /// * `f32` - Estimated equity, capped at `max_equity`
    #[must_use]
    pub fn estimate_equity(
        &self,
        strength: f32,
        draw: Option<Draw>,
        board_len: usize,
        opponents: usize,
    ) -> f32 {
        let extra_opponents = opponents.saturating_sub(1).min(i32::MAX as usize) as i32;
        let made = strength * self.config.opponent_discount.powi(extra_opponents);

        let per_out = match BOARD_CARDS.saturating_sub(board_len) {
            0 => 0.0,
            1 => 0.02,
            _ => 0.04,
        };
        let drawing = draw.map_or(0.0, |d| d.outs() as f32 * per_out);

        made.max(drawing).min(self.config.max_equity)
    }

    fn chance(&mut self, probability: f32) -> bool {
        self.rng.random_bool(f64::from(probability.clamp(0.0, 1.0)))
    }
}

impl Default for BotDecisionMaker {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a chip size into a legal bet or raise total. Falls back to the
/// passive option when the seat can't bet or raise.
fn aggressive(ctx: &BotDecisionContext, choices: &ActionChoices, size: Usd) -> Action {
    choices
        .bet_or_raise_to(ctx.current_bet + size)
        .unwrap_or_else(|| choices.passive())
}

/// Preflop strength of two hole cards in `[0.0, 1.0]`.
///
/// Pairs scale with rank; ace- and king-high hands score by kicker tier;
/// broadway and suited connectors score by gap; everything else is trash.
#[must_use]
pub fn preflop_strength(first: Card, second: Card) -> f32 {
    let high = first.value().max(second.value());
    let low = first.value().min(second.value());
    let suited = first.suit() == second.suit();
    let gap = high - low;
    let pick = |s: f32, o: f32| if suited { s } else { o };

    if high == low {
        let rank = f32::from(high);
        return match high {
            10..=ACE => 0.9 + (rank - 10.0) * 0.02,
            7..=9 => 0.7 + (rank - 7.0) * 0.05,
            _ => 0.4 + (rank - 2.0) * 0.05,
        };
    }
    if high == ACE {
        return match low {
            10..=ACE => pick(0.85, 0.75),
            7..=9 => pick(0.65, 0.45),
            _ => pick(0.4, 0.2),
        };
    }
    if high == KING {
        return match low {
            10..=ACE => pick(0.7, 0.6),
            7..=9 => pick(0.5, 0.3),
            _ => pick(0.3, 0.15),
        };
    }
    if high >= 11 {
        if gap <= 1 && low >= 9 {
            return pick(0.6, 0.5);
        }
        if gap <= 2 && low >= 8 {
            return pick(0.45, 0.3);
        }
    }
    if suited && gap <= 1 && low >= 5 {
        return 0.4;
    }
    if suited && gap <= 2 && low >= 6 {
        return 0.3;
    }
    0.1
}

/// Postflop strength from the made-hand category plus a small bonus for
/// the hand's leading rank.
#[must_use]
pub fn made_hand_strength(evaluation: &HandEvaluation) -> f32 {
    let base_strength = match evaluation.category {
        Category::HighCard => STRENGTH_HIGH_CARD,
        Category::OnePair => STRENGTH_ONE_PAIR,
        Category::TwoPair => STRENGTH_TWO_PAIR,
        Category::ThreeOfAKind => STRENGTH_THREE_OF_A_KIND,
        Category::Straight => STRENGTH_STRAIGHT,
        Category::Flush => STRENGTH_FLUSH,
        Category::FullHouse => STRENGTH_FULL_HOUSE,
        Category::FourOfAKind => STRENGTH_FOUR_OF_A_KIND,
        Category::StraightFlush | Category::RoyalFlush => STRENGTH_STRAIGHT_FLUSH,
    };
    // Normalize value (2-14) to 0.0-0.1 range for kicker bonus
    let kicker_bonus = f32::from(evaluation.primary_rank()) / 14.0 * 0.1;
    (base_strength + kicker_bonus).min(1.0)
}

/// Find flush draws (exactly four of a suit) and straight draws (four
/// consecutive distinct ranks, ace counting low too).
#[must_use]
pub fn detect_draw(cards: &[Card]) -> Option<Draw> {
    let mut suit_counts = [0usize; 4];
    let mut ranks = [false; 15];
    for card in cards {
        suit_counts[card.suit() as usize] += 1;
        ranks[usize::from(card.value())] = true;
    }
    ranks[1] = ranks[usize::from(ACE)];

    let flush = suit_counts.contains(&4);
    let straight = ranks.windows(4).any(|w| w.iter().all(|&present| present));

    match (flush, straight) {
        (true, true) => Some(Draw::Both),
        (true, false) => Some(Draw::Flush),
        (false, true) => Some(Draw::Straight),
        (false, false) => None,
    }
}

/// Calculate pot odds: the share of the final pot the call pays for.
///
/// # Arguments
///
/// * `pot_size` - Current pot size
/// * `call_amount` - Amount needed to call
///
/// # Returns
///
/// * `f32` - `call / (pot + call)`; 0.0 when the call is free
#[must_use]
pub fn calculate_pot_odds(pot_size: Usd, call_amount: Usd) -> f32 {
    if call_amount == 0 {
        return 0.0;
    }
    call_amount as f32 / (pot_size + call_amount) as f32
}

/// Raise increment as a fraction of the pot (0.75 / 0.6 / 0.5 for value,
/// bluff and semi-bluff), scaled by strength for value and by aggression.
#[must_use]
pub fn raise_size(pot: Usd, sizing: Sizing, strength: f32, aggression: f32) -> Usd {
    let fraction = match sizing {
        Sizing::Value => 0.75,
        Sizing::Bluff => 0.6,
        Sizing::SemiBluff => 0.5,
    };
    let mut size = pot as f32 * fraction;
    if sizing == Sizing::Value {
        size *= 0.8 + strength * 0.4;
    }
    size *= 0.8 + aggression * 0.4;
    (size.round() as Usd).max(1)
}

/// Opening bet as a fraction of the pot (0.7 / 0.5 / 0.4 for value, bluff
/// and semi-bluff), scaled by strength for value and by aggression.
#[must_use]
pub fn bet_size(pot: Usd, sizing: Sizing, strength: f32, aggression: f32) -> Usd {
    let fraction = match sizing {
        Sizing::Value => 0.7,
        Sizing::Bluff => 0.5,
        Sizing::SemiBluff => 0.4,
    };
    let mut size = pot as f32 * fraction;
    if sizing == Sizing::Value {
        size *= 0.7 + strength * 0.6;
    }
    size *= 0.7 + aggression * 0.6;
    (size.round() as Usd).max(1)
}
