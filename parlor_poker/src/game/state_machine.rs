//! Betting-round state machine for a single hand.
//!
//! A [`Hand`] owns its seats, deck and pot ledger from blinds to payout. It
//! only changes through [`Hand::start`], [`Hand::submit_action`],
//! [`Hand::force_fold`] and [`Hand::resolve_showdown`]; everything else is a
//! read-only query, so callers can't put the table into an invalid shape.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};
use uuid::Uuid;

use super::{
    constants::{BOARD_CARDS, BURN_CARDS, HOLE_CARDS, MAX_PLAYERS},
    entities::{
        Action, ActionChoices, Blinds, Card, Deck, Player, RaiseRange, SeatIndex, Usd, Username,
    },
    errors::{ActionReason, GameError},
    functional::{HandEvaluation, evaluate},
    pot::{PotLedger, SidePot},
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Phase {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Complete,
}

impl Phase {
    /// The betting street for this phase, if betting is still possible.
    #[must_use]
    pub fn street(self) -> Option<Street> {
        match self {
            Self::Preflop => Some(Street::Preflop),
            Self::Flop => Some(Street::Flop),
            Self::Turn => Some(Street::Turn),
            Self::River => Some(Street::River),
            Self::Showdown | Self::Complete => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.street() {
            Some(street) => write!(f, "{street}"),
            None if *self == Self::Showdown => write!(f, "showdown"),
            None => write!(f, "complete"),
        }
    }
}

/// Play positions used for tracking who is paying what blinds and whose
/// turn is first on each street.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayPositions {
    pub button: SeatIndex,
    pub small_blind: SeatIndex,
    pub big_blind: SeatIndex,
    pub first_preflop: SeatIndex,
    pub first_postflop: SeatIndex,
}

impl PlayPositions {
    /// Positions among dealt-in seats. Heads-up, the button posts the small
    /// blind and acts first preflop; the big blind acts first afterwards.
    fn compute(players: &[Player], button: SeatIndex) -> Self {
        let n = players.len();
        let next_dealt = |from: SeatIndex| {
            (1..=n)
                .map(|k| (from + k) % n)
                .find(|&seat| !players[seat].folded)
                .unwrap_or(from)
        };
        let dealt_in = players.iter().filter(|p| !p.folded).count();

        if dealt_in == 2 {
            let small_blind = if players[button].folded {
                next_dealt(button)
            } else {
                button
            };
            let big_blind = next_dealt(small_blind);
            Self {
                button,
                small_blind,
                big_blind,
                first_preflop: small_blind,
                first_postflop: big_blind,
            }
        } else {
            let small_blind = next_dealt(button);
            let big_blind = next_dealt(small_blind);
            Self {
                button,
                small_blind,
                big_blind,
                first_preflop: next_dealt(big_blind),
                first_postflop: (button + 1) % n,
            }
        }
    }
}

/// What a seat took home at the end of the hand. Uncontested awards carry
/// no evaluation since no cards were shown.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Payout {
    pub seat: SeatIndex,
    pub amount_won: Usd,
    pub evaluation: Option<HandEvaluation>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SeatView {
    pub name: Username,
    pub is_human: bool,
    pub chips: Usd,
    pub cards: Vec<Card>,
    pub amount_in_pot: Usd,
    pub total_committed: Usd,
    pub folded: bool,
    pub all_in: bool,
    pub last_action: Option<Action>,
}

/// Snapshot of a hand handed back to the orchestrator after every
/// operation.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GameState {
    pub hand_id: Uuid,
    pub phase: Phase,
    pub betting_round: Street,
    pub community_cards: Vec<Card>,
    /// Main pot. Zero once the hand is complete: the chips are back in
    /// the winners' stacks and listed in the payouts, while each seat's
    /// `total_committed` still records what it put in.
    pub pot: Usd,
    pub side_pots: Vec<SidePot>,
    pub current_bet: Usd,
    pub min_raise: Usd,
    pub blinds: Blinds,
    pub positions: PlayPositions,
    pub active_seat: Option<SeatIndex>,
    pub seats: Vec<SeatView>,
    /// Live hands were turned face up. False for a hand won uncontested.
    pub showdown: bool,
}

impl GameState {
    /// Chips on the table: every stack plus every pot.
    #[must_use]
    pub fn chips_in_play(&self) -> Usd {
        let stacks: Usd = self.seats.iter().map(|s| s.chips).sum();
        let side: Usd = self.side_pots.iter().map(|p| p.amount).sum();
        stacks + self.pot + side
    }

    /// The view one seat is entitled to: other seats' hole cards stay
    /// hidden until they're shown down.
    #[must_use]
    pub fn redacted_for(&self, viewer: SeatIndex) -> Self {
        let mut view = self.clone();
        for (seat, seat_view) in view.seats.iter_mut().enumerate() {
            let visible = seat == viewer || (self.showdown && !seat_view.folded);
            if !visible {
                seat_view.cards.clear();
            }
        }
        view
    }
}

/// One hand of Texas Hold'em from blinds to payout.
#[derive(Debug)]
pub struct Hand {
    id: Uuid,
    players: Vec<Player>,
    deck: Deck,
    board: Vec<Card>,
    burned: Vec<Card>,
    ledger: PotLedger,
    blinds: Blinds,
    positions: PlayPositions,
    phase: Phase,
    street: Street,
    current_bet: Usd,
    last_full_raise: Usd,
    active: Option<SeatIndex>,
    // Seat from which the next pending actor is searched.
    cursor: SeatIndex,
    payouts: Vec<Payout>,
}

impl Hand {
    /// Start a hand: sit out broke seats, post blinds, deal hole cards and
    /// position the action on the first actor.
    ///
    /// # Arguments
    ///
    /// * `players` - Seats in clockwise order; each keeps its stack in `user.money`
    /// * `button` - Index of the button seat within `players`
    /// * `blinds` - Small and big blind sizes
    /// * `deck` - Shuffled deck this hand draws from
    ///
    /// # Errors
    ///
    /// Nothing is mutated when the seat count, button, blinds or deck size
    /// are invalid.
    pub fn start(
        mut players: Vec<Player>,
        button: SeatIndex,
        blinds: Blinds,
        deck: Deck,
    ) -> Result<Self, GameError> {
        if players.len() > MAX_PLAYERS {
            return Err(GameError::CapacityReached);
        }
        let funded = players.iter().filter(|p| p.user.money > 0).count();
        if funded < 2 {
            return Err(GameError::InsufficientSeats { funded });
        }
        if button >= players.len() {
            return Err(GameError::InvalidSeat(button));
        }
        if !blinds.is_valid() {
            return Err(GameError::InvalidBlinds);
        }
        if deck.remaining() < funded * HOLE_CARDS + BOARD_CARDS + BURN_CARDS {
            return Err(GameError::DeckExhausted);
        }

        for player in &mut players {
            player.reset();
            if player.user.money == 0 {
                player.folded = true;
            }
        }
        let positions = PlayPositions::compute(&players, button);
        let num_seats = players.len();

        let mut hand = Self {
            id: Uuid::new_v4(),
            players,
            deck,
            board: Vec::with_capacity(BOARD_CARDS),
            burned: Vec::with_capacity(BURN_CARDS),
            ledger: PotLedger::new(num_seats),
            blinds,
            positions,
            phase: Phase::Preflop,
            street: Street::Preflop,
            current_bet: blinds.big,
            last_full_raise: blinds.big,
            active: None,
            cursor: positions.first_preflop,
            payouts: Vec::new(),
        };
        hand.post_blind(positions.small_blind, blinds.small);
        hand.post_blind(positions.big_blind, blinds.big);
        hand.deal_hole_cards()?;

        info!(
            "hand {} started: {funded} seats, button {button}, blinds {blinds}",
            hand.id
        );
        hand.advance()?;
        Ok(hand)
    }

    fn post_blind(&mut self, seat: SeatIndex, amount: Usd) {
        let moved = self.players[seat].commit(amount);
        self.ledger.commit(seat, moved);
    }

    fn deal_hole_cards(&mut self) -> Result<(), GameError> {
        let n = self.players.len();
        for _ in 0..HOLE_CARDS {
            for k in 1..=n {
                let seat = (self.positions.button + k) % n;
                if !self.players[seat].folded {
                    let card = self.deck.draw()?;
                    self.players[seat].cards.push(card);
                }
            }
        }
        Ok(())
    }

    // === Queries ===

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn street(&self) -> Street {
        self.street
    }

    #[must_use]
    pub fn active_seat(&self) -> Option<SeatIndex> {
        self.active
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    #[must_use]
    pub fn blinds(&self) -> Blinds {
        self.blinds
    }

    #[must_use]
    pub fn positions(&self) -> PlayPositions {
        self.positions
    }

    #[must_use]
    pub fn current_bet(&self) -> Usd {
        self.current_bet
    }

    /// Smallest legal raise increment: the big blind or the last full
    /// raise, whichever is larger.
    #[must_use]
    pub fn min_raise(&self) -> Usd {
        self.last_full_raise.max(self.blinds.big)
    }

    /// Chips the seat still owes to match the current bet.
    #[must_use]
    pub fn to_call(&self, seat: SeatIndex) -> Usd {
        self.players
            .get(seat)
            .map_or(0, |p| self.current_bet.saturating_sub(p.amount_in_pot))
    }

    /// Chips in the pot right now across the main and side pots.
    #[must_use]
    pub fn pot_total(&self) -> Usd {
        self.ledger.total()
    }

    #[must_use]
    pub fn payouts(&self) -> &[Payout] {
        &self.payouts
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Every seat still able to act has acted this round and matched the
    /// current bet.
    #[must_use]
    pub fn is_betting_round_complete(&self) -> bool {
        self.players
            .iter()
            .filter(|p| p.can_act())
            .all(|p| p.last_action.is_some() && p.amount_in_pot == self.current_bet)
    }

    /// Whether `action` would be accepted from `seat` right now.
    #[must_use]
    pub fn is_legal(&self, seat: SeatIndex, action: &Action) -> bool {
        self.validate(seat, action).is_ok()
    }

    /// Legal options for the seat to act, or `None` if it isn't their turn.
    #[must_use]
    pub fn action_choices(&self, seat: SeatIndex) -> Option<ActionChoices> {
        if self.active != Some(seat) {
            return None;
        }
        let player = self.players.get(seat)?;
        let to_call = self.to_call(seat);
        let max_to = player.amount_in_pot + player.user.money;

        let raise_range = if self.current_bet == 0 {
            (player.user.money > 0).then(|| RaiseRange {
                opens: true,
                min_to: self.min_raise().min(max_to),
                max_to,
            })
        } else if player.raise_option && max_to > self.current_bet {
            Some(RaiseRange {
                opens: false,
                min_to: (self.current_bet + self.min_raise()).min(max_to),
                max_to,
            })
        } else {
            None
        };

        Some(ActionChoices {
            to_call,
            call_amount: to_call.min(player.user.money),
            can_check: to_call == 0,
            raise_range,
        })
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        let folded: Vec<bool> = self.players.iter().map(|p| p.folded).collect();
        let all_in: Vec<bool> = self.players.iter().map(|p| p.all_in).collect();
        let mut pots = self.ledger.pots(&folded, &all_in).into_iter();
        let pot = pots.next().map_or(0, |p| p.amount);

        GameState {
            hand_id: self.id,
            phase: self.phase,
            betting_round: self.street,
            community_cards: self.board.clone(),
            pot,
            side_pots: pots.collect(),
            current_bet: self.current_bet,
            min_raise: self.min_raise(),
            blinds: self.blinds,
            positions: self.positions,
            active_seat: self.active,
            seats: self
                .players
                .iter()
                .map(|p| SeatView {
                    name: p.user.name.clone(),
                    is_human: p.is_human,
                    chips: p.user.money,
                    cards: p.cards.clone(),
                    amount_in_pot: p.amount_in_pot,
                    total_committed: p.total_committed,
                    folded: p.folded,
                    all_in: p.all_in,
                    last_action: p.last_action,
                })
                .collect(),
            showdown: self.phase == Phase::Showdown
                || self.payouts.iter().any(|p| p.evaluation.is_some()),
        }
    }

    /// Hand the seats and deck back once the hand is over.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Player>, Deck) {
        (self.players, self.deck)
    }

    // === Operations ===

    /// Apply a seat's action and advance the hand as far as it can go
    /// without another decision.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IllegalAction`] or [`GameError::OutOfTurn`]
    /// without touching the hand when the action breaks the betting rules.
    pub fn submit_action(&mut self, seat: SeatIndex, action: Action) -> Result<GameState, GameError> {
        self.validate(seat, &action)?;
        self.apply(seat, action);
        debug!("{} {action}", self.players[seat].user.name);
        self.cursor = (seat + 1) % self.players.len();
        self.advance()?;
        Ok(self.state())
    }

    /// Fold a seat immediately, whether or not it's their turn. Used when a
    /// player leaves or times out.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown seats or a completed hand.
    pub fn force_fold(&mut self, seat: SeatIndex) -> Result<GameState, GameError> {
        if seat >= self.players.len() {
            return Err(GameError::InvalidSeat(seat));
        }
        if self.phase == Phase::Complete {
            return Err(GameError::HandComplete);
        }
        let player = &mut self.players[seat];
        if player.folded {
            return Ok(self.state());
        }
        player.folded = true;
        player.last_action = Some(Action::Fold);
        player.raise_option = false;
        info!("{} forced to fold", player.user.name);

        if self.active == Some(seat) {
            self.cursor = (seat + 1) % self.players.len();
        }
        self.advance()?;
        Ok(self.state())
    }

    /// Score the live hands, split every pot and pay the winners.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotAtShowdown`] unless the hand is at showdown.
    pub fn resolve_showdown(&mut self) -> Result<Vec<Payout>, GameError> {
        if self.phase != Phase::Showdown {
            return Err(GameError::NotAtShowdown);
        }

        let mut evaluations: BTreeMap<SeatIndex, HandEvaluation> = BTreeMap::new();
        for (seat, player) in self.players.iter().enumerate().filter(|(_, p)| p.is_live()) {
            let mut cards = player.cards.clone();
            cards.extend_from_slice(&self.board);
            evaluations.insert(seat, evaluate(&cards)?);
        }

        let folded: Vec<bool> = self.players.iter().map(|p| p.folded).collect();
        let all_in: Vec<bool> = self.players.iter().map(|p| p.all_in).collect();
        let pots = self.ledger.pots(&folded, &all_in);
        let winnings = self
            .ledger
            .award(&pots, &evaluations, self.positions.button);

        for (&seat, &amount) in &winnings {
            self.players[seat].user.money += amount;
        }
        self.ledger.settle();

        self.payouts = evaluations
            .into_iter()
            .map(|(seat, evaluation)| Payout {
                seat,
                amount_won: winnings.get(&seat).copied().unwrap_or(0),
                evaluation: Some(evaluation),
            })
            .collect();
        for payout in self.payouts.iter().filter(|p| p.amount_won > 0) {
            info!(
                "{} wins ${} at showdown",
                self.players[payout.seat].user.name, payout.amount_won
            );
        }
        self.phase = Phase::Complete;
        Ok(self.payouts.clone())
    }

    /// Check an action against the betting rules without applying it.
    ///
    /// # Errors
    ///
    /// The same error [`Hand::submit_action`] would return.
    pub fn validate(&self, seat: SeatIndex, action: &Action) -> Result<(), GameError> {
        if self.phase == Phase::Complete {
            return Err(GameError::HandComplete);
        }
        let player = self.players.get(seat).ok_or(GameError::InvalidSeat(seat))?;
        if self.active != Some(seat) {
            return Err(GameError::OutOfTurn { seat });
        }
        let illegal = |reason| {
            Err(GameError::IllegalAction {
                seat,
                action: *action,
                reason,
            })
        };
        let to_call = self.to_call(seat);

        match *action {
            Action::Fold => Ok(()),
            Action::Check if to_call > 0 => illegal(ActionReason::FacingBet),
            Action::Check => Ok(()),
            Action::Call if to_call == 0 => illegal(ActionReason::NothingToCall),
            Action::Call => Ok(()),
            Action::Bet(_) if self.current_bet > 0 => illegal(ActionReason::BetAlreadyOpen),
            Action::Raise(_) if self.current_bet == 0 => illegal(ActionReason::NoBetToRaise),
            Action::Raise(_) if !player.raise_option => illegal(ActionReason::ActionNotReopened),
            Action::Bet(to) | Action::Raise(to) => {
                if to == 0 {
                    return illegal(ActionReason::ZeroAmount);
                }
                if to <= self.current_bet || to < player.amount_in_pot {
                    return illegal(ActionReason::BelowMinimumRaise);
                }
                let needed = to - player.amount_in_pot;
                if needed > player.user.money {
                    return illegal(ActionReason::ExceedsStack);
                }
                let all_in = needed == player.user.money;
                if to < self.current_bet + self.min_raise() && !all_in {
                    return illegal(ActionReason::BelowMinimumRaise);
                }
                Ok(())
            }
        }
    }

    // === Internals ===

    fn apply(&mut self, seat: SeatIndex, action: Action) {
        match action {
            Action::Fold => self.players[seat].folded = true,
            Action::Check => {}
            Action::Call => {
                let owed = self.to_call(seat);
                let moved = self.players[seat].commit(owed);
                self.ledger.commit(seat, moved);
            }
            Action::Bet(to) | Action::Raise(to) => {
                let needed = to - self.players[seat].amount_in_pot;
                let moved = self.players[seat].commit(needed);
                self.ledger.commit(seat, moved);

                let min_raise = self.min_raise();
                // Reopen for every seat now facing at least a full raise
                // over what it matched. Stacked short all-ins add up.
                for (other, player) in self.players.iter_mut().enumerate() {
                    if other != seat
                        && player.can_act()
                        && to.saturating_sub(player.amount_in_pot) >= min_raise
                    {
                        player.raise_option = true;
                    }
                }
                let increment = to - self.current_bet;
                if increment >= min_raise {
                    self.last_full_raise = increment;
                }
                self.current_bet = to;
            }
        }
        let player = &mut self.players[seat];
        player.last_action = Some(action);
        player.raise_option = false;
    }

    /// Next seat that still owes a decision this round, searching clockwise
    /// from the cursor.
    fn next_pending_actor(&self) -> Option<SeatIndex> {
        let n = self.players.len();
        let can_act: Vec<SeatIndex> = (0..n).filter(|&s| self.players[s].can_act()).collect();
        match can_act.as_slice() {
            [] => return None,
            // Nobody left to bet against; only an unmatched bet needs an answer.
            [only] if self.players[*only].amount_in_pot >= self.current_bet => return None,
            _ => {}
        }
        (0..n).map(|k| (self.cursor + k) % n).find(|&seat| {
            let player = &self.players[seat];
            player.can_act()
                && (player.last_action.is_none() || player.amount_in_pot < self.current_bet)
        })
    }

    /// Move the hand forward until a seat must decide or the hand reaches
    /// showdown or completes.
    fn advance(&mut self) -> Result<(), GameError> {
        loop {
            if self.phase == Phase::Complete {
                self.active = None;
                return Ok(());
            }
            let live: Vec<SeatIndex> = (0..self.players.len())
                .filter(|&s| self.players[s].is_live())
                .collect();
            if let [winner] = live.as_slice() {
                self.award_uncontested(*winner);
                return Ok(());
            }
            if self.phase == Phase::Showdown {
                self.active = None;
                return Ok(());
            }
            if let Some(seat) = self.next_pending_actor() {
                self.active = Some(seat);
                self.cursor = seat;
                return Ok(());
            }
            self.active = None;
            self.next_street()?;
        }
    }

    fn burn_and_reveal(&mut self, count: usize) -> Result<(), GameError> {
        let burn = self.deck.draw()?;
        self.burned.push(burn);
        for _ in 0..count {
            let card = self.deck.draw()?;
            self.board.push(card);
        }
        Ok(())
    }

    fn next_street(&mut self) -> Result<(), GameError> {
        let (phase, street, reveal) = match self.phase {
            Phase::Preflop => (Phase::Flop, Street::Flop, 3),
            Phase::Flop => (Phase::Turn, Street::Turn, 1),
            Phase::Turn => (Phase::River, Street::River, 1),
            Phase::River => {
                self.phase = Phase::Showdown;
                debug!("hand {} to showdown", self.id);
                return Ok(());
            }
            Phase::Showdown | Phase::Complete => return Ok(()),
        };
        self.burn_and_reveal(reveal)?;
        self.phase = phase;
        self.street = street;

        for player in &mut self.players {
            player.amount_in_pot = 0;
            if !player.folded {
                player.last_action = None;
                player.raise_option = true;
            }
        }
        self.current_bet = 0;
        self.last_full_raise = self.blinds.big;
        self.cursor = self.positions.first_postflop;

        let board: Vec<String> = self.board.iter().map(ToString::to_string).collect();
        debug!("hand {} {street}:{}", self.id, board.join(""));
        Ok(())
    }

    fn award_uncontested(&mut self, seat: SeatIndex) {
        let amount = self.ledger.total();
        self.players[seat].user.money += amount;
        self.ledger.settle();
        self.payouts = vec![Payout {
            seat,
            amount_won: amount,
            evaluation: None,
        }];
        self.phase = Phase::Complete;
        self.active = None;
        info!(
            "{} wins ${amount} uncontested",
            self.players[seat].user.name
        );
    }
}
