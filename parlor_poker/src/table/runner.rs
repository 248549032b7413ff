//! One table: seating, the hand lifecycle and settling chips with the
//! wallet.

use log::{debug, info, warn};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    config::TableConfig,
    controller::{Controller, Decision, SeatController},
    errors::TableError,
    stats::PlayerStats,
};
use crate::{
    bot::{BotDecisionContext, Position},
    game::{
        GameState, Hand, Payout, Phase,
        entities::{Action, ActionChoices, Deck, Player, SeatIndex, Usd, User, Username},
    },
    wallet::WalletManager,
};

/// A seated player between hands. During a hand the hand owns the live
/// stack and `user.money` is refreshed when it ends.
#[derive(Debug)]
pub struct TableSeat {
    pub user: User,
    pub controller: Controller,
    pub stats: PlayerStats,
    leaving: bool,
}

impl TableSeat {
    /// Asked to leave during a hand; removed once it ends.
    #[must_use]
    pub fn is_leaving(&self) -> bool {
        self.leaving
    }
}

/// A seat that left the table when a hand ended.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Departure {
    pub name: Username,
    /// Chips moved back to the wallet; zero for a bust.
    pub cashed_out: Usd,
    pub stats: PlayerStats,
}

/// What happened to a finished hand, with seats named rather than indexed.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HandSummary {
    pub hand_id: Uuid,
    pub payouts: Vec<Payout>,
    /// Every seat that collected chips and how many.
    pub winners: Vec<(Username, Usd)>,
    pub showdown: bool,
    /// Seats that left or busted.
    pub departed: Vec<Departure>,
}

/// Returned by [`Table::run`] whenever control goes back to the caller.
#[derive(Clone, Debug)]
pub enum TableEvent {
    /// A human seat must act through [`Table::submit_action`].
    AwaitingAction {
        seat: SeatIndex,
        name: Username,
        choices: ActionChoices,
    },
    ShowdownResolved(Vec<Payout>),
    HandComplete(HandSummary),
}

/// A single cash-game table.
#[derive(Debug)]
pub struct Table {
    config: TableConfig,
    wallet: WalletManager,
    seats: Vec<TableSeat>,
    button: SeatIndex,
    hand: Option<Hand>,
    hands_played: u64,
    rng: StdRng,
}

impl Table {
    /// Open a table.
    ///
    /// # Errors
    ///
    /// * `TableError::InvalidConfig` - The config fails validation
    pub fn new(config: TableConfig, wallet: WalletManager) -> Result<Self, TableError> {
        Self::build(config, wallet, StdRng::from_os_rng())
    }

    /// Open a table whose shuffles are reproducible.
    ///
    /// # Errors
    ///
    /// * `TableError::InvalidConfig` - The config fails validation
    pub fn with_seed(config: TableConfig, wallet: WalletManager, seed: u64) -> Result<Self, TableError> {
        Self::build(config, wallet, StdRng::seed_from_u64(seed))
    }

    fn build(config: TableConfig, wallet: WalletManager, rng: StdRng) -> Result<Self, TableError> {
        config.validate()?;
        info!("table {} open at {}", config.name, config.stakes);
        Ok(Self {
            seats: Vec::with_capacity(config.max_players),
            config,
            wallet,
            button: 0,
            hand: None,
            hands_played: 0,
            rng,
        })
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    #[must_use]
    pub fn wallet(&self) -> &WalletManager {
        &self.wallet
    }

    pub fn wallet_mut(&mut self) -> &mut WalletManager {
        &mut self.wallet
    }

    #[must_use]
    pub fn seats(&self) -> &[TableSeat] {
        &self.seats
    }

    #[must_use]
    pub fn seat_of(&self, name: &Username) -> Option<SeatIndex> {
        self.seats.iter().position(|seat| &seat.user.name == name)
    }

    #[must_use]
    pub fn stats(&self, name: &str) -> Option<&PlayerStats> {
        let name = Username::new(name);
        self.seats
            .iter()
            .find(|seat| seat.user.name == name)
            .map(|seat| &seat.stats)
    }

    #[must_use]
    pub fn button(&self) -> SeatIndex {
        self.button
    }

    #[must_use]
    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    #[must_use]
    pub fn hand(&self) -> Option<&Hand> {
        self.hand.as_ref()
    }

    /// Snapshot of the hand in progress.
    #[must_use]
    pub fn state(&self) -> Option<GameState> {
        self.hand.as_ref().map(Hand::state)
    }

    /// Seats with chips to play.
    #[must_use]
    pub fn funded_seats(&self) -> usize {
        self.seats.iter().filter(|seat| seat.user.money > 0).count()
    }

    /// Every chip at the table: stacks plus pots of the hand in progress.
    #[must_use]
    pub fn chips_on_table(&self) -> Usd {
        match &self.hand {
            Some(hand) => {
                let in_hand = hand.players().len();
                let late_joiners: Usd = self.seats.iter().skip(in_hand).map(|s| s.user.money).sum();
                hand.state().chips_in_play() + late_joiners
            }
            None => self.seats.iter().map(|seat| seat.user.money).sum(),
        }
    }

    // === Seating ===

    /// Buy in from the player's wallet and take the next seat. Players who
    /// join mid-hand are dealt in from the next hand.
    ///
    /// # Arguments
    ///
    /// * `name` - Player name; also the wallet owner
    /// * `controller` - Human or bot decision source
    ///
    /// # Returns
    ///
    /// * `Result<SeatIndex, TableError>` - The new seat
    ///
    /// # Errors
    ///
    /// Nothing changes when the name is seated, the table is full or the
    /// wallet can't cover the buy-in.
    pub fn join(&mut self, name: &str, controller: Controller) -> Result<SeatIndex, TableError> {
        let username = Username::new(name);
        if self.seat_of(&username).is_some() {
            return Err(TableError::SeatTaken(username));
        }
        if self.seats.len() >= self.config.max_players {
            return Err(TableError::TableFull);
        }

        let buy_in = self.config.stakes.buy_in;
        let key = self.idempotency_key("buy-in", &username);
        self.wallet
            .transfer_to_table(&username, &self.config.name, buy_in, key)?;

        info!("{username} joined {} with ${buy_in}", self.config.name);
        self.seats.push(TableSeat {
            user: User {
                name: username,
                money: buy_in,
            },
            controller,
            stats: PlayerStats::default(),
            leaving: false,
        });
        Ok(self.seats.len() - 1)
    }

    /// Leave the table. Outside a hand the stack is cashed out right away.
    /// A player in the hand is folded at once and cashed out when the hand
    /// ends.
    ///
    /// # Returns
    ///
    /// * `Result<Usd, TableError>` - Chips cashed out now (zero when deferred)
    ///
    /// # Errors
    ///
    /// * `TableError::UnknownPlayer` - Name isn't seated
    /// * `TableError::Wallet` - Cash-out failed; the player stays seated
    pub fn leave(&mut self, name: &str) -> Result<Usd, TableError> {
        let username = Username::new(name);
        let seat = self
            .seat_of(&username)
            .ok_or_else(|| TableError::UnknownPlayer(username.clone()))?;

        if let Some(hand) = self.hand.as_mut() {
            if seat < hand.players().len() {
                if !hand.is_complete() {
                    hand.force_fold(seat)?;
                }
                self.seats[seat].leaving = true;
                info!("{username} leaves after this hand");
                return Ok(0);
            }
        }

        let user = self.seats[seat].user.clone();
        let cashed = self.cash_out(&user)?;
        self.seats.remove(seat);
        if seat < self.button {
            self.button -= 1;
        }
        if self.button >= self.seats.len() {
            self.button = 0;
        }
        info!("{username} left {} with ${cashed}", self.config.name);
        Ok(cashed)
    }

    /// Queue an action for a human seat to be played when its turn comes.
    ///
    /// # Errors
    ///
    /// * `TableError::UnknownPlayer` - Name isn't seated
    /// * `TableError::NotHuman` - Seat is a bot
    pub fn queue_action(&mut self, name: &str, action: Action) -> Result<(), TableError> {
        let username = Username::new(name);
        let seat = self
            .seat_of(&username)
            .ok_or_else(|| TableError::UnknownPlayer(username.clone()))?;
        match &mut self.seats[seat].controller {
            Controller::Human(human) => {
                human.queue(action);
                Ok(())
            }
            Controller::Bot(_) => Err(TableError::NotHuman(username)),
        }
    }

    // === Hand lifecycle ===

    /// Deal a new hand from a fresh shuffle.
    ///
    /// # Errors
    ///
    /// * `TableError::HandInProgress` - The previous hand hasn't finished
    /// * `TableError::Game` - Fewer than two funded seats
    pub fn start_hand(&mut self) -> Result<GameState, TableError> {
        if self.hand.is_some() {
            return Err(TableError::HandInProgress);
        }
        let deck = Deck::shuffled(self.config.deck_sets, &mut self.rng);
        self.start_hand_with(deck)
    }

    /// Deal a new hand from the given deck, top card first. Used to replay
    /// hands.
    ///
    /// # Errors
    ///
    /// Same as [`Table::start_hand`], plus `GameError::DeckExhausted` for a
    /// short deck.
    pub fn start_hand_with(&mut self, deck: Deck) -> Result<GameState, TableError> {
        if self.hand.is_some() {
            return Err(TableError::HandInProgress);
        }
        if self.button >= self.seats.len() {
            self.button = 0;
        }
        let players: Vec<Player> = self
            .seats
            .iter()
            .map(|seat| Player::new(seat.user.clone(), seat.controller.is_human()))
            .collect();
        let hand = Hand::start(players, self.button, self.config.stakes.blinds, deck)?;
        let state = hand.state();
        self.hand = Some(hand);
        Ok(state)
    }

    /// Apply a human player's action.
    ///
    /// # Errors
    ///
    /// The action is checked against the betting rules before anything
    /// changes; a rejected action is returned as `TableError::Game`.
    pub fn submit_action(&mut self, name: &str, action: Action) -> Result<GameState, TableError> {
        let username = Username::new(name);
        let seat = self
            .seat_of(&username)
            .ok_or_else(|| TableError::UnknownPlayer(username.clone()))?;
        if !self.seats[seat].controller.is_human() {
            return Err(TableError::NotHuman(username));
        }
        let hand = self.hand.as_ref().ok_or(TableError::NoHandInProgress)?;
        if let Err(error) = hand.validate(seat, &action) {
            warn!("rejected {username} {action}: {error}");
            return Err(error.into());
        }
        self.apply(seat, action)
    }

    /// Fold the seat whose turn it is. The caller decides when a player
    /// has taken too long.
    ///
    /// # Errors
    ///
    /// * `TableError::NoHandInProgress` - No hand to act in
    pub fn timeout_active(&mut self) -> Result<GameState, TableError> {
        let hand = self.hand.as_mut().ok_or(TableError::NoHandInProgress)?;
        let Some(seat) = hand.active_seat() else {
            return Ok(hand.state());
        };
        info!("{} timed out", hand.players()[seat].user.name);
        Ok(hand.force_fold(seat)?)
    }

    /// Drive the hand until a human has to act, the showdown is resolved
    /// or the hand is settled.
    ///
    /// Bots act in turn. A policy failure, or a bot action the rules
    /// reject, folds the bot. Queued human actions are played when legal
    /// and discarded otherwise.
    ///
    /// # Errors
    ///
    /// * `TableError::NoHandInProgress` - Call [`Table::start_hand`] first
    pub fn run(&mut self) -> Result<TableEvent, TableError> {
        loop {
            let hand = self.hand.as_mut().ok_or(TableError::NoHandInProgress)?;
            match hand.phase() {
                Phase::Showdown => return Ok(TableEvent::ShowdownResolved(hand.resolve_showdown()?)),
                Phase::Complete => return self.finish_hand().map(TableEvent::HandComplete),
                _ => {}
            }

            let Some(seat) = hand.active_seat() else {
                return Err(TableError::Stalled(hand.phase()));
            };
            let choices = hand
                .action_choices(seat)
                .ok_or(TableError::Stalled(hand.phase()))?;
            let players = hand.players();
            let live = players.iter().filter(|p| p.is_live()).count();
            let ctx = BotDecisionContext {
                hole_cards: &players[seat].cards,
                board_cards: hand.board(),
                pot_size: hand.pot_total(),
                current_bet: hand.current_bet(),
                choices: Some(choices),
                position: Position::from_seats(seat, hand.positions().button, players.len()),
                opponents: live.saturating_sub(1),
            };
            let table_seat = &mut self.seats[seat];
            let name = table_seat.user.name.clone();
            let is_human = table_seat.controller.is_human();
            let decision = table_seat.controller.decide(&ctx);

            let action = match decision {
                Decision::Wait => {
                    return Ok(TableEvent::AwaitingAction { seat, name, choices });
                }
                Decision::Failed(error) => {
                    warn!("{name} policy failed ({error}), folding");
                    Action::Fold
                }
                Decision::Act(action) => match hand.validate(seat, &action) {
                    Ok(()) => action,
                    Err(error) if is_human => {
                        warn!("discarding queued {action} from {name}: {error}");
                        return Ok(TableEvent::AwaitingAction { seat, name, choices });
                    }
                    Err(error) => {
                        warn!("{name} chose an illegal action ({error}), folding");
                        Action::Fold
                    }
                },
            };
            if !is_human {
                debug!("bot {name} at seat {seat} {action}");
            }
            self.apply(seat, action)?;
        }
    }

    fn apply(&mut self, seat: SeatIndex, action: Action) -> Result<GameState, TableError> {
        let hand = self.hand.as_mut().ok_or(TableError::NoHandInProgress)?;
        let street = hand.street();
        let state = hand.submit_action(seat, action)?;
        if let Some(table_seat) = self.seats.get_mut(seat) {
            table_seat.stats.record_action(street, &action);
        }
        Ok(state)
    }

    /// Return chips to seats, update stats, drop busted and departing
    /// seats and move the button.
    fn finish_hand(&mut self) -> Result<HandSummary, TableError> {
        let hand = self.hand.take().ok_or(TableError::NoHandInProgress)?;
        let hand_id = hand.id();
        let payouts = hand.payouts().to_vec();
        let showdown = payouts.iter().any(|p| p.evaluation.is_some());
        let (players, _) = hand.into_parts();

        let mut winners = Vec::new();
        for (idx, player) in players.into_iter().enumerate() {
            let Some(seat) = self.seats.get_mut(idx) else {
                continue;
            };
            let won: Usd = payouts
                .iter()
                .filter(|p| p.seat == idx)
                .map(|p| p.amount_won)
                .sum();
            seat.user.money = player.user.money;
            if !player.cards.is_empty() {
                seat.stats
                    .record_hand(u64::from(won), showdown && player.is_live());
            }
            if won > 0 {
                winners.push((seat.user.name.clone(), won));
            }
        }

        let stays = |seat: &TableSeat| !seat.leaving && seat.user.money > 0;
        let n = self.seats.len();
        let next_button = (1..=n)
            .map(|k| (self.button + k) % n)
            .find(|&idx| stays(&self.seats[idx]))
            .map(|idx| self.seats[idx].user.name.clone());

        let mut departed = Vec::new();
        let mut kept = Vec::with_capacity(n);
        for seat in std::mem::take(&mut self.seats) {
            if stays(&seat) {
                kept.push(seat);
                continue;
            }
            if seat.user.money == 0 {
                info!("{} busted", seat.user.name);
            }
            match self.cash_out(&seat.user) {
                Ok(cashed_out) => departed.push(Departure {
                    name: seat.user.name,
                    cashed_out,
                    stats: seat.stats,
                }),
                Err(error) => {
                    warn!("cash-out for {} failed: {error}", seat.user.name);
                    kept.push(seat);
                }
            }
        }
        self.seats = kept;
        self.button = next_button
            .and_then(|name| self.seat_of(&name))
            .unwrap_or(0);
        self.hands_played += 1;

        info!(
            "hand {hand_id} complete, {} seats remain",
            self.seats.len()
        );
        Ok(HandSummary {
            hand_id,
            payouts,
            winners,
            showdown,
            departed,
        })
    }

    fn cash_out(&mut self, user: &User) -> Result<Usd, TableError> {
        if user.money == 0 {
            return Ok(0);
        }
        let key = self.idempotency_key("cash-out", &user.name);
        self.wallet
            .transfer_from_table(&user.name, &self.config.name, user.money, key)?;
        Ok(user.money)
    }

    fn idempotency_key(&self, kind: &str, user: &Username) -> String {
        format!("{kind}:{}:{user}:{}", self.config.name, Uuid::new_v4())
    }
}
