//! Table-wide limits shared by the engine and the orchestrator.

/// Maximum number of seats dealt into a single hand.
pub const MAX_PLAYERS: usize = 10;

/// Hole cards dealt to each funded seat.
pub const HOLE_CARDS: usize = 2;

/// Community cards on a complete board.
pub const BOARD_CARDS: usize = 5;

/// Burn cards drawn over a hand (one before each of flop, turn and river).
pub const BURN_CARDS: usize = 3;

/// Cards in one standard deck.
pub const CARDS_PER_SET: usize = 52;

/// Longest display name accepted for a seat.
pub const MAX_USERNAME_LENGTH: usize = 16;
