//! Per-player statistics accumulated across hands.

use serde::{Deserialize, Serialize};

use crate::game::{Street, entities::Action};

/// Player statistics tracker
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PlayerStats {
    /// Hands dealt in
    pub hands_played: u32,

    /// Hands where the player took at least one pot
    pub hands_won: u32,

    /// Times voluntarily put money in pot preflop
    pub vpip_count: u32,

    /// Times raised pre-flop
    pub pfr_count: u32,

    /// Times went to showdown
    pub showdown_count: u32,

    /// Total bets/raises made
    pub aggressive_actions: u32,

    /// Total calls made
    pub passive_actions: u32,

    /// Chips collected from pots, before subtracting what was put in
    pub total_winnings: u64,

    /// Largest single-hand collection
    pub biggest_pot: u64,

    // Flags for the hand in progress.
    #[serde(skip)]
    voluntary: bool,
    #[serde(skip)]
    raised_preflop: bool,
}

impl PlayerStats {
    /// Record one voluntary action. Blinds aren't actions and never count
    /// toward VPIP.
    pub fn record_action(&mut self, street: Street, action: &Action) {
        match action {
            Action::Call => self.passive_actions += 1,
            Action::Bet(_) | Action::Raise(_) => self.aggressive_actions += 1,
            Action::Fold | Action::Check => {}
        }
        if street == Street::Preflop {
            if matches!(action, Action::Call | Action::Bet(_) | Action::Raise(_)) {
                self.voluntary = true;
            }
            if action.is_aggressive() {
                self.raised_preflop = true;
            }
        }
    }

    /// Close out a hand the player was dealt into.
    ///
    /// # Arguments
    ///
    /// * `amount_won` - Chips collected this hand (zero when nothing was won)
    /// * `showed_down` - Whether the player's cards were shown at showdown
    pub fn record_hand(&mut self, amount_won: u64, showed_down: bool) {
        self.hands_played += 1;
        if amount_won > 0 {
            self.hands_won += 1;
            self.total_winnings += amount_won;
            self.biggest_pot = self.biggest_pot.max(amount_won);
        }
        if showed_down {
            self.showdown_count += 1;
        }
        if self.voluntary {
            self.vpip_count += 1;
        }
        if self.raised_preflop {
            self.pfr_count += 1;
        }
        self.voluntary = false;
        self.raised_preflop = false;
    }

    /// Calculate VPIP percentage
    #[must_use]
    pub fn vpip(&self) -> f32 {
        if self.hands_played == 0 {
            0.0
        } else {
            self.vpip_count as f32 / self.hands_played as f32
        }
    }

    /// Calculate PFR percentage
    #[must_use]
    pub fn pfr(&self) -> f32 {
        if self.hands_played == 0 {
            0.0
        } else {
            self.pfr_count as f32 / self.hands_played as f32
        }
    }

    /// Calculate aggression factor
    #[must_use]
    pub fn aggression_factor(&self) -> f32 {
        if self.passive_actions == 0 {
            self.aggressive_actions as f32
        } else {
            self.aggressive_actions as f32 / self.passive_actions as f32
        }
    }

    #[must_use]
    pub fn showdown_rate(&self) -> f32 {
        if self.hands_played == 0 {
            0.0
        } else {
            self.showdown_count as f32 / self.hands_played as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = PlayerStats::default();
        assert_eq!(stats.vpip(), 0.0);
        assert_eq!(stats.pfr(), 0.0);
        assert_eq!(stats.aggression_factor(), 0.0);
        assert_eq!(stats.showdown_rate(), 0.0);
    }

    #[test]
    fn test_preflop_raise_counts_vpip_and_pfr() {
        let mut stats = PlayerStats::default();
        stats.record_action(Street::Preflop, &Action::Raise(6));
        stats.record_action(Street::Flop, &Action::Call);
        stats.record_hand(30, true);

        stats.record_action(Street::Preflop, &Action::Fold);
        stats.record_hand(0, false);

        assert_eq!(stats.hands_played, 2);
        assert_eq!(stats.hands_won, 1);
        assert_eq!(stats.vpip(), 0.5);
        assert_eq!(stats.pfr(), 0.5);
        assert_eq!(stats.aggression_factor(), 1.0);
        assert_eq!(stats.showdown_rate(), 0.5);
    }

    #[test]
    fn test_postflop_aggression_is_not_pfr() {
        let mut stats = PlayerStats::default();
        stats.record_action(Street::Preflop, &Action::Check);
        stats.record_action(Street::Turn, &Action::Bet(10));
        stats.record_hand(0, false);
        assert_eq!(stats.vpip_count, 0);
        assert_eq!(stats.pfr_count, 0);
        assert_eq!(stats.aggressive_actions, 1);
    }

    #[test]
    fn test_winnings_and_biggest_pot() {
        let mut stats = PlayerStats::default();
        stats.record_hand(40, false);
        stats.record_hand(120, true);
        stats.record_hand(15, false);
        assert_eq!(stats.total_winnings, 175);
        assert_eq!(stats.biggest_pot, 120);
        assert_eq!(stats.hands_won, 3);
    }
}
