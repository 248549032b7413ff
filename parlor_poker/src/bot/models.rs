//! Bot play styles, table positions and the default roster.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::game::entities::SeatIndex;

/// Named play style. Styles only select a row of [`STYLE_PROFILES`]; the
/// decision logic is the same for every style.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum PlayStyle {
    #[default]
    Gto,
    Tight,
    Loose,
    Maniac,
}

impl PlayStyle {
    pub const ALL: [Self; 4] = [Self::Gto, Self::Tight, Self::Loose, Self::Maniac];

    /// Tuning parameters for this style.
    #[must_use]
    pub fn profile(self) -> BotProfile {
        STYLE_PROFILES
            .iter()
            .find(|(style, _)| *style == self)
            .map_or_else(BotProfile::default, |(_, profile)| *profile)
    }
}

impl fmt::Display for PlayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Gto => "GTO",
            Self::Tight => "Tight",
            Self::Loose => "Loose",
            Self::Maniac => "Maniac",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown play style {0:?}")]
pub struct UnknownStyle(pub String);

impl FromStr for PlayStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gto" => Ok(Self::Gto),
            "tight" => Ok(Self::Tight),
            "loose" => Ok(Self::Loose),
            "maniac" => Ok(Self::Maniac),
            _ => Err(UnknownStyle(s.to_string())),
        }
    }
}

/// How a bot plays. Every field is a probability-like knob in `[0, 1]`.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct BotProfile {
    /// Chance of taking the aggressive line when one is available, and a
    /// scale on bet sizing.
    pub aggression: f32,

    /// Multiplies the positional preflop threshold. Lower = more hands
    /// played.
    pub tightness: f32,

    /// Chance of a pure bluff from late position when checked to.
    pub bluff_frequency: f32,
}

impl Default for BotProfile {
    fn default() -> Self {
        STYLE_PROFILES[0].1
    }
}

/// Style table consumed by the decision maker.
pub const STYLE_PROFILES: [(PlayStyle, BotProfile); 4] = [
    (
        PlayStyle::Gto,
        BotProfile {
            aggression: 0.7,
            tightness: 0.6,
            bluff_frequency: 0.25,
        },
    ),
    (
        PlayStyle::Tight,
        BotProfile {
            aggression: 0.5,
            tightness: 0.8,
            bluff_frequency: 0.1,
        },
    ),
    (
        PlayStyle::Loose,
        BotProfile {
            aggression: 0.8,
            tightness: 0.3,
            bluff_frequency: 0.4,
        },
    ),
    (
        PlayStyle::Maniac,
        BotProfile {
            aggression: 0.95,
            tightness: 0.2,
            bluff_frequency: 0.6,
        },
    ),
];

/// Seat position relative to the button.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Position {
    SmallBlind,
    BigBlind,
    UnderTheGun,
    Middle,
    Cutoff,
    Button,
}

impl Position {
    /// Position of `seat` at a table of `num_players` dealt-in seats.
    ///
    /// Heads-up, the button is the small blind. Otherwise the seats between
    /// the big blind and the button split into early (UTG), middle and the
    /// cutoff directly right of the button.
    ///
    /// # Arguments
    ///
    /// * `seat` - Seat being classified
    /// * `button` - Button seat
    /// * `num_players` - Seats dealt into the hand
    #[must_use]
    pub fn from_seats(seat: SeatIndex, button: SeatIndex, num_players: usize) -> Self {
        let n = num_players.max(2);
        let relative = (seat % n + n - button % n + n - 1) % n;
        if n == 2 {
            return if relative == 0 {
                Self::BigBlind
            } else {
                Self::SmallBlind
            };
        }
        if relative == n - 1 {
            return Self::Button;
        }
        match relative {
            0 => Self::SmallBlind,
            1 => Self::BigBlind,
            _ => {
                let k = relative - 2;
                let between = n - 3;
                if k + 1 == between {
                    Self::Cutoff
                } else if k == 0 || k < (between - 1) / 2 {
                    Self::UnderTheGun
                } else {
                    Self::Middle
                }
            }
        }
    }

    /// Minimum preflop strength to continue from this position, before
    /// scaling by tightness.
    #[must_use]
    pub fn preflop_threshold(self) -> f32 {
        match self {
            Self::UnderTheGun => 0.65,
            Self::Middle => 0.55,
            Self::Cutoff => 0.45,
            Self::Button => 0.35,
            Self::SmallBlind => 0.5,
            Self::BigBlind => 0.6,
        }
    }

    #[must_use]
    pub fn is_late(self) -> bool {
        matches!(self, Self::Cutoff | Self::Button)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::SmallBlind => "SB",
            Self::BigBlind => "BB",
            Self::UnderTheGun => "UTG",
            Self::Middle => "MP",
            Self::Cutoff => "CO",
            Self::Button => "BTN",
        };
        write!(f, "{repr}")
    }
}

/// Bot player configuration
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BotConfig {
    /// Bot display name
    pub name: String,

    /// Play style preset
    pub style: PlayStyle,
}

const ROSTER: [(&str, PlayStyle); 8] = [
    ("Alex Chen", PlayStyle::Gto),
    ("Maria Rodriguez", PlayStyle::Tight),
    ("David Kim", PlayStyle::Loose),
    ("Sarah Johnson", PlayStyle::Gto),
    ("Mike Thompson", PlayStyle::Gto),
    ("Lisa Wang", PlayStyle::Maniac),
    ("Chris Brown", PlayStyle::Tight),
    ("Emma Davis", PlayStyle::Gto),
];

/// The first `count` bots of the default roster. Bots past the named eight
/// are called "Bot N" and play GTO.
#[must_use]
pub fn roster(count: usize) -> Vec<BotConfig> {
    (0..count)
        .map(|i| match ROSTER.get(i) {
            Some((name, style)) => BotConfig {
                name: (*name).to_string(),
                style: *style,
            },
            None => BotConfig {
                name: format!("Bot {}", i + 1),
                style: PlayStyle::Gto,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_table() {
        let maniac = PlayStyle::Maniac.profile();
        assert_eq!(maniac.aggression, 0.95);
        assert_eq!(maniac.tightness, 0.2);
        assert_eq!(maniac.bluff_frequency, 0.6);
        assert_eq!(PlayStyle::Tight.profile().tightness, 0.8);
        assert_eq!(BotProfile::default(), PlayStyle::Gto.profile());
    }

    #[test]
    fn test_style_parse() {
        assert_eq!("maniac".parse::<PlayStyle>(), Ok(PlayStyle::Maniac));
        assert_eq!("GTO".parse::<PlayStyle>(), Ok(PlayStyle::Gto));
        assert!("shark".parse::<PlayStyle>().is_err());
        for style in PlayStyle::ALL {
            assert_eq!(style.to_string().parse::<PlayStyle>(), Ok(style));
        }
    }

    // === Position Tests ===

    #[test]
    fn test_six_handed_positions() {
        let positions: Vec<Position> = (0..6).map(|seat| Position::from_seats(seat, 0, 6)).collect();
        assert_eq!(
            positions,
            vec![
                Position::Button,
                Position::SmallBlind,
                Position::BigBlind,
                Position::UnderTheGun,
                Position::Middle,
                Position::Cutoff,
            ]
        );
    }

    #[test]
    fn test_full_ring_positions() {
        let positions: Vec<Position> = (1..8).map(|seat| Position::from_seats(seat, 0, 8)).collect();
        assert_eq!(
            positions,
            vec![
                Position::SmallBlind,
                Position::BigBlind,
                Position::UnderTheGun,
                Position::UnderTheGun,
                Position::Middle,
                Position::Middle,
                Position::Cutoff,
            ]
        );
        assert_eq!(Position::from_seats(0, 0, 8), Position::Button);
    }

    #[test]
    fn test_heads_up_and_small_tables() {
        assert_eq!(Position::from_seats(3, 3, 2), Position::SmallBlind);
        assert_eq!(Position::from_seats(4, 3, 2), Position::BigBlind);
        assert_eq!(Position::from_seats(2, 2, 3), Position::Button);
        assert_eq!(Position::from_seats(0, 2, 3), Position::SmallBlind);
        assert_eq!(Position::from_seats(3, 0, 5), Position::UnderTheGun);
        assert_eq!(Position::from_seats(4, 0, 5), Position::Cutoff);
    }

    #[test]
    fn test_thresholds_loosen_toward_button() {
        assert!(Position::UnderTheGun.preflop_threshold() > Position::Middle.preflop_threshold());
        assert!(Position::Middle.preflop_threshold() > Position::Cutoff.preflop_threshold());
        assert!(Position::Cutoff.preflop_threshold() > Position::Button.preflop_threshold());
        assert!(Position::Button.is_late() && Position::Cutoff.is_late());
        assert!(!Position::BigBlind.is_late());
    }

    #[test]
    fn test_roster() {
        let bots = roster(10);
        assert_eq!(bots[0].name, "Alex Chen");
        assert_eq!(bots[5].style, PlayStyle::Maniac);
        assert_eq!(bots[8].name, "Bot 9");
        assert_eq!(bots[9].style, PlayStyle::Gto);
    }
}
