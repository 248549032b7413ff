//! Who makes the decisions for a seat.

use enum_dispatch::enum_dispatch;
use std::collections::VecDeque;

use crate::{
    bot::{BotConfig, BotDecisionContext, BotDecisionMaker, BotError, BotProfile, PlayStyle},
    game::entities::Action,
};

/// Outcome of asking a controller for its move.
#[derive(Debug)]
pub enum Decision {
    Act(Action),
    /// Nothing to do until a human submits an action.
    Wait,
    /// The policy couldn't produce an action; the table folds the seat.
    Failed(BotError),
}

#[enum_dispatch]
pub trait SeatController {
    fn is_human(&self) -> bool;

    /// Ask for the seat's next move given what it can see.
    fn decide(&mut self, ctx: &BotDecisionContext) -> Decision;
}

/// A person at the table. Actions can be queued ahead of the seat's turn
/// and are consumed in order.
#[derive(Debug, Default)]
pub struct Human {
    queue: VecDeque<Action>,
}

impl Human {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, action: Action) {
        self.queue.push_back(action);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

impl SeatController for Human {
    fn is_human(&self) -> bool {
        true
    }

    fn decide(&mut self, _ctx: &BotDecisionContext) -> Decision {
        self.queue.pop_front().map_or(Decision::Wait, Decision::Act)
    }
}

/// A seat played by the bot policy.
#[derive(Debug)]
pub struct Bot {
    pub config: BotConfig,
    profile: BotProfile,
    maker: BotDecisionMaker,
}

impl Bot {
    #[must_use]
    pub fn new(config: BotConfig) -> Self {
        Self {
            profile: config.style.profile(),
            config,
            maker: BotDecisionMaker::new(),
        }
    }

    /// Bot with a reproducible decision stream.
    #[must_use]
    pub fn with_seed(config: BotConfig, seed: u64) -> Self {
        Self {
            profile: config.style.profile(),
            config,
            maker: BotDecisionMaker::with_seed(seed),
        }
    }

    #[must_use]
    pub fn style(&self) -> PlayStyle {
        self.config.style
    }

    #[must_use]
    pub fn profile(&self) -> &BotProfile {
        &self.profile
    }
}

impl SeatController for Bot {
    fn is_human(&self) -> bool {
        false
    }

    fn decide(&mut self, ctx: &BotDecisionContext) -> Decision {
        match self.maker.decide(&self.profile, ctx) {
            Ok(action) => Decision::Act(action),
            Err(error) => Decision::Failed(error),
        }
    }
}

#[enum_dispatch(SeatController)]
#[derive(Debug)]
pub enum Controller {
    Human,
    Bot,
}

impl Controller {
    #[must_use]
    pub fn human() -> Self {
        Self::Human(Human::new())
    }

    #[must_use]
    pub fn bot(config: BotConfig) -> Self {
        Self::Bot(Bot::new(config))
    }
}
