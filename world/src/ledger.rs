//! Money, lives and score bookkeeping.

use tower_defense_core::{CommandError, EconomyConfig};

/// Economy and scoring state of a session. The high score outlives restarts.
#[derive(Clone, Debug)]
pub(crate) struct Ledger {
    money: u32,
    lives: u32,
    score: u32,
    high_score: u32,
    game_over: bool,
}

impl Ledger {
    pub(crate) fn new(economy: &EconomyConfig, high_score: u32) -> Self {
        Self {
            money: economy.starting_money,
            lives: economy.starting_lives,
            score: 0,
            high_score,
            game_over: false,
        }
    }

    pub(crate) fn money(&self) -> u32 {
        self.money
    }

    pub(crate) fn lives(&self) -> u32 {
        self.lives
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn high_score(&self) -> u32 {
        self.high_score
    }

    pub(crate) fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub(crate) fn credit(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    /// Spends money; refuses without mutation when funds are short.
    pub(crate) fn debit(&mut self, amount: u32) -> bool {
        match self.money.checked_sub(amount) {
            Some(remaining) => {
                self.money = remaining;
                true
            }
            None => false,
        }
    }

    /// Like [`Ledger::debit`], reporting a shortfall as a [`CommandError`].
    pub(crate) fn charge(&mut self, amount: u32) -> Result<(), CommandError> {
        let available = self.money;
        if self.debit(amount) {
            Ok(())
        } else {
            Err(CommandError::InsufficientFunds {
                required: amount,
                available,
            })
        }
    }

    /// Takes one life. Running out ends the game and latches the high score.
    pub(crate) fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 && !self.game_over {
            self.game_over = true;
            self.latch_high_score();
        }
    }

    pub(crate) fn credit_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        if self.game_over {
            self.latch_high_score();
        }
    }

    fn latch_high_score(&mut self) {
        self.high_score = self.high_score.max(self.score);
    }
}
