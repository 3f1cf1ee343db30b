use crate::state::AppState;
use crate::types::*;

/// One second of countdown as seen by the countdown task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    pub time_left: u32,
    /// The clock just reached a whole minute
    pub crossed_minute: bool,
    /// The clock hit zero and the match moved to `TimerExpired`
    pub expired: bool,
}

impl AppState {
    pub async fn update_time(&self, seconds: u32) {
        self.game.write().await.update_time(seconds);
    }

    /// Time ran out: spies win. Votes of the unfinished round are dropped.
    pub async fn timer_expired(&self) -> Result<Vec<Player>, String> {
        let mut game = self.game.write().await;
        let mut tally = self.tally.write().await;

        game.timer_expired()?;
        game.update_time(0);
        tally.reset();
        Ok(game.spies())
    }

    /// Take one second off the clock if it is running
    pub async fn countdown_step(&self) -> Option<CountdownTick> {
        let mut game = self.game.write().await;
        let mut tally = self.tally.write().await;

        if !game.clock_running() {
            return None;
        }

        let time_left = game.time_left.saturating_sub(1);
        game.update_time(time_left);

        if time_left > 0 {
            return Some(CountdownTick {
                time_left,
                crossed_minute: time_left % 60 == 0,
                expired: false,
            });
        }

        if let Err(e) = game.timer_expired() {
            tracing::warn!("Countdown reached zero but could not expire: {}", e);
            return None;
        }
        tally.reset();

        Some(CountdownTick {
            time_left: 0,
            crossed_minute: false,
            expired: true,
        })
    }
}
