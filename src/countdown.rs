use crate::haptics::{pulse, HapticFeedback, VibrationStyle};
use crate::protocol::Event;
use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// How the clock should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Calm,
    Warning,
    Critical,
}

pub fn urgency(seconds: u32) -> Urgency {
    if seconds <= 60 {
        Urgency::Critical
    } else if seconds <= 180 {
        Urgency::Warning
    } else {
        Urgency::Calm
    }
}

/// Remaining time as MM:SS
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Spawn the countdown that drives the match clock.
///
/// Every `period` it takes a second off while the clock runs and
/// broadcasts the remaining time. Whole minutes get a medium pulse; running
/// out gets a heavy one and a `TimerExpired` event naming every spy.
pub fn spawn_countdown(
    state: Arc<AppState>,
    period: Duration,
    haptics: Arc<dyn HapticFeedback>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(period).await;

            let Some(tick) = state.countdown_step().await else {
                continue;
            };

            if tick.expired {
                pulse(haptics.as_ref(), VibrationStyle::Heavy);
                let spies = state.get_game().await.spies();
                tracing::info!("Countdown finished, {} spies revealed", spies.len());
                state.broadcast(Event::TimeLeft { seconds: 0 });
                state.broadcast(Event::TimerExpired { spies });
                state.broadcast_stage().await;
                continue;
            }

            if tick.crossed_minute {
                pulse(haptics.as_ref(), VibrationStyle::Medium);
            }

            state.broadcast(Event::TimeLeft {
                seconds: tick.time_left,
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haptics::HapticError;
    use crate::types::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<VibrationStyle>>);

    impl HapticFeedback for Recorder {
        fn impact(&self, style: VibrationStyle) -> Result<(), HapticError> {
            self.0.lock().unwrap().push(style);
            Ok(())
        }
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(300), "05:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(9), "00:09");
        assert_eq!(format_clock(1800), "30:00");
    }

    #[test]
    fn test_urgency_thresholds() {
        assert_eq!(urgency(181), Urgency::Calm);
        assert_eq!(urgency(180), Urgency::Warning);
        assert_eq!(urgency(61), Urgency::Warning);
        assert_eq!(urgency(60), Urgency::Critical);
        assert_eq!(urgency(0), Urgency::Critical);
    }

    #[tokio::test]
    async fn test_countdown_runs_to_expiry() {
        let state = Arc::new(AppState::with_seed(41).unwrap());
        let names: Vec<String> = ["Ann", "Ben", "Cy"].iter().map(|s| s.to_string()).collect();
        state
            .start_match(&names, GameSettings::default())
            .await
            .unwrap();
        state.complete_role_reveal().await.unwrap();
        state.update_time(61).await;

        let mut rx = state.subscribe();
        let recorder = Arc::new(Recorder::default());
        let handle = spawn_countdown(state.clone(), Duration::from_millis(1), recorder.clone());

        let spies = loop {
            match rx.recv().await {
                Ok(Event::TimerExpired { spies }) => break spies,
                Ok(_) => {}
                // Lagging only drops ticks
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {}
                Err(e) => panic!("Channel closed: {}", e),
            }
        };
        handle.abort();

        assert_eq!(spies.len(), 1);
        assert_eq!(state.get_game().await.stage, GameStage::TimerExpired);

        let styles = recorder.0.lock().unwrap().clone();
        assert_eq!(
            styles,
            vec![VibrationStyle::Medium, VibrationStyle::Heavy]
        );
    }

    #[tokio::test]
    async fn test_countdown_idle_in_setup() {
        let state = Arc::new(AppState::with_seed(42).unwrap());
        let mut rx = state.subscribe();
        let handle = spawn_countdown(
            state.clone(),
            Duration::from_millis(1),
            Arc::new(crate::haptics::NoHaptics),
        );

        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.abort();

        assert!(rx.try_recv().is_err());
        assert_eq!(state.get_game().await.time_left, 0);
    }
}
