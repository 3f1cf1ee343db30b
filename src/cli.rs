//! Terminal input parsing and screen rendering

use crate::countdown::{format_clock, urgency, Urgency};
use crate::protocol::{Event, RoleCard};
use crate::setup::SetupDraft;
use crate::types::*;
use std::str::FromStr;

/// Which spy hint a `hint` line toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintToggle {
    Category,
    Letters,
    FirstLetter,
}

/// One typed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Players(Vec<String>),
    Add(String),
    /// 1-based slot
    Remove(usize),
    Spies(usize),
    TimerMinutes(u32),
    Category(WordCategory, bool),
    Hint(HintToggle, bool),
    ShowSetup,
    Start,
    Next,
    Question,
    /// 1-based position among the active players
    Vote(usize),
    Continue,
    End,
    Status,
    Help,
    Quit,
}

fn parse_switch(word: Option<&str>) -> Result<bool, String> {
    match word.map(str::to_lowercase).as_deref() {
        Some("on") | Some("yes") | Some("+") => Ok(true),
        Some("off") | Some("no") | Some("-") => Ok(false),
        _ => Err("Expected on or off".to_string()),
    }
}

fn parse_number<T: FromStr>(word: Option<&str>, what: &str) -> Result<T, String> {
    word.and_then(|w| w.parse().ok())
        .ok_or_else(|| format!("Expected a number for {}", what))
}

impl FromStr for Input {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = line
            .split_once(char::is_whitespace)
            .map(|(h, r)| (h, r.trim()))
            .unwrap_or((line, ""));
        let mut args = rest.split_whitespace();

        let input = match head.to_lowercase().as_str() {
            "players" => Input::Players(rest.split(',').map(|n| n.trim().to_string()).collect()),
            "add" if !rest.is_empty() => Input::Add(rest.to_string()),
            "add" => return Err("Usage: add <name>".to_string()),
            "remove" | "rm" => Input::Remove(parse_number(args.next(), "remove")?),
            "spies" => Input::Spies(parse_number(args.next(), "spies")?),
            "timer" => Input::TimerMinutes(parse_number(args.next(), "timer")?),
            "category" | "cat" => {
                let category = args
                    .next()
                    .ok_or("Usage: category <name> on|off")?
                    .parse::<WordCategory>()?;
                Input::Category(category, parse_switch(args.next())?)
            }
            "hint" => {
                let toggle = match args.next() {
                    Some("category") => HintToggle::Category,
                    Some("letters") => HintToggle::Letters,
                    Some("first") => HintToggle::FirstLetter,
                    _ => return Err("Usage: hint category|letters|first on|off".to_string()),
                };
                Input::Hint(toggle, parse_switch(args.next())?)
            }
            "setup" => Input::ShowSetup,
            "start" => Input::Start,
            "" | "next" | "n" => Input::Next,
            "q" | "question" => Input::Question,
            "vote" | "v" => Input::Vote(parse_number(args.next(), "vote")?),
            "continue" | "c" => Input::Continue,
            "end" | "new" => Input::End,
            "status" => Input::Status,
            "help" | "?" => Input::Help,
            "quit" | "exit" => Input::Quit,
            other => return Err(format!("Unknown command: {} (try help)", other)),
        };
        Ok(input)
    }
}

impl Input {
    /// Whether this line edits the setup draft
    pub fn edits_draft(&self) -> bool {
        matches!(
            self,
            Input::Players(_)
                | Input::Add(_)
                | Input::Remove(_)
                | Input::Spies(_)
                | Input::TimerMinutes(_)
                | Input::Category(..)
                | Input::Hint(..)
        )
    }

    /// Apply a setup edit. Returns a note when the edit could not be made.
    pub fn apply(&self, draft: &mut SetupDraft) -> Option<String> {
        match self {
            Input::Players(names) => draft.set_names(names.clone()),
            Input::Add(name) => {
                if !draft.add_player(name) {
                    return Some("The table is full".to_string());
                }
            }
            Input::Remove(slot) => {
                if *slot == 0 || !draft.remove_player(slot - 1) {
                    return Some(format!("Cannot remove slot {}", slot));
                }
            }
            Input::Spies(count) => draft.set_spy_count(*count),
            Input::TimerMinutes(minutes) => draft.set_timer_minutes(*minutes),
            Input::Category(category, enabled) => draft.set_category(*category, *enabled),
            Input::Hint(toggle, enabled) => match toggle {
                HintToggle::Category => draft.settings.show_category_to_spy = *enabled,
                HintToggle::Letters => draft.settings.show_letter_count_to_spy = *enabled,
                HintToggle::FirstLetter => draft.settings.show_first_letter_to_spy = *enabled,
            },
            _ => {}
        }
        None
    }
}

pub const HELP: &str = "\
Setup:    players a, b, c | add <name> | remove <n> | spies <n> | timer <minutes>
          category <name> on|off | hint category|letters|first on|off | setup | start
Reveal:   next (or just Enter)
Gameplay: q (next question) | vote <n> | status
Result:   continue | end
Anytime:  help | quit";

pub fn render_draft(draft: &SetupDraft) -> String {
    let mut out = String::from("Players:\n");
    for (i, name) in draft.names.iter().enumerate() {
        let shown = if name.trim().is_empty() { "(empty)" } else { name };
        out.push_str(&format!("  {}. {}\n", i + 1, shown));
    }
    let s = &draft.settings;
    let categories: Vec<&str> = s.categories.iter().map(|c| c.display_name()).collect();
    out.push_str(&format!(
        "Spies: {} (max {})\nTimer: {} min\nCategories: {}\n",
        s.spy_count,
        draft.max_spies(),
        s.timer_duration / 60,
        categories.join(", ")
    ));
    out.push_str(&format!(
        "Spy hints: category {}, letter count {}, first letter {}",
        on_off(s.show_category_to_spy),
        on_off(s.show_letter_count_to_spy),
        on_off(s.show_first_letter_to_spy)
    ));
    out
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn render_clock(seconds: u32) -> String {
    let marker = match urgency(seconds) {
        Urgency::Calm => "",
        Urgency::Warning => " !",
        Urgency::Critical => " !!",
    };
    format!("[{}{}]", format_clock(seconds), marker)
}

fn render_roster(players: &[Player]) -> String {
    players
        .iter()
        .enumerate()
        .map(|(i, p)| format!("  {}. {}", i + 1, p.name))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_card(card: &RoleCard) -> String {
    match card {
        RoleCard::Civilian { word, category } => {
            format!("You are a CIVILIAN.\nThe word is: {} ({})", word, category)
        }
        RoleCard::Spy { hints } => {
            let mut out = String::from("You are the SPY.");
            if let Some(category) = &hints.category {
                out.push_str(&format!("\nCategory: {}", category));
            }
            if let Some(count) = hints.letter_count {
                out.push_str(&format!("\nLetters: {}", count));
            }
            if let Some(first) = &hints.first_letter {
                out.push_str(&format!("\nFirst letter: {}", first));
            }
            out
        }
    }
}

/// Text for one event. `TimeLeft` renders only on whole minutes and in
/// the last ten seconds to keep the screen readable.
pub fn render_event(event: &Event) -> Option<String> {
    let text = match event {
        Event::Stage {
            stage, time_left, ..
        } => match stage {
            GameStage::Setup => "-- Setup -- (type setup to review, start to play)".to_string(),
            GameStage::RoleReveal => "-- Role reveal --".to_string(),
            GameStage::Gameplay => format!(
                "-- Gameplay {} -- ask questions, then vote <n>",
                render_clock(*time_left)
            ),
            GameStage::VotingResult => "-- Voting result --".to_string(),
            GameStage::TimerExpired => "-- Time is up --".to_string(),
        },
        Event::PassDevice {
            player_name,
            index,
            total,
        } => format!(
            "Pass the device to {} ({}/{}), then press Enter.",
            player_name,
            index + 1,
            total
        ),
        Event::RoleCard {
            player_name,
            card,
            is_last,
        } => format!(
            "{}:\n{}\nPress Enter to {}.",
            player_name,
            render_card(card),
            if *is_last { "start the game" } else { "hide" }
        ),
        Event::Question { text } => format!("Question: {}", text),
        Event::VoteCounts { cast, needed, .. } => format!("Votes: {}/{}", cast, needed),
        Event::TieVote => "Tie! Nobody is out. Vote again.".to_string(),
        Event::VotingResult {
            eliminated,
            was_last_spy,
            winner,
            remaining,
            time_left,
        } => {
            let role = if eliminated.is_spy { "a spy" } else { "a civilian" };
            let mut out = format!("{} was voted out. They were {}.", eliminated.name, role);
            if *was_last_spy {
                out.push_str("\nThat was the last spy!");
            }
            match winner {
                Some(winner) => out.push_str(&format!("\n{} win! Type continue.", winner)),
                None => out.push_str(&format!(
                    "\nStill in {}:\n{}\nType continue.",
                    render_clock(*time_left),
                    render_roster(remaining)
                )),
            }
            out
        }
        Event::TimeLeft { seconds } => {
            if *seconds % 60 != 0 && *seconds > 10 {
                return None;
            }
            render_clock(*seconds)
        }
        Event::TimerExpired { spies } => {
            let names: Vec<&str> = spies.iter().map(|p| p.name.as_str()).collect();
            format!(
                "Time is up. Spies win!\nThe spies were: {}\nType continue.",
                names.join(", ")
            )
        }
        Event::MatchEnded => "Match over.".to_string(),
        Event::Status {
            stage,
            time_left,
            players,
        } => {
            let active: Vec<Player> = players.iter().filter(|p| p.is_active).cloned().collect();
            format!(
                "{:?} {}\n{}",
                stage,
                render_clock(*time_left),
                render_roster(&active)
            )
        }
        Event::Error { msg, .. } => format!("! {}", msg),
    };
    Some(text)
}
