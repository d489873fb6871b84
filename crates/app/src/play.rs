//! Line-oriented terminal client for the game loop.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use escape_core::Clock;
use escape_core::model::Language;
use services::game::{GameError, GameLoop, LogKind, Screen, Session};
use services::{AppServices, HttpTransport, SubmitOutcome, Transport};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands: :run submits the typed solution, :hint toggles the hint panel,
:exit leaves the level, :restart wipes all progress, :quit ends the game.";

/// Play until stdin closes or the learner types `:quit`.
pub async fn run(services: &AppServices, server: Option<&str>) -> anyhow::Result<()> {
    let transport: Arc<dyn Transport> = match server {
        Some(url) => Arc::new(
            HttpTransport::new(url).with_context(|| format!("invalid server url {url}"))?,
        ),
        None => Arc::new(services.local_transport()),
    };
    let game = services.game_loop(transport);
    let mut session = Session::new(Clock::System);
    let mut draft = String::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        render(&session, &draft);
        prompt(&mut std::io::stdout())?;
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };
        match line.trim() {
            ":quit" => break,
            ":restart" => {
                draft.clear();
                report(game.restart(&mut session).await);
            }
            _ => report(handle(&game, &mut session, &mut draft, &line).await),
        }
    }
    Ok(())
}

async fn handle(
    game: &GameLoop,
    session: &mut Session,
    draft: &mut String,
    line: &str,
) -> Result<(), GameError> {
    let input = line.trim();
    match session.screen() {
        Screen::Start => game.begin(session).await,
        Screen::LanguageSelect => match pick_language(input) {
            Some(language) => game.select_language(session, language).await,
            None => {
                println!("Pick a track by number or name.");
                Ok(())
            }
        },
        Screen::Map => {
            if input == "b" {
                return session.back_to_languages();
            }
            match input.parse::<usize>() {
                Ok(number) if number > 0 => session.open_level(number - 1),
                _ => {
                    println!("Type a level number, or b to go back.");
                    Ok(())
                }
            }
        }
        Screen::Puzzle => match input {
            ":hint" => session.toggle_hint().map(|_| ()),
            ":exit" => {
                draft.clear();
                session.exit_level()
            }
            ":run" => {
                if let SubmitOutcome::Solved { .. } = game.submit(session, draft.as_str()).await? {
                    draft.clear();
                }
                Ok(())
            }
            _ => {
                draft.push_str(line);
                draft.push('\n');
                Ok(())
            }
        },
        Screen::SuccessModal => match input {
            "m" => session.back_to_map(),
            _ => session.next_level().map(|_| ()),
        },
        Screen::Escape => session.try_another(),
    }
}

fn pick_language(input: &str) -> Option<Language> {
    if let Ok(number) = input.parse::<usize>() {
        return number.checked_sub(1).and_then(|i| Language::ALL.get(i).copied());
    }
    input.to_lowercase().parse().ok()
}

fn report(result: Result<(), GameError>) {
    if let Err(err) = result {
        println!("! {err}");
    }
}

fn prompt(out: &mut impl Write) -> anyhow::Result<()> {
    out.write_all(b"> ")
        .and_then(|()| out.flush())
        .context("failed to write prompt")
}

fn render(session: &Session, draft: &str) {
    println!();
    match session.screen() {
        Screen::Start => {
            println!("404 ESCAPE ROOM");
            println!("Fix the broken code to escape. Press enter to begin.");
        }
        Screen::LanguageSelect => {
            println!("Choose a track:");
            for (i, language) in Language::ALL.iter().enumerate() {
                let track = session.progress().track(*language);
                println!(
                    "  {}. {:<10} {} solved, {} pts",
                    i + 1,
                    language.label(),
                    track.completed_count(),
                    track.score()
                );
            }
            if let Some(last) = session.log().last() {
                println!("{}", last.render());
            }
        }
        Screen::Map => {
            let Some(map) = session.map_view() else { return };
            println!("{}  ({} solved, {} pts)", map.title, map.completed, map.score);
            for card in &map.cards {
                let status = if card.completed {
                    "done"
                } else if card.locked {
                    "locked"
                } else {
                    "open"
                };
                let score = card.score.map(|s| format!(" {s} pts")).unwrap_or_default();
                println!("  {:>2}. {} [{status}]{score}", card.number, card.name);
            }
            println!("Type a level number, or b to go back.");
        }
        Screen::Puzzle => {
            let Some(puzzle) = session.puzzle_view() else { return };
            println!("{}: {}  [{}]", puzzle.heading, puzzle.title, puzzle.language_label);
            println!("{}", puzzle.description);
            println!("---");
            println!("{}", puzzle.code);
            println!("---");
            if let (true, Some(text)) = (puzzle.hint_panel.open, &puzzle.hint_panel.text) {
                println!("HINT: {text}");
            }
            for entry in puzzle.log {
                let marker = match entry.kind {
                    LogKind::Info => ' ',
                    LogKind::Success => '+',
                    LogKind::Error => '!',
                };
                println!("{marker} {}", entry.render());
            }
            if !draft.is_empty() {
                println!("Draft:\n{draft}");
            }
            println!("{HELP}");
        }
        Screen::SuccessModal => {
            if let Some(success) = session.success_view() {
                println!(
                    "{}! Score {} (hints used: {})",
                    success.status, success.score, success.hints_used
                );
            }
            println!("Enter for the next level, m for the map.");
        }
        Screen::Escape => {
            if let Some(escape) = session.escape_view() {
                println!("YOU ESCAPED THE {} ROOM", escape.language_label);
                println!(
                    "Score {}  Levels {}  Hints {}",
                    escape.total_score, escape.levels_completed, escape.hints_used
                );
            }
            println!("Press enter to try another track.");
        }
    }
}
