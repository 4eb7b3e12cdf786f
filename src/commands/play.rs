//! Terminal playback of the task list.
//!
//! Drives the playback engine with a one-second interval, re-reading the
//! stored order every tick so reorders made through the API take effect on
//! the next transition. Waiting states are resolved with a confirm prompt;
//! countdown expiry is announced with ascending bell tones.

use crate::db::tasks::Tasks;
use crate::libs::config::Config;
use crate::libs::playback::{Playback, PlaybackEvent, PlaybackState};
use crate::libs::task::Task;
use crate::libs::view::View;
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::time::{self, Duration};

#[derive(Debug, Args)]
pub struct PlayArgs {
    /// Database file path (overrides configuration)
    #[arg(long)]
    db_file: Option<PathBuf>,
}

pub async fn cmd(args: PlayArgs) -> Result<()> {
    let config = Config::read()?;
    let db_file = args.db_file.or_else(|| config.server.and_then(|s| s.db_file).map(PathBuf::from));
    let tasks = match db_file {
        Some(path) => Tasks::open(path)?,
        None => Tasks::new()?,
    };

    let order = tasks.fetch_ordered()?;
    if order.is_empty() {
        println!("No tasks to play.");
        return Ok(());
    }
    View::tasks(&order)?;

    let mut playback = Playback::new();
    playback.begin(&order);

    let mut interval = time::interval(Duration::from_secs(1));
    // The first tick completes immediately; consume it so every later tick
    // represents a full second.
    interval.tick().await;
    loop {
        match playback.state() {
            PlaybackState::Idle => break,
            // The play command exposes no pause control; a paused state can
            // only be left over from begin(), so just resume.
            PlaybackState::Paused { .. } => playback.resume(),
            PlaybackState::Waiting { task_id } => {
                let order = tasks.fetch_ordered()?;
                let title = title_of(&order, task_id);
                println!();
                let advance = Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(format!("'{title}' has no countdown. Mark it done and continue?"))
                    .default(true)
                    .interact()?;
                if advance {
                    playback.skip_to_next(&order);
                } else {
                    playback.stop();
                }
            }
            PlaybackState::Running { task_id, remaining_secs } => {
                let order = tasks.fetch_ordered()?;
                print!("\r⏳ {:<32} {}   ", title_of(&order, task_id), format_hms(remaining_secs));
                io::stdout().flush()?;

                interval.tick().await;
                let order = tasks.fetch_ordered()?;
                if let Some(PlaybackEvent::TimerCompleted { task_id }) = playback.tick(&order) {
                    println!("\n⏰ '{}' complete", title_of(&order, task_id));
                    alert();
                }
            }
            PlaybackState::Grace { next_task_id, remaining_secs } => {
                let order = tasks.fetch_ordered()?;
                print!("\r⏸ '{}' starts in {}s   ", title_of(&order, next_task_id), remaining_secs);
                io::stdout().flush()?;

                interval.tick().await;
                let order = tasks.fetch_ordered()?;
                if let Some(PlaybackEvent::AutoStarted { task_id }) = playback.tick(&order) {
                    println!("\n▶ '{}'", title_of(&order, task_id));
                }
            }
        }
    }

    println!("Playback finished.");
    Ok(())
}

fn title_of(order: &[Task], id: i64) -> String {
    order.iter().find(|t| t.id == id).map(|t| t.title.clone()).unwrap_or_else(|| format!("task {id}"))
}

fn format_hms(total_secs: u32) -> String {
    format!("{:02}:{:02}:{:02}", total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60)
}

/// Three-tone ascending alert. The terminal bell carries no pitch, so three
/// spaced tones stand in for the rising chime.
fn alert() {
    for _ in 0..3 {
        print!("\x07");
        io::stdout().flush().ok();
        std::thread::sleep(std::time::Duration::from_millis(150));
    }
}
