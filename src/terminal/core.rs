use std::{
    io::{Stdout, stdout},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use anyhow::bail;
use ratatui::{
    crossterm::{
        event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::CrosstermBackend,
};
use tokio::{sync::mpsc, task::JoinHandle};

use super::{
    Terminal,
    data::{Screen, UiEvent},
    draw::draw,
    message::Message,
};
use crate::log::Log;

const SCOPE: &str = "terminal";
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct Core {
    log: Log,
    events: mpsc::Sender<UiEvent>,
    taken_over: bool,
    /// Set to stop the input thread
    stop: Arc<AtomicBool>,
    terminal: ratatui::Terminal<CrosstermBackend<Stdout>>,
}

impl Core {
    pub fn build(log: Log, events: mpsc::Sender<UiEvent>) -> anyhow::Result<Self> {
        let terminal = ratatui::Terminal::new(CrosstermBackend::new(stdout()))?;
        Ok(Self {
            log,
            events,
            taken_over: false,
            stop: Arc::new(AtomicBool::new(false)),
            terminal,
        })
    }

    pub fn spawn(mut self) -> (Terminal, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                match msg {
                    Message::TakeOver(tx) => {
                        let _ = tx.send(self.take_over());
                    }
                    Message::Release(tx) => {
                        let _ = tx.send(self.release());
                    }
                    Message::Draw(screen, tx) => {
                        let _ = tx.send(self.draw(&screen));
                    }
                }
            }
            if self.taken_over {
                let _ = self.release();
            }
        });
        (Terminal::Actual(tx), handle)
    }

    fn take_over(&mut self) -> anyhow::Result<()> {
        if self.taken_over {
            bail!("Terminal already taken over");
        }
        self.taken_over = true;
        execute!(self.terminal.backend_mut(), EnterAlternateScreen)?;
        enable_raw_mode()?;
        self.terminal.clear()?;

        self.stop = Arc::new(AtomicBool::new(false));
        spawn_input_thread(self.events.clone(), self.stop.clone());
        self.log.info(SCOPE, "Terminal taken over");
        Ok(())
    }

    fn release(&mut self) -> anyhow::Result<()> {
        if !self.taken_over {
            bail!("Terminal not taken over");
        }
        self.taken_over = false;
        self.stop.store(true, Ordering::Relaxed);
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        disable_raw_mode()?;
        self.terminal.show_cursor()?;
        self.log.info(SCOPE, "Terminal released");
        Ok(())
    }

    fn draw(&mut self, screen: &Screen) -> anyhow::Result<()> {
        if !self.taken_over {
            bail!("Drawing on a terminal that was not taken over");
        }
        self.terminal.draw(|frame| draw(frame, screen))?;
        Ok(())
    }
}

/// Reads key presses on a blocking thread until `stop` is set or nobody
/// listens anymore.
fn spawn_input_thread(events: mpsc::Sender<UiEvent>, stop: Arc<AtomicBool>) {
    thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            match event::poll(POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(_) => break,
            }
            let Ok(Event::Key(key)) = event::read() else {
                continue;
            };
            let Some(ev) = map_key(key) else {
                continue;
            };
            if events.blocking_send(ev).is_err() {
                break;
            }
        }
    });
}

/// Translates a crossterm key press. Releases and repeats are dropped.
pub fn map_key(key: KeyEvent) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ev = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => UiEvent::Quit,
        KeyCode::Char(c) => UiEvent::Char(c),
        KeyCode::Up => UiEvent::Up,
        KeyCode::Down => UiEvent::Down,
        KeyCode::Left => UiEvent::Left,
        KeyCode::Right => UiEvent::Right,
        KeyCode::Enter => UiEvent::Enter,
        KeyCode::Esc => UiEvent::Esc,
        KeyCode::Tab | KeyCode::BackTab => UiEvent::Tab,
        KeyCode::Backspace => UiEvent::Backspace,
        _ => return None,
    };
    Some(ev)
}
