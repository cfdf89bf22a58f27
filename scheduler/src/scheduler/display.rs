use super::{
    runner::{process_state, RunnerEvent},
    SimulationResult, Ticks,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::{
    io::{self, Stdout},
    sync::mpsc::{self, Receiver},
    thread,
    time::{Duration, Instant},
};
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap},
    Terminal,
};

pub enum DisplayEvent {
    Input(KeyEvent),
    Tick,
}

const TICK_RATE: Duration = Duration::from_millis(400);

pub struct DisplayTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input_rx: Receiver<DisplayEvent>,
}

impl DisplayTerminal {
    pub fn new() -> Result<Self, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        // Nothing fallible remains once raw mode is on, so Drop always restores it.
        crossterm::terminal::enable_raw_mode()?;

        // Set up the input handling thread
        let (input_tx, input_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = TICK_RATE
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => {
                        if let Ok(Event::Key(key)) = event::read() {
                            if input_tx.send(DisplayEvent::Input(key)).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(_) => break,
                }

                if last_tick.elapsed() >= TICK_RATE {
                    if input_tx.send(DisplayEvent::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Ok(Self { terminal, input_rx })
    }

    pub fn draw(
        &mut self,
        result: &SimulationResult,
        tick: Ticks,
        paused: bool,
    ) -> Result<(), io::Error> {
        let running = tick
            .checked_sub(1)
            .and_then(|last| result.timeline.slot(last))
            .flatten();

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(5),
                    Constraint::Length(5),
                ])
                .split(f.size());

            let status = Paragraph::new(format!(
                "t={}/{} | {} | {}",
                tick,
                result.timeline.len(),
                match running {
                    Some(pid) => format!("CPU: P{pid}"),
                    None if tick == 0 => "Not started".to_owned(),
                    None => "CPU: idle".to_owned(),
                },
                if paused { "paused (s: step, r: resume)" } else { "p: pause, n: next, q: quit" }
            ))
            .style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::LightBlue),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(result.title())
                    .border_type(BorderType::Rounded),
            );

            f.render_widget(status, chunks[0]);

            let items = result.processes.iter().map(|process| {
                let executed = result.timeline.executed_before(process.pid(), tick);
                Row::new(vec![
                    Cell::from(format!("P{}", process.pid()))
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from(process.arrival().to_string()),
                    Cell::from(process.burst().to_string()),
                    Cell::from(process.priority().to_string()),
                    Cell::from(format!("{executed}/{}", process.burst())),
                    Cell::from(process_state(process, &result.timeline, tick).to_string()),
                ])
            });

            let table = Table::new(items)
                .header(
                    Row::new(vec!["PID", "Arrival", "Burst", "Priority", "Done", "State"])
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .widths(&[
                    Constraint::Length(5),
                    Constraint::Length(8),
                    Constraint::Length(6),
                    Constraint::Length(9),
                    Constraint::Length(8),
                    Constraint::Length(12),
                ])
                .block(Block::default().title("Processes").borders(Borders::ALL))
                .style(Style::default().fg(Color::LightGreen))
                .column_spacing(1);

            f.render_widget(table, chunks[1]);

            let strip: String = result
                .timeline
                .slots()
                .iter()
                .take(tick as usize)
                .map(|slot| match slot {
                    Some(pid) => format!("P{pid} "),
                    None => "-- ".to_owned(),
                })
                .collect();
            let gantt = Paragraph::new(strip)
                .wrap(Wrap { trim: false })
                .block(Block::default().title("Gantt").borders(Borders::ALL));

            f.render_widget(gantt, chunks[2]);
        })?;

        Ok(())
    }

    pub fn get_input(&self) -> RunnerEvent {
        match self.input_rx.recv() {
            Ok(event) => runner_event(event),
            Err(_) => RunnerEvent::Quit,
        }
    }
}

fn runner_event(event: DisplayEvent) -> RunnerEvent {
    let key = match event {
        DisplayEvent::Tick => return RunnerEvent::Tick,
        DisplayEvent::Input(key) => key,
    };
    if key.modifiers != KeyModifiers::NONE {
        return RunnerEvent::None;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => RunnerEvent::Quit,
        KeyCode::Char('p') => RunnerEvent::Pause,
        KeyCode::Char('r') => RunnerEvent::Resume,
        KeyCode::Char('s') => RunnerEvent::Step,
        KeyCode::Char('n') => RunnerEvent::Next,
        _ => RunnerEvent::None,
    }
}

impl Drop for DisplayTerminal {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}
