use std::io;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use crossterm::cursor;
use crossterm::event;
use crossterm::event::Event as CtEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use life_game::camera::Camera;
use life_game::config::Config;
use life_game::config::GameConfig;
use life_game::control::Control;

/// Environment variables `LIFE_ROW_NUMS`, `LIFE_RULE`, ... override the config file
const ENV_PREFIX: &str = "LIFE";

enum Event {
    TogglePause,
    Step,
    Reset,
    CamResize { cols: u16, rows: u16 },
    Exit,
}

fn handle_event(event: CtEvent) -> Option<Event> {
    match event {
        CtEvent::Key(KeyEvent {
            kind: KeyEventKind::Release,
            ..
        }) => None,
        CtEvent::Key(key_event) => match key_event {
            KeyEvent {
                code: KeyCode::Char('q'),
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => Some(Event::Exit),
            KeyEvent {
                code: KeyCode::Char(' '),
                ..
            } => Some(Event::TogglePause),
            KeyEvent {
                code: KeyCode::Char('n'),
                ..
            } => Some(Event::Step),
            KeyEvent {
                code: KeyCode::Char('r'),
                ..
            } => Some(Event::Reset),
            _ => None,
        },
        CtEvent::Resize(cols, rows) => Some(Event::CamResize { cols, rows }),
        _ => None,
    }
}

fn load_config() -> anyhow::Result<GameConfig> {
    let mut config = Config::new();

    if let Some(path) = std::env::args().nth(1) {
        let path = Path::new(&path);
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        config = text
            .parse()
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    }

    config.merge(Config::from_env(ENV_PREFIX));

    GameConfig::from_config(&config, GameConfig::terminal()).context("Invalid configuration")
}

/// Raw mode and the alternate screen, left again on drop
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self;

        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // nothing left to report to once the terminal is gone
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Braille characters hold 2x4 pixels
fn camera_size(cols: u16, rows: u16) -> (usize, usize) {
    // keep the last line free for the status bar
    (cols as usize * 2, rows.saturating_sub(1) as usize * 4)
}

fn draw(stdout: &mut io::Stdout, control: &mut Control<Camera>) -> io::Result<()> {
    let status = format!(
        "generation {} | population {} | {}",
        control.mapping().generation(),
        control.mapping().population(),
        if control.update_cells() { "running" } else { "paused" },
    );

    queue!(
        stdout,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;

    for line in control.canvas_mut().render().lines() {
        queue!(stdout, style::Print(line), cursor::MoveToNextLine(1))?;
    }

    queue!(stdout, style::Print(status))?;

    stdout.flush()
}

fn run(control: &mut Control<Camera>) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    let mut last_tick = Instant::now();

    loop {
        draw(&mut stdout, control)?;

        let sleep_time = control.config().sleep_time;
        let timeout = sleep_time.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)? {
            match handle_event(event::read()?) {
                None => {}
                Some(Event::Exit) => break,
                Some(Event::TogglePause) => control.toggle_update_cells(),
                Some(Event::Step) => control.step(),
                Some(Event::Reset) => control.reset(),
                Some(Event::CamResize { cols, rows }) => {
                    let (w, h) = camera_size(cols, rows);
                    control.canvas_mut().resize(w, h);
                }
            }
        }

        if last_tick.elapsed() >= sleep_time {
            control.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = load_config()?;

    let (cols, rows) = terminal::size().context("Failed to read terminal size")?;
    let (w, h) = camera_size(cols, rows);

    info!(?config, "starting");

    let mut control = Control::new(config, Camera::new(w, h));

    let res = {
        let _terminal = TerminalGuard::enter().context("Failed to set up the terminal")?;
        run(&mut control)
    };

    info!(
        loops = control.loop_nums(),
        paints = control.paint_nums(),
        generation = control.mapping().generation(),
        "exiting"
    );

    res
}

#[cfg(test)]
mod test {
    use crossterm::terminal;

    use super::TerminalGuard;
    use super::camera_size;

    #[test]
    fn terminal_is_restored() {
        // without a tty `enter` fails part way, which must not leave raw mode on either
        if let Ok(guard) = TerminalGuard::enter() {
            drop(guard);
        }

        assert!(!terminal::is_raw_mode_enabled().unwrap_or(false));
    }

    #[test]
    fn camera_keeps_a_status_line() {
        assert_eq!(camera_size(80, 24), (160, 92));
        assert_eq!(camera_size(10, 0), (20, 0));
    }
}
