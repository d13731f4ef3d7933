use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

mod storage;
mod task;
mod task_list;
mod ui;

use storage::Storage;
use ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load tasks before taking over the terminal so load warnings stay visible
    let storage = Storage::new(Storage::default_path());
    let mut app = App::new(storage);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Save tasks
    if let Err(err) = app.persist() {
        eprintln!("Failed to save tasks: {err}");
    }

    result?;
    Ok(())
}
