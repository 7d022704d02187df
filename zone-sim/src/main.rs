//! `zone [config.json]`: run the faction simulation in the terminal.

use std::io::{self, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use zone_sim::{AreaMap, MessageLog, SimConfig, World, init_logging};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::load(Path::new(&path))?,
        None => SimConfig::default(),
    };
    init_logging(config.level_filter()?)?;
    log::info!(
        "{} grid, {} pathfinding, {} ticks",
        config.bounds(),
        config.mode,
        config.ticks
    );

    let mut messages = MessageLog::new(config.max_num_messages);
    messages.set_echo(!config.show_grid);
    let map = AreaMap::load_or_empty(config.map.as_deref(), config.bounds(), &mut messages)?;
    let mut world = World::new(&config, map, messages)?;
    world.populate();

    let delay = Duration::from_millis(config.tick_delay_ms);
    let mut stdout = io::stdout();
    for _ in 0..config.ticks {
        if config.show_grid {
            render(&mut stdout, &world)?;
        }
        world.tick();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
    if config.show_grid {
        render(&mut stdout, &world)?;
    }
    Ok(())
}

fn render(out: &mut impl Write, world: &World) -> io::Result<()> {
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    write!(out, "{}", world.draw())?;
    writeln!(out)?;
    for entry in world.log().entries() {
        writeln!(out, "{}", entry.styled())?;
    }
    out.flush()
}
