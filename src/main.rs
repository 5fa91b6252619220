/// Entry point and game loop.

use std::time::{Duration, Instant};

use wordpush::config::GameConfig;
use wordpush::sim::event::GameEvent;
use wordpush::sim::step;
use wordpush::sim::world::{Phase, WorldState};
use wordpush::ui::input::{Command, InputState};
use wordpush::ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(10);

fn main() {
    env_logger::init();

    let config = GameConfig::load();
    let mut world = WorldState::new(&config);

    if let Err(e) = world.load_level(config.play.start_level) {
        log::warn!("{e}; starting at level 1");
        if let Err(e) = world.load_level(0) {
            eprintln!("No playable level: {e}");
            return;
        }
    }

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!("Thanks for playing wordpush! {} moves on the last level.", world.moves);
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let repeat = Duration::from_millis(config.input.repeat_ms);
    let mut last_move = Instant::now().checked_sub(repeat).unwrap_or_else(Instant::now);

    loop {
        kb.drain_events();

        match kb.command() {
            Some(Command::Quit) => break,
            Some(cmd) => handle_command(world, cmd)?,
            None => {}
        }

        if world.phase == Phase::Playing {
            if let Some(dir) = kb.direction() {
                // A fresh press always moves; holding repeats at `repeat_ms`.
                if kb.direction_pressed() || last_move.elapsed() >= repeat {
                    let events = step::step(world, Some(dir));
                    log_events(&events);
                    last_move = Instant::now();
                }
            }
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn handle_command(world: &mut WorldState, cmd: Command) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Command::Undo => log_events(&step::undo(world)),
        Command::Restart if world.phase != Phase::Complete => world.restart()?,
        Command::Confirm if world.phase == Phase::Won => world.advance()?,
        _ => {}
    }
    Ok(())
}

fn log_events(events: &[GameEvent]) {
    for e in events {
        log::debug!("{e:?}");
    }
}
