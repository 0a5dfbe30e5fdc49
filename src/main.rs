//! Clear Ahead headless runner
//!
//! The browser build is driven from JavaScript through `clear_ahead::web`.
//! Natively this binary plays runs with a simple autopilot that taps the
//! nearest obstacle, which is handy for tuning and for eyeballing the logs.
//!
//! Usage: `clear-ahead [seed] [easy|hard] [forest|snow|road|beach]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clear_ahead::consts::*;
    use clear_ahead::sim::{GameMode, MapKind};
    use clear_ahead::{Profile, SessionController, SessionEvent, SessionPhase, Settings};

    clear_ahead::init_logging();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(2024u64);
    let mode = args
        .next()
        .and_then(|s| GameMode::from_str(&s))
        .unwrap_or(GameMode::Easy);
    let map = args
        .next()
        .and_then(|s| MapKind::from_str(&s))
        .unwrap_or(MapKind::Forest);

    // Own every map so any selection can be played
    let profile = Profile {
        owned_maps: MapKind::ALL.to_vec(),
        tutorial_done: true,
        ..Default::default()
    };
    let mut session = SessionController::new(profile, Settings::default(), seed);
    session.set_mode(mode);
    session.set_map(map);
    session.start();

    // Ten simulated minutes at 60 fps at most
    const MAX_FRAMES: u32 = 36_000;
    let mut summary = None;

    for frame in 0..MAX_FRAMES {
        // One tap every few frames at the obstacle closest to the player
        if frame % 4 == 0 {
            let target = session.render_view().and_then(|view| {
                view.visible_obstacles()
                    .filter(|o| o.pos.x + o.size.x > PLAYER_X)
                    .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
                    .map(|o| o.center())
            });
            if let Some(target) = target {
                session.pointer_move(target.x, target.y);
                session.trigger_hit();
            }
        }

        session.tick(REFERENCE_FRAME_MS);

        for event in session.drain_events() {
            match event {
                SessionEvent::Milestone { distance, message } => {
                    log::info!("{}m - {}", distance, message);
                }
                SessionEvent::Progress(p) if session.run().is_some_and(|r| r.frame % 600 == 0) => {
                    log::debug!(
                        "distance {:.1}, speed {:.2}, coins {}, smashed {}",
                        p.distance,
                        p.speed,
                        p.currency,
                        p.smashed
                    );
                }
                SessionEvent::RunEnded(s) => summary = Some(s),
                _ => {}
            }
        }

        if matches!(session.phase(), SessionPhase::GameOver { .. }) {
            break;
        }
    }

    match summary {
        Some(s) => println!(
            "Run over after {}m: {} coins, {} smashed, best {}m{}",
            s.distance,
            s.currency,
            s.smashed,
            s.high_score,
            if s.new_high_score { " (new best)" } else { "" }
        ),
        None => {
            let run = session.run();
            println!(
                "Autopilot survived {} frames, distance {:.0}m",
                MAX_FRAMES,
                run.map_or(0.0, |r| r.distance)
            );
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is clear_ahead::web::wasm_start, this is just to satisfy the compiler
}
