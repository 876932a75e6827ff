//! weapon-sim: headless scripted firing session.
//!
//! Runs each requested weapon (default: all) through a fixed 60 Hz script of
//! hip fire, moving fire, aimed fire and a manual reload, then prints a
//! summary. Reads `weapons.ron` from the working directory if present.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use engine_core::{FpsCamera, ManualClock, Time, Vec3};
use weapons::{ShotInfo, WeaponConfig, WeaponController, WeaponType};

const FRAME: f64 = 1.0 / 60.0;

#[derive(Debug, Default)]
struct SessionStats {
    shots: usize,
    max_deviation_deg: f32,
    max_recoil: f32,
    reloads_seen: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let weapons = std::env::args()
        .skip(1)
        .map(|arg| arg.parse::<WeaponType>().with_context(|| format!("bad weapon argument {arg:?}")))
        .collect::<Result<Vec<_>>>()?;
    let weapons = if weapons.is_empty() { WeaponType::ALL.to_vec() } else { weapons };

    let config = WeaponConfig::load();
    log::info!("Starting weapon-sim for {} weapon(s)", weapons.len());

    for weapon_type in weapons {
        let stats = run_session(weapon_type, &config);
        println!(
            "{:<7} shots {:>3}  max deviation {:>5.2}°  peak aim recoil {:.4} rad  reloads {}",
            weapon_type, stats.shots, stats.max_deviation_deg, stats.max_recoil, stats.reloads_seen
        );
    }
    Ok(())
}

fn run_session(weapon_type: WeaponType, config: &WeaponConfig) -> SessionStats {
    let clock = ManualClock::new();
    let mut time = Time::new(&clock);
    let shots: Rc<RefCell<Vec<ShotInfo>>> = Rc::default();
    let sink = Rc::clone(&shots);

    let mut controller = WeaponController::from_config(
        FpsCamera::new(Vec3::new(0.0, 1.7, 0.0)),
        clock.clone(),
        config,
        move |shot: &ShotInfo| sink.borrow_mut().push(shot.clone()),
    );
    controller.equip(weapon_type, format!("{} (sim)", weapon_type));

    let mut stats = SessionStats::default();
    let mut was_reloading = false;

    // 0-1 s moving hip fire, 1-2 s standing hip fire, 2-4 s aimed fire, then a manual reload.
    let script_end = 7.0;
    while time.elapsed_seconds() < script_end {
        let t = time.elapsed_seconds();
        controller.set_moving(t < 1.0);
        controller.set_aiming((2.0..4.0).contains(&t));

        if t < 4.0 {
            controller.shoot();
        } else if t < 4.0 + FRAME {
            controller.start_reload();
        }

        // The player pulls down against the climb, a little late.
        let pitch_before = controller.camera().pitch();
        if pitch_before > 0.0 {
            controller.camera_mut().process_mouse(0.0, pitch_before * 60.0);
        }

        clock.advance(FRAME);
        time.update(&clock);
        controller.tick(time.delta_seconds());

        let reloading = controller.current_weapon().is_some_and(|w| w.is_reloading);
        if reloading && !was_reloading {
            stats.reloads_seen += 1;
        }
        was_reloading = reloading;
        stats.max_recoil = stats.max_recoil.max(controller.weapon_state().current_recoil.length());
    }

    if let Some(weapon) = controller.current_weapon() {
        log::info!(
            "{} finished with {} after {} frames",
            weapon.display_name,
            weapon.ammo_display(),
            time.frame_count()
        );
    }

    let shots = shots.borrow();
    stats.shots = shots.len();
    stats.max_deviation_deg = shots
        .iter()
        .map(|s| s.direction.angle_between(Vec3::NEG_Z).to_degrees())
        .fold(0.0, f32::max);
    stats
}
