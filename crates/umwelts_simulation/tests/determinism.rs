//! Тесты детерминизма headless-прогонов
//!
//! Один и тот же scripted-ввод даёт побайтово идентичные снепшоты мира:
//! время продвигается вручную, источников недетерминизма в тике нет.

use bevy::prelude::*;
use umwelts_simulation::*;

/// Полный сценарий: интро → wake → ходьба → смены режимов → прыжок птицы
fn run_scenario(ticks: usize) -> Vec<u8> {
    let mut app = create_headless_app();
    app.add_plugins(SimulationPlugin);

    let config = AvatarConfig::default();
    let _scene = {
        let mut commands = app.world_mut().commands();
        spawn_apartment(&mut commands, &config)
    };
    app.update();

    for tick in 0..ticks {
        {
            let mut input = app.world_mut().resource_mut::<PlayerInput>();
            match tick {
                300 => input.wake = true,
                310 => input.move_direction = Vec2::new(0.0, 1.0),
                400 => input.mode_select = Some(UmweltMode::Dog),
                450 => input.mode_select = Some(UmweltMode::Bird),
                460 => input.jump = true,
                520 => input.descend = true,
                _ => {}
            }
        }
        app.update();
    }

    let mut snapshot = world_snapshot::<Transform>(app.world_mut());
    snapshot.extend(world_snapshot::<UmweltMode>(app.world_mut()));
    snapshot.extend(world_snapshot::<FlightState>(app.world_mut()));
    snapshot
}

#[test]
fn test_determinism_two_runs() {
    const TICKS: usize = 600;

    let snapshot1 = run_scenario(TICKS);
    let snapshot2 = run_scenario(TICKS);

    assert_eq!(
        snapshot1, snapshot2,
        "Scripted run produced diverging world snapshots"
    );

    log("✓ Determinism: 2 identical scripted runs");
}

#[test]
fn test_determinism_multiple_runs() {
    const TICKS: usize = 400;

    let snapshots: Vec<_> = (0..3).map(|_| run_scenario(TICKS)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Run {} diverged from run 0",
            i
        );
    }
}
