//! Headless симуляция Umwelts
//!
//! Запускает Bevy App без рендера: интро-сценарий, wake handoff,
//! немного ходьбы и смен режима — smoke-прогон всей сцены.

use bevy::prelude::*;
use umwelts_simulation::{
    create_headless_app, spawn_apartment, AvatarConfig, PlayerInput, SimulationPlugin, UmweltMode,
};

fn main() {
    println!("Starting Umwelts headless simulation");

    let mut app = create_headless_app();
    app.add_plugins(SimulationPlugin);

    let config = AvatarConfig::default();
    let scene = {
        let mut commands = app.world_mut().commands();
        spawn_apartment(&mut commands, &config)
    };

    // Интро: ждём конца текста, потом просыпаемся
    for _ in 0..400 {
        app.update();
    }
    app.world_mut().resource_mut::<PlayerInput>().wake = true;
    app.update();

    // Немного ходим и переключаем umwelt-режимы
    {
        let mut input = app.world_mut().resource_mut::<PlayerInput>();
        input.move_direction = Vec2::new(0.0, 1.0);
    }
    for tick in 0..600 {
        if tick == 200 {
            app.world_mut().resource_mut::<PlayerInput>().mode_select = Some(UmweltMode::Dog);
        }
        if tick == 400 {
            app.world_mut().resource_mut::<PlayerInput>().mode_select = Some(UmweltMode::Bird);
        }
        app.update();

        if tick % 100 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    let position = app
        .world()
        .get::<Transform>(scene.avatar)
        .map(|t| t.translation)
        .unwrap_or_default();
    println!("Avatar finished at {:?}", position);
    println!("Simulation complete!");
}
