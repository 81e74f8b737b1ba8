//! Umwelts Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: logic layer игры Umwelts (first-person
//! exploration, три umwelt-режима восприятия). Rendering/physics
//! resolution/input polling/audio mixing — на стороне host engine;
//! симуляция общается с ним через component stand-ins.
//!
//! Порядок тика фиксирован и явный (никаких engine lifecycle hooks):
//! locomotion → effects → interaction → soundscape → narrative →
//! camera rigs → input cleanup. Всё в FixedUpdate 60Hz.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

// Публичные модули
pub mod camera;
pub mod components;
pub mod effects;
pub mod input;
pub mod interaction;
pub mod locomotion;
pub mod logger;
pub mod narrative;
pub mod soundscape;
pub mod spawn;

// Re-export базовых компонентов для удобства
pub use camera::{CameraRigsPlugin, HeadBob, OrbitCamera};
pub use components::*;
pub use effects::{EffectsPlugin, SceneSelected, UmweltEffects};
pub use input::{clear_input_edges, PlayerInput};
pub use interaction::{HintTexts, InteractionPlugin};
pub use locomotion::{
    dog_jump_velocity, spawn_avatar, LocomotionPlugin, ModeChanged,
};
pub use logger::*;
pub use narrative::{
    IntroCamera, Narrative, NarrativePhase, NarrativePlugin, NarrativeScript, TextStep,
};
pub use soundscape::{MeditationState, NoiseSource, SnoringSource, Soundscape, SoundscapePlugin};
pub use spawn::{spawn_apartment, ApartmentScene};

/// Фазы тика симуляции — явный fixed-order update loop
///
/// Input сэмплируется хостом ДО тика; edge-флаги гасятся в InputCleanup.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Locomotion,
    Effects,
    Interaction,
    Soundscape,
    Narrative,
    CameraRigs,
    InputCleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<PlayerInput>()
            .init_resource::<AvatarConfig>()
            // Порядок фаз тика виден в одном месте
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Locomotion,
                    SimulationSet::Effects,
                    SimulationSet::Interaction,
                    SimulationSet::Soundscape,
                    SimulationSet::Narrative,
                    SimulationSet::CameraRigs,
                    SimulationSet::InputCleanup,
                )
                    .chain(),
            )
            // Подсистемы
            .add_plugins((
                LocomotionPlugin,
                EffectsPlugin,
                InteractionPlugin,
                SoundscapePlugin,
                NarrativePlugin,
                CameraRigsPlugin,
            ))
            .add_systems(
                FixedUpdate,
                clear_input_edges.in_set(SimulationSet::InputCleanup),
            );
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время продвигается вручную ровно на 1/60 за update — один FixedUpdate
/// на тик, детерминированные headless-прогоны.
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )))
        .insert_resource(Time::<Fixed>::from_hz(60.0));

    app
}

/// Snapshot мира для сравнения детерминизма
/// (упрощённая версия: Debug-байты компонентов, отсортированные по Entity)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
