//! Медитация и её 2D-soundscape
//!
//! Во время медитации аватар обездвижен, а игрок двигает виртуального
//! слушателя стрелками по ограниченному прямоугольнику; громкость каждого
//! источника падает линейно с расстоянием. Конец медитации — dwell-таймер:
//! копим elapsed, на пороге срабатываем один раз и возвращаем управление.

use bevy::prelude::*;

use crate::components::{AudioEmitter, ControllerActive, Player};
use crate::input::PlayerInput;
use crate::logger;
use crate::SimulationSet;

/// Состояние медитации (explicit state machine, без корутин)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub enum MeditationState {
    #[default]
    Inactive,
    Running {
        elapsed: f32,
    },
    Finished,
}

impl MeditationState {
    pub fn is_running(&self) -> bool {
        matches!(self, MeditationState::Running { .. })
    }
}

/// Конфигурация soundscape-мини-сцены
#[derive(Resource, Debug, Clone)]
pub struct Soundscape {
    /// Позиция виртуального слушателя
    pub listener: Vec2,
    /// Шаг перемещения за тик при зажатой стрелке
    pub movement_step: f32,
    /// Дальность слышимости источника
    pub sound_range: f32,
    pub boundary_min: Vec2,
    pub boundary_max: Vec2,
    /// Длительность медитации до возврата управления (сек)
    pub meditation_duration: f32,
}

impl Default for Soundscape {
    fn default() -> Self {
        Self {
            listener: Vec2::ZERO,
            movement_step: 1.0,
            sound_range: 10.0,
            boundary_min: Vec2::new(-10.0, -10.0),
            boundary_max: Vec2::new(10.0, 10.0),
            meditation_duration: 60.0,
        }
    }
}

/// Источник шума в 2D-пространстве медитации
#[derive(Component, Debug, Clone, Copy)]
pub struct NoiseSource {
    pub position: Vec2,
}

/// Храп собаки — отдельный источник
#[derive(Component, Debug, Clone, Copy)]
pub struct SnoringSource {
    pub position: Vec2,
}

/// Система: тик медитации
///
/// Срабатывает один раз на пороге: возвращает управление аватару.
pub fn meditation_tick(
    time: Res<Time<Fixed>>,
    scape: Res<Soundscape>,
    mut state: ResMut<MeditationState>,
    mut avatars: Query<&mut ControllerActive, With<Player>>,
) {
    let MeditationState::Running { elapsed } = *state else {
        return;
    };

    let elapsed = elapsed + time.delta_secs();
    if elapsed >= scape.meditation_duration {
        *state = MeditationState::Finished;
        for mut controller in avatars.iter_mut() {
            controller.0 = true;
        }
        logger::log_info("Meditation finished, control returned");
    } else {
        *state = MeditationState::Running { elapsed };
    }
}

/// Система: запуск источников при входе в медитацию
///
/// Неназначенный клип — ошибка в лог, источник пропускается, кадр живёт.
pub fn soundscape_start(
    state: Res<MeditationState>,
    mut was_running: Local<bool>,
    mut sources: Query<(
        &mut AudioEmitter,
        Option<&NoiseSource>,
        Option<&SnoringSource>,
    )>,
) {
    let running = state.is_running();
    if running && !*was_running {
        for (mut emitter, noise, snoring) in sources.iter_mut() {
            if noise.is_none() && snoring.is_none() {
                continue;
            }
            match &emitter.clip {
                None => logger::log_error("A noise source has no audio clip assigned"),
                Some(_) => {
                    emitter.looping = true;
                    emitter.playing = true;
                }
            }
        }
    }
    *was_running = running;
}

/// Система: перемещение слушателя стрелками (с clamp к границам)
pub fn soundscape_movement(
    state: Res<MeditationState>,
    input: Res<PlayerInput>,
    mut scape: ResMut<Soundscape>,
) {
    if !state.is_running() || input.arrows == Vec2::ZERO {
        return;
    }

    let step = scape.movement_step;
    let next = scape.listener + input.arrows * step;
    scape.listener = next.clamp(scape.boundary_min, scape.boundary_max);
}

/// Система: громкость источников по расстоянию
///
/// volume = clamp01(1 − distance / sound_range)
pub fn soundscape_volumes(
    state: Res<MeditationState>,
    scape: Res<Soundscape>,
    mut noise: Query<(&NoiseSource, &mut AudioEmitter), Without<SnoringSource>>,
    mut snoring: Query<(&SnoringSource, &mut AudioEmitter), Without<NoiseSource>>,
) {
    if !state.is_running() {
        return;
    }

    for (source, mut emitter) in noise.iter_mut() {
        if emitter.clip.is_none() {
            continue;
        }
        let distance = scape.listener.distance(source.position);
        emitter.volume = (1.0 - distance / scape.sound_range).clamp(0.0, 1.0);
    }

    for (source, mut emitter) in snoring.iter_mut() {
        if emitter.clip.is_none() {
            continue;
        }
        let distance = scape.listener.distance(source.position);
        emitter.volume = (1.0 - distance / scape.sound_range).clamp(0.0, 1.0);
    }
}

pub struct SoundscapePlugin;

impl Plugin for SoundscapePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MeditationState>()
            .init_resource::<Soundscape>()
            .add_systems(
                FixedUpdate,
                (
                    meditation_tick,
                    soundscape_start,
                    soundscape_movement,
                    soundscape_volumes,
                )
                    .chain()
                    .in_set(SimulationSet::Soundscape),
            );
    }
}
