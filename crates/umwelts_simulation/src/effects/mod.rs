//! Scene Effect Coordinator
//!
//! Явно сконструированный resource вместо скрытого singleton: собирается
//! в composition root сцены и инжектится в App. Реагирует на ModeChanged,
//! свапает глобальный post-processing профиль и держит инвариант
//! "максимум одна overlay-группа активна одновременно". Идемпотентен.

use bevy::prelude::*;

use crate::components::{
    EffectProfile, EffectVolume, NodeToggle, OverlayGroup, Player, SceneGroup, SceneKind,
    UmweltMode,
};
use crate::locomotion::ModeChanged;
use crate::logger;
use crate::SimulationSet;

/// Координатор сценовых эффектов
///
/// Все ссылки опциональны: отсутствующий volume/quad пишется в лог
/// и пропускается, кадр не прерывается.
#[derive(Resource, Debug, Clone, Default)]
pub struct UmweltEffects {
    /// Глобальный post-processing volume
    pub volume: Option<Entity>,
    /// Dog-view quad (активен только в режиме Dog)
    pub dog_view_quad: Option<Entity>,
    /// Последний применённый режим (для наблюдаемости/тестов)
    pub last_applied: Option<UmweltMode>,
    /// Применён ли стартовый эффект (первый тик сцены)
    pub initialized: bool,
}

impl EffectProfile {
    /// Профиль post-processing для режима
    pub fn for_mode(mode: UmweltMode) -> Self {
        match mode {
            UmweltMode::Person => EffectProfile::Default,
            UmweltMode::Dog => EffectProfile::Dog,
            UmweltMode::Bird => EffectProfile::Bird,
        }
    }
}

/// Event: запрос переключения группы сцены (город/лес/вода)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneSelected(pub SceneKind);

/// Система: применение umwelt-эффектов по смене режима
///
/// На первом тике применяет эффект текущего режима аватара (аналог
/// стартового ApplyEffect), дальше — только по ModeChanged. Повторное
/// применение того же режима наблюдаемо ничего не меняет.
pub fn apply_umwelt_effects(
    mut effects: ResMut<UmweltEffects>,
    mut mode_events: EventReader<ModeChanged>,
    avatars: Query<&UmweltMode, With<Player>>,
    mut volumes: Query<&mut EffectVolume>,
    mut overlays: Query<(&OverlayGroup, &mut NodeToggle)>,
    mut quads: Query<&mut NodeToggle, Without<OverlayGroup>>,
) {
    let mut requested: Option<UmweltMode> = None;

    if !effects.initialized {
        if let Some(mode) = avatars.iter().next() {
            requested = Some(*mode);
            effects.initialized = true;
        }
    }
    for event in mode_events.read() {
        requested = Some(event.current);
    }
    let Some(mode) = requested else {
        return;
    };

    // Post-processing профиль
    if let Some(volume) = effects.volume {
        match volumes.get_mut(volume) {
            Ok(mut v) => v.profile = EffectProfile::for_mode(mode),
            Err(_) => logger::log_warning("Effect volume reference is stale, skipping"),
        }
    }

    // Overlay-группы: сначала всё гасим, потом включаем максимум одну
    for (_, mut toggle) in overlays.iter_mut() {
        toggle.active = false;
    }
    for (group, mut toggle) in overlays.iter_mut() {
        if group.mode == mode {
            toggle.active = true;
        }
    }

    // Dog-view quad активен только в режиме Dog
    if let Some(quad) = effects.dog_view_quad {
        match quads.get_mut(quad) {
            Ok(mut toggle) => toggle.active = mode == UmweltMode::Dog,
            Err(_) => logger::log_warning("Dog view quad reference is stale, skipping"),
        }
    }

    effects.last_applied = Some(mode);
    logger::log(&format!("{:?} effect applied", mode));
}

/// Система: mutually exclusive переключение групп сцены
pub fn apply_scene_selection(
    mut events: EventReader<SceneSelected>,
    mut groups: Query<(&SceneGroup, &mut NodeToggle)>,
) {
    for SceneSelected(kind) in events.read().copied() {
        for (group, mut toggle) in groups.iter_mut() {
            toggle.active = group.kind == kind;
        }
        logger::log(&format!("Scene group {:?} shown", kind));
    }
}

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UmweltEffects>()
            .add_event::<SceneSelected>()
            .add_systems(
                FixedUpdate,
                (apply_umwelt_effects, apply_scene_selection)
                    .chain()
                    .in_set(SimulationSet::Effects),
            );
    }
}
