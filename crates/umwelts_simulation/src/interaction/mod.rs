//! Интерактивные пропы: proximity-зоны, stage-машины, dwell-таймеры
//!
//! Все пропы сцены — один настраиваемый автомат (Mealy): переход строго по
//! конъюнкции occupied && required mode && interact edge. Sticky-эффекты
//! (ActivateNode) выход из зоны не трогает; prompt-текст и счётчик стадий
//! сбрасываются.

use bevy::prelude::*;

use crate::components::{
    ControllerActive, DogJumpRegion, InteractionStage, InteractionZone, LampLight, NodeToggle,
    Player, PresenceHint, PromptText, StageEffect, StageTable, UiText, UmweltMode, ZoneSense,
    ZoneTimer,
};
use crate::input::PlayerInput;
use crate::logger;
use crate::soundscape::MeditationState;
use crate::SimulationSet;

/// Hint-тексты контроллера (interact / dog jump), опциональны
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct HintTexts {
    pub interact: Option<Entity>,
    pub jump: Option<Entity>,
}

/// Система: occupancy всех proximity-зон (enter/exit)
///
/// Выход из зоны сбрасывает стадию в 0 и гасит prompt-текст; sticky
/// активации не трогаем. Зона с выключенным NodeToggle не занимается.
pub fn update_zone_occupancy(
    avatars: Query<&Transform, With<Player>>,
    mut zones: Query<(
        &Transform,
        &mut InteractionZone,
        Option<&mut InteractionStage>,
        Option<&PromptText>,
        Option<&NodeToggle>,
    )>,
    mut texts: Query<&mut UiText>,
) {
    let Some(avatar_pos) = avatars.iter().next().map(|t| t.translation) else {
        return;
    };

    for (zone_transform, mut zone, stage, prompt, toggle) in zones.iter_mut() {
        let enabled = toggle.map(|t| t.active).unwrap_or(true);
        let inside =
            enabled && avatar_pos.distance(zone_transform.translation) < zone.radius;

        if inside && !zone.occupied {
            zone.occupied = true;
        } else if !inside && zone.occupied {
            zone.occupied = false;

            // Сброс состояния при выходе (независимо от достигнутой стадии)
            if let Some(mut stage) = stage {
                stage.0 = 0;
            }
            if let Some(prompt) = prompt {
                if let Ok(mut text) = texts.get_mut(prompt.text) {
                    text.visible = false;
                }
            }
        }
    }
}

/// Система: что аватар "чувствует" вокруг + hint-тексты
///
/// can_interact — занята хоть одна stage-зона текущего режима;
/// can_dog_jump — занята хоть одна dog-jump зона. Hint'ы показываются
/// только в соответствующем режиме.
pub fn update_zone_sense(
    mut avatars: Query<(&UmweltMode, &mut ZoneSense), With<Player>>,
    zones: Query<(
        &InteractionZone,
        Option<&StageTable>,
        Option<&DogJumpRegion>,
    )>,
    hints: Res<HintTexts>,
    mut texts: Query<&mut UiText>,
) {
    let Some((mode, mut sense)) = avatars.iter_mut().next() else {
        return;
    };
    let mode = *mode;

    let mut can_interact = false;
    let mut can_dog_jump = false;
    for (zone, table, jump_region) in zones.iter() {
        if !zone.occupied {
            continue;
        }
        if let Some(table) = table {
            if table.required_mode == mode {
                can_interact = true;
            }
        }
        if jump_region.is_some() {
            can_dog_jump = true;
        }
    }
    sense.can_interact = can_interact;
    sense.can_dog_jump = can_dog_jump;

    if let Some(hint) = hints.interact {
        if let Ok(mut text) = texts.get_mut(hint) {
            text.visible = can_interact && mode == UmweltMode::Person;
        }
    }
    if let Some(hint) = hints.jump {
        if let Ok(mut text) = texts.get_mut(hint) {
            text.visible = can_dog_jump && mode == UmweltMode::Dog;
        }
    }
}

/// Система: продвижение stage-машин пропов по interact edge
pub fn advance_prop_stages(
    input: Res<PlayerInput>,
    mut avatars: Query<(&UmweltMode, &mut ControllerActive), With<Player>>,
    mut props: Query<(&InteractionZone, &StageTable, &mut InteractionStage)>,
    mut texts: Query<&mut UiText>,
    mut nodes: Query<&mut NodeToggle>,
    mut lights: Query<&mut LampLight>,
    mut meditation: ResMut<MeditationState>,
) {
    if !input.interact {
        return;
    }
    let Some((mode, mut controller)) = avatars.iter_mut().next() else {
        return;
    };
    if !controller.0 {
        return;
    }
    let mode = *mode;

    for (zone, table, mut stage) in props.iter_mut() {
        if !zone.occupied || table.required_mode != mode {
            continue;
        }

        if let Some(row) = table.row(stage.0) {
            for effect in row {
                fire_stage_effect(
                    effect,
                    &mut texts,
                    &mut nodes,
                    &mut lights,
                    &mut *meditation,
                    &mut *controller,
                );
            }
        }
        stage.0 = stage.0.saturating_add(1);
    }
}

fn fire_stage_effect(
    effect: &StageEffect,
    texts: &mut Query<&mut UiText>,
    nodes: &mut Query<&mut NodeToggle>,
    lights: &mut Query<&mut LampLight>,
    meditation: &mut MeditationState,
    controller: &mut ControllerActive,
) {
    match effect {
        StageEffect::ShowText(target) => match texts.get_mut(*target) {
            Ok(mut text) => text.visible = true,
            Err(_) => logger::log_warning("Stage text reference missing, skipping"),
        },
        StageEffect::HideText(target) => {
            if let Ok(mut text) = texts.get_mut(*target) {
                text.visible = false;
            }
        }
        StageEffect::ToggleNode(target) => match nodes.get_mut(*target) {
            Ok(mut toggle) => toggle.active = !toggle.active,
            Err(_) => logger::log_warning("Stage node reference missing, skipping"),
        },
        StageEffect::ActivateNode(target) => match nodes.get_mut(*target) {
            Ok(mut toggle) => {
                // Только если неактивен; активация sticky
                if !toggle.active {
                    toggle.active = true;
                    logger::log(&format!("Activated: {:?}", target));
                }
            }
            Err(_) => logger::log_warning("Stage node reference missing, skipping"),
        },
        StageEffect::LightOn(target) => match lights.get_mut(*target) {
            Ok(mut light) => light.on = true,
            Err(_) => logger::log_warning("Lamp light reference missing, skipping"),
        },
        StageEffect::BeginMeditation => {
            *meditation = MeditationState::Running { elapsed: 0.0 };
            // Контроллер выключается на время медитации
            controller.0 = false;
            logger::log_info("Meditation started");
        }
    }
}

/// Система: presence-пропы (текст видим, пока аватар в зоне в нужном режиме)
pub fn presence_hints(
    avatars: Query<&UmweltMode, With<Player>>,
    props: Query<(&InteractionZone, &PresenceHint)>,
    mut texts: Query<&mut UiText>,
) {
    let Some(mode) = avatars.iter().next() else {
        return;
    };

    for (zone, hint) in props.iter() {
        let visible = zone.occupied && hint.required_mode == *mode;
        if let Ok(mut text) = texts.get_mut(hint.text) {
            text.visible = visible;
        }
    }
}

/// Система: dwell-таймеры зон
///
/// Копит elapsed, пока зона занята в требуемом режиме; на пороге срабатывает
/// один раз; при выходе (или смене режима) сбрасывается и может сработать
/// снова при следующем заходе.
pub fn zone_dwell_timers(
    time: Res<Time<Fixed>>,
    avatars: Query<&UmweltMode, With<Player>>,
    mut zones: Query<(&InteractionZone, &mut ZoneTimer)>,
    mut nodes: Query<&mut NodeToggle>,
) {
    let delta = time.delta_secs();
    let Some(mode) = avatars.iter().next() else {
        return;
    };

    for (zone, mut timer) in zones.iter_mut() {
        let engaged =
            zone.occupied && timer.required_mode.map_or(true, |required| required == *mode);

        if engaged {
            timer.elapsed += delta;
            if !timer.fired && timer.elapsed >= timer.threshold {
                timer.fired = true;
                if let Some(target) = timer.activate {
                    match nodes.get_mut(target) {
                        Ok(mut toggle) => toggle.active = true,
                        Err(_) => {
                            logger::log_warning("Zone timer target missing, skipping")
                        }
                    }
                }
                logger::log("Zone dwell timer fired");
            }
        } else {
            timer.elapsed = 0.0;
            timer.fired = false;
        }
    }
}

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HintTexts>().add_systems(
            FixedUpdate,
            (
                update_zone_occupancy,
                update_zone_sense,
                advance_prop_stages,
                presence_hints,
                zone_dwell_timers,
            )
                .chain()
                .in_set(SimulationSet::Interaction),
        );
    }
}
