//! Scripted narrative: интро-последовательность и передача управления
//!
//! Строго упорядоченный single-pass автомат:
//! IntroDisplay → AwaitingWake → HandedOff (terminal).
//! Вместо engine-корутин — явные шаги с elapsed-in-step, продвигаемые
//! раз в тик. Параллельно с текстом идёт полноэкранный fade от чёрного.
//! Все ссылки на UI/камеру/аватара опциональны (log and continue).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{ControllerActive, FadeOverlay, NodeToggle, UiText};
use crate::input::PlayerInput;
use crate::logger;
use crate::SimulationSet;

/// Одна строка интро-текста
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeLine {
    pub text: String,
    /// Сколько секунд держать строку на экране (между fade-in и fade-out)
    pub hold: f32,
}

/// Сценарий интро (inspector-data аналог)
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeScript {
    pub lines: Vec<NarrativeLine>,
    /// Длительность полноэкранного fade-in от чёрного
    pub fade_duration: f32,
    /// Скорость fade текста (alpha в секунду; 2.0 == 0.5 сек на фейд)
    pub text_fade_rate: f32,
}

impl Default for NarrativeScript {
    fn default() -> Self {
        Self {
            lines: vec![NarrativeLine {
                text: "Tomorrow, 9 A.M.".to_string(),
                hold: 3.0,
            }],
            fade_duration: 3.0,
            text_fade_rate: 2.0,
        }
    }
}

/// Шаг показа одной строки
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextStep {
    FadeIn,
    Hold { elapsed: f32 },
    FadeOut,
}

/// Фаза narrative-автомата
#[derive(Debug, Clone, PartialEq)]
pub enum NarrativePhase {
    IntroDisplay { line: usize, step: TextStep },
    AwaitingWake,
    /// Terminal: управление отдано аватару, replay нет
    HandedOff,
}

/// Ссылки narrative на объекты сцены — все опциональны
#[derive(Debug, Clone, Copy, Default)]
pub struct NarrativeRefs {
    /// UiText интро-строк
    pub narrative_text: Option<Entity>,
    /// UiText «проснуться» prompt
    pub wake_prompt: Option<Entity>,
    /// FadeOverlay + NodeToggle полноэкранного затемнения
    pub fade_overlay: Option<Entity>,
    /// NodeToggle narrative-канваса
    pub canvas: Option<Entity>,
    /// NodeToggle + IntroCamera интро-камеры
    pub intro_camera: Option<Entity>,
    /// Аватар (ControllerActive включается при handoff)
    pub avatar: Option<Entity>,
    /// Первая интерактивная зона, активируемая при handoff
    pub first_zone: Option<Entity>,
}

/// Состояние narrative-последовательности
#[derive(Resource, Debug, Clone)]
pub struct Narrative {
    pub phase: NarrativePhase,
    /// Alpha текущей строки (автомат самодостаточен, UI — зеркало)
    pub text_alpha: f32,
    /// Прогресс полноэкранного fade-in
    pub fade_elapsed: f32,
    pub refs: NarrativeRefs,
}

impl Default for Narrative {
    fn default() -> Self {
        Self {
            phase: NarrativePhase::IntroDisplay {
                line: 0,
                step: TextStep::FadeIn,
            },
            text_alpha: 0.0,
            fade_elapsed: 0.0,
            refs: NarrativeRefs::default(),
        }
    }
}

/// Интро-камера: лёгкое покачивание за мышью вокруг стартовой ориентации
#[derive(Component, Debug, Clone)]
pub struct IntroCamera {
    pub sensitivity: f32,
    /// Максимальный наклон от стартовой ориентации (градусы)
    pub max_tilt: f32,
    pub initial: Quat,
    pub target: Quat,
}

impl Default for IntroCamera {
    fn default() -> Self {
        Self {
            sensitivity: 0.3,
            max_tilt: 90.0,
            initial: Quat::IDENTITY,
            target: Quat::IDENTITY,
        }
    }
}

/// Система: тик narrative-автомата
pub fn narrative_tick(
    time: Res<Time<Fixed>>,
    input: Res<PlayerInput>,
    script: Res<NarrativeScript>,
    mut narrative: ResMut<Narrative>,
    mut texts: Query<&mut UiText>,
    mut overlays: Query<(&mut FadeOverlay, &mut NodeToggle)>,
    mut toggles: Query<&mut NodeToggle, Without<FadeOverlay>>,
    mut controllers: Query<&mut ControllerActive>,
) {
    let delta = time.delta_secs();

    // Полноэкранный fade-in от чёрного (идёт параллельно тексту)
    if narrative.fade_elapsed < script.fade_duration {
        narrative.fade_elapsed += delta;
        let progress = (narrative.fade_elapsed / script.fade_duration).min(1.0);
        if let Some(entity) = narrative.refs.fade_overlay {
            if let Ok((mut overlay, mut toggle)) = overlays.get_mut(entity) {
                overlay.alpha = 1.0 - progress;
                if progress >= 1.0 {
                    toggle.active = false;
                }
            }
        }
    }

    match narrative.phase.clone() {
        NarrativePhase::IntroDisplay { line, step } => {
            let Some(current) = script.lines.get(line) else {
                // Пустой сценарий — сразу ждём пробуждения
                show_wake_prompt(&narrative.refs, &mut texts);
                narrative.phase = NarrativePhase::AwaitingWake;
                return;
            };

            let (next_step, line_done) = match step {
                TextStep::FadeIn => {
                    narrative.text_alpha =
                        (narrative.text_alpha + script.text_fade_rate * delta).min(1.0);
                    if narrative.text_alpha >= 1.0 {
                        (TextStep::Hold { elapsed: 0.0 }, false)
                    } else {
                        (TextStep::FadeIn, false)
                    }
                }
                TextStep::Hold { elapsed } => {
                    let elapsed = elapsed + delta;
                    if elapsed >= current.hold {
                        (TextStep::FadeOut, false)
                    } else {
                        (TextStep::Hold { elapsed }, false)
                    }
                }
                TextStep::FadeOut => {
                    narrative.text_alpha =
                        (narrative.text_alpha - script.text_fade_rate * delta).max(0.0);
                    if narrative.text_alpha <= 0.0 {
                        (TextStep::FadeIn, true)
                    } else {
                        (TextStep::FadeOut, false)
                    }
                }
            };

            // Зеркалим состояние строки в UI-текст (опционален)
            if let Some(entity) = narrative.refs.narrative_text {
                if let Ok(mut text) = texts.get_mut(entity) {
                    text.text = current.text.clone();
                    text.alpha = narrative.text_alpha;
                    text.visible = true;
                }
            }

            if line_done {
                if line + 1 < script.lines.len() {
                    narrative.phase = NarrativePhase::IntroDisplay {
                        line: line + 1,
                        step: TextStep::FadeIn,
                    };
                } else {
                    if let Some(entity) = narrative.refs.narrative_text {
                        if let Ok(mut text) = texts.get_mut(entity) {
                            text.visible = false;
                        }
                    }
                    show_wake_prompt(&narrative.refs, &mut texts);
                    narrative.phase = NarrativePhase::AwaitingWake;
                    logger::log("Narrative intro finished, waiting for wake input");
                }
            } else {
                narrative.phase = NarrativePhase::IntroDisplay {
                    line,
                    step: next_step,
                };
            }
        }

        NarrativePhase::AwaitingWake => {
            if input.wake {
                hand_off_control(&narrative.refs, &mut texts, &mut toggles, &mut controllers);
                narrative.phase = NarrativePhase::HandedOff;
            }
        }

        // Terminal, replay нет
        NarrativePhase::HandedOff => {}
    }
}

fn show_wake_prompt(refs: &NarrativeRefs, texts: &mut Query<&mut UiText>) {
    if let Some(entity) = refs.wake_prompt {
        match texts.get_mut(entity) {
            Ok(mut text) => text.visible = true,
            Err(_) => logger::log_warning("Wake prompt reference missing, skipping"),
        }
    }
}

/// Необратимая передача управления аватару
fn hand_off_control(
    refs: &NarrativeRefs,
    texts: &mut Query<&mut UiText>,
    toggles: &mut Query<&mut NodeToggle, Without<FadeOverlay>>,
    controllers: &mut Query<&mut ControllerActive>,
) {
    if let Some(entity) = refs.intro_camera {
        match toggles.get_mut(entity) {
            Ok(mut toggle) => toggle.active = false,
            Err(_) => logger::log_warning("Intro camera reference missing, skipping"),
        }
    }
    if let Some(entity) = refs.avatar {
        match controllers.get_mut(entity) {
            Ok(mut controller) => controller.0 = true,
            Err(_) => logger::log_warning("Avatar reference missing, skipping"),
        }
    }
    if let Some(entity) = refs.wake_prompt {
        if let Ok(mut text) = texts.get_mut(entity) {
            text.visible = false;
        }
    }
    if let Some(entity) = refs.canvas {
        if let Ok(mut toggle) = toggles.get_mut(entity) {
            toggle.active = false;
        }
    }
    if let Some(entity) = refs.first_zone {
        if let Ok(mut toggle) = toggles.get_mut(entity) {
            toggle.active = true;
        }
    }
    logger::log_info("Control handed to the avatar");
}

/// Система: покачивание интро-камеры за мышью
///
/// Target-ориентация — небольшие офсеты от стартовой, приближение
/// экспоненциальным сглаживанием. Работает только пока камера активна.
pub fn intro_camera_sway(
    time: Res<Time<Fixed>>,
    input: Res<PlayerInput>,
    mut cameras: Query<(&mut IntroCamera, &mut Transform, &NodeToggle)>,
) {
    let delta = time.delta_secs();

    for (mut camera, mut transform, toggle) in cameras.iter_mut() {
        if !toggle.active {
            continue;
        }

        let mouse = input.mouse_delta * camera.sensitivity;
        let right: Vec3 = *transform.right();
        let x_rotation = Quat::from_axis_angle(right, (-mouse.y * camera.max_tilt).to_radians());
        let y_rotation = Quat::from_rotation_y((mouse.x * camera.max_tilt).to_radians());
        camera.target = camera.initial * x_rotation * y_rotation;

        let t = (delta * 2.0).min(1.0);
        transform.rotation = transform.rotation.slerp(camera.target, t);
    }
}

pub struct NarrativePlugin;

impl Plugin for NarrativePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NarrativeScript>()
            .init_resource::<Narrative>()
            .add_systems(
                FixedUpdate,
                (narrative_tick, intro_camera_sway)
                    .chain()
                    .in_set(SimulationSet::Narrative),
            );
    }
}
