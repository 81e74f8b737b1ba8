//! Engine-collaborator stand-ins: активация объектов, UI-текст, звук, свет
//!
//! Хост-движок владеет рендером/микшером/виджетами; симуляция видит только
//! эти компоненты. Все ссылки на них опциональны (§ error policy:
//! отсутствует — пишем в лог и пропускаем, кадр не прерываем).

use bevy::prelude::*;

/// Активность engine-объекта (аналог SetActive)
#[derive(Component, Debug, Clone, Copy)]
pub struct NodeToggle {
    pub active: bool,
}

impl NodeToggle {
    pub fn off() -> Self {
        Self { active: false }
    }

    pub fn on() -> Self {
        Self { active: true }
    }
}

/// UI-текст (prompt, narrative line). Alpha для fade-анимаций narrative.
#[derive(Component, Debug, Clone)]
pub struct UiText {
    pub text: String,
    pub visible: bool,
    pub alpha: f32,
}

impl UiText {
    /// Скрытый текст (как стартуют все prompt-тексты сцены)
    pub fn hidden(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: false,
            alpha: 1.0,
        }
    }
}

/// Audio source stand-in: play/loop/volume
///
/// clip = None означает неназначенный клип: поведение пропускается с логом.
#[derive(Component, Debug, Clone)]
pub struct AudioEmitter {
    pub clip: Option<String>,
    pub playing: bool,
    pub looping: bool,
    pub volume: f32,
}

impl AudioEmitter {
    pub fn with_clip(clip: impl Into<String>) -> Self {
        Self {
            clip: Some(clip.into()),
            playing: false,
            looping: false,
            volume: 1.0,
        }
    }

    /// Emitter без клипа (для log-and-skip пути)
    pub fn empty() -> Self {
        Self {
            clip: None,
            playing: false,
            looping: false,
            volume: 1.0,
        }
    }
}

/// Точечный свет лампы (вкл/выкл)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LampLight {
    pub on: bool,
}

/// Полноэкранный fade overlay (чёрный, alpha 1 = полностью тёмный)
#[derive(Component, Debug, Clone, Copy)]
pub struct FadeOverlay {
    pub alpha: f32,
}

/// Группа overlay/particle-эффектов одного umwelt-режима
///
/// Инвариант координатора: активна максимум одна группа одновременно.
#[derive(Component, Debug, Clone, Copy)]
pub struct OverlayGroup {
    pub mode: crate::components::UmweltMode,
}

/// Глобальный post-processing volume (swap профиля по режиму)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectVolume {
    pub profile: EffectProfile,
}

/// Профиль post-processing (volume profile asset stand-in)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectProfile {
    #[default]
    Default,
    Dog,
    Bird,
}

/// Визуальная модель, привязанная к режиму (dog body mesh, dog particles)
///
/// switch_mode активирует её только когда активен её режим.
#[derive(Component, Debug, Clone, Copy)]
pub struct ModeModel {
    pub mode: crate::components::UmweltMode,
}

/// Переключаемая группа сцены (город/лес/вода) — mutually exclusive
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneGroup {
    pub kind: SceneKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    City,
    Forest,
    Water,
}
