//! Avatar компоненты: umwelt-режимы, настройки движения, kinematic state
//!
//! Архитектура:
//! - UmweltMode — единственный writer это switch_mode system (frame-serialized)
//! - Settings-бандлы читаются из AvatarConfig, после старта не мутируются
//! - Позиция/ориентация живут на Transform (physics body stand-in)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Umwelt-режим аватара (каким существом игрок воспринимает сцену)
///
/// Ровно один активен. Переключается только switch_mode system
/// по edge-triggered клавишам, guards нет — любой режим достижим из любого.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub enum UmweltMode {
    #[default]
    Person,
    Dog,
    Bird,
}

/// Настройки движения для наземного режима (immutable после старта)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementSettings {
    /// Высота capsule (и камеры) в метрах
    pub height: f32,
    /// Скорость ходьбы (m/s)
    pub walk_speed: f32,
    /// Скорость бега (m/s, только Person)
    pub run_speed: f32,
    /// Радиус capsule коллайдера
    pub radius: f32,
}

/// Настройки птичьего полёта (sub-state-machine режима Bird)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirdSettings {
    /// Скорость ходьбы по земле (m/s)
    pub ground_speed: f32,
    /// Горизонтальная скорость в hover (m/s)
    pub fly_speed: f32,
    /// Высота зависания над точкой взлёта (m)
    pub hover_height: f32,
    /// Скорость набора высоты (m/s)
    pub ascent_speed: f32,
    /// Скорость снижения (m/s)
    pub descent_speed: f32,
    /// Множитель field-of-view в режиме птицы
    pub fov_multiplier: f32,
}

/// Полная конфигурация аватара (inspector-data аналог)
///
/// Создаётся при старте, дальше read-only. Значения по умолчанию —
/// из оригинальной сцены.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct AvatarConfig {
    pub person: MovementSettings,
    pub dog: MovementSettings,
    pub bird: MovementSettings,
    pub avian: BirdSettings,
    /// Радиус generic-зон контроллера (интеракции, dog jump)
    pub interaction_radius: f32,
    /// Чувствительность мыши (градусы на unit дельты)
    pub mouse_sensitivity: f32,
    /// Сила прыжка собаки
    pub dog_jump_force: f32,
    /// Гравитация (положительная константа, вычитается из velocity.y)
    pub gravity: f32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            person: MovementSettings {
                height: 1.0,
                walk_speed: 3.0,
                run_speed: 5.0,
                radius: 0.3,
            },
            dog: MovementSettings {
                height: 0.5,
                walk_speed: 4.0,
                run_speed: 4.0,
                radius: 0.3,
            },
            bird: MovementSettings {
                height: 0.3,
                walk_speed: 2.0,
                run_speed: 2.0,
                radius: 0.2,
            },
            avian: BirdSettings {
                ground_speed: 2.0,
                fly_speed: 4.0,
                hover_height: 0.5,
                ascent_speed: 3.0,
                descent_speed: 3.0,
                fov_multiplier: 1.5,
            },
            interaction_radius: 2.0,
            mouse_sensitivity: 2.0,
            dog_jump_force: 4.0,
            gravity: 9.81,
        }
    }
}

impl AvatarConfig {
    /// Настройки движения для конкретного режима
    pub fn settings(&self, mode: UmweltMode) -> &MovementSettings {
        match mode {
            UmweltMode::Person => &self.person,
            UmweltMode::Dog => &self.dog,
            UmweltMode::Bird => &self.bird,
        }
    }
}

/// Kinematic state аватара (velocity + ground contact)
///
/// Velocity интегрируем сами, Rapier используется только для коллайдера.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct KinematicBody {
    pub velocity: Vec3,
    /// На земле ли аватар (floor plane y=0, headless ground check)
    pub grounded: bool,
}

/// Состояние птичьего полёта (hover sub-state-machine)
///
/// Инварианты:
/// - hovering выставляется только командой ascend с земли
/// - landing завершается ТОЛЬКО когда descending && grounded одновременно
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct FlightState {
    pub hovering: bool,
    pub ascending: bool,
    pub descending: bool,
    /// Целевая высота зависания (y точки взлёта + hover_height)
    pub target_hover_y: f32,
    /// Знаковая вертикальная скорость в hover (ascent/descent ramp)
    pub vertical_speed: f32,
}

impl FlightState {
    /// Сброс всех флагов полёта (вызывается при смене режима)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Что аватар "видит" вокруг себя в этом тике (generic-зоны контроллера)
///
/// Пишется interaction systems, читается locomotion (dog jump) и hint-текстами.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ZoneSense {
    /// В радиусе хотя бы одной интерактивной зоны
    pub can_interact: bool,
    /// В радиусе хотя бы одной dog-jump зоны
    pub can_dog_jump: bool,
}

/// Marker component для player-controlled entity
///
/// В single-player сцене ровно один entity несёт этот компонент.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Включён ли контроллер аватара
///
/// false — пока narrative не отдал управление, и во время медитации
/// (аналог выключенного CharacterController). Locomotion systems
/// пропускают аватара с выключенным контроллером.
#[derive(Component, Debug, Clone, Copy)]
pub struct ControllerActive(pub bool);

impl Default for ControllerActive {
    fn default() -> Self {
        Self(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_default_is_person() {
        assert_eq!(UmweltMode::default(), UmweltMode::Person);
    }

    #[test]
    fn test_config_settings_lookup() {
        let config = AvatarConfig::default();
        assert_eq!(config.settings(UmweltMode::Person).walk_speed, 3.0);
        assert_eq!(config.settings(UmweltMode::Bird).walk_speed, 2.0);
    }

    #[test]
    fn test_flight_state_reset() {
        let mut flight = FlightState {
            hovering: true,
            ascending: true,
            descending: false,
            target_hover_y: 3.5,
            vertical_speed: 3.0,
        };
        flight.reset();
        assert!(!flight.hovering);
        assert!(!flight.ascending);
        assert_eq!(flight.vertical_speed, 0.0);
    }
}
