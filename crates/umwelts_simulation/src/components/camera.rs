//! Camera компоненты аватара
//!
//! Камера не рендерит ничего в headless-симуляции: компонент хранит
//! field-of-view, pitch и высоту глаз, которые engine adapter применил бы
//! к реальной камере.

use bevy::prelude::*;

/// First-person камера аватара
///
/// Yaw применяется к Transform самого аватара (heading), pitch — только
/// к камере. Pitch НЕ клампится: оригинальный контроллер оставил его
/// неограниченным (в отличие от orbit-рига).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct AvatarCamera {
    /// Текущий field-of-view (градусы)
    pub fov: f32,
    /// FOV по умолчанию, запоминается при старте
    pub default_fov: f32,
    /// Pitch камеры (градусы, без ограничений)
    pub pitch_deg: f32,
    /// Высота глаз над Transform аватара (= height активного режима)
    pub eye_height: f32,
    /// Вертикальное смещение head bob (пишет head_bob system)
    pub bob_offset: f32,
}

impl Default for AvatarCamera {
    fn default() -> Self {
        Self {
            fov: 60.0,
            default_fov: 60.0,
            pitch_deg: 0.0,
            eye_height: 1.0,
            bob_offset: 0.0,
        }
    }
}

impl AvatarCamera {
    /// FOV = default * multiplier (режим Bird)
    pub fn adjust_fov(&mut self, multiplier: f32) {
        self.fov = self.default_fov * multiplier;
    }

    /// Возврат к FOV по умолчанию (Person/Dog)
    pub fn reset_fov(&mut self) {
        self.fov = self.default_fov;
    }

    /// Мировая позиция глаз для данного Transform аватара
    pub fn eye_position(&self, avatar: &Transform) -> Vec3 {
        avatar.translation + Vec3::Y * (self.eye_height + self.bob_offset)
    }
}
