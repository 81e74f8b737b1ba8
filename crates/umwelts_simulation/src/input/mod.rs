//! Player input surface
//!
//! Хост (или тест) пишет PlayerInput resource ПЕРЕД тиком; системы читают
//! его в течение тика; clear_input_edges гасит edge-флаги в конце chain.
//! Никакого device polling внутри симуляции — remapping surface нет.
//!
//! Оригинальная раскладка вешает Space сразу на interact/jump/ascend/wake,
//! а S — на "назад" и descend. Здесь это РАЗНЫЕ логические входы: adapter
//! волен поднять несколько флагов с одной физической клавиши.

use bevy::prelude::*;

use crate::components::UmweltMode;

/// Сэмпл входа на один тик
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    /// Направление движения: x вправо, y вперёд (нормализует adapter)
    pub move_direction: Vec2,
    /// Sprint modifier (held, только Person)
    pub sprint: bool,
    /// Jump / ascend (edge)
    pub jump: bool,
    /// Interact (edge)
    pub interact: bool,
    /// Descend (edge, режим Bird)
    pub descend: bool,
    /// "Проснуться" в narrative-интро (edge)
    pub wake: bool,
    /// Запрос смены режима (edge, три выделенные клавиши)
    pub mode_select: Option<UmweltMode>,
    /// Дельта мыши за кадр (look)
    pub mouse_delta: Vec2,
    /// Дельта колеса за кадр (zoom orbit-рига)
    pub scroll: f32,
    /// Зажата ли кнопка orbit drag (held)
    pub orbit_drag: bool,
    /// Стрелки для soundscape-мини-сцены (held)
    pub arrows: Vec2,
}

impl PlayerInput {
    /// Сброс edge-флагов и per-frame дельт. Held-поля не трогаем.
    pub fn clear_edges(&mut self) {
        self.jump = false;
        self.interact = false;
        self.descend = false;
        self.wake = false;
        self.mode_select = None;
        self.mouse_delta = Vec2::ZERO;
        self.scroll = 0.0;
    }
}

/// Система: сброс edge-флагов в конце тика
///
/// Один записанный хостом edge живёт ровно один FixedUpdate.
pub fn clear_input_edges(mut input: ResMut<PlayerInput>) {
    input.clear_edges();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_edges_keeps_held_state() {
        let mut input = PlayerInput {
            move_direction: Vec2::new(0.0, 1.0),
            sprint: true,
            jump: true,
            interact: true,
            mode_select: Some(UmweltMode::Dog),
            mouse_delta: Vec2::splat(3.0),
            ..default()
        };
        input.clear_edges();

        assert!(!input.jump);
        assert!(!input.interact);
        assert!(input.mode_select.is_none());
        assert_eq!(input.mouse_delta, Vec2::ZERO);
        // held-поля переживают сброс
        assert!(input.sprint);
        assert_eq!(input.move_direction, Vec2::new(0.0, 1.0));
    }
}
