//! Locomotion events

use bevy::prelude::*;

use crate::components::UmweltMode;

/// Event: режим аватара сменился
///
/// Генерируется:
/// - switch_mode system (edge-triggered клавиши режимов)
/// - первичное применение эффектов при старте сцены
///
/// Обрабатывается:
/// - apply_umwelt_effects (Scene Effect Coordinator)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChanged {
    pub previous: UmweltMode,
    pub current: UmweltMode,
}
