//! ECS Components для сцены Umwelts
//!
//! Организация по доменам:
//! - avatar: umwelt-режимы, настройки движения, kinematic state, Player marker
//! - camera: first-person камера (FOV, pitch, высота глаз)
//! - interaction: proximity-зоны, stage-машины пропов, dwell-таймеры
//! - scene: engine stand-ins (NodeToggle, UiText, AudioEmitter, overlay groups)

pub mod avatar;
pub mod camera;
pub mod interaction;
pub mod scene;

// Re-exports для удобного импорта
pub use avatar::*;
pub use camera::*;
pub use interaction::*;
pub use scene::*;
