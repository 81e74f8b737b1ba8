//! Interaction компоненты: proximity-зоны, stage-машины пропов
//!
//! Один настраиваемый проп вместо россыпи почти одинаковых скриптов:
//! {радиус, требуемый режим, таблица стадий, эффекты на стадию}.
//! Переходы — чистый Mealy-автомат: occupied && mode && interact edge.

use bevy::prelude::*;

use super::UmweltMode;

/// Сферическая proximity-зона пропа
///
/// occupied мутируется только zone-occupancy system (enter/exit).
#[derive(Component, Debug, Clone, Copy)]
pub struct InteractionZone {
    pub radius: f32,
    pub occupied: bool,
}

impl InteractionZone {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            occupied: false,
        }
    }
}

/// Счётчик стадий пропа
///
/// Инвариант: растёт только по interact edge при occupied && required mode;
/// сбрасывается в 0 при выходе из зоны (независимо от текущей стадии).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct InteractionStage(pub u8);

/// Side effect одной стадии
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEffect {
    /// Показать UI-текст
    ShowText(Entity),
    /// Скрыть UI-текст
    HideText(Entity),
    /// Перещёлкнуть активность узла (computer screen)
    ToggleNode(Entity),
    /// Активировать узел, если неактивен. Sticky: выход из зоны не гасит.
    ActivateNode(Entity),
    /// Включить свет лампы
    LightOn(Entity),
    /// Начать медитацию (bed, стадия 1)
    BeginMeditation,
}

/// Что делать, когда стадии кончились
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageAdvance {
    /// Дальнейшие нажатия — no-op (lamp, bed)
    #[default]
    Saturate,
    /// Вернуться к стадии 0 (computer screen toggle каждым нажатием)
    Loop,
}

/// Data-driven таблица стадий пропа
///
/// Строка = эффекты одного нажатия. Требуемый режим — часть пропа,
/// не таблицы: один проп == одна зона == один режим.
#[derive(Component, Debug, Clone)]
pub struct StageTable {
    pub required_mode: UmweltMode,
    pub rows: Vec<Vec<StageEffect>>,
    pub advance: StageAdvance,
}

impl StageTable {
    pub fn new(required_mode: UmweltMode, rows: Vec<Vec<StageEffect>>) -> Self {
        Self {
            required_mode,
            rows,
            advance: StageAdvance::Saturate,
        }
    }

    pub fn looping(required_mode: UmweltMode, rows: Vec<Vec<StageEffect>>) -> Self {
        Self {
            required_mode,
            rows,
            advance: StageAdvance::Loop,
        }
    }

    /// Строка эффектов для текущей стадии (None когда saturated)
    pub fn row(&self, stage: u8) -> Option<&[StageEffect]> {
        let idx = match self.advance {
            StageAdvance::Saturate => stage as usize,
            StageAdvance::Loop => {
                if self.rows.is_empty() {
                    return None;
                }
                stage as usize % self.rows.len()
            }
        };
        self.rows.get(idx).map(|row| row.as_slice())
    }
}

/// Prompt-текст пропа, который скрывается при выходе из зоны
///
/// Активация через ActivateNode — sticky и НЕ сбрасывается; этот компонент
/// помечает только то, что гаснет вместе со сбросом стадии.
#[derive(Component, Debug, Clone, Copy)]
pub struct PromptText {
    pub text: Entity,
}

/// Presence-проп без стадий (bed smell): текст видим, пока аватар в зоне
/// и в требуемом режиме.
#[derive(Component, Debug, Clone, Copy)]
pub struct PresenceHint {
    pub required_mode: UmweltMode,
    pub text: Entity,
}

/// Marker: зона разрешает dog jump
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct DogJumpRegion;

/// Dwell-таймер зоны: копит время в зоне, срабатывает один раз на пороге,
/// сбрасывается при выходе.
#[derive(Component, Debug, Clone)]
pub struct ZoneTimer {
    /// Требуемый режим (None — любой)
    pub required_mode: Option<UmweltMode>,
    pub threshold: f32,
    pub elapsed: f32,
    pub fired: bool,
    /// Узел, активируемый при срабатывании (опционален)
    pub activate: Option<Entity>,
}

impl ZoneTimer {
    pub fn new(threshold: f32) -> Self {
        Self {
            required_mode: None,
            threshold,
            elapsed: 0.0,
            fired: false,
            activate: None,
        }
    }

    pub fn for_mode(mut self, mode: UmweltMode) -> Self {
        self.required_mode = Some(mode);
        self
    }

    pub fn activating(mut self, target: Entity) -> Self {
        self.activate = Some(target);
        self
    }
}
