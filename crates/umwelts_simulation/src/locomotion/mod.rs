//! Locomotion/Camera Controller
//!
//! Архитектура:
//! - Rapier для коллайдера (RigidBody::KinematicPositionBased)
//! - Custom velocity integration (Rapier forces не используем)
//! - Смена режима реконфигурирует capsule, FOV и mode-specific модели
//!
//! Порядок систем фиксирован (.chain()): ground check → смена режима →
//! mouse look → movement input по режиму → gravity → интеграция → sync.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::components::{
    AvatarCamera, AvatarConfig, ControllerActive, FlightState, KinematicBody, ModeModel,
    MovementSettings, NodeToggle, Player, UmweltMode,
};
use crate::input::PlayerInput;
use crate::logger;
use crate::SimulationSet;

pub mod events;
pub mod movement;

pub use events::ModeChanged;
pub use movement::{
    apply_avatar_gravity, avatar_movement_input, dog_jump_velocity, ground_detection,
    integrate_velocity, mouse_look, sync_velocity_to_rapier, GROUND_EPSILON,
    GROUND_STICK_VELOCITY,
};

/// Capsule коллайдер под настройки режима
pub fn capsule_collider(settings: &MovementSettings) -> Collider {
    Collider::capsule_y((settings.height * 0.5).max(0.05), settings.radius)
}

/// Collision groups аватара (коллайдит со static geometry сцены)
pub fn avatar_collision_groups() -> CollisionGroups {
    CollisionGroups::new(Group::GROUP_1, Group::ALL)
}

/// Система: edge-triggered смена umwelt-режима
///
/// Guards нет — любой режим достижим из любого в любой момент.
/// Повторный запрос того же режима прогоняет конфигурацию заново
/// (идемпотентно в наблюдаемом состоянии).
pub fn switch_mode(
    mut commands: Commands,
    input: Res<PlayerInput>,
    config: Res<AvatarConfig>,
    mut mode_events: EventWriter<ModeChanged>,
    mut avatars: Query<
        (
            Entity,
            &mut UmweltMode,
            &mut FlightState,
            &mut AvatarCamera,
            &ControllerActive,
        ),
        With<Player>,
    >,
    mut models: Query<(&ModeModel, &mut NodeToggle)>,
) {
    let Some(requested) = input.mode_select else {
        return;
    };

    for (entity, mut mode, mut flight, mut camera, active) in avatars.iter_mut() {
        if !active.0 {
            continue;
        }

        let previous = *mode;
        *mode = requested;

        // Полётные флаги сбрасываются при любой смене режима
        flight.reset();

        // Collider и камера под новый режим
        let settings = config.settings(requested);
        camera.eye_height = settings.height;
        match requested {
            UmweltMode::Bird => camera.adjust_fov(config.avian.fov_multiplier),
            _ => camera.reset_fov(),
        }
        commands.entity(entity).insert(capsule_collider(settings));

        // Mode-specific модели (dog body mesh, dog particles)
        for (model, mut toggle) in models.iter_mut() {
            toggle.active = model.mode == requested;
        }

        mode_events.write(ModeChanged {
            previous,
            current: requested,
        });
        logger::log(&format!("Switched to {:?}", requested));
    }
}

/// Plugin контроллера локомоции
///
/// Все системы в FixedUpdate, последовательно, до rapier physics step.
pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        use bevy_rapier3d::plugin::PhysicsSet;

        app.add_event::<ModeChanged>().add_systems(
            FixedUpdate,
            (
                ground_detection,
                switch_mode,
                mouse_look,
                avatar_movement_input,
                apply_avatar_gravity,
                integrate_velocity,
                sync_velocity_to_rapier,
            )
                .chain()
                .in_set(SimulationSet::Locomotion)
                .before(PhysicsSet::SyncBackend),
        );
    }
}

/// Spawn helper для аватара
///
/// Создаёт entity с полным набором компонентов:
/// - Transform
/// - KinematicBody + FlightState + ZoneSense (наши)
/// - AvatarCamera + HeadBob
/// - Rapier: RigidBody + Collider (capsule по Person-настройкам)
pub fn spawn_avatar(commands: &mut Commands, config: &AvatarConfig, position: Vec3) -> Entity {
    use crate::camera::HeadBob;
    use crate::components::ZoneSense;

    commands
        .spawn((
            // Bevy transform
            Transform::from_translation(position),
            // Наши компоненты
            UmweltMode::Person,
            KinematicBody::default(),
            FlightState::default(),
            ZoneSense::default(),
            AvatarCamera {
                eye_height: config.person.height,
                ..Default::default()
            },
            HeadBob::default(),
            ControllerActive::default(),
            Player,
            // Rapier physics
            RigidBody::KinematicPositionBased,
            capsule_collider(&config.person),
            Velocity::default(),
            avatar_collision_groups(),
        ))
        .id()
}
