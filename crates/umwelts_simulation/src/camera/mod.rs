//! Camera rigs: head bob первой камеры и вторичный orbit-риг
//!
//! Head bob пишет только вертикальный офсет в AvatarCamera; orbit-риг —
//! самостоятельная камера вокруг цели. Pitch клампится ТОЛЬКО здесь,
//! основной контроллер оставляет pitch свободным.

use bevy::prelude::*;

use crate::components::{AvatarCamera, KinematicBody, Player, UmweltMode};
use crate::input::PlayerInput;
use crate::SimulationSet;

/// Покачивание камеры при движении, per-mode параметры
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct HeadBob {
    pub walk_speed: f32,
    pub walk_amount: f32,
    pub run_speed: f32,
    pub run_amount: f32,
    pub dog_speed: f32,
    pub dog_amount: f32,
    pub bird_speed: f32,
    pub bird_amount: f32,
    pub timer: f32,
}

impl Default for HeadBob {
    fn default() -> Self {
        Self {
            walk_speed: 3.0,
            walk_amount: 0.05,
            run_speed: 5.0,
            run_amount: 0.1,
            dog_speed: 4.0,
            dog_amount: 0.08,
            bird_speed: 2.0,
            bird_amount: 0.02,
            timer: 0.0,
        }
    }
}

/// Система: head bob
///
/// В воздухе наземные режимы не качаются; птица — наоборот, качается
/// только в полёте.
pub fn head_bob(
    time: Res<Time<Fixed>>,
    input: Res<PlayerInput>,
    mut query: Query<(&UmweltMode, &KinematicBody, &mut HeadBob, &mut AvatarCamera), With<Player>>,
) {
    let delta = time.delta_secs();

    for (mode, body, mut bob, mut camera) in query.iter_mut() {
        if !body.grounded && *mode != UmweltMode::Bird {
            continue;
        }

        let (speed, amount) = match mode {
            UmweltMode::Person => {
                if input.sprint {
                    (bob.run_speed, bob.run_amount)
                } else {
                    (bob.walk_speed, bob.walk_amount)
                }
            }
            UmweltMode::Dog => (bob.dog_speed, bob.dog_amount),
            UmweltMode::Bird => {
                // На земле птица не качается
                if body.grounded {
                    continue;
                }
                (bob.bird_speed, bob.bird_amount)
            }
        };

        if body.velocity.length() > 0.1 {
            bob.timer += delta * speed;
            camera.bob_offset = bob.timer.sin() * amount;
        } else {
            bob.timer = 0.0;
            camera.bob_offset = 0.0;
        }
    }
}

/// Вторичный orbit-риг вокруг цели
///
/// В отличие от основной камеры pitch здесь клампится; zoom по колесу
/// ограничен [min_zoom, max_zoom]; после inactivity_time без ввода риг
/// медленно крутится сам.
#[derive(Component, Debug, Clone)]
pub struct OrbitCamera {
    pub target: Option<Entity>,
    pub offset: Vec3,
    pub sensitivity: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub inactivity_time: f32,
    pub auto_spin_speed: f32,
    pub idle_elapsed: f32,
    pub zoom_speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        let offset = Vec3::new(0.0, 2.0, -5.0);
        Self {
            target: None,
            offset,
            sensitivity: 10.0,
            min_pitch: -20.0,
            max_pitch: 80.0,
            yaw: 0.0,
            pitch: 0.0,
            inactivity_time: 5.0,
            auto_spin_speed: 10.0,
            idle_elapsed: 0.0,
            zoom_speed: 2.0,
            min_zoom: 2.0,
            max_zoom: 10.0,
            zoom: offset.length(),
        }
    }
}

/// Система: orbit-риг (drag rotate, scroll zoom, auto-spin)
pub fn orbit_camera(
    time: Res<Time<Fixed>>,
    input: Res<PlayerInput>,
    mut rigs: Query<(&mut OrbitCamera, &mut Transform)>,
    targets: Query<&Transform, Without<OrbitCamera>>,
) {
    let delta = time.delta_secs();

    for (mut rig, mut transform) in rigs.iter_mut() {
        let Some(target_entity) = rig.target else {
            continue;
        };
        let Ok(target) = targets.get(target_entity) else {
            continue;
        };
        let target_pos = target.translation;

        if input.orbit_drag {
            rig.idle_elapsed = 0.0;
            if input.mouse_delta != Vec2::ZERO {
                rig.yaw += input.mouse_delta.x * rig.sensitivity;
                let pitch = rig.pitch - input.mouse_delta.y * rig.sensitivity;
                rig.pitch = pitch.clamp(rig.min_pitch, rig.max_pitch);
            }
        } else {
            rig.idle_elapsed += delta;
            if rig.idle_elapsed > rig.inactivity_time {
                // Auto-spin при бездействии
                rig.yaw += rig.auto_spin_speed * delta;
            }
        }

        if input.scroll != 0.0 {
            let zoom = rig.zoom - input.scroll * rig.zoom_speed;
            rig.zoom = zoom.clamp(rig.min_zoom, rig.max_zoom);
        }

        let rotation = Quat::from_euler(
            EulerRot::YXZ,
            rig.yaw.to_radians(),
            rig.pitch.to_radians(),
            0.0,
        );
        transform.translation = target_pos + rotation * (rig.offset.normalize_or_zero() * rig.zoom);
        transform.look_at(target_pos, Vec3::Y);
    }
}

pub struct CameraRigsPlugin;

impl Plugin for CameraRigsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (head_bob, orbit_camera)
                .chain()
                .in_set(SimulationSet::CameraRigs),
        );
    }
}
