//! Движение аватара: три режима, общая гравитация, интеграция velocity
//!
//! Формула dog jump (энергосохранение снаряда) вынесена в dog_jump_velocity
//! и используется только оттуда — числовой паритет проверяется тестом.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;

use crate::components::{
    AvatarCamera, AvatarConfig, BirdSettings, ControllerActive, FlightState, KinematicBody,
    Player, UmweltMode, ZoneSense,
};
use crate::input::PlayerInput;

/// Порог ground check (пол на y = 0, headless stand-in коллизий движка)
pub const GROUND_EPSILON: f32 = 0.01;

/// Прижимающая velocity на земле (чтобы тело не "отлипало" от пола)
pub const GROUND_STICK_VELOCITY: f32 = -0.1;

/// Начальная вертикальная скорость прыжка собаки: sqrt(2 · J · G)
pub fn dog_jump_velocity(jump_force: f32, gravity: f32) -> f32 {
    (2.0 * jump_force * gravity).sqrt()
}

/// Система: ground detection через Y-проверку
///
/// Пол на y=0; grounded с небольшим запасом на numerical errors.
pub fn ground_detection(mut query: Query<(&Transform, &mut KinematicBody), With<Player>>) {
    for (transform, mut body) in query.iter_mut() {
        body.grounded = transform.translation.y <= GROUND_EPSILON;
    }
}

/// Система: camera look
///
/// Yaw — на heading аватара, pitch — только на камеру. Оба масштабируются
/// чувствительностью и per-frame дельтой мыши. Без сглаживания; pitch
/// без клампа (клампит только orbit-риг).
pub fn mouse_look(
    input: Res<PlayerInput>,
    config: Res<AvatarConfig>,
    mut query: Query<(&mut Transform, &mut AvatarCamera, &ControllerActive), With<Player>>,
) {
    if input.mouse_delta == Vec2::ZERO {
        return;
    }

    for (mut transform, mut camera, active) in query.iter_mut() {
        if !active.0 {
            continue;
        }
        let yaw = input.mouse_delta.x * config.mouse_sensitivity;
        let pitch = input.mouse_delta.y * config.mouse_sensitivity;

        transform.rotate_y(-yaw.to_radians());
        camera.pitch_deg += pitch;
    }
}

/// Система: movement input по активному режиму
///
/// Пишет горизонтальную velocity; Dog дополнительно обрабатывает прыжок,
/// Bird — hover sub-state-machine (взлёт/посадка/контроль высоты).
/// ZoneSense приходит из interaction systems прошлого тика.
pub fn avatar_movement_input(
    input: Res<PlayerInput>,
    config: Res<AvatarConfig>,
    mut query: Query<
        (
            &UmweltMode,
            &Transform,
            &mut KinematicBody,
            &mut FlightState,
            &ZoneSense,
            &ControllerActive,
        ),
        With<Player>,
    >,
) {
    for (mode, transform, mut body, mut flight, sense, active) in query.iter_mut() {
        if !active.0 {
            continue;
        }

        match mode {
            UmweltMode::Person => {
                let speed = if input.sprint {
                    config.person.run_speed
                } else {
                    config.person.walk_speed
                };
                set_horizontal_velocity(transform, input.move_direction, speed, &mut body);
            }

            UmweltMode::Dog => {
                set_horizontal_velocity(
                    transform,
                    input.move_direction,
                    config.dog.walk_speed,
                    &mut body,
                );

                if sense.can_dog_jump && input.jump {
                    body.velocity.y = dog_jump_velocity(config.dog_jump_force, config.gravity);
                }
            }

            UmweltMode::Bird => {
                // Takeoff / landing intents (edge inputs)
                if input.jump {
                    start_ascending(&mut flight, transform.translation.y, &config.avian);
                }
                if input.descend {
                    start_descending(&mut flight, &config.avian);
                }

                // Контроль высоты
                if flight.ascending && transform.translation.y >= flight.target_hover_y {
                    flight.ascending = false;
                    flight.vertical_speed = 0.0;
                }
                // Посадка завершается ТОЛЬКО при descend-команде НА земле
                if flight.descending && body.grounded {
                    complete_landing(&mut flight, &mut body);
                }

                if flight.hovering {
                    set_horizontal_velocity(
                        transform,
                        input.move_direction,
                        config.avian.fly_speed,
                        &mut body,
                    );
                    body.velocity.y = flight.vertical_speed;
                } else {
                    set_horizontal_velocity(
                        transform,
                        input.move_direction,
                        config.avian.ground_speed,
                        &mut body,
                    );
                }
            }
        }
    }
}

/// Переход grounded → hovering; повторный ascend в hover — no-op
fn start_ascending(flight: &mut FlightState, current_y: f32, avian: &BirdSettings) {
    if flight.hovering {
        return;
    }
    flight.hovering = true;
    flight.ascending = true;
    flight.target_hover_y = current_y + avian.hover_height;
    flight.vertical_speed = avian.ascent_speed;
}

fn start_descending(flight: &mut FlightState, avian: &BirdSettings) {
    flight.descending = true;
    flight.vertical_speed = -avian.descent_speed;
}

fn complete_landing(flight: &mut FlightState, body: &mut KinematicBody) {
    flight.hovering = false;
    flight.descending = false;
    flight.vertical_speed = 0.0;
    body.velocity.y = 0.0;
}

/// Горизонтальная velocity из move input (Y не трогаем — gravity handling)
fn set_horizontal_velocity(
    transform: &Transform,
    direction: Vec2,
    speed: f32,
    body: &mut KinematicBody,
) {
    if direction.length_squared() > 0.01 {
        let direction = direction.normalize();
        let world = transform.forward() * direction.y + transform.right() * direction.x;
        body.velocity.x = world.x * speed;
        body.velocity.z = world.z * speed;
    } else {
        body.velocity.x = 0.0;
        body.velocity.z = 0.0;
    }
}

/// Система: общая гравитация (Person/Dog и Bird на земле)
///
/// На земле отрицательная velocity клампится к прижимающей константе,
/// дальше обычное накопление. Hover гравитацию не получает.
pub fn apply_avatar_gravity(
    time: Res<Time<Fixed>>,
    config: Res<AvatarConfig>,
    mut query: Query<(&mut KinematicBody, &FlightState, &ControllerActive), With<Player>>,
) {
    let delta = time.delta_secs();

    for (mut body, flight, active) in query.iter_mut() {
        if !active.0 || flight.hovering {
            continue;
        }
        if body.grounded && body.velocity.y < 0.0 {
            body.velocity.y = GROUND_STICK_VELOCITY;
        }
        body.velocity.y -= config.gravity * delta;
    }
}

/// Система: интеграция velocity → Transform
///
/// Пол на y=0 — stand-in коллизионного разрешения движка.
pub fn integrate_velocity(
    time: Res<Time<Fixed>>,
    mut query: Query<(&mut Transform, &mut KinematicBody, &ControllerActive), With<Player>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut body, active) in query.iter_mut() {
        if !active.0 {
            continue;
        }
        transform.translation += body.velocity * delta;
        if transform.translation.y < 0.0 {
            transform.translation.y = 0.0;
            if body.velocity.y < 0.0 {
                body.velocity.y = 0.0;
            }
        }
    }
}

/// Система: синхронизация нашей velocity в Rapier
pub fn sync_velocity_to_rapier(
    mut query: Query<(&KinematicBody, &mut Velocity), With<Player>>,
) {
    for (body, mut rapier_velocity) in query.iter_mut() {
        rapier_velocity.linvel = body.velocity;
    }
}
