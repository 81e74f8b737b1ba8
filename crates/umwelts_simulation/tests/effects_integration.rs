//! Scene Effect Coordinator integration tests
//!
//! Проверяем:
//! - стартовое применение эффекта текущего режима
//! - инвариант "максимум одна overlay-группа активна"
//! - идемпотентность повторного применения
//! - dog-view quad и mutually exclusive группы сцены

use bevy::prelude::*;
use umwelts_simulation::*;

fn setup_scene() -> (App, ApartmentScene) {
    let mut app = create_headless_app();
    app.add_plugins(SimulationPlugin);

    let config = AvatarConfig::default();
    let scene = {
        let mut commands = app.world_mut().commands();
        spawn_apartment(&mut commands, &config)
    };
    app.update();

    app.world_mut()
        .get_mut::<ControllerActive>(scene.avatar)
        .unwrap()
        .0 = true;

    (app, scene)
}

fn tick(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

fn select_mode(app: &mut App, mode: UmweltMode) {
    app.world_mut().resource_mut::<PlayerInput>().mode_select = Some(mode);
    tick(app, 1);
}

fn active_overlays(app: &mut App) -> Vec<UmweltMode> {
    let world = app.world_mut();
    let mut query = world.query::<(&OverlayGroup, &NodeToggle)>();
    query
        .iter(world)
        .filter(|(_, toggle)| toggle.active)
        .map(|(group, _)| group.mode)
        .collect()
}

fn active_scene_groups(app: &mut App) -> Vec<SceneKind> {
    let world = app.world_mut();
    let mut query = world.query::<(&SceneGroup, &NodeToggle)>();
    query
        .iter(world)
        .filter(|(_, toggle)| toggle.active)
        .map(|(group, _)| group.kind)
        .collect()
}

#[test]
fn test_startup_applies_current_mode_effect() {
    let (mut app, scene) = setup_scene();
    tick(&mut app, 1);

    let effects = app.world().resource::<UmweltEffects>();
    assert_eq!(effects.last_applied, Some(UmweltMode::Person));

    let volume = app.world().get::<EffectVolume>(scene.effect_volume).unwrap();
    assert_eq!(volume.profile, EffectProfile::Default);

    assert_eq!(active_overlays(&mut app), vec![UmweltMode::Person]);
}

#[test]
fn test_overlay_groups_are_mutually_exclusive() {
    let (mut app, scene) = setup_scene();

    select_mode(&mut app, UmweltMode::Dog);
    assert_eq!(active_overlays(&mut app), vec![UmweltMode::Dog]);

    select_mode(&mut app, UmweltMode::Bird);
    // Ровно одна группа: птичья, собачьей больше нет
    assert_eq!(active_overlays(&mut app), vec![UmweltMode::Bird]);

    let volume = app.world().get::<EffectVolume>(scene.effect_volume).unwrap();
    assert_eq!(volume.profile, EffectProfile::Bird);
}

#[test]
fn test_repeated_apply_is_idempotent() {
    let (mut app, scene) = setup_scene();

    select_mode(&mut app, UmweltMode::Dog);
    let first_overlays = active_overlays(&mut app);
    let first_quad = app.world().get::<NodeToggle>(scene.dog_view_quad).unwrap().active;

    select_mode(&mut app, UmweltMode::Dog);
    assert_eq!(active_overlays(&mut app), first_overlays);
    assert_eq!(
        app.world().get::<NodeToggle>(scene.dog_view_quad).unwrap().active,
        first_quad
    );
}

#[test]
fn test_dog_view_quad_follows_mode() {
    let (mut app, scene) = setup_scene();

    select_mode(&mut app, UmweltMode::Dog);
    assert!(app.world().get::<NodeToggle>(scene.dog_view_quad).unwrap().active);

    select_mode(&mut app, UmweltMode::Bird);
    assert!(!app.world().get::<NodeToggle>(scene.dog_view_quad).unwrap().active);
}

#[test]
fn test_scene_groups_switch_exclusively() {
    let (mut app, _scene) = setup_scene();
    tick(&mut app, 1);

    // Город показан по умолчанию
    assert_eq!(active_scene_groups(&mut app), vec![SceneKind::City]);

    app.world_mut().send_event(SceneSelected(SceneKind::Forest));
    tick(&mut app, 1);
    assert_eq!(active_scene_groups(&mut app), vec![SceneKind::Forest]);

    app.world_mut().send_event(SceneSelected(SceneKind::Water));
    tick(&mut app, 1);
    assert_eq!(active_scene_groups(&mut app), vec![SceneKind::Water]);
}
