//! Composition root сцены: аватар + квартира
//!
//! Здесь (и только здесь) связываются ссылки между пропами, narrative,
//! координатором эффектов и soundscape — dependency injection вместо
//! поиска по глобальному состоянию. Handles возвращаются наружу для
//! engine adapter и интеграционных тестов.

use bevy::prelude::*;

use crate::camera::OrbitCamera;
use crate::components::{
    AvatarConfig, ControllerActive, DogJumpRegion, EffectProfile, EffectVolume, FadeOverlay,
    InteractionStage, InteractionZone, LampLight, ModeModel, NodeToggle, PresenceHint,
    PromptText, SceneGroup, SceneKind, StageEffect, StageTable, UiText, UmweltMode, ZoneTimer,
};
use crate::effects::UmweltEffects;
use crate::interaction::HintTexts;
use crate::locomotion::spawn_avatar;
use crate::narrative::{IntroCamera, Narrative, NarrativeRefs};
use crate::soundscape::{NoiseSource, SnoringSource};

/// Handles заспавненной сцены
#[derive(Debug, Clone, Copy)]
pub struct ApartmentScene {
    pub avatar: Entity,
    pub computer_zone: Entity,
    pub computer_screen: Entity,
    pub lamp_zone: Entity,
    pub lamp_text: Entity,
    /// «Следующий объект» лампы — зона настоящей лампы (sticky-активация)
    pub real_lamp_zone: Entity,
    pub real_lamp_text: Entity,
    pub real_lamp_light: Entity,
    pub bed_zone: Entity,
    pub bed_text: Entity,
    pub bed_smell_zone: Entity,
    pub bed_smell_text: Entity,
    pub bed_warm_spot: Entity,
    pub dog_jump_zone: Entity,
    pub effect_volume: Entity,
    pub dog_view_quad: Entity,
    pub intro_camera: Entity,
    pub fade_overlay: Entity,
    pub wake_prompt: Entity,
    pub narrative_text: Entity,
}

/// Спавнит аватара и всю квартиру, инжектит resources сцены
///
/// Аватар стартует с выключенным контроллером: управление отдаёт narrative
/// по wake input.
pub fn spawn_apartment(commands: &mut Commands, config: &AvatarConfig) -> ApartmentScene {
    let avatar = spawn_avatar(commands, config, Vec3::ZERO);
    commands.entity(avatar).insert(ControllerActive(false));

    // --- Компьютер: экран toggle каждым нажатием, зона открывается narrative ---
    let computer_screen = commands.spawn(NodeToggle::off()).id();
    let computer_zone = commands
        .spawn((
            Transform::from_xyz(-3.0, 0.0, 1.0),
            InteractionZone::new(config.interaction_radius),
            InteractionStage::default(),
            StageTable::looping(
                UmweltMode::Person,
                vec![vec![StageEffect::ToggleNode(computer_screen)]],
            ),
            NodeToggle::off(), // активируется при wake handoff
        ))
        .id();

    // --- Лампа: первое нажатие — текст, второе — активация следующей зоны ---
    let lamp_text = commands.spawn(UiText::hidden("A lamp. It is off.")).id();
    let real_lamp_text = commands
        .spawn(UiText::hidden("The real lamp hums quietly."))
        .id();
    let real_lamp_light = commands.spawn(LampLight::default()).id();
    let real_lamp_zone = commands
        .spawn((
            Transform::from_xyz(4.0, 0.0, 2.0),
            InteractionZone::new(config.interaction_radius),
            InteractionStage::default(),
            StageTable::new(
                UmweltMode::Person,
                vec![
                    vec![StageEffect::ShowText(real_lamp_text)],
                    vec![StageEffect::LightOn(real_lamp_light)],
                ],
            ),
            PromptText {
                text: real_lamp_text,
            },
            NodeToggle::off(), // активирует лампа (sticky)
        ))
        .id();
    let lamp_zone = commands
        .spawn((
            Transform::from_xyz(2.0, 0.0, 0.0),
            InteractionZone::new(config.interaction_radius),
            InteractionStage::default(),
            StageTable::new(
                UmweltMode::Person,
                vec![
                    vec![StageEffect::ShowText(lamp_text)],
                    vec![StageEffect::ActivateNode(real_lamp_zone)],
                ],
            ),
            PromptText { text: lamp_text },
        ))
        .id();

    // --- Кровать: текст, затем медитация ---
    let bed_text = commands
        .spawn(UiText::hidden("Lie down and close your eyes."))
        .id();
    let bed_zone = commands
        .spawn((
            Transform::from_xyz(0.0, 0.0, -3.0),
            InteractionZone::new(config.interaction_radius),
            InteractionStage::default(),
            StageTable::new(
                UmweltMode::Person,
                vec![
                    vec![StageEffect::ShowText(bed_text)],
                    vec![
                        StageEffect::BeginMeditation,
                        StageEffect::HideText(bed_text),
                    ],
                ],
            ),
            PromptText { text: bed_text },
        ))
        .id();

    // --- Запах кровати: presence-текст в режиме собаки + dwell-таймер ---
    let bed_smell_text = commands
        .spawn(UiText::hidden("It smells like a long afternoon."))
        .id();
    let bed_warm_spot = commands.spawn(NodeToggle::off()).id();
    let bed_smell_zone = commands
        .spawn((
            Transform::from_xyz(0.5, 0.0, -3.0),
            InteractionZone::new(config.interaction_radius),
            PresenceHint {
                required_mode: UmweltMode::Dog,
                text: bed_smell_text,
            },
            ZoneTimer::new(10.0)
                .for_mode(UmweltMode::Dog)
                .activating(bed_warm_spot),
        ))
        .id();

    // --- Dog jump регион ---
    let dog_jump_zone = commands
        .spawn((
            Transform::from_xyz(5.0, 0.0, -2.0),
            InteractionZone::new(config.interaction_radius),
            DogJumpRegion,
        ))
        .id();

    // --- Координатор эффектов: volume, overlay-группы, dog quad ---
    let effect_volume = commands
        .spawn(EffectVolume {
            profile: EffectProfile::Default,
        })
        .id();
    for mode in [UmweltMode::Person, UmweltMode::Dog, UmweltMode::Bird] {
        commands.spawn((
            crate::components::OverlayGroup { mode },
            NodeToggle::off(),
        ));
    }
    let dog_view_quad = commands.spawn(NodeToggle::off()).id();

    // Mode-specific модели собаки
    commands.spawn((
        ModeModel {
            mode: UmweltMode::Dog,
        },
        NodeToggle::off(),
    ));
    commands.spawn((
        ModeModel {
            mode: UmweltMode::Dog,
        },
        NodeToggle::off(),
    ));

    // Группы сцены; город показан по умолчанию
    commands.spawn((
        SceneGroup {
            kind: SceneKind::City,
        },
        NodeToggle::on(),
    ));
    commands.spawn((
        SceneGroup {
            kind: SceneKind::Forest,
        },
        NodeToggle::off(),
    ));
    commands.spawn((
        SceneGroup {
            kind: SceneKind::Water,
        },
        NodeToggle::off(),
    ));

    commands.insert_resource(UmweltEffects {
        volume: Some(effect_volume),
        dog_view_quad: Some(dog_view_quad),
        ..Default::default()
    });

    // --- Narrative: интро-камера смотрит вверх, экран затемнён ---
    let intro_camera = commands
        .spawn((
            Transform::from_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_3)),
            IntroCamera {
                initial: Quat::from_rotation_x(std::f32::consts::FRAC_PI_3),
                ..Default::default()
            },
            NodeToggle::on(),
        ))
        .id();
    let fade_overlay = commands
        .spawn((FadeOverlay { alpha: 1.0 }, NodeToggle::on()))
        .id();
    let narrative_text = commands.spawn(UiText::hidden("")).id();
    let wake_prompt = commands
        .spawn(UiText::hidden("Press [Space] to wake up"))
        .id();
    let canvas = commands.spawn(NodeToggle::on()).id();

    commands.insert_resource(Narrative {
        refs: NarrativeRefs {
            narrative_text: Some(narrative_text),
            wake_prompt: Some(wake_prompt),
            fade_overlay: Some(fade_overlay),
            canvas: Some(canvas),
            intro_camera: Some(intro_camera),
            avatar: Some(avatar),
            first_zone: Some(computer_zone),
        },
        ..Default::default()
    });

    // --- Hint-тексты контроллера ---
    let interact_hint = commands
        .spawn(UiText::hidden("Press [Space] to interact"))
        .id();
    let jump_hint = commands.spawn(UiText::hidden("Press [Space] to jump")).id();
    commands.insert_resource(HintTexts {
        interact: Some(interact_hint),
        jump: Some(jump_hint),
    });

    // --- Soundscape медитации ---
    for (clip, position) in [
        ("traffic_hum", Vec2::new(-6.0, 4.0)),
        ("neighbor_tv", Vec2::new(5.0, 5.0)),
        ("fridge_buzz", Vec2::new(3.0, -7.0)),
    ] {
        commands.spawn((
            NoiseSource { position },
            crate::components::AudioEmitter::with_clip(clip),
        ));
    }
    commands.spawn((
        SnoringSource {
            position: Vec2::new(-2.0, -2.0),
        },
        crate::components::AudioEmitter::with_clip("dog_snoring"),
    ));

    // Вторичный orbit-риг вокруг аватара
    commands.spawn((
        Transform::default(),
        OrbitCamera {
            target: Some(avatar),
            ..Default::default()
        },
    ));

    ApartmentScene {
        avatar,
        computer_zone,
        computer_screen,
        lamp_zone,
        lamp_text,
        real_lamp_zone,
        real_lamp_text,
        real_lamp_light,
        bed_zone,
        bed_text,
        bed_smell_zone,
        bed_smell_text,
        bed_warm_spot,
        dog_jump_zone,
        effect_volume,
        dog_view_quad,
        intro_camera,
        fade_overlay,
        wake_prompt,
        narrative_text,
    }
}
