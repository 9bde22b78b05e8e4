//! This module handles things to setup bevy for the candle table.

use crate::{
    config::SceneConfig,
    interaction::{to_bevy_vec3, Flame, FlameLabel, FlamePopup, RevealClock, SharedInteraction},
};
use bevy::{core_pipeline::bloom::BloomSettings, prelude::*};
use chrono::Datelike;
use fc_calendar::CANDLE_COUNT;
use fc_candle::{table_layout, CandleFlame};
use rand::{thread_rng, Rng};
use smooth_bevy_cameras::controllers::orbit::{OrbitCameraBundle, OrbitCameraController};

/// The colour of candle wax, also used for the candle light.
const WAX_COLOUR: Color = Color::rgb(0.906, 0.878, 0.8);

/// How far above the base of a candle its flame sits.
const FLAME_HEIGHT: f32 = 0.6;

/// The radius of the circle the candle light wanders around.
const LIGHT_ORBIT_RADIUS: f32 = 1.;

/// How fast the candle light wanders, in radians per second.
const LIGHT_ORBIT_SPEED: f32 = 0.6;

/// The brightest the candle light gets.
const LIGHT_MAX_INTENSITY: f32 = 1600.;

/// A light that wanders in a circle above the table and flickers.
#[derive(Component, Clone, Copy, Debug, Default)]
pub(super) struct FlickeringLight {
    /// How far around its circle the light is.
    angle: f32,
}

/// Setup the Bevy world with a camera, lights, and all the candles.
pub(super) fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut interaction: ResMut<SharedInteraction>,
) {
    // Hold LControl to orbit the camera
    commands
        .spawn((
            Camera3dBundle {
                camera: Camera {
                    hdr: true,
                    ..default()
                },
                ..default()
            },
            BloomSettings {
                intensity: 1.2,
                threshold: 0.8,
                ..default()
            },
        ))
        .insert(OrbitCameraBundle::new(
            OrbitCameraController {
                mouse_rotate_sensitivity: Vec2::splat(0.2),
                mouse_wheel_zoom_sensitivity: 0.05,
                smoothing_weight: 0.1,
                ..default()
            },
            Vec3::new(0., 3., 4.),
            Vec3::ZERO,
            Vec3::Y,
        ));

    commands.spawn((
        PointLightBundle {
            point_light: PointLight {
                color: WAX_COLOUR,
                intensity: LIGHT_MAX_INTENSITY,
                range: 10.,
                shadows_enabled: false,
                ..default()
            },
            transform: Transform::from_xyz(0., 1., LIGHT_ORBIT_RADIUS),
            ..default()
        },
        FlickeringLight::default(),
    ));

    let wax = materials.add(StandardMaterial {
        base_color: WAX_COLOUR,
        perceptual_roughness: 1.,
        metallic: 0.2,
        ..default()
    });
    let wick = materials.add(StandardMaterial {
        base_color: Color::rgb_u8(30, 24, 20),
        perceptual_roughness: 0.9,
        ..default()
    });
    let flame_material = materials.add(StandardMaterial {
        base_color: Color::rgb(1., 0.62, 0.2),
        emissive: Color::rgb_linear(6., 2.4, 0.4),
        ..default()
    });

    // Total height is depth + 2 * radius, so this is a one unit tall candle
    let candle_mesh = meshes.add(Mesh::from(shape::Capsule {
        radius: 0.1,
        depth: 0.8,
        ..default()
    }));
    let wick_mesh = meshes.add(Mesh::from(shape::Capsule {
        radius: 0.012,
        depth: 0.06,
        ..default()
    }));
    let flame_mesh = meshes.add(Mesh::from(shape::UVSphere {
        sectors: 32,
        stacks: 16,
        radius: 0.05,
    }));

    debug!("Adding candles to table");
    for spec in table_layout() {
        let flame = CandleFlame::new(spec, &mut interaction.0);

        commands
            .spawn(PbrBundle {
                mesh: candle_mesh.clone(),
                material: wax.clone(),
                transform: Transform::from_translation(to_bevy_vec3(spec.position)),
                ..default()
            })
            .with_children(|builder| {
                builder.spawn(PbrBundle {
                    mesh: wick_mesh.clone(),
                    material: wick.clone(),
                    transform: Transform::from_xyz(0., 0.52, 0.),
                    ..default()
                });

                // Flames start hidden until they've been resolved against the calendar
                builder.spawn((
                    PbrBundle {
                        mesh: flame_mesh.clone(),
                        material: flame_material.clone(),
                        transform: Transform::from_xyz(0., FLAME_HEIGHT, 0.)
                            .with_scale(Vec3::new(1., 2., 1.)),
                        visibility: Visibility { is_visible: false },
                        ..default()
                    },
                    Flame(flame),
                ));
            });
    }
    debug!("Finished adding candles to table");
}

/// Add the table to the world.
pub(super) fn add_table_to_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let wood = materials.add(StandardMaterial {
        base_color: Color::rgb_u8(92, 51, 23),
        perceptual_roughness: 0.85,
        ..default()
    });

    // Table top, with the candles standing on it
    commands.spawn(PbrBundle {
        mesh: meshes.add(Mesh::from(shape::Box::new(5., 0.2, 5.))),
        material: wood.clone(),
        transform: Transform::from_xyz(0., -0.6, 0.),
        ..default()
    });

    let leg_mesh = meshes.add(Mesh::from(shape::Capsule {
        radius: 0.2,
        depth: 1.6,
        ..default()
    }));
    for (x, z) in [(2., 2.), (-2., 2.), (2., -2.), (-2., -2.)] {
        commands.spawn(PbrBundle {
            mesh: leg_mesh.clone(),
            material: wood.clone(),
            transform: Transform::from_xyz(x, -1.7, z),
            ..default()
        });
    }

    // Floor
    commands.spawn(PbrBundle {
        mesh: meshes.add(Mesh::from(shape::Plane { size: 1000. })),
        material: materials.add(StandardMaterial {
            base_color: Color::rgb(0.12, 0.1, 0.09),
            perceptual_roughness: 0.9,
            ..default()
        }),
        transform: Transform::from_xyz(0., -2.7, 0.),
        ..default()
    });
}

/// Add the title and the week labels, if there's a font to draw them with.
pub(super) fn add_text_to_world(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<SceneConfig>,
    clock: Res<RevealClock>,
) {
    let Some(font_path) = &config.font_path else {
        debug!("No font configured, so not adding any text");
        return;
    };
    let font: Handle<Font> = asset_server.load(font_path.as_str());

    let title = config
        .title
        .clone()
        .unwrap_or_else(|| format!("{CANDLE_COUNT} Candles of {}", clock.now().year()));

    commands.spawn(
        TextBundle::from_section(
            title,
            TextStyle {
                font: font.clone(),
                font_size: 40.,
                color: WAX_COLOUR,
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            position: UiRect {
                left: Val::Px(20.),
                top: Val::Px(16.),
                ..default()
            },
            ..default()
        }),
    );

    let mut popup = TextBundle::from_section(
        "",
        TextStyle {
            font: font.clone(),
            font_size: 20.,
            color: Color::WHITE,
        },
    )
    .with_style(Style {
        position_type: PositionType::Absolute,
        ..default()
    });
    popup.visibility = Visibility { is_visible: false };
    commands.spawn((popup, FlamePopup));

    // These stay hidden until their flames are lit
    for spec in table_layout() {
        let mut label = TextBundle::from_section(
            spec.index.week_label().to_string(),
            TextStyle {
                font: font.clone(),
                font_size: 14.,
                color: WAX_COLOUR,
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            ..default()
        });
        label.visibility = Visibility { is_visible: false };
        commands.spawn((label, FlameLabel(spec.index)));
    }
}

/// Move the candle light around its circle and randomly change its brightness.
pub(super) fn flicker_lights(
    time: Res<Time>,
    mut lights: Query<(&mut PointLight, &mut Transform, &mut FlickeringLight)>,
) {
    let mut rng = thread_rng();

    for (mut light, mut transform, mut flicker) in &mut lights {
        flicker.angle += LIGHT_ORBIT_SPEED * time.delta_seconds();
        transform.translation = Vec3::new(
            flicker.angle.sin() * LIGHT_ORBIT_RADIUS,
            1.,
            flicker.angle.cos() * LIGHT_ORBIT_RADIUS,
        );
        light.intensity = LIGHT_MAX_INTENSITY * rng.gen_range(0.5..=1.);
    }
}
