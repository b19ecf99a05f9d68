//! Visualization plugin - Self-contained plugin pattern
//!
//! Draws the pendulum and its trace with gizmos and keeps the parameter
//! labels in sync with the simulation. The simulation works in screen-down
//! coordinates with the pivot at the origin; everything is flipped to Bevy's
//! y-up world here.

use crate::config::RenderingConfig;
use crate::physics::dynamics::BobPositions;
use crate::physics::parameters::Parameter;
use crate::physics::trace::TraceSegment;
use crate::plugins::simulation::{LatestFrame, SimulationSet};
use crate::prelude::*;

/// Gizmo alpha is the trace age out of this maximum
const TRACE_ALPHA_SCALE: f32 = 255.0;

const LABEL_LEFT_PX: f32 = 20.0;
const LABEL_TOP_PX: f32 = 15.0;
const LABEL_ROW_GAP_PX: f32 = 10.0;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceVisibility {
    pub enabled: bool,
}

impl Default for TraceVisibility {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Text showing the current value of one parameter
#[derive(Component, Debug, Clone, Copy)]
pub struct ParameterLabel(pub Parameter);

#[derive(Component)]
pub struct Bob {
    pub index: usize,
}

pub struct VisualizationPlugin;

impl Plugin for VisualizationPlugin {
    fn build(&self, app: &mut App) {
        let (background, trace_enabled) = app
            .world()
            .get_resource::<SimulationConfig>()
            .map(|config| {
                (
                    srgb(config.rendering.background_color),
                    config.trace.enabled,
                )
            })
            .unwrap_or((Color::WHITE, true));

        app.insert_resource(ClearColor(background));
        app.insert_resource(TraceVisibility {
            enabled: trace_enabled,
        });

        app.add_systems(
            Startup,
            (
                spawn_camera,
                spawn_bobs,
                spawn_parameter_labels,
                configure_gizmos,
            ),
        );
        app.add_systems(
            Update,
            handle_trace_toggle_command.in_set(SimulationSet::Commands),
        );
        app.add_systems(
            Update,
            (draw_pendulum, sync_bobs, update_parameter_labels).in_set(SimulationSet::Render),
        );
    }
}

pub fn srgb([r, g, b]: [f32; 3]) -> Color {
    Color::srgb(r, g, b)
}

/// Screen-down simulation coordinates to Bevy world coordinates
pub fn to_world(position: Vector) -> Vec2 {
    Vec2::new(position.x as f32, -position.y as f32)
}

/// Trace color with the segment's age as its alpha
pub fn trace_segment_color(rendering: &RenderingConfig, segment: &TraceSegment) -> Color {
    srgb(rendering.trace_color).with_alpha((segment.age as f32 / TRACE_ALPHA_SCALE).clamp(0.0, 1.0))
}

/// Segments of the latest frame's trace, or none while the trace is hidden
pub fn visible_trace_segments<'a>(
    latest_frame: &'a LatestFrame,
    visibility: &TraceVisibility,
) -> &'a [TraceSegment] {
    match latest_frame.0.as_ref() {
        Some(frame) if visibility.enabled => &frame.segments,
        _ => &[],
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Name::new("Main Camera"), Camera2d));
}

fn configure_gizmos(mut store: ResMut<GizmoConfigStore>, config: Res<SimulationConfig>) {
    let (gizmo_config, _) = store.config_mut::<DefaultGizmoConfigGroup>();
    gizmo_config.line.width = config.rendering.line_width;
}

fn spawn_bobs(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    config: Res<SimulationConfig>,
) {
    let mesh = meshes.add(Circle::new(0.5));
    let material = materials.add(srgb(config.rendering.bob_fill_color));

    for index in 0..2 {
        commands.spawn((
            Name::new(format!("Bob {}", index + 1)),
            Bob { index },
            Mesh2d(mesh.clone()),
            MeshMaterial2d(material.clone()),
            Transform::default(),
        ));
    }
}

fn draw_pendulum(
    mut gizmos: Gizmos,
    context: Res<SimulationContext>,
    latest_frame: Res<LatestFrame>,
    visibility: Res<TraceVisibility>,
    config: Res<SimulationConfig>,
) {
    let rendering = &config.rendering;

    for segment in visible_trace_segments(&latest_frame, &visibility) {
        gizmos.line_2d(
            to_world(segment.from),
            to_world(segment.to),
            trace_segment_color(rendering, segment),
        );
    }

    let BobPositions { bob1, bob2 } = context.bob_positions();
    let parameters = context.parameters();
    let rod_color = srgb(rendering.rod_color);

    gizmos.line_2d(Vec2::ZERO, to_world(bob1), rod_color);
    gizmos.line_2d(to_world(bob1), to_world(bob2), rod_color);
    gizmos.circle_2d(to_world(bob1), parameters.mass1 as f32 / 2.0, rod_color);
    gizmos.circle_2d(to_world(bob2), parameters.mass2 as f32 / 2.0, rod_color);
}

/// Bob meshes are unit-diameter circles scaled to the bob's mass
fn sync_bobs(context: Res<SimulationContext>, mut bobs: Query<(&Bob, &mut Transform)>) {
    let positions = context.bob_positions();
    let parameters = context.parameters();

    for (bob, mut transform) in &mut bobs {
        let (position, mass) = match bob.index {
            0 => (positions.bob1, parameters.mass1),
            _ => (positions.bob2, parameters.mass2),
        };
        transform.translation = to_world(position).extend(0.0);
        transform.scale = Vec3::splat(mass as f32);
    }
}

fn spawn_parameter_labels(mut commands: Commands, config: Res<SimulationConfig>) {
    if !config.ui.show_parameter_labels {
        return;
    }

    commands
        .spawn((
            Name::new("Parameter Labels"),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(LABEL_TOP_PX),
                left: Val::Px(LABEL_LEFT_PX),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(LABEL_ROW_GAP_PX),
                ..default()
            },
        ))
        .with_children(|parent| {
            for parameter in Parameter::ALL {
                parent.spawn((
                    ParameterLabel(parameter),
                    Text::new(parameter.name()),
                    TextFont {
                        font_size: config.ui.font_size,
                        ..default()
                    },
                    TextColor(srgb(config.rendering.rod_color)),
                ));
            }
        });
}

pub fn update_parameter_labels(
    context: Res<SimulationContext>,
    mut labels: Query<(&ParameterLabel, &mut Text)>,
) {
    let parameters = context.parameters();

    for (label, mut text) in &mut labels {
        let value = parameters.label(label.0);
        if text.0 != value {
            text.0 = value;
        }
    }
}

pub fn handle_trace_toggle_command(
    mut commands: EventReader<SimulationCommand>,
    mut visibility: ResMut<TraceVisibility>,
) {
    for command in commands.read() {
        if !matches!(command, SimulationCommand::ToggleTrace) {
            continue;
        }
        visibility.enabled = !visibility.enabled;
        info!(
            "Trace {}",
            if visibility.enabled {
                "shown"
            } else {
                "hidden"
            }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::simulation::SimulationPlugin;
    use crate::test_utils::create_test_app;

    #[test]
    fn test_to_world_flips_y() {
        assert_eq!(to_world(Vector::new(3.0, 150.0)), Vec2::new(3.0, -150.0));
    }

    #[test]
    fn test_trace_alpha_follows_age() {
        let rendering = RenderingConfig::default();
        let segment = |age| TraceSegment {
            from: Vector::ZERO,
            to: Vector::ONE,
            age,
        };

        let fresh = trace_segment_color(&rendering, &segment(150.0));
        let faded = trace_segment_color(&rendering, &segment(0.0));

        assert!((fresh.alpha() - 150.0 / 255.0).abs() < 1e-6);
        assert_eq!(faded.alpha(), 0.0);
    }

    #[test]
    fn test_trace_segments_follow_latest_frame() {
        let mut app = create_test_app();
        app.add_plugins(SimulationPlugin::with_config(SimulationConfig::default()));
        for _ in 0..3 {
            app.update();
        }

        let latest = app.world().resource::<LatestFrame>();
        let shown = visible_trace_segments(latest, &TraceVisibility { enabled: true });
        let hidden = visible_trace_segments(latest, &TraceVisibility { enabled: false });

        assert_eq!(shown.len(), 2);
        assert_eq!(shown[1].to, app.world().resource::<SimulationContext>().bob_positions().bob2);
        assert!(hidden.is_empty());
        assert!(visible_trace_segments(&LatestFrame::default(), &TraceVisibility::default()).is_empty());
    }

    fn labels_app() -> App {
        let mut app = create_test_app();
        app.add_plugins(SimulationPlugin::with_config(SimulationConfig::default()));
        app.insert_resource(TraceVisibility::default());
        app.add_systems(Startup, spawn_parameter_labels);
        app.add_systems(
            Update,
            (
                handle_trace_toggle_command.in_set(SimulationSet::Commands),
                update_parameter_labels.in_set(SimulationSet::Render),
            ),
        );
        app
    }

    fn label_texts(app: &mut App) -> Vec<String> {
        let world = app.world_mut();
        let mut query = world.query::<(&ParameterLabel, &Text)>();
        let mut labels: Vec<_> = query
            .iter(world)
            .map(|(label, text)| (label.0 as usize, text.0.clone()))
            .collect();
        labels.sort();
        labels.into_iter().map(|(_, text)| text).collect()
    }

    #[test]
    fn test_parameter_labels_follow_context() {
        let mut app = labels_app();
        app.update();

        assert_eq!(
            label_texts(&mut app),
            vec![
                "Length of Pendulum 1: 150",
                "Length of Pendulum 2: 150",
                "Mass of Pendulum 1: 10",
                "Mass of Pendulum 2: 10",
            ]
        );

        app.world_mut()
            .send_event(SimulationCommand::SetParameter(Parameter::Mass2, 17.0));
        app.update();

        assert_eq!(label_texts(&mut app)[3], "Mass of Pendulum 2: 17");
    }

    #[test]
    fn test_trace_toggle() {
        let mut app = labels_app();

        app.world_mut().send_event(SimulationCommand::ToggleTrace);
        app.update();
        assert!(!app.world().resource::<TraceVisibility>().enabled);

        app.world_mut().send_event(SimulationCommand::ToggleTrace);
        app.update();
        assert!(app.world().resource::<TraceVisibility>().enabled);
    }
}
