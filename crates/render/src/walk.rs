use boatclub_kernel::{SceneState, Transform, TransformStack};
use glam::{Mat4, Vec3};

use crate::error::RenderError;
use crate::scene::{SceneNode, SceneNodes, layout};
use crate::sink::{DrawCall, DrawSink};

/// Counters gathered while walking one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draws: usize,
    pub max_depth: usize,
}

/// Owns the live transform and the save/restore stack for one frame, and
/// forwards leaf draws to a sink.
pub struct SceneWalker<'a, S: DrawSink + ?Sized> {
    live: Transform,
    stack: TransformStack,
    sink: &'a mut S,
    stats: FrameStats,
}

impl<'a, S: DrawSink + ?Sized> SceneWalker<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Self {
            live: Transform::IDENTITY,
            stack: TransformStack::new(),
            sink,
            stats: FrameStats::default(),
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.live
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.live
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Save the live transform.
    pub fn push(&mut self) {
        self.stack.push(&self.live);
        self.stats.max_depth = self.stats.max_depth.max(self.stack.depth());
    }

    /// Restore the most recently saved transform.
    pub fn pop(&mut self) -> Result<(), RenderError> {
        self.live = self.stack.pop()?;
        Ok(())
    }

    /// Run `f` as a child subtree: the live transform is saved before and
    /// restored after, even when `f` fails.
    pub fn scoped<F>(&mut self, f: F) -> Result<(), RenderError>
    where
        F: FnOnce(&mut Self) -> Result<(), RenderError>,
    {
        self.push();
        let result = f(self);
        let restored = self.pop();
        result.and(restored)
    }

    /// Issue one draw of `node` at the live transform.
    pub fn draw(&mut self, node: &SceneNode) -> Result<(), RenderError> {
        let call = DrawCall {
            mesh: node.mesh,
            color: node.color,
            material: node.material(),
            model: self.live.matrix(),
            normal: self.live.normal_matrix()?,
        };
        tracing::trace!(
            mesh = node.mesh.0,
            textured = node.texture.is_some(),
            depth = self.stack.depth(),
            "draw"
        );
        self.sink.draw(&call)?;
        self.stats.draws += 1;
        Ok(())
    }

    /// End the walk. Entries left on the stack are an error.
    pub fn finish(self) -> Result<FrameStats, RenderError> {
        self.stack.ensure_empty()?;
        Ok(self.stats)
    }
}

/// Walk the fixed hierarchy: terrain, water, trees, bridge, boathouse with
/// its moored boats, then every patrolling boat.
pub fn walk_hierarchy<S: DrawSink + ?Sized>(
    walker: &mut SceneWalker<'_, S>,
    state: &SceneState,
    nodes: &SceneNodes,
) -> Result<(), RenderError> {
    walker.transform_mut().set_identity();
    walker.draw(&nodes.terrain)?;
    walker.draw(&nodes.water)?;

    for p in layout::TREE_POSITIONS {
        walker.scoped(|w| {
            let s = layout::TREE_SCALE;
            w.transform_mut().scale(s, s, s).translate(p.x, p.y, p.z);
            w.draw(&nodes.tree)
        })?;
    }

    walker.scoped(|w| {
        let start = layout::BRIDGE_START;
        w.transform_mut().translate(start.x, start.y, start.z);
        for segment in 0..layout::BRIDGE_SEGMENTS {
            if segment > 0 {
                let d = layout::BRIDGE_SPACING;
                w.transform_mut()
                    .translate(d.x, d.y, d.z)
                    .scale(1.0, layout::BRIDGE_RISE, 1.0);
            }
            w.draw(&nodes.bridge)?;
        }
        Ok(())
    })?;

    walker.scoped(|w| {
        let at = layout::BOATHOUSE_POSITION;
        w.transform_mut()
            .rotate(layout::BOATHOUSE_YAW_DEGREES, Vec3::Y)
            .translate(at.x, at.y, at.z);
        w.draw(&nodes.boathouse)?;

        let s = layout::MOORED_SCALE;
        let start = layout::MOORED_START;
        w.transform_mut()
            .scale(s, s, s)
            .translate(start.x, start.y, start.z);
        for _ in 0..layout::MOORED_BOATS {
            w.draw(&nodes.boat)?;
            let d = layout::MOORED_SPACING;
            w.transform_mut().translate(d.x, d.y, d.z);
        }
        Ok(())
    })?;

    for actor in state.actors() {
        walker.scoped(|w| {
            let p = actor.motion.position(&actor.config);
            w.transform_mut()
                .rotate(layout::FLEET_YAW_DEGREES, Vec3::Y)
                .translate(p.x, p.y, p.z)
                .rotate(actor.motion.heading_degrees, Vec3::Y);
            w.draw(&nodes.boat)
        })?;
    }
    Ok(())
}

/// Draw one frame with an already computed view-projection transform.
pub fn draw_frame<S: DrawSink + ?Sized>(
    view_projection: Mat4,
    state: &SceneState,
    nodes: &SceneNodes,
    sink: &mut S,
) -> Result<FrameStats, RenderError> {
    sink.begin_frame(view_projection, state.lighting())?;
    let mut walker = SceneWalker::new(&mut *sink);
    walk_hierarchy(&mut walker, state, nodes)?;
    let stats = walker.finish()?;
    sink.end_frame()?;
    Ok(stats)
}

/// Draw the scene as seen from the current camera.
pub fn draw_scene<S: DrawSink + ?Sized>(
    state: &SceneState,
    nodes: &SceneNodes,
    sink: &mut S,
) -> Result<FrameStats, RenderError> {
    draw_frame(state.view_projection(), state, nodes, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use boatclub_assets::{MeshLibrary, SCENE_TEXTURES, SolidColorLoader, load_all};
    use boatclub_common::{MeshKind, Rgb};
    use boatclub_kernel::{SceneConfig, TransformError};

    fn nodes() -> (MeshLibrary, SceneNodes) {
        let meshes = MeshLibrary::builtin();
        let textures = load_all(&SolidColorLoader::default(), &SCENE_TEXTURES).unwrap();
        let nodes = SceneNodes::resolve(&meshes, &textures).unwrap();
        (meshes, nodes)
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, 1e-4)
    }

    #[test]
    fn frame_issues_every_leaf_in_order() {
        let (meshes, nodes) = nodes();
        let state = SceneState::new();
        let mut sink = RecordingSink::new();
        let stats = draw_scene(&state, &nodes, &mut sink).unwrap();

        let patrols = state.actors().len();
        assert_eq!(stats.draws, layout::STATIC_DRAWS + patrols);
        assert_eq!(stats.max_depth, 1);

        let kind = |k| meshes.handle(k).unwrap();
        let mut expected = vec![kind(MeshKind::Terrain), kind(MeshKind::Water)];
        expected.extend([kind(MeshKind::Tree); 3]);
        expected.extend([kind(MeshKind::Bridge); 8]);
        expected.push(kind(MeshKind::Boathouse));
        expected.extend(std::iter::repeat_n(kind(MeshKind::Boat), 10 + patrols));

        let frame = sink.last_frame().unwrap();
        let drawn: Vec<_> = frame.draws.iter().map(|d| d.mesh).collect();
        assert_eq!(drawn, expected);
        assert!(frame.finished);
    }

    #[test]
    fn materials_follow_nodes() {
        let (_, nodes) = nodes();
        let mut sink = RecordingSink::new();
        draw_scene(&SceneState::new(), &nodes, &mut sink).unwrap();
        let draws = &sink.last_frame().unwrap().draws;

        let textured: Vec<bool> = draws.iter().map(|d| d.material.is_textured()).collect();
        assert!(textured[..5].iter().all(|t| *t));
        assert!(textured[5..13].iter().all(|t| !*t));
        assert!(textured[13]);
        assert!(textured[14..].iter().all(|t| !*t));
        assert_eq!(draws[13].color, layout::BOATHOUSE_COLOR);
        assert!(draws[14..].iter().all(|d| d.color == layout::BOAT_COLOR));
        assert!(draws[..13].iter().all(|d| d.color == Rgb::WHITE));
    }

    #[test]
    fn hierarchy_places_leaves() {
        let (_, nodes) = nodes();
        let mut sink = RecordingSink::new();
        draw_scene(&SceneState::new(), &nodes, &mut sink).unwrap();
        let draws = &sink.last_frame().unwrap().draws;

        assert_eq!(draws[0].model, Mat4::IDENTITY);
        // Trees translate inside the scaled frame.
        assert!(close(draws[2].origin(), Vec3::new(-3.9, 0.0, 6.0)));
        // Bridge segments step by 4 along x.
        for i in 0..8 {
            assert!(close(draws[5 + i].origin(), Vec3::new(-8.0 + 4.0 * i as f32, 0.0, 0.0)));
        }
        // Each segment is 4.5% taller than the last.
        let last_y_scale = draws[12].model.y_axis.length();
        assert!((last_y_scale - 1.045f32.powi(7)).abs() < 1e-4);

        let yaw = Mat4::from_rotation_y((-20.0f32).to_radians());
        let boathouse = yaw.transform_point3(Vec3::new(16.0, 0.0, -2.0));
        assert!(close(draws[13].origin(), boathouse));

        // Moored boats: scale 2 then offset, spaced 0.5 in the scaled frame.
        let first = yaw.transform_point3(Vec3::new(16.0, 0.0, -2.0) + 2.0 * Vec3::new(-1.0, -0.05, 3.0));
        assert!(close(draws[14].origin(), first));
        let step = draws[15].origin() - draws[14].origin();
        assert!((step.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn patrol_boats_follow_motion_state() {
        let (_, nodes) = nodes();
        let mut state = SceneState::new();
        for _ in 0..40 {
            state.step();
        }
        let mut sink = RecordingSink::new();
        draw_scene(&state, &nodes, &mut sink).unwrap();
        let draws = &sink.last_frame().unwrap().draws;

        let fleet = Mat4::from_rotation_y((-85.0f32).to_radians());
        for (i, actor) in state.actors().iter().enumerate() {
            let expected = fleet.transform_point3(actor.motion.position(&actor.config));
            assert!(close(draws[layout::STATIC_DRAWS + i].origin(), expected));
        }
    }

    #[test]
    fn draw_count_tracks_patrol_config() {
        let (_, nodes) = nodes();
        let mut config = SceneConfig::default();
        config.patrols.push(config.patrols[0]);
        let state = SceneState::from_config(&config).unwrap();
        let mut sink = RecordingSink::new();
        let stats = draw_scene(&state, &nodes, &mut sink).unwrap();
        assert_eq!(stats.draws, layout::STATIC_DRAWS + 3);

        config.patrols.clear();
        let state = SceneState::from_config(&config).unwrap();
        let stats = draw_scene(&state, &nodes, &mut sink).unwrap();
        assert_eq!(stats.draws, layout::STATIC_DRAWS);
    }

    #[test]
    fn normal_matrix_accompanies_every_draw() {
        let (_, nodes) = nodes();
        let mut sink = RecordingSink::new();
        draw_scene(&SceneState::new(), &nodes, &mut sink).unwrap();
        for d in &sink.last_frame().unwrap().draws {
            let expected = d.model.inverse().transpose();
            assert!(d.normal.abs_diff_eq(expected, 1e-4));
        }
    }

    #[test]
    fn scoped_restores_transform_after_error() {
        let mut sink = RecordingSink::new();
        let mut walker = SceneWalker::new(&mut sink);
        walker.transform_mut().translate(1.0, 0.0, 0.0);
        let before = *walker.transform();

        let err = walker
            .scoped(|w| {
                w.transform_mut().scale(5.0, 5.0, 5.0);
                Err(RenderError::Backend("boom".into()))
            })
            .unwrap_err();
        assert!(matches!(err, RenderError::Backend(_)));
        assert_eq!(*walker.transform(), before);
        assert_eq!(walker.depth(), 0);
        assert!(walker.finish().is_ok());
    }

    #[test]
    fn unbalanced_walk_is_reported() {
        let mut sink = RecordingSink::new();
        let mut walker = SceneWalker::new(&mut sink);
        walker.push();
        assert!(matches!(
            walker.finish(),
            Err(RenderError::Transform(TransformError::Unterminated { depth: 1 }))
        ));

        let mut walker = SceneWalker::new(&mut sink);
        assert!(matches!(
            walker.pop(),
            Err(RenderError::Transform(TransformError::ImbalancedStack))
        ));
    }

    #[test]
    fn sink_failure_aborts_frame() {
        struct Failing;
        impl DrawSink for Failing {
            fn draw(&mut self, _: &DrawCall) -> Result<(), RenderError> {
                Err(RenderError::Backend("lost device".into()))
            }
        }
        let (_, nodes) = nodes();
        let err = draw_scene(&SceneState::new(), &nodes, &mut Failing).unwrap_err();
        assert!(matches!(err, RenderError::Backend(_)));
    }
}
