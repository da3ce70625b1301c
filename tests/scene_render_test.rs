mod common;

use common::test_utils::{AssetDir, prepare};
use desk_scene::{
    Matrix4, SceneError, Vector4,
    data_structures::transform::Transform,
    flow,
    resources::mesh::ShapeKind,
    scene::{BoundSurface, script},
    shader::{UniformValue, names},
};

fn assert_matrix_eq(actual: Matrix4<f32>, expected: Matrix4<f32>) {
    let a: &[f32; 16] = actual.as_ref();
    let e: &[f32; 16] = expected.as_ref();
    for (x, y) in a.iter().zip(e) {
        assert!((x - y).abs() < 1e-5, "{actual:?} != {expected:?}");
    }
}

#[test]
fn full_scene_renders_every_draw_with_its_state() {
    let assets = AssetDir::with_desk_textures("render");
    let mut prepared = prepare(assets.config());
    prepared.target.begin_frame();

    let report = prepared.scene.render_scene(&mut prepared.target);
    assert!(report.is_clean(), "{:?}", report.issues);
    assert_eq!(report.draws, 125);

    let draws = prepared.target.draws();
    assert_eq!(draws.len(), 125);
    let script = script::desk_scene();
    for (recorded, scripted) in draws.iter().zip(&script) {
        assert_eq!(recorded.shape, scripted.shape);
        assert_matrix_eq(recorded.model(), scripted.transform.to_matrix());
        assert_eq!(recorded.object.use_texture, 1);
    }

    // the floor samples wood from unit 0, the tabletop black wood from unit 1
    assert_eq!(draws[0].object.texture_slot, 0);
    assert_eq!(draws[0].object.shininess, 32.0);
    assert_eq!(draws[2].object.texture_slot, 1);
    assert_eq!(draws[2].object.shininess, 16.0);
    assert_eq!(draws[3].object.texture_slot, 2);
    assert_eq!(draws[3].object.shininess, 64.0);
    assert_eq!(draws.iter().filter(|d| d.shape == ShapeKind::Cylinder).count(), 2);
}

#[test]
fn missing_texture_keeps_the_previous_one_bound() {
    let assets = AssetDir::with_desk_textures("stale");
    assets.remove("snhu_one.jpg");
    let mut prepared = prepare(assets.config());

    let report = prepared.scene.render_scene(&mut prepared.target);
    assert_eq!(report.draws, 125);
    assert_eq!(report.issues.len(), 1);
    assert!(matches!(&report.issues[0], SceneError::UnknownTexture(tag) if tag == "monitor_screen"));

    // monitor screen is the last monitor draw, it still samples the frame's black metal
    let screen = &prepared.target.draws()[2 + 9 + 5];
    assert_eq!(screen.object.texture_slot, 2);
    assert_eq!(screen.object.specular_color, [1.0, 1.0, 1.0]);
}

#[test]
fn unknown_material_is_sticky() {
    let assets = AssetDir::with_desk_textures("sticky");
    let mut prepared = prepare(assets.config());
    let scene = &mut prepared.scene;
    let sink = &mut prepared.target;

    scene.set_shader_material(sink, "blackMetalMat").unwrap();
    let writes = sink.uniforms().len();
    let err = scene.set_shader_material(sink, "velvetMat").unwrap_err();

    assert!(matches!(err, SceneError::UnknownMaterial(_)));
    assert_eq!(sink.uniforms().len(), writes);
    assert_eq!(sink.scene_uniforms().object.shininess, 64.0);
    assert_eq!(scene.draw_state().material.as_deref(), Some("blackMetalMat"));
}

#[test]
fn unknown_texture_is_distinct_from_unit_zero() {
    let assets = AssetDir::with_desk_textures("unit_zero");
    let mut prepared = prepare(assets.config());
    let scene = &mut prepared.scene;
    let sink = &mut prepared.target;

    assert_eq!(scene.set_shader_texture(sink, "wood").unwrap(), 0);
    let samplers = sink.uniforms().count(names::OBJECT_TEXTURE);
    let err = scene.set_shader_texture(sink, "granite").unwrap_err();

    assert!(matches!(err, SceneError::UnknownTexture(_)));
    assert_eq!(sink.uniforms().count(names::OBJECT_TEXTURE), samplers);
    assert_eq!(
        scene.draw_state().surface,
        BoundSurface::Texture {
            tag: "wood".into(),
            slot: 0
        }
    );
}

#[test]
fn flat_colour_switches_texturing_off() {
    let mut prepared = prepare(AssetDir::new("colour").config());
    let scene = &mut prepared.scene;
    let sink = &mut prepared.target;

    scene.set_shader_color(sink, [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(sink.uniforms().last(names::USE_TEXTURE), Some(UniformValue::Bool(false)));
    assert_eq!(
        sink.uniforms().last(names::OBJECT_COLOR),
        Some(UniformValue::Vec4(Vector4::new(1.0, 0.0, 0.0, 1.0)))
    );
    assert_eq!(sink.scene_uniforms().object.use_texture, 0);
}

#[test]
fn scaled_rotated_translated_model_matrix() {
    let transform = Transform::new((2.0, 1.0, 1.0), (0.0, 0.0, 90.0), (1.0, 0.0, 0.0));
    let expected = Matrix4::new(
        0.0, 2.0, 0.0, 0.0, //
        -1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        1.0, 0.0, 0.0, 1.0,
    );
    assert_matrix_eq(transform.to_matrix(), expected);
}

#[test]
fn dry_run_renders_one_frame() {
    let assets = AssetDir::with_desk_textures("dry_run");
    let report = flow::run_headless(assets.config()).expect("dry run succeeds");
    assert_eq!(report.draws, 125);
    assert!(report.is_clean(), "{:?}", report.issues);
}
