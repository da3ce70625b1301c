mod common;

use common::test_utils::{AssetDir, prepare};
use desk_scene::{
    DuplicateTagPolicy, SceneConfig, SceneError, Vector3,
    resources::mesh::ShapeKind,
    scene::lights::MAX_POINT_LIGHTS,
    shader::{UniformValue, names},
};

#[test]
fn desk_textures_get_units_in_load_order() {
    let assets = AssetDir::with_desk_textures("units");
    let prepared = prepare(assets.config());

    assert!(prepared.report.is_clean(), "{:?}", prepared.report.failures);
    assert_eq!(prepared.report.textures_loaded, 5);

    let textures = prepared.scene.textures();
    assert_eq!(textures.find_slot_by_tag("wood"), Some(0));
    assert_eq!(textures.find_slot_by_tag("black_wood"), Some(1));
    assert_eq!(textures.find_slot_by_tag("black_metal"), Some(2));
    assert_eq!(textures.find_slot_by_tag("white"), Some(4));
    for (unit, entry) in textures.entries().iter().enumerate() {
        assert_eq!(prepared.gpu.bound(unit as u32), Some(entry.handle));
    }
    assert_eq!(
        prepared.gpu.dimensions(textures.find_id_by_tag("wood").unwrap()),
        Some((4, 4))
    );
}

#[test]
fn missing_texture_file_is_reported_and_skipped() {
    let assets = AssetDir::with_desk_textures("missing");
    assets.remove("snhu_one.jpg");
    let prepared = prepare(assets.config());

    assert_eq!(prepared.report.textures_loaded, 4);
    assert_eq!(prepared.report.failures.len(), 1);
    assert!(matches!(prepared.report.failures[0], SceneError::Io { .. }));

    let textures = prepared.scene.textures();
    assert_eq!(textures.find_slot_by_tag("monitor_screen"), None);
    // later textures move up instead of leaving a gap
    assert_eq!(textures.find_slot_by_tag("white"), Some(3));
}

#[test]
fn greyscale_texture_is_rejected() {
    let assets = AssetDir::with_desk_textures("grey");
    assets.write_grey("white_texture.jpg", 2, 2);
    let prepared = prepare(assets.config());

    assert_eq!(prepared.report.failures.len(), 1);
    assert!(matches!(
        prepared.report.failures[0],
        SceneError::UnsupportedChannels { channels: 1, .. }
    ));
    assert_eq!(prepared.scene.textures().find_slot_by_tag("white"), None);
    assert_eq!(prepared.gpu.live_count(), 4);
}

#[test]
fn capacity_limits_how_many_textures_load() {
    let assets = AssetDir::with_desk_textures("capacity");
    let config = SceneConfig {
        texture_capacity: 2,
        ..assets.config()
    };
    let prepared = prepare(config);

    assert_eq!(prepared.report.textures_loaded, 2);
    assert_eq!(prepared.report.failures.len(), 3);
    assert!(
        prepared
            .report
            .failures
            .iter()
            .all(|e| matches!(e, SceneError::RegistryFull { capacity: 2, .. }))
    );
    let textures = prepared.scene.textures();
    assert_eq!(textures.find_slot_by_tag("wood"), Some(0));
    assert_eq!(textures.find_slot_by_tag("black_wood"), Some(1));
    assert_eq!(textures.find_slot_by_tag("black_metal"), None);
}

#[test]
fn materials_are_defined_with_their_shading_parameters() {
    let prepared = prepare(AssetDir::new("materials").config());
    let materials = prepared.scene.materials();

    let metal = materials.find_by_tag("blackMetalMat").expect("blackMetalMat is defined");
    assert_eq!(metal.shininess, 64.0);
    assert_eq!(metal.specular_color, Vector3::new(0.5, 0.5, 0.5));
    assert_eq!(materials.find_by_tag("woodMat").map(|m| m.shininess), Some(32.0));
    assert!(materials.find_by_tag("blackmetalmat").is_none());
}

#[test]
fn lights_and_meshes_are_set_up_once() {
    let prepared = prepare(AssetDir::new("lights").config());
    let uniforms = prepared.target.uniforms();

    assert_eq!(uniforms.last(names::USE_LIGHTING), Some(UniformValue::Bool(true)));
    assert_eq!(
        uniforms.last(names::DIRECTIONAL_DIFFUSE),
        Some(UniformValue::Vec3(Vector3::new(0.6, 0.6, 0.6)))
    );
    assert_eq!(
        uniforms.last(&names::point_light(0, "position")),
        Some(UniformValue::Vec3(Vector3::new(0.0, 12.0, 0.0)))
    );
    assert_eq!(
        uniforms.last(&names::point_light(0, "bActive")),
        Some(UniformValue::Bool(true))
    );
    for slot in 1..MAX_POINT_LIGHTS {
        assert_eq!(
            uniforms.last(&names::point_light(slot, "bActive")),
            Some(UniformValue::Bool(false))
        );
    }

    let lights = &prepared.target.scene_uniforms().lights;
    assert_eq!(lights.points[0].active, 1);
    assert!(lights.points[1..].iter().all(|p| p.active == 0));

    assert_eq!(
        prepared.target.loaded(),
        &[ShapeKind::Plane, ShapeKind::Box, ShapeKind::Cylinder]
    );
}

#[test]
fn config_file_selects_shadowing_policy() {
    let assets = AssetDir::new("config");
    let config_path = assets.path().join("scene.json");
    std::fs::write(
        &config_path,
        format!(
            r#"{{ "asset_dir": {:?}, "duplicate_tags": "shadow", "texture_capacity": 8 }}"#,
            assets.path().display().to_string()
        ),
    )
    .expect("failed to write config");

    let config = SceneConfig::from_path(&config_path).expect("config parses");
    assert_eq!(config.duplicate_tags, DuplicateTagPolicy::Shadow);
    assert_eq!(config.texture_capacity, 8);
    assert_eq!(config.asset_dir, assets.path());
}

#[test]
fn preparing_again_hands_out_units_from_zero() {
    let assets = AssetDir::with_desk_textures("prepare_twice");
    let mut prepared = prepare(assets.config());
    let first_wood = prepared.scene.textures().find_id_by_tag("wood");

    let report = prepared.scene.prepare_scene(&mut prepared.gpu, &mut prepared.target);
    assert!(report.is_clean(), "{:?}", report.failures);
    assert_eq!(report.textures_loaded, 5);

    let textures = prepared.scene.textures();
    assert_eq!(textures.len(), 5);
    assert_eq!(textures.find_slot_by_tag("wood"), Some(0));
    assert_eq!(textures.find_slot_by_tag("white"), Some(4));
    assert_ne!(textures.find_id_by_tag("wood"), first_wood);
    assert_eq!(prepared.gpu.live_count(), 5);
    assert_eq!(prepared.gpu.bound(0), textures.find_id_by_tag("wood"));
}

#[test]
fn oversized_texture_file_is_reported_and_skipped() {
    let assets = AssetDir::with_desk_textures("oversized");
    assets.write_rgb("snhu_one.jpg", 9000, 1, [0, 0, 0]);
    let prepared = prepare(assets.config());

    assert_eq!(prepared.report.textures_loaded, 4);
    assert_eq!(prepared.report.failures.len(), 1);
    assert!(matches!(
        &prepared.report.failures[0],
        SceneError::Upload { label, .. } if label == "monitor_screen"
    ));
    assert_eq!(prepared.scene.textures().find_slot_by_tag("monitor_screen"), None);
    assert_eq!(prepared.gpu.live_count(), 4);
}
