//! The desk scene as data.
//!
//! Every sub-assembly returns the draws it is made of, in drawing order. The
//! script never touches the registries: materials and textures are referenced
//! by tag and resolved when the draw is bound.

use crate::{
    data_structures::{material::MaterialRegistry, transform::Transform},
    error::SceneError,
    resources::mesh::ShapeKind,
};

/// Where a draw takes its base colour from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Surface {
    Texture(&'static str),
    Color([f32; 4]),
}

/// One primitive draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Draw {
    pub shape: ShapeKind,
    pub transform: Transform,
    pub material: &'static str,
    pub surface: Surface,
    pub uv_scale: (f32, f32),
}

impl Draw {
    fn new(shape: ShapeKind, transform: Transform, material: &'static str, texture: &'static str) -> Self {
        Self {
            shape,
            transform,
            material,
            surface: Surface::Texture(texture),
            uv_scale: (1.0, 1.0),
        }
    }

    fn plane(transform: Transform, material: &'static str, texture: &'static str) -> Self {
        Self::new(ShapeKind::Plane, transform, material, texture)
    }

    fn cube(transform: Transform, material: &'static str, texture: &'static str) -> Self {
        Self::new(ShapeKind::Box, transform, material, texture)
    }

    fn cylinder(transform: Transform, material: &'static str, texture: &'static str) -> Self {
        Self::new(ShapeKind::Cylinder, transform, material, texture)
    }
}

/// Image files (relative to the asset directory) and the tags they are registered under.
///
/// The order decides the texture units: `wood` is unit 0, `black_wood` unit 1 and so on.
pub const TEXTURE_FILES: [(&str, &str); 5] = [
    ("wood_texture.jpg", "wood"),
    ("black_wood_texture.jpg", "black_wood"),
    ("black_brushed_metal_texture.jpg", "black_metal"),
    ("snhu_one.jpg", "monitor_screen"),
    ("white_texture.jpg", "white"),
];

const WOOD: &str = "woodMat";
const BLACK_WOOD: &str = "blackWoodMat";
const BLACK_METAL: &str = "blackMetalMat";
const SCREEN: &str = "monitorScreenMat";
const WHITE: &str = "whiteMat";

/// Define every material the script refers to. Failures are returned, not fatal.
pub fn define_object_materials(materials: &mut MaterialRegistry) -> Vec<SceneError> {
    let white = (1.0, 1.0, 1.0);
    [
        materials.define(WOOD, white, (0.3, 0.3, 0.3), 32.0),
        materials.define(BLACK_WOOD, white, (0.2, 0.2, 0.2), 16.0),
        materials.define(BLACK_METAL, white, (0.5, 0.5, 0.5), 64.0),
        materials.define(SCREEN, white, (1.0, 1.0, 1.0), 64.0),
        materials.define(WHITE, white, (0.5, 0.5, 0.5), 1.0),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect()
}

pub fn floor() -> Vec<Draw> {
    vec![Draw::plane(
        Transform::scaled_at((20.0, 1.0, 15.0), (0.0, 0.0, 0.0)),
        WOOD,
        "wood",
    )]
}

pub fn wall() -> Vec<Draw> {
    vec![Draw::plane(
        Transform::scaled_at((20.0, 1.0, 20.0), (0.0, 15.0, -15.0)).with_rotation(90.0, 0.0, 0.0),
        WOOD,
        "wood",
    )]
}

pub fn desk() -> Vec<Draw> {
    let metal = |scale: (f32, f32, f32), at: (f32, f32, f32)| {
        Draw::cube(Transform::scaled_at(scale, at), BLACK_METAL, "black_metal")
    };
    vec![
        Draw::cube(
            Transform::scaled_at((24.0, 0.75, 16.0), (0.0, 10.0, 0.0)),
            BLACK_WOOD,
            "black_wood",
        ),
        // left frame: leg, joint, top rail, foot
        metal((1.25, 10.0, 1.25), (-9.0, 5.0, 0.0)),
        metal((1.25, 1.25, 1.25), (-8.0, 9.0, 0.0)),
        metal((1.25, 0.5, 12.0), (-8.0, 9.5, 0.0)),
        metal((1.25, 0.5, 12.0), (-9.0, 0.25, 0.0)),
        // right frame
        metal((1.25, 10.0, 1.25), (9.0, 5.0, 0.0)),
        metal((1.25, 1.25, 1.25), (8.0, 9.0, 0.0)),
        metal((1.25, 0.5, 12.0), (8.0, 9.5, 0.0)),
        metal((1.25, 0.5, 15.0), (9.0, 0.25, 0.0)),
    ]
}

pub fn monitor() -> Vec<Draw> {
    vec![
        Draw::cube(
            Transform::scaled_at((2.0, 0.25, 2.0), (-5.0, 10.5, -6.0)),
            BLACK_METAL,
            "black_metal",
        ),
        Draw::cylinder(
            Transform::scaled_at((0.5, 2.0, 0.5), (-5.0, 10.75, -6.0)),
            BLACK_METAL,
            "black_metal",
        ),
        Draw::cylinder(
            Transform::scaled_at((0.5, 6.0, 0.5), (-5.0, 12.5, -6.0)).with_rotation(0.0, 0.0, -30.0),
            BLACK_METAL,
            "black_metal",
        ),
        Draw::cube(
            Transform::scaled_at((2.0, 1.0, 2.0), (-1.5, 17.0, -5.5)).with_rotation(90.0, 0.0, 0.0),
            BLACK_METAL,
            "black_metal",
        ),
        Draw::cube(
            Transform::scaled_at((15.5, 10.5, 0.5), (0.0, 19.0, -5.0)),
            BLACK_METAL,
            "black_metal",
        ),
        Draw::cube(
            Transform::scaled_at((15.0, 10.0, 0.25), (0.0, 19.0, -4.85)),
            SCREEN,
            "monitor_screen",
        ),
    ]
}

pub const KEY_ROWS: usize = 6;
pub const KEY_COLUMNS: usize = 17;

pub fn keyboard() -> Vec<Draw> {
    let mut draws = Vec::with_capacity(1 + KEY_ROWS * KEY_COLUMNS);
    draws.push(Draw::cube(
        Transform::scaled_at((10.0, 0.25, 4.0), (0.0, 10.5, 0.0)),
        BLACK_METAL,
        "black_metal",
    ));
    for row in 0..KEY_ROWS {
        for column in 0..KEY_COLUMNS {
            let at = (-4.0 + column as f32 / 2.0, 10.5, -1.0 + row as f32 / 2.0);
            draws.push(Draw::cube(Transform::scaled_at((0.35, 0.35, 0.35), at), WHITE, "white"));
        }
    }
    draws
}

pub fn mouse() -> Vec<Draw> {
    vec![
        Draw::cube(
            Transform::scaled_at((1.25, 0.5, 1.75), (7.0, 10.5, 0.0)),
            BLACK_METAL,
            "black_metal",
        ),
        Draw::cube(
            Transform::scaled_at((1.25, 0.75, 0.875), (7.0, 10.5, 0.45)),
            BLACK_METAL,
            "black_metal",
        ),
        Draw::cube(
            Transform::scaled_at((0.5, 0.75, 0.75), (6.7, 10.5, -0.45)),
            WHITE,
            "white",
        ),
        Draw::cube(
            Transform::scaled_at((0.5, 0.75, 0.75), (7.3, 10.5, -0.45)),
            WHITE,
            "white",
        ),
        // scroll wheel
        Draw::cube(
            Transform::scaled_at((0.05, 1.0, 0.6), (7.0, 10.5, -0.45)),
            BLACK_METAL,
            "black_metal",
        ),
    ]
}

/// Sub-assemblies in drawing order.
pub const SUB_ASSEMBLIES: [(&str, fn() -> Vec<Draw>); 6] = [
    ("floor", floor),
    ("wall", wall),
    ("desk", desk),
    ("monitor", monitor),
    ("keyboard", keyboard),
    ("mouse", mouse),
];

/// Every draw of the scene, in order.
pub fn desk_scene() -> Vec<Draw> {
    SUB_ASSEMBLIES.iter().flat_map(|(_, assembly)| assembly()).collect()
}
