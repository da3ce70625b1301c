//! Fixed scene lighting.

use cgmath::Vector3;

use crate::shader::{UniformSink, names};

/// Point light slots declared by the scene shader.
pub const MAX_POINT_LIGHTS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub active: bool,
}

fn grey(level: f32) -> Vector3<f32> {
    Vector3::new(level, level, level)
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneLights {
    pub use_lighting: bool,
    pub directional: DirectionalLight,
    /// Filled from slot 0 upwards; slots past the end are switched off.
    pub points: Vec<PointLight>,
}

impl SceneLights {
    /// A soft sun from above and slightly behind plus one fill light over the desk.
    pub fn desk_default() -> Self {
        Self {
            use_lighting: true,
            directional: DirectionalLight {
                direction: Vector3::new(-0.2, -1.0, -0.3),
                ambient: grey(0.1),
                diffuse: grey(0.6),
                specular: grey(0.8),
                active: true,
            },
            points: vec![PointLight {
                position: Vector3::new(0.0, 12.0, 0.0),
                ambient: grey(0.05),
                diffuse: grey(0.6),
                specular: grey(0.8),
                active: true,
            }],
        }
    }

    /// Write every light uniform. Unused point light slots get `bActive = false`.
    pub fn apply<S: UniformSink + ?Sized>(&self, sink: &mut S) {
        sink.set_bool(names::USE_LIGHTING, self.use_lighting);

        let sun = &self.directional;
        sink.set_vec3(names::DIRECTIONAL_DIRECTION, sun.direction);
        sink.set_vec3(names::DIRECTIONAL_AMBIENT, sun.ambient);
        sink.set_vec3(names::DIRECTIONAL_DIFFUSE, sun.diffuse);
        sink.set_vec3(names::DIRECTIONAL_SPECULAR, sun.specular);
        sink.set_bool(names::DIRECTIONAL_ACTIVE, sun.active);

        if self.points.len() > MAX_POINT_LIGHTS {
            log::warn!(
                "{} point lights configured, only the first {MAX_POINT_LIGHTS} are used",
                self.points.len()
            );
        }
        for slot in 0..MAX_POINT_LIGHTS {
            match self.points.get(slot) {
                Some(light) => {
                    sink.set_vec3(&names::point_light(slot, "position"), light.position);
                    sink.set_vec3(&names::point_light(slot, "ambient"), light.ambient);
                    sink.set_vec3(&names::point_light(slot, "diffuse"), light.diffuse);
                    sink.set_vec3(&names::point_light(slot, "specular"), light.specular);
                    sink.set_bool(&names::point_light(slot, "bActive"), light.active);
                }
                None => sink.set_bool(&names::point_light(slot, "bActive"), false),
            }
        }
    }
}

impl Default for SceneLights {
    fn default() -> Self {
        Self::desk_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{UniformLog, UniformValue};

    #[test]
    fn desk_lights_fill_slot_zero_only() {
        let mut log = UniformLog::new();
        SceneLights::desk_default().apply(&mut log);

        assert_eq!(log.last(names::USE_LIGHTING), Some(UniformValue::Bool(true)));
        assert_eq!(
            log.last(names::DIRECTIONAL_DIRECTION),
            Some(UniformValue::Vec3(Vector3::new(-0.2, -1.0, -0.3)))
        );
        assert_eq!(log.last(names::DIRECTIONAL_ACTIVE), Some(UniformValue::Bool(true)));

        assert_eq!(
            log.last(&names::point_light(0, "ambient")),
            Some(UniformValue::Vec3(grey(0.05)))
        );
        assert_eq!(
            log.last(&names::point_light(0, "specular")),
            Some(UniformValue::Vec3(grey(0.8)))
        );
        assert_eq!(log.last(&names::point_light(0, "bActive")), Some(UniformValue::Bool(true)));
        for slot in 1..MAX_POINT_LIGHTS {
            assert_eq!(
                log.last(&names::point_light(slot, "bActive")),
                Some(UniformValue::Bool(false)),
                "slot {slot}"
            );
            assert_eq!(log.count(&names::point_light(slot, "position")), 0);
        }
    }

    #[test]
    fn extra_point_lights_are_dropped() {
        let mut lights = SceneLights::desk_default();
        let fill = lights.points[0];
        lights.points = vec![fill; MAX_POINT_LIGHTS + 2];

        let mut log = UniformLog::new();
        lights.apply(&mut log);
        assert_eq!(log.count(&names::point_light(MAX_POINT_LIGHTS, "bActive")), 0);
        assert_eq!(
            log.last(&names::point_light(MAX_POINT_LIGHTS - 1, "bActive")),
            Some(UniformValue::Bool(true))
        );
    }
}
