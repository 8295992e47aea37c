use serde::{Deserialize, Serialize};

use crate::display::Color;
use crate::math3d::Vec3;

/// Point light and surface reflection coefficients for the Phong model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    pub position: Vec3,
    /// Diffuse reflection coefficient, 0..=1
    pub diffuse: f64,
    /// Specular reflection coefficient, 0..=1
    pub specular: f64,
    /// Ambient reflection coefficient, 0..=1
    pub ambient: f64,
    /// Specular exponent
    pub shininess: f64,
    /// Incident light intensity per channel
    pub light_color: Color,
    pub ambient_color: Color,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(500.0, 500.0, 100.0),
            diffuse: 0.5,
            specular: 0.5,
            ambient: 0.5,
            shininess: 10.0,
            light_color: Color::WHITE,
            ambient_color: Color::BLUE,
        }
    }
}

impl LightSettings {
    /// Phong color at `point` with unit surface `normal`, seen from unit
    /// direction `view`.
    ///
    /// Ambient always contributes; diffuse only when the light is in front of
    /// the surface, specular only when the reflection leans towards the
    /// viewer. Channels saturate at 255.
    pub fn shade(&self, point: Vec3, normal: Vec3, view: Vec3) -> Color {
        let to_light = (self.position - point).normalize();
        let ln = to_light.dot(&normal);
        let diffuse = if ln > 0.0 { self.diffuse * ln } else { 0.0 };

        let reflected = to_light.reflect_about(&normal);
        let vr = view.dot(&reflected);
        let specular = if vr > 0.0 {
            self.specular * vr.powf(self.shininess)
        } else {
            0.0
        };

        let channel = |incident: u8, ambient: u8| -> u8 {
            let value = f64::from(ambient) * self.ambient + f64::from(incident) * (diffuse + specular);
            value.round().clamp(0.0, 255.0) as u8
        };
        Color::rgb(
            channel(self.light_color.r, self.ambient_color.r),
            channel(self.light_color.g, self.ambient_color.g),
            channel(self.light_color.b, self.ambient_color.b),
        )
    }
}
