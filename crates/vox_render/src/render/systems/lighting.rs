//! Dynamic light storage
//!
//! Lights are created and destroyed by gameplay (torches, projectiles,
//! explosions) and live in a generational slot map, so a stale [`LightId`]
//! held by a despawned entity can never alias a newer light.

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::{Colour, Vec3};
use crate::render::api::{CullMode, RenderDevice, RenderMode};
use crate::render::guards::{CullScope, MatrixScope};
use crate::render::scene::{DynamicLight, LightingSource};

new_key_type! {
    /// Handle to a light owned by a [`LightingManager`]
    pub struct LightId;
}

/// Slices and stacks of the debug marker sphere
const DEBUG_SPHERE_DETAIL: u32 = 12;

/// Owner of every dynamic point light in the world
#[derive(Debug, Default, Clone)]
pub struct LightingManager {
    lights: SlotMap<LightId, DynamicLight>,
}

impl LightingManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a light and return its handle
    pub fn add_light(&mut self, position: Vec3, radius: f32, diffuse_scale: f32, colour: Colour) -> LightId {
        let id = self.lights.insert(DynamicLight { position, radius, diffuse_scale, colour });
        log::trace!("Added dynamic light {:?} at {:?} r={}", id, position, radius);
        id
    }

    /// Remove a light; returns it if the handle was still live
    pub fn remove_light(&mut self, id: LightId) -> Option<DynamicLight> {
        self.lights.remove(id)
    }

    /// Look up a light
    pub fn light(&self, id: LightId) -> Option<&DynamicLight> {
        self.lights.get(id)
    }

    /// Move a light; returns `false` for a stale handle
    pub fn update_position(&mut self, id: LightId, position: Vec3) -> bool {
        self.lights.get_mut(id).map(|light| light.position = position).is_some()
    }

    /// Resize a light; returns `false` for a stale handle
    pub fn update_radius(&mut self, id: LightId, radius: f32) -> bool {
        self.lights.get_mut(id).map(|light| light.radius = radius).is_some()
    }

    /// Recolour a light; returns `false` for a stale handle
    pub fn update_colour(&mut self, id: LightId, colour: Colour) -> bool {
        self.lights.get_mut(id).map(|light| light.colour = colour).is_some()
    }

    /// Number of live lights
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    /// Whether there are no lights
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Remove every light
    pub fn clear(&mut self) {
        self.lights.clear();
    }
}

impl LightingSource for LightingManager {
    fn lights(&self) -> Box<dyn Iterator<Item = &DynamicLight> + '_> {
        Box::new(self.lights.values())
    }

    fn render_debug(&mut self, device: &mut dyn RenderDevice) {
        let mut cull = CullScope::set(device, CullMode::None, CullMode::Back);
        cull.set_render_mode(RenderMode::Wireframe);
        for light in self.lights.values() {
            let mut matrix = MatrixScope::push(&mut *cull);
            matrix.translate(light.position);
            matrix.draw_sphere(light.radius, DEBUG_SPHERE_DETAIL, DEBUG_SPHERE_DETAIL);
        }
        cull.set_render_mode(RenderMode::Solid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::{DeviceCommand, RecordingDevice};

    #[test]
    fn test_add_update_remove() {
        let mut manager = LightingManager::new();
        let id = manager.add_light(Vec3::zeros(), 5.0, 1.0, Colour::WHITE);
        assert_eq!(manager.len(), 1);

        assert!(manager.update_position(id, Vec3::new(1.0, 2.0, 3.0)));
        assert!(manager.update_radius(id, 8.0));
        let light = manager.light(id).unwrap();
        assert_eq!(light.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(light.radius, 8.0);

        assert!(manager.remove_light(id).is_some());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_stale_handle_does_not_alias_new_light() {
        let mut manager = LightingManager::new();
        let old = manager.add_light(Vec3::zeros(), 1.0, 1.0, Colour::WHITE);
        manager.remove_light(old);
        let new = manager.add_light(Vec3::zeros(), 2.0, 1.0, Colour::BLACK);

        assert!(manager.light(old).is_none());
        assert!(!manager.update_colour(old, Colour::WHITE));
        assert_eq!(manager.light(new).unwrap().colour, Colour::BLACK);
    }

    #[test]
    fn test_clear_invalidates_every_handle() {
        let mut manager = LightingManager::new();
        let a = manager.add_light(Vec3::zeros(), 1.0, 1.0, Colour::WHITE);
        let b = manager.add_light(Vec3::x(), 2.0, 1.0, Colour::WHITE);

        manager.clear();
        assert!(manager.is_empty());
        assert_eq!(manager.lights().count(), 0);
        assert!(manager.light(a).is_none());
        assert!(!manager.update_radius(b, 3.0));
    }

    #[test]
    fn test_lights_iterates_every_live_light() {
        let mut manager = LightingManager::new();
        manager.add_light(Vec3::zeros(), 1.0, 1.0, Colour::WHITE);
        manager.add_light(Vec3::zeros(), 2.0, 1.0, Colour::WHITE);

        let mut radii: Vec<f32> = manager.lights().map(|l| l.radius).collect();
        radii.sort_by(f32::total_cmp);
        assert_eq!(radii, vec![1.0, 2.0]);
    }

    #[test]
    fn test_debug_render_is_balanced() {
        let mut manager = LightingManager::new();
        manager.add_light(Vec3::zeros(), 3.0, 1.0, Colour::WHITE);
        manager.add_light(Vec3::x(), 4.0, 1.0, Colour::WHITE);

        let mut device = RecordingDevice::new();
        manager.render_debug(&mut device);

        assert!(device.audit().is_ok());
        assert_eq!(device.count(|c| matches!(c, DeviceCommand::DrawSphere { .. })), 2);
    }
}
