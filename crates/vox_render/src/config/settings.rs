//! # Render Settings
//!
//! Persisted render configuration. The sequencer never reads these directly
//! during a frame; the game copies [`RenderFlags`] into a
//! [`FrameSnapshot`](crate::render::FrameSnapshot) at frame start.
//!
//! Every field has a default, so a settings file only needs to name the
//! values it changes:
//!
//! ```toml
//! version = "0.3.1"
//!
//! [flags]
//! blur = true
//! debug_render = true
//! ```

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::foundation::math::{utils, Colour, Vec3};

/// Top-level render configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Version string shown on the build-info line
    pub version: String,
    /// Pipeline feature toggles
    pub flags: RenderFlags,
    /// Post-process tuning
    pub post: PostProcessSettings,
    /// Near/far planes shared by the 3D and full-screen passes
    pub depth: DepthRange,
    /// Default directional light
    pub default_light: DefaultLightSettings,
    /// Character paperdoll viewport
    pub paperdoll: PaperdollSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            flags: RenderFlags::default(),
            post: PostProcessSettings::default(),
            depth: DepthRange::default(),
            default_light: DefaultLightSettings::default(),
            paperdoll: PaperdollSettings::default(),
        }
    }
}

impl Config for RenderSettings {}

impl RenderSettings {
    /// Validate the configuration
    ///
    /// Rejects values no pass can work with. Combinations that are legal but
    /// have no effect are only logged, see [`RenderFlags::log_ineffective`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.post.blur_size.is_finite() || self.post.blur_size < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "blur_size must be a non-negative number, got {}", self.post.blur_size
            )));
        }

        if !self.post.sampling_multiplier.is_finite() || self.post.sampling_multiplier <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "sampling_multiplier must be positive, got {}", self.post.sampling_multiplier
            )));
        }

        if !(self.depth.near > 0.0 && self.depth.far > self.depth.near) {
            return Err(ConfigError::Invalid(format!(
                "depth range must satisfy 0 < near < far, got near={} far={}",
                self.depth.near, self.depth.far
            )));
        }

        let offset = self.default_light.offset();
        if !offset.iter().all(|c| c.is_finite()) || offset.norm_squared() == 0.0 {
            return Err(ConfigError::Invalid(
                "default light offset must be finite and non-zero".to_string(),
            ));
        }

        if self.paperdoll.width == 0 || self.paperdoll.height == 0 {
            return Err(ConfigError::Invalid("paperdoll viewport must not be empty".to_string()));
        }

        self.flags.log_ineffective();
        Ok(())
    }
}

/// Pipeline feature toggles
///
/// FXAA and blur are independent: with both enabled the SSAO output is
/// anti-aliased first and then blurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderFlags {
    /// Render the shadow map and sample it in the world shader
    pub shadows: bool,
    /// Capture geometry into the SSAO/G-buffer and composite it afterwards
    pub deferred_rendering: bool,
    /// Accumulate dynamic point lights into the lighting buffer
    pub dynamic_lighting: bool,
    /// Hardware multisampling, and the FXAA pass when its shader exists
    pub multisampling: bool,
    /// Two-pass separable blur at the end of the post chain
    pub blur: bool,
    /// Apply the ambient occlusion term in the composite shader
    pub ssao: bool,
    /// Debug overlays and the verbose debug text block
    pub debug_render: bool,
    /// Draw instanced scenery
    pub instance_render: bool,
    /// Paperdoll rendered without shaders
    pub model_wireframe: bool,
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self {
            shadows: true,
            deferred_rendering: true,
            dynamic_lighting: true,
            multisampling: true,
            blur: false,
            ssao: true,
            debug_render: false,
            instance_render: true,
            model_wireframe: false,
        }
    }
}

impl RenderFlags {
    /// Flags with every optional pass switched off
    pub const fn minimal() -> Self {
        Self {
            shadows: false,
            deferred_rendering: false,
            dynamic_lighting: false,
            multisampling: false,
            blur: false,
            ssao: false,
            debug_render: false,
            instance_render: false,
            model_wireframe: false,
        }
    }

    /// Log combinations that are accepted but change nothing on screen
    pub fn log_ineffective(&self) {
        if self.deferred_rendering {
            return;
        }
        if self.blur {
            log::warn!("Blur is enabled without deferred rendering; the blur passes will not run");
        }
        if self.ssao {
            log::warn!("SSAO is enabled without deferred rendering; the composite pass will not run");
        }
        if self.dynamic_lighting {
            log::warn!("Dynamic lighting is enabled without deferred rendering; the lighting buffer is never composited");
        }
    }
}

/// Post-process tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessSettings {
    /// Blur kernel step; the horizontal pass uses the global blur amount instead while that is positive
    pub blur_size: f32,
    /// SSAO sampling multiplier
    pub sampling_multiplier: f32,
}

impl Default for PostProcessSettings {
    fn default() -> Self {
        Self {
            blur_size: 0.0015,
            sampling_multiplier: 0.5,
        }
    }
}

/// Near/far clipping planes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthRange {
    /// Near plane distance
    pub near: f32,
    /// Far plane distance
    pub far: f32,
}

impl Default for DepthRange {
    fn default() -> Self {
        Self { near: 0.01, far: 1000.0 }
    }
}

/// Default directional light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultLightSettings {
    /// Light position relative to the player; the shadow camera sits here
    pub offset: [f32; 3],
    /// Ambient colour
    pub ambient: Colour,
    /// Diffuse colour
    pub diffuse: Colour,
    /// Specular colour
    pub specular: Colour,
}

impl Default for DefaultLightSettings {
    fn default() -> Self {
        Self {
            offset: [300.0, 300.0, 300.0],
            ambient: Colour::rgb(1.0, 1.0, 1.0),
            diffuse: Colour::rgb(0.0, 0.0, 0.0),
            specular: Colour::rgb(0.0, 0.0, 0.0),
        }
    }
}

impl DefaultLightSettings {
    /// Offset as a vector
    pub fn offset(&self) -> Vec3 {
        utils::vec3_from_array(self.offset)
    }
}

/// Character paperdoll viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperdollSettings {
    /// Offscreen viewport width in pixels
    pub width: u32,
    /// Offscreen viewport height in pixels
    pub height: u32,
    /// Camera eye position
    pub eye: [f32; 3],
    /// Camera look-at target
    pub target: [f32; 3],
}

impl Default for PaperdollSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            eye: [0.0, 1.3, 2.85],
            target: [0.0, 1.3, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = RenderSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.post.blur_size, 0.0015);
        assert_eq!(settings.depth.near, 0.01);
        assert_eq!(settings.depth.far, 1000.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: RenderSettings = toml::from_str(
            "version = \"1.2.3\"\n[flags]\nblur = true\nshadows = false\n",
        )
        .unwrap();

        assert_eq!(settings.version, "1.2.3");
        assert!(settings.flags.blur);
        assert!(!settings.flags.shadows);
        assert!(settings.flags.deferred_rendering);
        assert_eq!(settings.post, PostProcessSettings::default());
    }

    #[test]
    fn test_ron_parse() {
        let settings: RenderSettings =
            ron::from_str("(flags: (multisampling: false), post: (blur_size: 0.004))").unwrap();

        assert!(!settings.flags.multisampling);
        assert_eq!(settings.post.blur_size, 0.004);
    }

    #[test]
    fn test_inverted_depth_range_rejected() {
        let mut settings = RenderSettings::default();
        settings.depth = DepthRange { near: 10.0, far: 1.0 };
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_negative_blur_rejected() {
        let mut settings = RenderSettings::default();
        settings.post.blur_size = -0.1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_light_offset_rejected() {
        let mut settings = RenderSettings::default();
        settings.default_light.offset = [0.0; 3];
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_fxaa_and_blur_may_coexist() {
        let mut settings = RenderSettings::default();
        settings.flags.multisampling = true;
        settings.flags.blur = true;
        assert!(settings.validate().is_ok());
    }
}
