//! Control panel description: one entry per editable parameter.
//!
//! A front end iterates [`Panel::controls`] once to build its widgets; every
//! edit comes back through [`Panel::set`], which writes the parameter and
//! pushes that control's single render side effect. Ranges are advisory:
//! out-of-range values are stored as given.

use crate::config::{Modifier, Params};
use crate::error::ControlError;
use crate::scene::RenderSink;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Folder {
    Parameters,
    Visual,
    Material,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlKind {
    Slider { min: f32, max: f32, step: f32 },
    Color,
    Toggle,
    /// One of [`Modifier::ALL`].
    Choice,
}

impl ControlKind {
    fn expects(self) -> &'static str {
        match self {
            ControlKind::Slider { .. } => "a number",
            ControlKind::Color => "a color",
            ControlKind::Toggle => "true or false",
            ControlKind::Choice => "None, Droopy or Ribbed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlValue {
    Number(f32),
    Color(u32),
    Toggle(bool),
    Choice(Modifier),
}

impl ControlValue {
    /// Parse user text according to the control kind. Colors accept `#rrggbb`,
    /// `0xrrggbb` or decimal; choices accept the label or its index.
    pub fn parse(kind: ControlKind, text: &str) -> Option<Self> {
        let text = text.trim();
        match kind {
            ControlKind::Slider { .. } => text.parse().ok().map(ControlValue::Number),
            ControlKind::Color => {
                let hex = text.strip_prefix('#').or_else(|| text.strip_prefix("0x"));
                match hex {
                    Some(h) => u32::from_str_radix(h, 16).ok(),
                    None => text.parse().ok(),
                }
                .map(ControlValue::Color)
            }
            ControlKind::Toggle => text.parse().ok().map(ControlValue::Toggle),
            ControlKind::Choice => Modifier::ALL
                .iter()
                .copied()
                .find(|m| m.label().eq_ignore_ascii_case(text))
                .or_else(|| text.parse::<u8>().ok().and_then(|i| Modifier::try_from(i).ok()))
                .map(ControlValue::Choice),
        }
    }
}

type Read = Box<dyn Fn(&Params) -> ControlValue + Send + Sync>;
type Write = Box<dyn Fn(&mut Params, ControlValue) -> bool + Send + Sync>;
type Effect = fn(&Params, &mut dyn RenderSink);

pub struct Control {
    pub key: &'static str,
    pub label: &'static str,
    pub folder: Folder,
    pub kind: ControlKind,
    read: Read,
    write: Write,
    effect: Effect,
}

impl Control {
    pub fn value(&self, params: &Params) -> ControlValue {
        (self.read)(params)
    }

    fn slider(
        folder: Folder,
        key: &'static str,
        label: &'static str,
        (min, max, step): (f32, f32, f32),
        get: fn(&Params) -> f32,
        set: fn(&mut Params, f32),
        effect: Effect,
    ) -> Self {
        Self {
            key,
            label,
            folder,
            kind: ControlKind::Slider { min, max, step },
            read: Box::new(move |p: &Params| ControlValue::Number(get(p))),
            write: Box::new(move |p: &mut Params, v: ControlValue| match v {
                ControlValue::Number(x) => {
                    set(p, x);
                    true
                }
                _ => false,
            }),
            effect,
        }
    }

    fn color(
        folder: Folder,
        key: &'static str,
        label: &'static str,
        get: fn(&Params) -> u32,
        set: fn(&mut Params, u32),
        effect: Effect,
    ) -> Self {
        Self {
            key,
            label,
            folder,
            kind: ControlKind::Color,
            read: Box::new(move |p: &Params| ControlValue::Color(get(p))),
            write: Box::new(move |p: &mut Params, v: ControlValue| match v {
                ControlValue::Color(c) => {
                    set(p, c);
                    true
                }
                _ => false,
            }),
            effect,
        }
    }

    fn toggle(
        folder: Folder,
        key: &'static str,
        label: &'static str,
        get: fn(&Params) -> bool,
        set: fn(&mut Params, bool),
        effect: Effect,
    ) -> Self {
        Self {
            key,
            label,
            folder,
            kind: ControlKind::Toggle,
            read: Box::new(move |p: &Params| ControlValue::Toggle(get(p))),
            write: Box::new(move |p: &mut Params, v: ControlValue| match v {
                ControlValue::Toggle(b) => {
                    set(p, b);
                    true
                }
                _ => false,
            }),
            effect,
        }
    }
}

fn no_effect(_: &Params, _: &mut dyn RenderSink) {}

fn push_mesh_material(p: &Params, sink: &mut dyn RenderSink) {
    sink.mesh_material_mut().sync(p);
}

fn push_color(p: &Params, sink: &mut dyn RenderSink) {
    sink.mesh_material_mut().color = p.color;
    sink.points_material_mut().color = p.color;
}

pub struct Panel {
    controls: Vec<Control>,
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel {
    pub fn new() -> Self {
        use Folder::*;

        let modifier = Control {
            key: "modifier",
            label: "Modifier",
            folder: Parameters,
            kind: ControlKind::Choice,
            read: Box::new(|p: &Params| ControlValue::Choice(p.modifier)),
            write: Box::new(|p: &mut Params, v: ControlValue| match v {
                ControlValue::Choice(m) => {
                    p.modifier = m;
                    true
                }
                _ => false,
            }),
            effect: no_effect,
        };

        let controls = vec![
            modifier,
            Control::slider(
                Parameters,
                "amplitude",
                "Amplitude",
                (0.0, 1.0, 0.01),
                |p| p.amplitude,
                |p, v| p.amplitude = v,
                no_effect,
            ),
            Control::slider(
                Parameters,
                "frequency",
                "Frequency",
                (0.1, 5.0, 0.01),
                |p| p.frequency,
                |p, v| p.frequency = v,
                no_effect,
            ),
            Control::slider(
                Parameters,
                "bloom",
                "Bloom",
                (0.0, 1.0, 0.01),
                |p| p.bloom,
                |p, v| p.bloom = v,
                |p, s| s.set_bloom_strength(p.bloom),
            ),
            Control::slider(
                Parameters,
                "noiseSpeed",
                "Noise Speed",
                (0.0, 3.0, 0.01),
                |p| p.noise_speed,
                |p, v| p.noise_speed = v,
                no_effect,
            ),
            Control::slider(
                Parameters,
                "rotationSpeed",
                "Rotation Speed",
                (0.0, 1.0, 0.01),
                |p| p.rotation_speed,
                |p, v| p.rotation_speed = v,
                no_effect,
            ),
            Control::slider(
                Parameters,
                "ribAmp",
                "Rib Amplitude",
                (0.0, 1.0, 0.01),
                |p| p.rib_amp,
                |p, v| p.rib_amp = v,
                no_effect,
            ),
            Control::slider(
                Parameters,
                "ribFreq",
                "Rib Frequency",
                (1.0, 30.0, 0.1),
                |p| p.rib_freq,
                |p, v| p.rib_freq = v,
                no_effect,
            ),
            Control::color(
                Parameters,
                "color",
                "Color",
                |p| p.color,
                |p, v| p.color = v,
                push_color,
            ),
            Control::color(
                Parameters,
                "backgroundColor",
                "Background Color",
                |p| p.background_color,
                |p, v| p.background_color = v,
                |p, s| s.set_clear_color(p.background_color),
            ),
            Control::toggle(
                Visual,
                "pointMode",
                "Point Mode",
                |p| p.point_mode,
                |p, v| p.point_mode = v,
                |p, s| s.set_point_mode(p.point_mode),
            ),
            Control::slider(
                Visual,
                "pointSize",
                "Point Size",
                (0.001, 0.1, 0.001),
                |p| p.point_size,
                |p, v| p.point_size = v,
                |p, s| s.points_material_mut().size = p.point_size,
            ),
            Control::toggle(
                Visual,
                "useTexture",
                "Use Texture",
                |p| p.use_texture,
                |p, v| p.use_texture = v,
                no_effect,
            ),
            Control::slider(
                Material,
                "metalness",
                "metalness",
                (0.0, 1.0, 0.01),
                |p| p.metalness,
                |p, v| p.metalness = v,
                push_mesh_material,
            ),
            Control::slider(
                Material,
                "roughness",
                "roughness",
                (0.0, 1.0, 0.01),
                |p| p.roughness,
                |p, v| p.roughness = v,
                push_mesh_material,
            ),
            Control::slider(
                Material,
                "transmission",
                "transmission",
                (0.0, 1.0, 0.01),
                |p| p.transmission,
                |p, v| p.transmission = v,
                push_mesh_material,
            ),
            Control::slider(
                Material,
                "thickness",
                "thickness",
                (0.0, 2.0, 0.01),
                |p| p.thickness,
                |p, v| p.thickness = v,
                push_mesh_material,
            ),
            Control::slider(
                Material,
                "clearcoat",
                "clearcoat",
                (0.0, 1.0, 0.01),
                |p| p.clearcoat,
                |p, v| p.clearcoat = v,
                push_mesh_material,
            ),
            Control::slider(
                Material,
                "clearcoatRoughness",
                "clearcoatRoughness",
                (0.0, 1.0, 0.01),
                |p| p.clearcoat_roughness,
                |p, v| p.clearcoat_roughness = v,
                push_mesh_material,
            ),
            Control::slider(
                Material,
                "envMapIntensity",
                "envMapIntensity",
                (0.0, 2.0, 0.01),
                |p| p.env_map_intensity,
                |p, v| p.env_map_intensity = v,
                push_mesh_material,
            ),
        ];

        Self { controls }
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn get(&self, key: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.key == key)
    }

    pub fn in_folder(&self, folder: Folder) -> impl Iterator<Item = &Control> {
        self.controls.iter().filter(move |c| c.folder == folder)
    }

    /// Write one control and push its side effect.
    pub fn set(
        &self,
        key: &str,
        value: ControlValue,
        params: &mut Params,
        sink: &mut dyn RenderSink,
    ) -> Result<(), ControlError> {
        let control = self
            .get(key)
            .ok_or_else(|| ControlError::Unknown(key.to_string()))?;
        if !(control.write)(params, value) {
            return Err(ControlError::WrongKind {
                key: key.to_string(),
                expected: control.kind.expects(),
            });
        }
        (control.effect)(params, sink);
        Ok(())
    }

    /// `key=value` text form, as typed on the command line.
    pub fn set_text(
        &self,
        assignment: &str,
        params: &mut Params,
        sink: &mut dyn RenderSink,
    ) -> Result<(), ControlError> {
        let (key, raw) = assignment
            .split_once('=')
            .ok_or_else(|| ControlError::Unknown(assignment.to_string()))?;
        let key = key.trim();
        let control = self
            .get(key)
            .ok_or_else(|| ControlError::Unknown(key.to_string()))?;
        let value = ControlValue::parse(control.kind, raw).ok_or_else(|| ControlError::WrongKind {
            key: key.to_string(),
            expected: control.kind.expects(),
        })?;
        self.set(key, value, params, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;

    fn setup() -> (Panel, Params, Scene) {
        let params = Params::default();
        let scene = Scene::new(&params);
        (Panel::new(), params, scene)
    }

    #[test]
    fn keys_are_unique() {
        let panel = Panel::new();
        let mut keys: Vec<_> = panel.controls().iter().map(|c| c.key).collect();
        let n = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), n);
        assert_eq!(panel.in_folder(Folder::Material).count(), 7);
    }

    #[test]
    fn bloom_edit_reaches_bloom_pass() {
        let (panel, mut params, mut scene) = setup();
        panel
            .set("bloom", ControlValue::Number(0.75), &mut params, &mut scene)
            .unwrap();
        assert_eq!(params.bloom, 0.75);
        assert_eq!(scene.bloom.strength, 0.75);
    }

    #[test]
    fn color_edit_reaches_both_materials() {
        let (panel, mut params, mut scene) = setup();
        panel.set_text("color=#ff00ff", &mut params, &mut scene).unwrap();
        assert_eq!(params.color, 0xff00ff);
        assert_eq!(scene.mesh_material.color, 0xff00ff);
        assert_eq!(scene.points_material.color, 0xff00ff);
    }

    #[test]
    fn out_of_range_values_are_kept() {
        let (panel, mut params, mut scene) = setup();
        panel.set_text("ribFreq=250", &mut params, &mut scene).unwrap();
        assert_eq!(params.rib_freq, 250.0);
        panel.set_text("amplitude=-2", &mut params, &mut scene).unwrap();
        assert_eq!(params.amplitude, -2.0);
    }

    #[test]
    fn modifier_accepts_label_or_index() {
        let (panel, mut params, mut scene) = setup();
        panel.set_text("modifier=ribbed", &mut params, &mut scene).unwrap();
        assert_eq!(params.modifier, Modifier::Ribbed);
        panel.set_text("modifier=1", &mut params, &mut scene).unwrap();
        assert_eq!(params.modifier, Modifier::Droopy);
    }

    #[test]
    fn wrong_kind_and_unknown_keys_are_rejected() {
        let (panel, mut params, mut scene) = setup();
        let before = params.clone();
        assert!(matches!(
            panel.set("amplitude", ControlValue::Toggle(true), &mut params, &mut scene),
            Err(ControlError::WrongKind { .. })
        ));
        assert!(matches!(
            panel.set_text("wobble=1", &mut params, &mut scene),
            Err(ControlError::Unknown(_))
        ));
        assert!(panel.set_text("pointMode=maybe", &mut params, &mut scene).is_err());
        assert_eq!(params, before);
    }

    #[test]
    fn material_edit_syncs_mesh_material() {
        let (panel, mut params, mut scene) = setup();
        panel.set_text("roughness=0.9", &mut params, &mut scene).unwrap();
        assert_eq!(scene.mesh_material.roughness, 0.9);
        assert_eq!(panel.get("roughness").unwrap().value(&params), ControlValue::Number(0.9));
    }
}
