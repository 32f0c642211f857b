//! Parameter state and preset operations.
//!
//! [`Controller`] is the single owner of the live [`Params`], the preset
//! collection and the active preset name. The frame tick borrows the
//! parameters from here; nothing else holds them.

use std::path::Path;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::Params;
use crate::error::{ControlError, PresetError, StoreError};
use crate::panel::{ControlValue, Panel};
use crate::preset::{Preset, PresetBook};
use crate::scene::RenderSink;
use crate::store::{CUSTOM_PRESETS_KEY, KeyValueStore};
use crate::texture::Texture;

/// Fallback when a deleted active preset leaves no other candidate.
pub const FALLBACK_PRESET: &str = "Neutral";

pub struct Controller {
    params: Params,
    presets: PresetBook,
    active: String,
    store: Box<dyn KeyValueStore>,
    panel: Panel,
    texture: Option<Rc<Texture>>,
}

impl Controller {
    /// Built-in presets, replaced wholesale by any persisted collection.
    /// `default_preset` becomes active if present, otherwise the first name.
    /// Nothing is applied yet; call [`Controller::apply_preset`] once a sink exists.
    pub fn new(store: Box<dyn KeyValueStore>, default_preset: &str) -> Self {
        let mut controller = Self {
            params: Params::default(),
            presets: PresetBook::builtin(),
            active: String::new(),
            store,
            panel: Panel::new(),
            texture: None,
        };
        controller.load_persisted_presets();
        controller.active = if controller.presets.contains(default_preset) {
            default_preset.to_string()
        } else {
            controller
                .presets
                .names()
                .next()
                .unwrap_or(FALLBACK_PRESET)
                .to_string()
        };
        controller
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn presets(&self) -> &PresetBook {
        &self.presets
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn texture(&self) -> Option<&Rc<Texture>> {
        self.texture.as_ref()
    }

    /// Replace the built-in collection with the persisted one, if any.
    /// Unreadable, corrupt or empty data keeps what is already loaded.
    pub fn load_persisted_presets(&mut self) -> bool {
        match self.read_persisted() {
            Ok(Some(book)) if !book.is_empty() => {
                info!(count = book.len(), "loaded persisted presets");
                self.presets = book;
                true
            }
            Ok(Some(_)) => {
                warn!("persisted preset collection is empty; keeping built-ins");
                false
            }
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable persisted presets");
                false
            }
        }
    }

    fn read_persisted(&self) -> Result<Option<PresetBook>, StoreError> {
        match self.store.get(CUSTOM_PRESETS_KEY)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn persist(&mut self, book: &PresetBook) -> Result<(), PresetError> {
        let text = serde_json::to_string(book)?;
        self.store.set(CUSTOM_PRESETS_KEY, &text)?;
        Ok(())
    }

    /// Overwrite the fields the preset carries and push the look to the
    /// renderer. Unknown names are logged and ignored.
    pub fn apply_preset(&mut self, name: &str, sink: &mut dyn RenderSink) -> bool {
        let Some(preset) = self.presets.get(name) else {
            warn!(preset = %name, "no such preset");
            return false;
        };
        preset.apply_to(&mut self.params);
        self.active = name.to_string();
        debug!(preset = %name, params = ?self.params, "applied preset");
        self.push_look(sink);
        true
    }

    fn push_look(&self, sink: &mut dyn RenderSink) {
        sink.mesh_material_mut().sync(&self.params);
        let points = sink.points_material_mut();
        points.color = self.params.color;
        points.size = self.params.point_size;
        sink.set_bloom_strength(self.params.bloom);
        sink.set_clear_color(self.params.background_color);
        sink.set_point_mode(self.params.point_mode);
        self.bind_texture(sink);
    }

    /// Bind the kept texture to both materials, or clear the maps when
    /// `useTexture` is off.
    fn bind_texture(&self, sink: &mut dyn RenderSink) {
        let map = self.texture.clone().filter(|_| self.params.use_texture);
        sink.mesh_material_mut().map = map.clone();
        sink.points_material_mut().map = map;
    }

    /// Capture the current look under `name` (trimmed), make it active,
    /// persist and apply it.
    pub fn save_preset(&mut self, name: &str, sink: &mut dyn RenderSink) -> Result<(), PresetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PresetError::EmptyName);
        }
        let preset = Preset::capture(&self.params);
        let mut next = self.presets.clone();
        next.insert(name, preset);
        self.persist(&next)?;
        self.presets = next;
        info!(preset = %name, "saved preset");
        self.apply_preset(name, sink);
        Ok(())
    }

    /// Remove `name`. The last remaining preset can't be deleted. Deleting
    /// the active preset switches to another one once the removal is persisted.
    pub fn delete_preset(&mut self, name: &str, sink: &mut dyn RenderSink) -> Result<bool, PresetError> {
        if self.presets.len() <= 1 {
            return Err(PresetError::LastPreset);
        }
        if !self.presets.contains(name) {
            warn!(preset = %name, "delete of unknown preset ignored");
            return Ok(false);
        }
        let replacement = (self.active == name)
            .then(|| self.presets.first_other(name).unwrap_or(FALLBACK_PRESET).to_string());
        let mut next = self.presets.clone();
        next.remove(name);
        self.persist(&next)?;
        self.presets = next;
        if let Some(replacement) = replacement {
            self.apply_preset(&replacement, sink);
            self.active = replacement;
        }
        info!(preset = %name, active = %self.active, "deleted preset");
        Ok(true)
    }

    /// Pretty JSON of the whole collection.
    pub fn export_presets(&self) -> Result<String, PresetError> {
        Ok(self.presets.to_pretty_json()?)
    }

    pub fn export_presets_to(&self, path: &Path) -> Result<(), PresetError> {
        let json = self.export_presets()?;
        std::fs::write(path, json).map_err(StoreError::from)?;
        info!(path = %path.display(), "exported presets");
        Ok(())
    }

    /// Single-control edit through the panel table.
    pub fn set_control(
        &mut self,
        key: &str,
        value: ControlValue,
        sink: &mut dyn RenderSink,
    ) -> Result<(), ControlError> {
        self.panel.set(key, value, &mut self.params, sink)
    }

    /// `key=value` form of [`Controller::set_control`].
    pub fn set_control_text(&mut self, assignment: &str, sink: &mut dyn RenderSink) -> Result<(), ControlError> {
        self.panel.set_text(assignment, &mut self.params, sink)
    }

    /// New texture for both materials. Only bound when `useTexture` is on;
    /// it is kept either way.
    pub fn set_texture(&mut self, texture: Texture, sink: &mut dyn RenderSink) {
        if self.params.use_texture {
            info!(width = texture.width, height = texture.height, "texture applied");
        } else {
            debug!("texture loaded but useTexture is off");
        }
        self.texture = Some(Rc::new(texture));
        self.bind_texture(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Modifier;
    use crate::scene::Scene;
    use crate::store::MemoryStore;

    fn controller() -> (Controller, Scene) {
        let c = Controller::new(Box::new(MemoryStore::new()), "Neutral");
        let scene = Scene::new(c.params());
        (c, scene)
    }

    #[test]
    fn starts_on_default_preset() {
        let (c, _) = controller();
        assert_eq!(c.active(), "Neutral");
        assert_eq!(c.presets().len(), 4);
    }

    #[test]
    fn unknown_default_falls_back_to_first_name() {
        let c = Controller::new(Box::new(MemoryStore::new()), "Nope");
        assert_eq!(c.active(), "Angry");
    }

    #[test]
    fn apply_missing_preset_is_a_no_op() {
        let (mut c, mut scene) = controller();
        let before = c.params().clone();
        assert!(!c.apply_preset("Elated", &mut scene));
        assert_eq!(c.params(), &before);
        assert_eq!(c.active(), "Neutral");
        assert_eq!(scene.material_version, 0);
    }

    #[test]
    fn apply_pushes_look_to_renderer() {
        let (mut c, mut scene) = controller();
        assert!(c.apply_preset("Sad", &mut scene));
        assert_eq!(c.params().modifier, Modifier::Droopy);
        assert_eq!(scene.mesh_material.color, 0x4444ff);
        assert_eq!(scene.points_material.color, 0x4444ff);
        assert_eq!(scene.bloom.strength, 0.1);
    }

    #[test]
    fn empty_name_is_rejected() {
        let (mut c, mut scene) = controller();
        assert!(matches!(c.save_preset("   ", &mut scene), Err(PresetError::EmptyName)));
        assert_eq!(c.presets().len(), 4);
    }

    #[test]
    fn save_trims_name() {
        let (mut c, mut scene) = controller();
        c.save_preset("  Calm ", &mut scene).unwrap();
        assert!(c.presets().contains("Calm"));
        assert_eq!(c.active(), "Calm");
    }

    #[test]
    fn deleting_unknown_preset_changes_nothing() {
        let (mut c, mut scene) = controller();
        assert!(!c.delete_preset("Ghost", &mut scene).unwrap());
        assert_eq!(c.presets().len(), 4);
    }

    #[test]
    fn texture_respects_use_texture() {
        let (mut c, mut scene) = controller();
        c.set_control("useTexture", ControlValue::Toggle(false), &mut scene).unwrap();
        c.set_texture(Texture::solid(1, 1, [1, 2, 3, 255]), &mut scene);
        assert!(scene.mesh_material.map.is_none());
        assert!(c.texture().is_some());

        c.set_control("useTexture", ControlValue::Toggle(true), &mut scene).unwrap();
        c.set_texture(Texture::solid(1, 1, [1, 2, 3, 255]), &mut scene);
        assert!(scene.mesh_material.map.is_some());
        assert!(scene.points_material.map.is_some());
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn failed_save_changes_nothing() {
        let mut c = Controller::new(Box::new(FailingStore), "Neutral");
        let mut scene = Scene::new(c.params());
        let before = c.params().clone();
        assert!(matches!(c.save_preset("Calm", &mut scene), Err(PresetError::Persist(_))));
        assert!(!c.presets().contains("Calm"));
        assert_eq!(c.active(), "Neutral");
        assert_eq!(c.params(), &before);
    }

    #[test]
    fn failed_delete_of_active_preset_changes_nothing() {
        let mut c = Controller::new(Box::new(FailingStore), "Neutral");
        let mut scene = Scene::new(c.params());
        assert!(c.apply_preset("Sad", &mut scene));
        let before = c.params().clone();
        let version = scene.material_version;

        assert!(matches!(c.delete_preset("Sad", &mut scene), Err(PresetError::Persist(_))));
        assert!(c.presets().contains("Sad"));
        assert_eq!(c.active(), "Sad");
        assert_eq!(c.params(), &before);
        assert_eq!(scene.material_version, version);
    }

    #[test]
    fn apply_pushes_background_point_mode_and_texture_flag() {
        let mut store = MemoryStore::new();
        store
            .set(
                CUSTOM_PRESETS_KEY,
                r#"{"Night":{"amplitude":0.3,"backgroundColor":1193046,"pointMode":true,"useTexture":false}}"#,
            )
            .unwrap();
        let mut c = Controller::new(Box::new(store), "Night");
        let mut scene = Scene::new(c.params());
        c.set_texture(Texture::solid(1, 1, [9, 9, 9, 255]), &mut scene);
        assert!(scene.mesh_material.map.is_some());

        assert!(c.apply_preset("Night", &mut scene));
        assert_eq!(c.params().amplitude, 0.3);
        assert_eq!(scene.clear_color, 0x123456);
        assert!(scene.point_mode);
        assert!(!c.params().use_texture);
        assert!(scene.mesh_material.map.is_none());
        assert!(scene.points_material.map.is_none());

        let exported: serde_json::Value = serde_json::from_str(&c.export_presets().unwrap()).unwrap();
        assert_eq!(exported["Night"]["backgroundColor"], 1193046);
        assert_eq!(exported["Night"]["pointMode"], true);
        assert_eq!(exported["Night"]["useTexture"], false);
    }

    #[test]
    fn corrupt_persisted_data_keeps_builtins() {
        let mut store = MemoryStore::new();
        store.set(CUSTOM_PRESETS_KEY, "{not json").unwrap();
        let c = Controller::new(Box::new(store), "Neutral");
        assert_eq!(c.presets(), &PresetBook::builtin());
    }

    #[test]
    fn empty_persisted_map_keeps_builtins() {
        let mut store = MemoryStore::new();
        store.set(CUSTOM_PRESETS_KEY, "{}").unwrap();
        let c = Controller::new(Box::new(store), "Neutral");
        assert_eq!(c.presets().len(), 4);
    }
}
