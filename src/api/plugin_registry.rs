use crate::error::{ViewportError, ViewportResult};
use crate::extensions::{ViewportContext, ViewportEvent, ViewportPlugin};
use crate::layout::LayoutTree;

use super::ViewportEngine;

impl<T: LayoutTree> ViewportEngine<T> {
    /// Registers a plugin. Ids must be non-empty and unique.
    pub fn register_plugin(&mut self, plugin: Box<dyn ViewportPlugin>) -> ViewportResult<()> {
        let plugin_id = plugin.id().to_owned();
        if plugin_id.is_empty() {
            return Err(ViewportError::InvalidData(
                "plugin id must not be empty".to_owned(),
            ));
        }
        if self.plugins.iter().any(|entry| entry.id() == plugin_id) {
            return Err(ViewportError::InvalidData(format!(
                "plugin with id `{plugin_id}` is already registered"
            )));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    /// Unregisters a plugin by id. Returns `true` when removed.
    pub fn unregister_plugin(&mut self, plugin_id: &str) -> bool {
        if let Some(position) = self
            .plugins
            .iter()
            .position(|entry| entry.id() == plugin_id)
        {
            self.plugins.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn has_plugin(&self, plugin_id: &str) -> bool {
        self.plugins.iter().any(|entry| entry.id() == plugin_id)
    }

    pub(super) fn viewport_context(&self) -> ViewportContext {
        let now_ms = self.now_ms();
        ViewportContext {
            frame: self.frame,
            now_ms,
            granularity: self.granularity,
            period: self.period,
            occlusion_px: self.occlusion.current_occlusion(),
            guard_active: self.guard.is_active(now_ms),
        }
    }

    pub(super) fn emit_event(&mut self, event: ViewportEvent) {
        if self.plugins.is_empty() {
            return;
        }
        let context = self.viewport_context();
        for plugin in &mut self.plugins {
            plugin.on_event(&event, context);
        }
    }
}
