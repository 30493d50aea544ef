use anyhow::Result;
use duct::cmd;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::common::config::SyncConfig;
use crate::common::paths::PathResolver;
use crate::ui::prelude::*;

use super::store::{self, Scope, SettingsStore};

/// Everything one apply cycle reads: the desktop's settings stores, tool
/// configuration and the path environment.
#[derive(Debug)]
pub struct SyncContext {
    desktop: SettingsStore,
    session: SettingsStore,
    appearance: SettingsStore,
    config: SyncConfig,
    resolver: PathResolver,
    debug: bool,
}

impl SyncContext {
    pub fn load(config: SyncConfig, debug: bool) -> Result<Self> {
        Ok(Self {
            desktop: SettingsStore::load(Scope::Desktop)?,
            session: SettingsStore::load(Scope::Session)?,
            appearance: SettingsStore::load(Scope::Appearance)?,
            config,
            resolver: PathResolver::from_env(),
            debug,
        })
    }

    pub fn from_parts(
        desktop: SettingsStore,
        session: SettingsStore,
        appearance: SettingsStore,
        config: SyncConfig,
        resolver: PathResolver,
    ) -> Self {
        Self {
            desktop,
            session,
            appearance,
            config,
            resolver,
            debug: false,
        }
    }

    pub fn desktop(&self) -> &SettingsStore {
        &self.desktop
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn cursor_theme(&self) -> String {
        self.session.string(store::CURSOR_THEME)
    }

    /// Whether GTK settings are managed at all.
    ///
    /// An unset flag is persisted as `false` so the choice shows up in the
    /// appearance settings file.
    pub fn gtk_control_enabled(&mut self) -> bool {
        if !self.appearance.contains(store::CONTROL_GTK_THEME.key) {
            self.appearance.set_bool(store::CONTROL_GTK_THEME, false);
            if let Err(e) = self.appearance.save() {
                emit(
                    Level::Debug,
                    "settings.save_failed",
                    &format!("Could not persist default GTK control flag: {e:#}"),
                    None,
                );
            }
        }
        self.appearance.bool(store::CONTROL_GTK_THEME)
    }

    pub fn set_gtk_control_enabled(&mut self, enabled: bool) -> Result<()> {
        self.appearance.set_bool(store::CONTROL_GTK_THEME, enabled);
        self.appearance.save()
    }

    /// Re-read every store from disk.
    pub fn reload(&mut self) -> Result<()> {
        self.desktop = SettingsStore::load_from(self.desktop.path().to_path_buf())?;
        self.session = SettingsStore::load_from(self.session.path().to_path_buf())?;
        self.appearance = SettingsStore::load_from(self.appearance.path().to_path_buf())?;
        Ok(())
    }

    pub fn settings_paths(&self) -> Vec<PathBuf> {
        [&self.desktop, &self.session, &self.appearance]
            .iter()
            .map(|s| s.path().to_path_buf())
            .collect()
    }

    /// Modification times of the settings files; changes when any file does.
    pub fn settings_fingerprint(&self) -> Vec<Option<SystemTime>> {
        self.settings_paths()
            .iter()
            .map(|p| std::fs::metadata(p).and_then(|m| m.modified()).ok())
            .collect()
    }

    /// Best-effort desktop notification.
    pub fn notify(&self, summary: &str, body: &str) {
        if !self.config.notifications {
            return;
        }

        if self.debug {
            emit(
                Level::Debug,
                "settings.notify",
                &format!("{summary}: {body}"),
                None,
            );
            return;
        }

        if let Err(err) = cmd!("notify-send", summary, body)
            .stdout_null()
            .stderr_null()
            .run()
        {
            emit(
                Level::Debug,
                "settings.notify.error",
                &format!("Failed to send notification: {err}"),
                None,
            );
        }
    }
}
