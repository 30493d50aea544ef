//! The apply cycle: desktop settings to GTK 3, GTK 2 and xsettingsd

use anyhow::Result;
use std::time::SystemTime;
use tokio::signal::unix::{SignalKind, signal};

use crate::gtk::writer::{self, WriteReport};
use crate::gtk::{GtkVersion, projector, reader, templates};
use crate::settings::context::SyncContext;
use crate::ui::prelude::*;
use crate::xsettings::{DaemonState, XSettingsDaemon};

/// GTK 2 goes last; the live xsettings snapshot uses its theme.
const TARGETS: [GtkVersion; 2] = [GtkVersion::Gtk3, GtkVersion::Gtk2];

#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Set when GTK control is disabled and nothing was touched
    pub skipped: bool,
    pub targets: Vec<WriteReport>,
    /// xsettingsd configuration matching what was written
    pub xsettings: Option<String>,
    pub reloaded: bool,
}

/// Run one full apply cycle.
///
/// Each target is written independently; a failing target never stops the
/// others.
pub fn apply(ctx: &mut SyncContext, daemon: &mut XSettingsDaemon) -> ApplyReport {
    if !ctx.gtk_control_enabled() {
        emit(
            Level::Info,
            "apply.disabled",
            "GTK theme control is disabled; nothing to do",
            None,
        );
        return ApplyReport {
            skipped: true,
            ..Default::default()
        };
    }

    let base = projector::project(ctx.desktop());
    let cursor_theme = ctx.cursor_theme();
    let timeout = ctx.config().query_timeout();

    let mut report = ApplyReport::default();
    let mut live = base.clone();
    for version in TARGETS {
        // Theme names differ between GTK generations, so each target keeps
        // its own instead of inheriting the previous one
        let theme = reader::active_gtk_theme(ctx.resolver(), version, timeout);
        let config = base.with_style_theme(theme);
        let written = writer::write_gtk_config(ctx.resolver(), version, &config, &cursor_theme);
        notify_backup(ctx, &written);
        report.targets.push(written);
        live = config;
    }

    let snapshot = templates::render_xsettings(&live, &cursor_theme);
    report.reloaded = daemon.push(&snapshot);
    report.xsettings = Some(snapshot);

    let written = report.targets.iter().filter(|t| t.written).count();
    emit(
        Level::Success,
        "apply.done",
        &format!(
            "Updated {written} of {} GTK config files{}",
            report.targets.len(),
            if report.reloaded { " and reloaded xsettingsd" } else { "" }
        ),
        None,
    );
    report
}

/// Write a single GTK version with an explicitly chosen theme.
pub fn apply_theme(ctx: &mut SyncContext, version: GtkVersion, theme: &str) -> WriteReport {
    let config = projector::project(ctx.desktop()).with_style_theme(theme);
    let report = writer::write_gtk_config(ctx.resolver(), version, &config, &ctx.cursor_theme());
    notify_backup(ctx, &report);
    report
}

fn notify_backup(ctx: &SyncContext, report: &WriteReport) {
    if let Some(backup) = &report.backup {
        ctx.notify(
            "GTK themes",
            &format!(
                "'{}' has been overwritten. You can find a copy of your old settings in '{}'",
                report.path.display(),
                backup.display()
            ),
        );
    }
}

/// Apply cycle for long-lived modes: also starts xsettingsd from the fresh
/// snapshot when no daemon is running, including after it died.
fn sync(ctx: &mut SyncContext, daemon: &mut XSettingsDaemon) -> ApplyReport {
    let report = apply(ctx, daemon);
    if daemon.state() != DaemonState::Running
        && let Some(snapshot) = &report.xsettings
    {
        *daemon = XSettingsDaemon::start(&ctx.config().xsettingsd_command, snapshot);
    }
    report
}

/// One watch tick: re-apply when a settings file changed since `last`.
///
/// `last` is refreshed after the cycle, so writes made by the cycle itself do
/// not trigger another one.
fn poll_once(
    ctx: &mut SyncContext,
    daemon: &mut XSettingsDaemon,
    last: &mut Vec<Option<SystemTime>>,
) -> Option<ApplyReport> {
    if ctx.settings_fingerprint() == *last {
        return None;
    }

    let report = match ctx.reload() {
        Ok(()) => Some(sync(ctx, daemon)),
        Err(e) => {
            emit(
                Level::Warn,
                "watch.reload_failed",
                &format!("Keeping previous settings: {e:#}"),
                None,
            );
            None
        }
    };
    *last = ctx.settings_fingerprint();
    report
}

/// Apply now, then again whenever a settings file changes, until Ctrl-C or
/// SIGTERM. xsettingsd lives exactly as long as this loop.
pub async fn watch(mut ctx: SyncContext) -> Result<()> {
    let mut daemon = XSettingsDaemon::inactive();
    sync(&mut ctx, &mut daemon);
    let mut last = ctx.settings_fingerprint();

    let mut ticker = tokio::time::interval(ctx.config().watch_interval());
    ticker.tick().await;
    let mut sigterm = signal(SignalKind::terminate())?;

    emit(
        Level::Info,
        "watch.started",
        &format!(
            "Watching {} for changes",
            ctx.settings_paths()
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        None,
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = sigterm.recv() => break,
            _ = ticker.tick() => {
                poll_once(&mut ctx, &mut daemon, &mut last);
            }
        }
    }

    emit(Level::Info, "watch.stopped", "Stopped watching", None);
    drop(daemon);
    Ok(())
}
