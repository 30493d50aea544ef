mod apply;
mod common;
mod gtk;
mod settings;
mod ui;
mod xsettings;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::common::config::SyncConfig;
use crate::gtk::{GtkVersion, ThemeQuery, reader, themes};
use crate::settings::context::SyncContext;
use crate::ui::prelude::*;
use crate::xsettings::XSettingsDaemon;

/// Sync desktop theme settings to GTK and xsettingsd
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit one JSON object per event
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write GTK 2/3 settings from the desktop settings once
    Apply,
    /// Keep xsettingsd running and re-apply whenever settings change
    Watch,
    /// List installed GTK themes
    Themes {
        /// GTK version: 2, 3 or any
        #[arg(short, long, default_value = "3")]
        version: ThemeQuery,
    },
    /// Show the theme currently configured for a GTK version
    Current {
        #[arg(short, long, default_value = "3")]
        version: GtkVersion,
    },
    /// Write one GTK version's settings with the given theme
    SetTheme {
        theme: String,
        #[arg(short, long, default_value = "3")]
        version: GtkVersion,
    },
    /// Print the desktop's default GTK theme as reported by gsettings
    DefaultTheme,
    /// Enable or disable GTK theme control
    Control {
        #[arg(action = clap::ArgAction::Set, value_parser = clap::builder::BoolishValueParser::new())]
        enabled: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    ui::set_debug_mode(cli.debug);
    ui::init(
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        },
        !cli.no_color,
    );

    if let Err(e) = run(cli) {
        emit(Level::Error, "gtksync.error", &format!("Error: {e:#}"), None);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = SyncConfig::load()?;

    match cli.command {
        Commands::Apply => {
            // A daemon started here would die with this process; live reload
            // belongs to `watch`
            let mut ctx = SyncContext::load(config, cli.debug)?;
            apply::apply(&mut ctx, &mut XSettingsDaemon::inactive());
        }
        Commands::Watch => {
            let ctx = SyncContext::load(config, cli.debug)?;
            tokio::runtime::Runtime::new()?.block_on(apply::watch(ctx))?;
        }
        Commands::Themes { version } => {
            let found = themes::list_gtk_themes(version);
            emit(
                Level::Info,
                "gtk.themes",
                &found.join("\n"),
                Some(serde_json::json!({ "themes": found })),
            );
        }
        Commands::Current { version } => {
            let ctx = SyncContext::load(config, cli.debug)?;
            let theme =
                reader::active_gtk_theme(ctx.resolver(), version, ctx.config().query_timeout());
            emit(
                Level::Info,
                "gtk.current",
                &theme,
                Some(serde_json::json!({ "version": version.as_str(), "theme": theme })),
            );
        }
        Commands::SetTheme { theme, version } => {
            let mut ctx = SyncContext::load(config, cli.debug)?;
            let report = apply::apply_theme(&mut ctx, version, &theme);
            if report.written {
                emit(
                    Level::Success,
                    "gtk.set_theme.done",
                    &format!("Set GTK {version} theme to '{theme}' in {}", report.path.display()),
                    None,
                );
            } else {
                anyhow::bail!("could not write {}", report.path.display());
            }
        }
        Commands::DefaultTheme => {
            let theme = themes::default_gtk_theme(config.query_timeout());
            emit(Level::Info, "gtk.default_theme", &theme, None);
        }
        Commands::Control { enabled } => {
            let mut ctx = SyncContext::load(config, cli.debug)?;
            ctx.set_gtk_control_enabled(enabled)?;
            emit(
                Level::Success,
                "settings.control",
                &format!(
                    "GTK theme control {}",
                    if enabled { "enabled" } else { "disabled" }
                ),
                None,
            );
        }
    }

    Ok(())
}
