use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser};
use openhours_core::config::{
    Settings, env_overrides, load_settings_file, merge_settings, resolve_settings_path,
};
use openhours_core::element::{
    DATA_CHANNEL, DATA_DATE, DATA_FROM, DATA_SERVICE, DATA_TYPE, DATA_UNTIL, WidgetElement,
};
use openhours_core::headless::HeadlessElement;
use openhours_shared::WidgetSettings;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "openhours",
    version,
    about = "Render an opening hours widget without a browser"
)]
pub struct Cli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Settings file; defaults to $OPENHOURS_CONFIG or the user config dir.
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    #[arg(long = "endpoint")]
    pub endpoint: Option<String>,

    #[arg(long = "language")]
    pub language: Option<String>,

    /// Accept widgets without a channel id.
    #[arg(long = "allow-missing-channel")]
    pub allow_missing_channel: bool,

    /// Widget type (`data-type`).
    #[arg(long = "type")]
    pub view_type: Option<String>,

    #[arg(long = "service")]
    pub service: Option<String>,

    #[arg(long = "channel")]
    pub channel: Option<String>,

    /// Widget date (`data-date`): YYYY-MM-DD, `today` or `tomorrow`.
    #[arg(long = "date")]
    pub date: Option<String>,

    #[arg(long = "from")]
    pub from: Option<String>,

    #[arg(long = "until")]
    pub until: Option<String>,

    /// Page-wide date override, like the `oh_day` query parameter.
    #[arg(long = "day")]
    pub day: Option<String>,

    /// Print the planned request as JSON instead of fetching it.
    #[arg(long = "plan", conflicts_with = "title")]
    pub plan: bool,

    /// Print the channel label instead of the opening hours.
    #[arg(long = "title")]
    pub title: bool,
}

impl Cli {
    /// The widget element the flags describe.
    pub fn widget_element(&self) -> HeadlessElement {
        let element = HeadlessElement::new();
        let attributes = [
            (DATA_TYPE, &self.view_type),
            (DATA_SERVICE, &self.service),
            (DATA_CHANNEL, &self.channel),
            (DATA_DATE, &self.date),
            (DATA_FROM, &self.from),
            (DATA_UNTIL, &self.until),
        ];
        for (key, value) in attributes {
            if let Some(value) = value {
                element.set_data(key, value);
            }
        }
        element
    }

    fn flag_overrides(&self) -> WidgetSettings {
        WidgetSettings {
            endpoint: self.endpoint.clone(),
            language: self.language.clone(),
            require_channel: self.allow_missing_channel.then_some(false),
            ..WidgetSettings::default()
        }
    }
}

/// File, then environment, then flags.
#[tracing::instrument(skip_all)]
pub fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let file = match resolve_settings_path(cli.config.as_deref()) {
        Some(path) => load_settings_file(&path)?,
        None => WidgetSettings::default(),
    };
    let merged = merge_settings(merge_settings(file, env_overrides()), cli.flag_overrides());
    debug!(?merged, "merged widget settings");
    Ok(Settings::from_raw(merged))
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn flags_become_widget_attributes() {
        let cli = Cli::try_parse_from([
            "openhours",
            "--type",
            "month",
            "--service",
            "5",
            "--channel",
            "12",
            "--from",
            "2026-05-01",
        ])
        .expect("parse flags");
        let element = cli.widget_element();

        assert_eq!(element.data(DATA_TYPE).as_deref(), Some("month"));
        assert_eq!(element.data(DATA_CHANNEL).as_deref(), Some("12"));
        assert_eq!(element.data(DATA_FROM).as_deref(), Some("2026-05-01"));
        assert_eq!(element.data(DATA_UNTIL), None);
        assert_eq!(element.data(DATA_DATE), None);
    }

    #[test]
    fn plan_and_title_are_exclusive() {
        let parsed = Cli::try_parse_from(["openhours", "--plan", "--title"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn flags_override_settings_file() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("openhours.toml");
        fs::write(
            &path,
            "endpoint = \"https://file.example\"\nlanguage = \"fr\"\nrequest_timeout_secs = 5\n",
        )
        .expect("write settings");

        let cli = Cli::try_parse_from([
            "openhours",
            "--config",
            path.to_str().expect("utf-8 path"),
            "--language",
            "nl",
            "--allow-missing-channel",
        ])
        .expect("parse flags");
        let settings = load_settings(&cli).expect("load settings");

        assert_eq!(settings.language, "nl");
        assert_eq!(settings.request_timeout_secs, 5);
        assert!(!settings.require_channel);
        assert!(settings.endpoint.ends_with('/'));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let cli = Cli::try_parse_from([
            "openhours",
            "--config",
            temp.path()
                .join("absent.toml")
                .to_str()
                .expect("utf-8 path"),
        ])
        .expect("parse flags");
        assert!(load_settings(&cli).is_err());
    }
}
