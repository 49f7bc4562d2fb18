use super::schema::Config;
use tracing::{debug, warn};

macro_rules! define_overrides {
    ($( $env:literal => $($path:ident).+ );* $(;)?) => {
        /// String-valued `CHATRELAY_*` environment variables and the field each one sets.
        pub const STRING_OVERRIDE_VARS: &[&str] = &[$($env),*];

        fn apply_string_overrides(config: &mut Config, lookup: &impl Fn(&str) -> Option<String>) {
            $(
                if let Some(val) = lookup($env).filter(|v| !v.is_empty()) {
                    debug!("applying {} override", $env);
                    config.$($path).+ = val;
                }
            )*
        }
    };
}

define_overrides! {
    "CHATRELAY_PASTE_POST_URL"  => paste.post_url;
    "CHATRELAY_PASTE_SHARE_URL" => paste.share_url;
    "CHATRELAY_USER_AGENT"      => fetch.user_agent;
}

pub const MAX_LINES_VAR: &str = "CHATRELAY_MAX_LINES_LIMIT";

/// Apply environment variable overrides.
///
/// Any `CHATRELAY_*` variable that is set and non-empty overwrites the
/// corresponding config field, so deployments can tune the bot without
/// touching the config file.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides(config, |name| std::env::var(name).ok());
}

pub(crate) fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    apply_string_overrides(config, &lookup);

    if let Some(val) = lookup(MAX_LINES_VAR).filter(|v| !v.is_empty()) {
        match val.trim().parse::<usize>() {
            Ok(limit) => config.messages.max_lines_limit = Some(limit),
            Err(_) => warn!("ignoring {}: '{}' is not a line count", MAX_LINES_VAR, val),
        }
    }
}
