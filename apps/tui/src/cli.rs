use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "spray-dashboard",
    version,
    about = "Spray campaign coverage dashboard"
)]
pub struct CliArgs {
    /// Print coverage and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless coverage as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the spray API base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// District to open (`All` for every district)
    #[arg(long, value_name = "NAME")]
    pub district: Option<String>,

    /// Target area to open
    #[arg(long = "target-area", value_name = "ID")]
    pub target_area: Option<String>,

    /// Restrict spray points and buffers to one spray date (YYYY-MM-DD)
    #[arg(long = "spray-date", value_name = "DATE")]
    pub spray_date: Option<String>,

    /// Coverage color scheme: current, legacy or legend
    #[arg(long, value_name = "SCHEME")]
    pub scheme: Option<String>,

    /// Start from a route fragment such as `#!Chienge/1203`
    #[arg(long, value_name = "FRAGMENT")]
    pub route: Option<String>,

    /// Override the log file used while the dashboard is open
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api_url {
            std::env::set_var("SPRAY_API_URL", url);
        }
        if let Some(district) = &self.district {
            std::env::set_var("DEFAULT_DISTRICT", district);
        }
        if let Some(target) = &self.target_area {
            std::env::set_var("DEFAULT_TARGET_AREA", target);
        }
        if let Some(date) = &self.spray_date {
            std::env::set_var("SPRAY_DATE", date);
        }
        if let Some(scheme) = &self.scheme {
            std::env::set_var("COVERAGE_SCHEME", scheme);
        }
        if let Some(route) = &self.route {
            std::env::set_var("SPRAY_ROUTE", route);
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("SPRAY_LOG_FILE", path);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_route_and_flags() {
        let args = CliArgs::parse_from([
            "spray-dashboard",
            "--headless",
            "--json",
            "--route",
            "#!Chienge/1203",
            "--scheme",
            "legend",
        ]);
        assert!(args.headless);
        assert!(args.json);
        assert_eq!(args.route.as_deref(), Some("#!Chienge/1203"));
        assert_eq!(args.scheme.as_deref(), Some("legend"));
        assert_eq!(args.district, None);
    }
}
