//! Navigation state carried in `#!District/TargetID` fragments.

use chrono::NaiveDate;
use std::fmt;

/// Which districts a view covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DistrictScope {
    All,
    Named(String),
}

impl DistrictScope {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value.chars().any(char::is_control) {
            return None;
        }
        if value.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        Some(Self::Named(value.to_string()))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for DistrictScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Cumulative cutoff requested through `spray_date=` or `day=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cutoff {
    Date(NaiveDate),
    /// 1-based index into the campaign's spray dates.
    Day(u32),
}

impl Cutoff {
    pub fn parse(key: &str, value: &str) -> Option<Self> {
        match key.trim() {
            "spray_date" => NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                .ok()
                .map(Self::Date),
            "day" => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|day| *day > 0)
                .map(Self::Day),
            _ => None,
        }
    }

    /// Last spray date the cutoff covers. Data is fetched up to and including
    /// it, so `day=2` spans both of the first two dates.
    pub fn resolve(self, spray_dates: &[String]) -> Option<String> {
        match self {
            Self::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
            Self::Day(day) => spray_dates.get(day.checked_sub(1)? as usize).cloned(),
        }
    }
}

/// Fallbacks used when a fragment is empty or cannot be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefaults {
    pub district: String,
    pub target_area: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub district: DistrictScope,
    pub target_area: Option<String>,
    pub cutoff: Option<Cutoff>,
}

impl Route {
    pub fn from_defaults(defaults: &RouteDefaults) -> Self {
        Self {
            district: DistrictScope::parse(&defaults.district).unwrap_or(DistrictScope::All),
            target_area: defaults.target_area.clone().filter(|t| is_target_id(t)),
            cutoff: None,
        }
    }

    /// Reads `#!Chienge/1203?spray_date=2015-09-30`. The leading `#` is
    /// optional. Anything that is not a `!` route falls back to `defaults`,
    /// as does a missing district. A target area of `0` means none.
    pub fn parse(fragment: &str, defaults: &RouteDefaults) -> Self {
        let fragment = fragment.trim();
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let Some(path) = fragment.strip_prefix('!') else {
            return Self::from_defaults(defaults);
        };

        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let mut segments = path.split('/');

        let Some(district) = segments.next().and_then(DistrictScope::parse) else {
            return Self::from_defaults(defaults);
        };

        let target_area = segments
            .next()
            .map(str::trim)
            .filter(|target| is_target_id(target))
            .map(str::to_string);

        let cutoff = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find_map(|(key, value)| Cutoff::parse(key, value));

        Self {
            district,
            target_area,
            cutoff,
        }
    }

    pub fn to_fragment(&self) -> String {
        let mut fragment = format!("#!{}", self.district);
        if let Some(target) = &self.target_area {
            fragment.push('/');
            fragment.push_str(target);
        }
        match self.cutoff {
            Some(Cutoff::Date(date)) => {
                fragment.push_str(&format!("?spray_date={}", date.format("%Y-%m-%d")));
            }
            Some(Cutoff::Day(day)) => fragment.push_str(&format!("?day={day}")),
            None => {}
        }
        fragment
    }
}

fn is_target_id(value: &str) -> bool {
    !value.is_empty() && value != "0" && !value.chars().any(char::is_control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn defaults() -> RouteDefaults {
        RouteDefaults {
            district: "Chienge".to_string(),
            target_area: None,
        }
    }

    #[test]
    fn parses_district_and_target() {
        let route = Route::parse("#!Chienge/1203", &defaults());
        assert_eq!(route.district, DistrictScope::Named("Chienge".to_string()));
        assert_eq!(route.target_area.as_deref(), Some("1203"));
        assert_eq!(route.cutoff, None);
        assert_eq!(route.to_fragment(), "#!Chienge/1203");
    }

    #[test]
    fn all_districts_and_zero_target() {
        let route = Route::parse("!all/0", &defaults());
        assert_eq!(route.district, DistrictScope::All);
        assert_eq!(route.target_area, None);
    }

    #[test]
    fn malformed_fragments_fall_back_to_defaults() {
        let expected = Route::from_defaults(&defaults());
        for fragment in ["", "#", "#Chienge/12", "#!", "#!/1203", "garbage"] {
            assert_eq!(Route::parse(fragment, &defaults()), expected, "{fragment:?}");
        }
        assert_eq!(expected.district, DistrictScope::Named("Chienge".to_string()));
    }

    #[test]
    fn reads_cutoff_from_query() {
        let route = Route::parse("#!Nchelenge/88?spray_date=2015-09-30", &defaults());
        let date = NaiveDate::from_ymd_opt(2015, 9, 30);
        assert_eq!(route.cutoff, date.map(Cutoff::Date));
        assert_eq!(route.to_fragment(), "#!Nchelenge/88?spray_date=2015-09-30");

        let route = Route::parse("#!Nchelenge/88?day=2", &defaults());
        assert_eq!(route.cutoff, Some(Cutoff::Day(2)));
        let dates = vec!["2015-09-29".to_string(), "2015-09-30".to_string()];
        assert_eq!(
            route.cutoff.and_then(|c| c.resolve(&dates)).as_deref(),
            Some("2015-09-30")
        );
        assert_eq!(Cutoff::Day(3).resolve(&dates), None);
        assert_eq!(Cutoff::parse("day", "0"), None);
        assert_eq!(Cutoff::parse("spray_date", "30/09/2015"), None);
    }
}
