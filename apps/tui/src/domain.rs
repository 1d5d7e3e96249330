use serde::{Serialize, Serializer};
use std::fmt;

/// Outcome recorded for a structure on a spray day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SprayStatus {
    Sprayed,
    NotSprayed,
    NotSprayable,
}

impl SprayStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "yes" | "true" | "1" | "sprayed" => Some(Self::Sprayed),
            "no" | "false" | "0" | "not sprayed" | "not_sprayed" => Some(Self::NotSprayed),
            "not sprayable" | "not_sprayable" | "notsprayable" | "n/a" => {
                Some(Self::NotSprayable)
            }
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sprayed => "Sprayed",
            Self::NotSprayed => "Not Sprayed",
            Self::NotSprayable => "Not Sprayable",
        }
    }
}

/// Built-in coverage color schemes seen across dashboard releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdScheme {
    #[default]
    Current,
    Legacy,
    Legend,
}

impl ThresholdScheme {
    pub const ALL: [Self; 3] = [Self::Current, Self::Legacy, Self::Legend];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Legacy => "legacy",
            Self::Legend => "legend",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Current),
            1 => Some(Self::Legacy),
            2 => Some(Self::Legend),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "current" | "default" => Some(Self::Current),
            "legacy" => Some(Self::Legacy),
            "legend" => Some(Self::Legend),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Current => "Current (20/40/75/85)",
            Self::Legacy => "Legacy (30/40/80/90)",
            Self::Legend => "Map legend (1/33/66/100)",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Current => 0,
            Self::Legacy => 1,
            Self::Legend => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::from_index((self.index() + 1) % Self::ALL.len()).unwrap_or_default()
    }
}

/// An sRGB color as the upstream API and legends express it (`#RRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Accepts `#RRGGBB`, `RRGGBB` and the short `#RGB` form.
    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let expand = |c: &str| channel(&c.repeat(2));
                Some(Self::new(
                    expand(&hex[0..1])?,
                    expand(&hex[1..2])?,
                    expand(&hex[2..3])?,
                ))
            }
            _ => None,
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spray_status_parses_api_values() {
        assert_eq!(SprayStatus::parse("yes"), Some(SprayStatus::Sprayed));
        assert_eq!(SprayStatus::parse(" No "), Some(SprayStatus::NotSprayed));
        assert_eq!(
            SprayStatus::parse("not sprayable"),
            Some(SprayStatus::NotSprayable)
        );
        assert_eq!(SprayStatus::parse("maybe"), None);
    }

    #[test]
    fn scheme_cycles_through_all_variants() {
        let mut scheme = ThresholdScheme::Current;
        for expected in [ThresholdScheme::Legacy, ThresholdScheme::Legend, ThresholdScheme::Current] {
            scheme = scheme.next();
            assert_eq!(scheme, expected);
        }
        assert_eq!(ThresholdScheme::parse("LEGACY"), Some(ThresholdScheme::Legacy));
    }

    #[test]
    fn hex_color_round_trips_through_display() {
        let color = HexColor::parse("#2ecc40");
        assert_eq!(color, Some(HexColor::new(0x2E, 0xCC, 0x40)));
        assert_eq!(color.map(|c| c.to_string()).as_deref(), Some("#2ECC40"));
        assert_eq!(HexColor::parse("#fff"), Some(HexColor::new(255, 255, 255)));
        assert_eq!(HexColor::parse("#12345"), None);
        assert_eq!(HexColor::parse("zzzzzz"), None);
    }
}
