//! Mapping from WMO weather codes to the small set of conditions the viewer
//! knows how to describe and draw.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

use serde::{Deserialize, Serialize};

/// Icon family used to render a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Sun,
    Cloud,
    Rain,
    Snow,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Sun => "sun",
            Icon::Cloud => "cloud",
            Icon::Rain => "rain",
            Icon::Snow => "snow",
        }
    }

    /// Asset name shipped with the desktop front end.
    pub fn file_name(&self) -> &'static str {
        match self {
            Icon::Sun => "sun.png",
            Icon::Cloud => "cloud.png",
            Icon::Rain => "rain.png",
            Icon::Snow => "snow.png",
        }
    }
}

impl std::fmt::Display for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weather condition resolved from a WMO code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    Clear,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    RimeFog,
    DrizzleLight,
    DrizzleModerate,
    DrizzleDense,
    RainLight,
    RainModerate,
    RainHeavy,
    RainShowers,
    Thunderstorm,
    ThunderstormHail,
    SnowLight,
    SnowModerate,
    SnowHeavy,
    SnowShowers,
    Unknown,
}

impl Condition {
    pub const ALL: [Condition; 20] = [
        Condition::Clear,
        Condition::MainlyClear,
        Condition::PartlyCloudy,
        Condition::Overcast,
        Condition::Fog,
        Condition::RimeFog,
        Condition::DrizzleLight,
        Condition::DrizzleModerate,
        Condition::DrizzleDense,
        Condition::RainLight,
        Condition::RainModerate,
        Condition::RainHeavy,
        Condition::RainShowers,
        Condition::Thunderstorm,
        Condition::ThunderstormHail,
        Condition::SnowLight,
        Condition::SnowModerate,
        Condition::SnowHeavy,
        Condition::SnowShowers,
        Condition::Unknown,
    ];

    /// Classify a WMO weather code. Never fails: anything unrecognised is
    /// [`Condition::Unknown`].
    ///
    /// The precipitation bands are matched before the per-code table, so every
    /// code in 51..=67 reads as moderate rain, 71..=77 as moderate snow and
    /// 95..=99 as a plain thunderstorm.
    pub fn from_code(code: i32) -> Self {
        match code {
            51..=67 => Condition::RainModerate,
            71..=77 => Condition::SnowModerate,
            80..=82 => Condition::RainShowers,
            85..=86 => Condition::SnowShowers,
            95..=99 => Condition::Thunderstorm,
            _ => Self::from_exact_code(code).unwrap_or(Condition::Unknown),
        }
    }

    /// Look up the variant whose nominal code is exactly `code`.
    pub fn from_exact_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == Some(code))
    }

    /// Nominal WMO code of this condition.
    pub fn code(&self) -> Option<i32> {
        let code = match self {
            Condition::Clear => 0,
            Condition::MainlyClear => 1,
            Condition::PartlyCloudy => 2,
            Condition::Overcast => 3,
            Condition::Fog => 45,
            Condition::RimeFog => 48,
            Condition::DrizzleLight => 51,
            Condition::DrizzleModerate => 53,
            Condition::DrizzleDense => 55,
            Condition::RainLight => 61,
            Condition::RainModerate => 63,
            Condition::RainHeavy => 65,
            Condition::SnowLight => 71,
            Condition::SnowModerate => 73,
            Condition::SnowHeavy => 75,
            Condition::RainShowers => 80,
            Condition::SnowShowers => 85,
            Condition::Thunderstorm => 95,
            Condition::ThunderstormHail => 99,
            Condition::Unknown => return None,
        };
        Some(code)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Condition::Clear => "Czyste niebo",
            Condition::MainlyClear => "Głównie bezchmurnie",
            Condition::PartlyCloudy => "Częściowe zachmurzenie",
            Condition::Overcast => "Pochmurno",
            Condition::Fog => "Mgła",
            Condition::RimeFog => "Mgła osadzająca szadź",
            Condition::DrizzleLight => "Lekka mżawka",
            Condition::DrizzleModerate => "Umiarkowana mżawka",
            Condition::DrizzleDense => "Gęsta mżawka",
            Condition::RainLight => "Słaby deszcz",
            Condition::RainModerate => "Umiarkowany deszcz",
            Condition::RainHeavy => "Ulewa",
            Condition::RainShowers => "Przelotne opady",
            Condition::Thunderstorm => "Burza",
            Condition::ThunderstormHail => "Burza z gradem",
            Condition::SnowLight => "Słaby śnieg",
            Condition::SnowModerate => "Umiarkowany śnieg",
            Condition::SnowHeavy => "Śnieżyca",
            Condition::SnowShowers => "Przelotne opady śniegu",
            Condition::Unknown => "Nieznane",
        }
    }

    pub fn icon(&self) -> Icon {
        match self {
            Condition::Clear | Condition::MainlyClear => Icon::Sun,
            Condition::PartlyCloudy
            | Condition::Overcast
            | Condition::Fog
            | Condition::RimeFog
            | Condition::Unknown => Icon::Cloud,
            Condition::DrizzleLight
            | Condition::DrizzleModerate
            | Condition::DrizzleDense
            | Condition::RainLight
            | Condition::RainModerate
            | Condition::RainHeavy
            | Condition::RainShowers
            | Condition::Thunderstorm
            | Condition::ThunderstormHail => Icon::Rain,
            Condition::SnowLight
            | Condition::SnowModerate
            | Condition::SnowHeavy
            | Condition::SnowShowers => Icon::Snow,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}
