//! Domain data models for crop recommendation and disease history.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---

/// Irrigation requirement of a crop, as an ordinal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaterNeed {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl WaterNeed {
    pub const ALL: [WaterNeed; 4] = [Self::Low, Self::Medium, Self::High, Self::VeryHigh];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    /// Parse a water label as shown in any UI language.
    ///
    /// Canonical English labels match case-insensitively; localized labels
    /// must match exactly after trimming.
    pub fn from_label(label: &str) -> Option<Self> {
        // ---
        if let Ok(w) = label.parse() {
            return Some(w);
        }
        let label = label.trim();
        Language::ALL
            .iter()
            .find_map(|lang| {
                Self::ALL
                    .into_iter()
                    .find(|w| crate::localization::water_label(*w, *lang) == label)
            })
            .or_else(|| {
                crate::localization::WATER_LABEL_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == label)
                    .map(|(_, w)| *w)
            })
    }
}

impl FromStr for WaterNeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "very high" => Ok(Self::VeryHigh),
            other => Err(format!("unknown water need '{}'", other)),
        }
    }
}

impl fmt::Display for WaterNeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Climate zone, derived from the farmer's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimateZone {
    Tropical,
    Temperate,
    Dry,
}

impl FromStr for ClimateZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tropical" => Ok(Self::Tropical),
            "temperate" => Ok(Self::Temperate),
            "dry" => Ok(Self::Dry),
            other => Err(format!("unknown climate zone '{}'", other)),
        }
    }
}

impl fmt::Display for ClimateZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Tropical => "Tropical",
            Self::Temperate => "Temperate",
            Self::Dry => "Dry",
        };
        f.write_str(s)
    }
}

/// Sowing season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Rainy,
    Winter,
    Summer,
}

impl Season {
    /// Season for a calendar month (1-12): monsoon runs June to October,
    /// winter November to March, summer April and May.
    pub fn for_month(month: u32) -> Self {
        match month {
            6..=10 => Self::Rainy,
            4 | 5 => Self::Summer,
            _ => Self::Winter,
        }
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rainy" | "monsoon" | "rainy / monsoon" | "rainy/monsoon" => Ok(Self::Rainy),
            "winter" => Ok(Self::Winter),
            "summer" => Ok(Self::Summer),
            other => Err(format!("unknown season '{}'", other)),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Rainy => "Rainy",
            Self::Winter => "Winter",
            Self::Summer => "Summer",
        };
        f.write_str(s)
    }
}

/// Supported UI and content languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Ta,
    Te,
    Ml,
}

impl Language {
    pub const ALL: [Language; 5] = [Self::En, Self::Hi, Self::Ta, Self::Te, Self::Ml];

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Ta => "ta",
            Self::Te => "te",
            Self::Ml => "ml",
        }
    }

    /// Name of the language in its own script.
    pub fn native_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "हिंदी",
            Self::Ta => "தமிழ்",
            Self::Te => "తెలుగు",
            Self::Ml => "മലയാളം",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported language '{}'", s.trim()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One row of the crop profile table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropProfile {
    // ---
    pub crop: String,
    pub ph_min: f64,
    pub ph_max: f64,
    pub water_need: WaterNeed,
    pub climate_zone: ClimateZone,
    pub season: Season,
    pub base_yield: f64,
    pub fertilizer: Option<String>,
    pub sowing_months: Option<String>,
    pub carbon_footprint: String,
    pub crop_hi: Option<String>,
    pub crop_ta: Option<String>,
    pub crop_te: Option<String>,
    pub crop_ml: Option<String>,
}

impl CropProfile {
    /// Join key shared with [`MarketPrice`].
    pub fn key(&self) -> String {
        normalize_crop_name(&self.crop)
    }

    pub fn accepts_ph(&self, ph: f64) -> bool {
        self.ph_min <= ph && ph <= self.ph_max
    }

    /// Crop name in `lang`, falling back to the table's English name.
    pub fn localized_name(&self, lang: Language) -> &str {
        // ---
        let name = match lang {
            Language::En => None,
            Language::Hi => self.crop_hi.as_deref(),
            Language::Ta => self.crop_ta.as_deref(),
            Language::Te => self.crop_te.as_deref(),
            Language::Ml => self.crop_ml.as_deref(),
        };
        name.filter(|n| !n.trim().is_empty()).unwrap_or(&self.crop)
    }
}

/// One row of the market price table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketPrice {
    pub crop: String,
    pub base_price: f64,
}

/// A crop that passed the recommendation filter, with its ranking score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub profile: CropProfile,
    pub base_price: f64,
    /// `base_yield * base_price`; a relative score, not a currency amount.
    pub profit_index: f64,
}

/// Flat, append-only disease history row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoryRecord {
    // ---
    pub farmer: String,
    pub crop: String,
    pub disease: String,
    pub remedy_en: String,
    pub precautions_en: String,
    pub remedy_hi: String,
    pub precautions_hi: String,
    pub remedy_ta: String,
    pub precautions_ta: String,
    pub remedy_te: String,
    pub precautions_te: String,
    pub remedy_ml: String,
    pub precautions_ml: String,
}

/// Lowercase, trimmed crop name used as the join key between tables.
pub fn normalize_crop_name(name: &str) -> String {
    name.trim().to_lowercase()
}
