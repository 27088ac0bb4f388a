//! Static localization tables.
//!
//! Holds the state lookups (climate zone and default language), the UI string
//! bundles for each supported language, the localized water labels, and the
//! one fallback rule used for every piece of translated content.

use serde::{Deserialize, Serialize};

use crate::models::{ClimateZone, Language, WaterNeed};

// ---

/// A state the service knows how to map to a climate zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateInfo {
    pub state: &'static str,
    pub climate_zone: ClimateZone,
    pub default_language: Language,
}

const fn state(
    state: &'static str,
    climate_zone: ClimateZone,
    default_language: Language,
) -> StateInfo {
    StateInfo {
        state,
        climate_zone,
        default_language,
    }
}

pub static STATES: [StateInfo; 18] = [
    // Tropical
    state("Kerala", ClimateZone::Tropical, Language::Ml),
    state("Karnataka", ClimateZone::Tropical, Language::En),
    state("Tamil Nadu", ClimateZone::Tropical, Language::Ta),
    state("Andhra Pradesh", ClimateZone::Tropical, Language::Te),
    state("Goa", ClimateZone::Tropical, Language::En),
    state("Maharashtra", ClimateZone::Tropical, Language::En),
    state("West Bengal", ClimateZone::Tropical, Language::En),
    state("Odisha", ClimateZone::Tropical, Language::En),
    // Temperate / subtropical
    state("Punjab", ClimateZone::Temperate, Language::Hi),
    state("Haryana", ClimateZone::Temperate, Language::Hi),
    state("Uttar Pradesh", ClimateZone::Temperate, Language::Hi),
    state("Madhya Pradesh", ClimateZone::Temperate, Language::Hi),
    state("Bihar", ClimateZone::Temperate, Language::Hi),
    state("Himachal Pradesh", ClimateZone::Temperate, Language::Hi),
    state("Jammu & Kashmir", ClimateZone::Temperate, Language::Hi),
    // Dry / arid
    state("Rajasthan", ClimateZone::Dry, Language::Hi),
    state("Gujarat", ClimateZone::Dry, Language::Hi),
    state("Ladakh", ClimateZone::Dry, Language::En),
];

/// Find a state by name, ignoring case and surrounding whitespace.
pub fn lookup_state(name: &str) -> Option<&'static StateInfo> {
    let name = name.trim();
    STATES.iter().find(|s| s.state.eq_ignore_ascii_case(name))
}

/// Per-language text with an English fallback.
///
/// Values missing from the source JSON deserialize as empty strings, which
/// [`localize`] treats the same as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub hi: String,
    #[serde(default)]
    pub ta: String,
    #[serde(default)]
    pub te: String,
    #[serde(default)]
    pub ml: String,
}

impl LocalizedText {
    /// Raw value for `lang`, possibly empty.
    pub fn get(&self, lang: Language) -> &str {
        match lang {
            Language::En => &self.en,
            Language::Hi => &self.hi,
            Language::Ta => &self.ta,
            Language::Te => &self.te,
            Language::Ml => &self.ml,
        }
    }
}

/// Text for `lang` if present and non-blank, otherwise the English text.
///
/// Callers apply this to each field on its own, so a remedy may fall back to
/// English while its precautions stay in the requested language.
pub fn localize(text: &LocalizedText, lang: Language) -> &str {
    let wanted = text.get(lang);
    if wanted.trim().is_empty() {
        &text.en
    } else {
        wanted
    }
}

/// Water-need label as shown in the given language.
pub fn water_label(water: WaterNeed, lang: Language) -> &'static str {
    // ---
    use WaterNeed::*;
    match (lang, water) {
        (Language::En, w) => w.as_str(),
        (Language::Hi, Low) => "कम",
        (Language::Hi, Medium) => "मध्यम",
        (Language::Hi, High) => "अधिक",
        (Language::Hi, VeryHigh) => "बहुत अधिक",
        (Language::Ta, Low) => "குறைந்த",
        (Language::Ta, Medium) => "மிதமான",
        (Language::Ta, High) => "அதிக",
        (Language::Ta, VeryHigh) => "மிக அதிக",
        (Language::Te, Low) => "తక్కువ",
        (Language::Te, Medium) => "మధ్యస్థ",
        (Language::Te, High) => "ఎక్కువ",
        (Language::Te, VeryHigh) => "చాలా ఎక్కువ",
        (Language::Ml, Low) => "കുറഞ്ഞത്",
        (Language::Ml, Medium) => "മധ്യമം",
        (Language::Ml, High) => "അധികം",
        (Language::Ml, VeryHigh) => "വളരെ അധികം",
    }
}

/// Older spellings still accepted as input but no longer displayed.
pub const WATER_LABEL_ALIASES: [(&str, WaterNeed); 1] = [("மதியம்", WaterNeed::Medium)];

/// Labels for the recommendation view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UiStrings {
    pub crop_header: &'static str,
    pub state: &'static str,
    pub soil_ph: &'static str,
    pub water: &'static str,
    pub recommend_btn: &'static str,
    pub recommended_crops: &'static str,
    pub profit_chart: &'static str,
    pub profit_values: &'static str,
    pub no_match: &'static str,
    pub sowing: &'static str,
    pub fertilizer: &'static str,
    pub profit_index: &'static str,
    pub carbon: &'static str,
}

const EN: UiStrings = UiStrings {
    crop_header: "Crop Recommendation System",
    state: "Select State",
    soil_ph: "Soil pH",
    water: "Water Availability",
    recommend_btn: "Recommend Crop",
    recommended_crops: "Recommended Crops:",
    profit_chart: "Profit Index Chart",
    profit_values: "Profit Index Values:",
    no_match: "No matching crops found for the given criteria.",
    sowing: "Sowing Months",
    fertilizer: "Fertilizer",
    profit_index: "Profit Index",
    carbon: "Carbon Footprint",
};

const HI: UiStrings = UiStrings {
    crop_header: "फ़सल सिफारिश प्रणाली",
    state: "राज्य चुनें",
    soil_ph: "मिट्टी का pH",
    water: "पानी की उपलब्धता",
    recommend_btn: "फसल सुझाएँ",
    recommended_crops: "अनुशंसित फ़सलें:",
    profit_chart: "लाभ सूचकांक चार्ट",
    profit_values: "लाभ सूचकांक मान:",
    no_match: "दिए गए मापदंडों के लिए कोई उपयुक्त फ़सल नहीं मिली।",
    sowing: "बुआई के महीने",
    fertilizer: "उर्वरक",
    profit_index: "लाभ सूचकांक",
    carbon: "कार्बन पदचिह्न",
};

const TA: UiStrings = UiStrings {
    crop_header: "பயிர் பரிந்துரை அமைப்பு",
    state: "மாநிலத்தைத் தேர்ந்தெடுக்கவும்",
    soil_ph: "மண்ணின் pH",
    water: "நீர் இருப்பு",
    recommend_btn: "பயிர் பரிந்துரை செய்யவும்",
    recommended_crops: "பரிந்துரைக்கப்பட்ட பயிர்கள்:",
    profit_chart: "இலாப குறியீட்டு வரைபடம்",
    profit_values: "இலாப குறியீட்டு மதிப்புகள்:",
    no_match: "கொடுக்கப்பட்ட அளவுகோல்களுக்கு பொருந்தும் பயிர்கள் இல்லை.",
    sowing: "விதைப்பு மாதங்கள்",
    fertilizer: "உரம்",
    profit_index: "இலாப குறியீடு",
    carbon: "கார்பன் தடம்",
};

const TE: UiStrings = UiStrings {
    crop_header: "పంట సిఫారసుల వ్యవస్థ",
    state: "రాష్ట్రాన్ని ఎంచుకోండి",
    soil_ph: "మట్టి pH",
    water: "నీటి అందుబాటు",
    recommend_btn: "పంటను సిఫారసు చేయండి",
    recommended_crops: "సిఫారసు చేసిన పంటలు:",
    profit_chart: "లాభ సూచిక చార్ట్",
    profit_values: "లాభ సూచిక విలువలు:",
    no_match: "ఇచ్చిన ప్రమాణాలకు సరిపడే పంటలు లభించలేదు.",
    sowing: "విత్తే నెలలు",
    fertilizer: "ఎరువు",
    profit_index: "లాభ సూచిక",
    carbon: "కార్బన్ పాదముద్ర",
};

const ML: UiStrings = UiStrings {
    crop_header: "വിള ശുപാർശ സംവിധാനം",
    state: "സംസ്ഥാനം തിരഞ്ഞെടുക്കുക",
    soil_ph: "മണ്ണിന്റെ pH",
    water: "ജല ലഭ്യത",
    recommend_btn: "വിള ശുപാർശ ചെയ്യുക",
    recommended_crops: "ശുപാർശ ചെയ്ത വിളകൾ:",
    profit_chart: "ലാഭ സൂചിക ചാർട്ട്",
    profit_values: "ലാഭ സൂചിക മൂല്യങ്ങൾ:",
    no_match: "നൽകിയ മാനദണ്ഡങ്ങൾക്ക് യോജിക്കുന്ന വിളകൾ ഒന്നും കണ്ടെത്തിയില്ല.",
    sowing: "വിതയ്ക്കുന്ന മാസങ്ങൾ",
    fertilizer: "വളം",
    profit_index: "ലാഭ സൂചിക",
    carbon: "കാർബൺ ഫുട്പ്രിന്റ്",
};

pub fn ui_strings(lang: Language) -> &'static UiStrings {
    match lang {
        Language::En => &EN,
        Language::Hi => &HI,
        Language::Ta => &TA,
        Language::Te => &TE,
        Language::Ml => &ML,
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn text(en: &str, hi: &str) -> LocalizedText {
        LocalizedText {
            en: en.to_string(),
            hi: hi.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_localize_prefers_requested_language() {
        // ---
        let t = text("Spray copper", "कॉपर का छिड़काव करें");
        assert_eq!(localize(&t, Language::Hi), "कॉपर का छिड़काव करें");
        assert_eq!(localize(&t, Language::En), "Spray copper");
    }

    #[test]
    fn test_localize_falls_back_to_english_when_blank() {
        // ---
        let t = text("Spray copper", "   ");
        assert_eq!(localize(&t, Language::Hi), "Spray copper");
        assert_eq!(localize(&t, Language::Ml), "Spray copper");
    }

    #[test]
    fn test_missing_languages_deserialize_empty() {
        // ---
        let t: LocalizedText = serde_json::from_str(r#"{"en":"Rotate crops","ta":"பயிர் சுழற்சி"}"#).unwrap();
        assert_eq!(t.hi, "");
        assert_eq!(localize(&t, Language::Ta), "பயிர் சுழற்சி");
        assert_eq!(localize(&t, Language::Te), "Rotate crops");
    }

    #[test]
    fn test_state_lookup_ignores_case() {
        // ---
        let kerala = lookup_state("  kerala ").unwrap();
        assert_eq!(kerala.climate_zone, ClimateZone::Tropical);
        assert_eq!(kerala.default_language, Language::Ml);
        assert_eq!(lookup_state("RAJASTHAN").unwrap().climate_zone, ClimateZone::Dry);
        assert!(lookup_state("Atlantis").is_none());
    }

    #[test]
    fn test_state_zones_match_profile_vocabulary() {
        // ---
        for s in &STATES {
            let parsed: ClimateZone = s.climate_zone.to_string().parse().unwrap();
            assert_eq!(parsed, s.climate_zone, "zone mismatch for {}", s.state);
        }
    }

    #[test]
    fn test_water_labels_are_unique_per_language() {
        // ---
        for lang in Language::ALL {
            let mut labels: Vec<&str> = WaterNeed::ALL.iter().map(|w| water_label(*w, lang)).collect();
            labels.sort();
            labels.dedup();
            assert_eq!(labels.len(), 4, "duplicate water label in {}", lang);
        }
    }

    #[test]
    fn test_every_language_has_a_bundle() {
        // ---
        for lang in Language::ALL {
            assert!(!ui_strings(lang).no_match.is_empty());
        }
        assert_eq!(ui_strings(Language::En).profit_index, "Profit Index");
    }
}
