//! Loader for the crop profile and market price tables.
//!
//! Both tables are read once at startup and shared read-only for the life of
//! the process. Any malformed file is a startup error.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};

use crate::error::DataError;
use crate::models::{normalize_crop_name, CropProfile, MarketPrice};
use crate::schema::{self, Columns};

// ---

/// Immutable crop reference data.
#[derive(Debug, Clone, Default)]
pub struct CropCatalog {
    /// Profiles in table order; recommendation ties keep this order.
    pub profiles: Vec<CropProfile>,
    /// Prices keyed by normalized crop name.
    pub prices: HashMap<String, MarketPrice>,
}

impl CropCatalog {
    /// Load both tables from disk.
    pub fn load(crop_path: &Path, price_path: &Path) -> Result<Self, DataError> {
        // ---
        let crops = open(crop_path)?;
        let prices = open(price_path)?;
        let catalog = Self::from_readers(crops, crop_path, prices, price_path)?;

        tracing::info!(
            "Loaded {} crop profiles from {} and {} prices from {}",
            catalog.profiles.len(),
            crop_path.display(),
            catalog.prices.len(),
            price_path.display()
        );
        Ok(catalog)
    }

    /// Parse both tables from arbitrary readers; `*_path` is used in errors.
    pub fn from_readers<C: Read, P: Read>(
        crops: C,
        crop_path: &Path,
        prices: P,
        price_path: &Path,
    ) -> Result<Self, DataError> {
        // ---
        let profiles = read_profiles(crops, crop_path)?;
        let prices = read_prices(prices, price_path)?;

        let unpriced: Vec<&str> = profiles
            .iter()
            .filter(|p| !prices.contains_key(&p.key()))
            .map(|p| p.crop.as_str())
            .collect();
        if !unpriced.is_empty() {
            tracing::warn!(
                "{} crops have no market price and will never be recommended: {}",
                unpriced.len(),
                unpriced.join(", ")
            );
        }

        Ok(Self { profiles, prices })
    }

    /// Market price joined on the normalized crop name.
    pub fn price_for(&self, profile: &CropProfile) -> Option<&MarketPrice> {
        self.prices.get(&profile.key())
    }
}

fn open(path: &Path) -> Result<File, DataError> {
    File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses the cells of one row, tagging errors with file, row, and column.
struct Row<'a> {
    cols: &'a Columns,
    record: &'a StringRecord,
    path: &'a Path,
    row: usize,
}

impl Row<'_> {
    fn text(&self, column: &str) -> Result<String, DataError> {
        // ---
        match self.cols.get_non_empty(self.record, column) {
            Some(v) => Ok(v),
            None => Err(self.invalid(column, "", "value is required".to_string())),
        }
    }

    fn optional(&self, column: &str) -> Option<String> {
        self.cols.get_non_empty(self.record, column)
    }

    fn parse<T>(&self, column: &str) -> Result<T, DataError>
    where
        T: FromStr,
        T::Err: ToString,
    {
        // ---
        let raw = self.cols.get(self.record, column).unwrap_or_default();
        raw.parse::<T>()
            .map_err(|e| self.invalid(column, raw, e.to_string()))
    }

    fn number(&self, column: &str) -> Result<f64, DataError> {
        // ---
        let value: f64 = self.parse(column)?;
        if !value.is_finite() {
            let raw = self.cols.get(self.record, column).unwrap_or_default();
            return Err(self.invalid(column, raw, "not a finite number".to_string()));
        }
        Ok(value)
    }

    fn invalid(&self, column: &str, value: &str, reason: String) -> DataError {
        DataError::InvalidValue {
            path: self.path.to_path_buf(),
            row: self.row,
            column: column.to_string(),
            value: value.to_string(),
            reason,
        }
    }
}

fn records<R: Read>(
    reader: R,
    path: &Path,
    table: &schema::TableSchema,
) -> Result<(Columns, Vec<StringRecord>), DataError> {
    // ---
    let csv_err = |source: csv::Error| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(csv_err)?.clone();
    let cols = Columns::validate(&headers, table, path)?;

    let rows = rdr
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)?;
    Ok((cols, rows))
}

fn read_profiles<R: Read>(reader: R, path: &Path) -> Result<Vec<CropProfile>, DataError> {
    // ---
    let (cols, rows) = records(reader, path, &schema::CROP_PROFILES)?;
    let mut profiles = Vec::with_capacity(rows.len());

    for (i, record) in rows.iter().enumerate() {
        // Header is line 1
        let row = Row {
            cols: &cols,
            record,
            path,
            row: i + 2,
        };

        let profile = CropProfile {
            crop: row.text("crop")?,
            ph_min: row.number("ph_min")?,
            ph_max: row.number("ph_max")?,
            water_need: row.parse("water_need")?,
            climate_zone: row.parse("climate_zone")?,
            season: row.parse("season")?,
            base_yield: row.number("base_yield")?,
            fertilizer: row.optional("fertilizer"),
            sowing_months: row.optional("sowing_months"),
            carbon_footprint: row.text("carbon_footprint")?,
            crop_hi: row.optional("crop_hi"),
            crop_ta: row.optional("crop_ta"),
            crop_te: row.optional("crop_te"),
            crop_ml: row.optional("crop_ml"),
        };

        if profile.ph_min > profile.ph_max {
            return Err(row.invalid(
                "ph_min",
                &profile.ph_min.to_string(),
                format!("greater than ph_max {}", profile.ph_max),
            ));
        }
        profiles.push(profile);
    }
    Ok(profiles)
}

fn read_prices<R: Read>(
    reader: R,
    path: &Path,
) -> Result<HashMap<String, MarketPrice>, DataError> {
    // ---
    let (cols, rows) = records(reader, path, &schema::MARKET_PRICES)?;
    let mut prices = HashMap::with_capacity(rows.len());

    for (i, record) in rows.iter().enumerate() {
        let row = Row {
            cols: &cols,
            record,
            path,
            row: i + 2,
        };
        let price = MarketPrice {
            crop: row.text("crop")?,
            base_price: row.number("base_price")?,
        };

        let key = normalize_crop_name(&price.crop);
        if prices.contains_key(&key) {
            return Err(DataError::DuplicatePrice {
                path: path.to_path_buf(),
                crop: price.crop,
            });
        }
        prices.insert(key, price);
    }
    Ok(prices)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::{ClimateZone, Season, WaterNeed};

    const CROPS: &str = "\
Crop,PH_MIN,ph_max,water_need,climate_zone,season,base_yield,fertilizer,sowing_months,carbon_footprint,crop_hi
Rice,5.5,7.0,medium,tropical,Rainy / Monsoon,40,Urea,Jun-Jul,High,चावल
Millet,5.0,8.0,Low,Dry,Summer,15,,Apr-May,Low,
";

    const PRICES: &str = "crop,base_price\n rice ,20\nMillet,35\n";

    fn load(crops: &str, prices: &str) -> Result<CropCatalog, DataError> {
        CropCatalog::from_readers(
            crops.as_bytes(),
            Path::new("crops.csv"),
            prices.as_bytes(),
            Path::new("prices.csv"),
        )
    }

    #[test]
    fn test_loads_profiles_with_normalized_categories() {
        // ---
        let catalog = load(CROPS, PRICES).unwrap();
        assert_eq!(catalog.profiles.len(), 2);

        let rice = &catalog.profiles[0];
        assert_eq!(rice.crop, "Rice");
        assert_eq!(rice.water_need, WaterNeed::Medium);
        assert_eq!(rice.climate_zone, ClimateZone::Tropical);
        assert_eq!(rice.season, Season::Rainy);
        assert_eq!(rice.base_yield, 40.0);
        assert_eq!(rice.fertilizer.as_deref(), Some("Urea"));
        assert_eq!(rice.crop_hi.as_deref(), Some("चावल"));
        assert_eq!(rice.crop_ml, None);

        let millet = &catalog.profiles[1];
        assert_eq!(millet.fertilizer, None);
        assert_eq!(millet.crop_hi, None);
    }

    #[test]
    fn test_prices_join_on_normalized_name() {
        // ---
        let catalog = load(CROPS, PRICES).unwrap();
        let rice = &catalog.profiles[0];
        assert_eq!(catalog.price_for(rice).map(|p| p.base_price), Some(20.0));
    }

    #[test]
    fn test_duplicate_price_is_rejected() {
        // ---
        let err = load(CROPS, "crop,base_price\nRice,20\nRICE,22\n").unwrap_err();
        assert!(matches!(err, DataError::DuplicatePrice { crop, .. } if crop == "RICE"));
    }

    #[test]
    fn test_alternate_crop_column_is_not_accepted() {
        // ---
        let err = load(CROPS, "crop_name,base_price\nRice,20\n").unwrap_err();
        assert!(matches!(err, DataError::MissingColumns { .. }));
    }

    #[test]
    fn test_bad_number_reports_row_and_column() {
        // ---
        let crops = CROPS.replace("40,Urea", "forty,Urea");
        match load(&crops, PRICES).unwrap_err() {
            DataError::InvalidValue {
                row, column, value, ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(column, "base_yield");
                assert_eq!(value, "forty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        // ---
        let crops = CROPS.replace("tropical", "polar");
        assert!(matches!(
            load(&crops, PRICES).unwrap_err(),
            DataError::InvalidValue { column, .. } if column == "climate_zone"
        ));
    }

    #[test]
    fn test_inverted_ph_range_is_rejected() {
        // ---
        let crops = CROPS.replace("5.5,7.0", "7.5,7.0");
        assert!(load(&crops, PRICES).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        // ---
        let err = CropCatalog::load(Path::new("/nonexistent/crops.csv"), Path::new("p.csv"))
            .unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
