//! Geography reference data: continents, countries, regions, cities.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continent {
  pub code:  String,
  pub name:  String,
  /// Display colour, e.g. `#4a90d9`.
  pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
  pub code:             String,
  pub name:             String,
  pub continent_code:   Option<String>,
  pub capital:          Option<City>,
  pub gdp:              i64,
  pub population:       i64,
  pub has_region_icons: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCountry {
  pub code:             String,
  pub name:             String,
  pub continent_code:   Option<String>,
  pub capital_city_id:  Option<i64>,
  #[serde(default)]
  pub gdp:              i64,
  #[serde(default)]
  pub population:       i64,
  #[serde(default)]
  pub has_region_icons: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
  pub id:           i64,
  pub code:         String,
  pub name:         String,
  pub country_code: String,
  pub country_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRegion {
  pub code:         String,
  pub name:         String,
  pub country_code: String,
}

/// A city joined with its region and country codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
  pub id:           i64,
  pub name:         String,
  pub region_id:    i64,
  pub region_code:  String,
  pub country_code: String,
  pub latitude:     Option<f64>,
  pub longitude:    Option<f64>,
}

impl City {
  /// `"Name, RG, CC"`.
  pub fn display(&self) -> String {
    format!("{}, {}, {}", self.name, self.region_code, self.country_code)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn city_display() {
    let city = City {
      id:           1,
      name:         "Portland".into(),
      region_id:    2,
      region_code:  "OR".into(),
      country_code: "US".into(),
      latitude:     None,
      longitude:    None,
    };
    assert_eq!(city.display(), "Portland, OR, US");
  }
}
