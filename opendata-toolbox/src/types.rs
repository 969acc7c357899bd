//! Public types used by toolbox operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ToolboxError, ToolboxResult};

/// Longest county filter accepted; longer values cannot name a real Landkreis.
const MAX_COUNTY_LEN: usize = 100;

/// Renewable energy carrier ("Energieträger") as known to MaStR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum EnergySource {
    /// Solar photovoltaics.
    Photovoltaik,
    /// Wind power.
    Windkraft,
    /// Hydro power.
    Wasserkraft,
    /// Biomass.
    Biomasse,
}

impl EnergySource {
    /// Every energy source, in tool-schema order.
    pub const ALL: [Self; 4] = [
        Self::Photovoltaik,
        Self::Windkraft,
        Self::Wasserkraft,
        Self::Biomasse,
    ];

    /// German name, as used on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Photovoltaik => "Photovoltaik",
            Self::Windkraft => "Windkraft",
            Self::Wasserkraft => "Wasserkraft",
            Self::Biomasse => "Biomasse",
        }
    }

    /// MaStR filter code for the `Energieträger` column.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Photovoltaik => "2495",
            Self::Windkraft => "2497",
            Self::Wasserkraft => "2498",
            Self::Biomasse => "2493",
        }
    }
}

impl fmt::Display for EnergySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses the German wire name, for callers that do not go through serde.
impl FromStr for EnergySource {
    type Err = ToolboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|source| source.name() == s)
            .ok_or_else(|| ToolboxError::UnknownFilterValue(format!("energy source '{s}'")))
    }
}

/// German federal state ("Bundesland").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum FederalState {
    #[serde(rename = "Baden-Württemberg")]
    BadenWuerttemberg,
    Bayern,
    Berlin,
    Brandenburg,
    Bremen,
    Hamburg,
    Hessen,
    #[serde(rename = "Mecklenburg-Vorpommern")]
    MecklenburgVorpommern,
    Niedersachsen,
    #[serde(rename = "Nordrhein-Westfalen")]
    NordrheinWestfalen,
    #[serde(rename = "Rheinland-Pfalz")]
    RheinlandPfalz,
    Saarland,
    Sachsen,
    #[serde(rename = "Sachsen-Anhalt")]
    SachsenAnhalt,
    #[serde(rename = "Schleswig-Holstein")]
    SchleswigHolstein,
    #[serde(rename = "Thüringen")]
    Thueringen,
}

impl FederalState {
    /// All sixteen states, alphabetical by German name.
    pub const ALL: [Self; 16] = [
        Self::BadenWuerttemberg,
        Self::Bayern,
        Self::Berlin,
        Self::Brandenburg,
        Self::Bremen,
        Self::Hamburg,
        Self::Hessen,
        Self::MecklenburgVorpommern,
        Self::Niedersachsen,
        Self::NordrheinWestfalen,
        Self::RheinlandPfalz,
        Self::Saarland,
        Self::Sachsen,
        Self::SachsenAnhalt,
        Self::SchleswigHolstein,
        Self::Thueringen,
    ];

    /// German name, as used on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BadenWuerttemberg => "Baden-Württemberg",
            Self::Bayern => "Bayern",
            Self::Berlin => "Berlin",
            Self::Brandenburg => "Brandenburg",
            Self::Bremen => "Bremen",
            Self::Hamburg => "Hamburg",
            Self::Hessen => "Hessen",
            Self::MecklenburgVorpommern => "Mecklenburg-Vorpommern",
            Self::Niedersachsen => "Niedersachsen",
            Self::NordrheinWestfalen => "Nordrhein-Westfalen",
            Self::RheinlandPfalz => "Rheinland-Pfalz",
            Self::Saarland => "Saarland",
            Self::Sachsen => "Sachsen",
            Self::SachsenAnhalt => "Sachsen-Anhalt",
            Self::SchleswigHolstein => "Schleswig-Holstein",
            Self::Thueringen => "Thüringen",
        }
    }

    /// MaStR filter code for the `Bundesland` column.
    ///
    /// The codes are not alphabetical: Brandenburg is 1400, Schleswig-Holstein 1411.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Brandenburg => "1400",
            Self::Berlin => "1401",
            Self::BadenWuerttemberg => "1402",
            Self::Bayern => "1403",
            Self::Bremen => "1404",
            Self::Hessen => "1405",
            Self::Hamburg => "1406",
            Self::MecklenburgVorpommern => "1407",
            Self::Niedersachsen => "1408",
            Self::NordrheinWestfalen => "1409",
            Self::RheinlandPfalz => "1410",
            Self::SchleswigHolstein => "1411",
            Self::Saarland => "1412",
            Self::Sachsen => "1413",
            Self::SachsenAnhalt => "1414",
            Self::Thueringen => "1415",
        }
    }
}

impl fmt::Display for FederalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses the German wire name, for callers that do not go through serde.
impl FromStr for FederalState {
    type Err = ToolboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.name() == s)
            .ok_or_else(|| ToolboxError::UnknownFilterValue(format!("federal state '{s}'")))
    }
}

/// Filter set for a MaStR power-sum query.
///
/// Build it with [`PowerSumsQuery::new`] to get trimmed and validated filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerSumsQuery {
    /// Energy carrier, always filtered on.
    pub energy_source: EnergySource,
    /// Optional federal state.
    pub state: Option<FederalState>,
    /// Optional postal code ("Postleitzahl"), exact match.
    pub postal_code: Option<String>,
    /// Optional county ("Landkreis"), substring match.
    pub county: Option<String>,
}

impl PowerSumsQuery {
    /// Create a query, normalising the free-text filters.
    ///
    /// Blank postal code or county values count as absent.
    pub fn new(
        energy_source: EnergySource,
        state: Option<FederalState>,
        postal_code: Option<&str>,
        county: Option<&str>,
    ) -> ToolboxResult<Self> {
        let postal_code = non_blank(postal_code).map(validate_postal_code).transpose()?;
        let county = non_blank(county).map(validate_county).transpose()?;

        Ok(Self {
            energy_source,
            state,
            postal_code,
            county,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// German postal codes have five digits; shorter prefixes are passed through
/// unchanged and simply match nothing.
fn validate_postal_code(plz: &str) -> ToolboxResult<String> {
    if plz.len() > 5 || !plz.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ToolboxError::ValidationError(format!(
            "Postal code must be at most 5 digits (got '{plz}')"
        )));
    }
    Ok(plz.to_string())
}

/// `'` and `~` delimit values and operators in the MaStR filter language.
fn validate_county(county: &str) -> ToolboxResult<String> {
    if county.chars().count() > MAX_COUNTY_LEN {
        return Err(ToolboxError::ValidationError(format!(
            "County name exceeds maximum length of {MAX_COUNTY_LEN} characters"
        )));
    }
    if county.contains(['\'', '~']) {
        return Err(ToolboxError::ValidationError(format!(
            "County name must not contain ' or ~ (got '{county}')"
        )));
    }
    Ok(county.to_string())
}

/// Summed installed power of the matching units, in kilowatts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerSums {
    /// Gross power ("Bruttoleistung"). For PV: the module power.
    pub gross_kw: f64,
    /// Net power ("Nettoleistung"). For PV: the combined inverter power.
    pub net_kw: f64,
}

/// Result of a single SNTP exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkTime {
    /// Server that answered.
    pub server: String,
    /// Current time, corrected by the measured clock offset.
    pub time: chrono::DateTime<chrono::Utc>,
    /// Local clock offset relative to the server, in milliseconds.
    pub offset_ms: i64,
    /// Round-trip delay of the exchange, in milliseconds.
    pub round_trip_ms: i64,
    /// Server stratum (1 = primary reference).
    pub stratum: u8,
}
