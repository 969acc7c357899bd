//! MCP tool parameter schemas
//!
//! All structs derive `Debug`, `Deserialize`, and `JsonSchema` as required by rmcp.

use opendata_toolbox::{EnergySource, FederalState};
use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for the `get-sums` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetSumsParams {
    /// Energy carrier to sum up.
    #[serde(rename = "type")]
    #[schemars(description = "Energieträger, Energiequelle, Art der Erzeugung")]
    pub energy_source: EnergySource,

    /// Restrict to one federal state.
    #[schemars(description = "Bundesland, in dem sich die Anlagen befinden")]
    pub state: Option<FederalState>,

    /// Restrict to one postal code.
    #[schemars(description = "Postleitzahl der Anlagen")]
    pub plz: Option<String>,

    /// Restrict to counties whose name contains this text.
    #[schemars(description = "Landkreis oder Region, in der die Anlagen stehen")]
    pub county: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use schemars::schema_for;

    #[test]
    fn only_type_is_required() {
        let params: GetSumsParams =
            serde_json::from_value(serde_json::json!({ "type": "Photovoltaik" })).unwrap();
        assert_eq!(params.energy_source, EnergySource::Photovoltaik);
        assert!(params.state.is_none());
        assert!(params.plz.is_none());
        assert!(params.county.is_none());
    }

    #[test]
    fn all_fields_deserialize() {
        let params: GetSumsParams = serde_json::from_value(serde_json::json!({
            "type": "Windkraft",
            "state": "Schleswig-Holstein",
            "plz": "25821",
            "county": "Nordfriesland"
        }))
        .unwrap();
        assert_eq!(params.state, Some(FederalState::SchleswigHolstein));
        assert_eq!(params.plz.as_deref(), Some("25821"));
        assert_eq!(params.county.as_deref(), Some("Nordfriesland"));
    }

    #[test]
    fn missing_type_fails() {
        let result: serde_json::Result<GetSumsParams> =
            serde_json::from_value(serde_json::json!({ "state": "Bayern" }));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_state_fails() {
        let result: serde_json::Result<GetSumsParams> = serde_json::from_value(
            serde_json::json!({ "type": "Biomasse", "state": "Österreich" }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn schema_lists_enum_values_and_required_fields() {
        let schema = serde_json::to_value(schema_for!(GetSumsParams)).unwrap();
        let required = schema
            .get("required")
            .and_then(serde_json::Value::as_array)
            .unwrap();
        assert_eq!(required, &vec![serde_json::json!("type")]);

        let text = schema.to_string();
        for source in EnergySource::ALL {
            assert!(text.contains(source.name()), "schema misses {source}");
        }
        for state in FederalState::ALL {
            assert!(text.contains(state.name()), "schema misses {state}");
        }
    }
}
