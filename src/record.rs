use std::collections::BTreeMap;

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A single scalar field of a health record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Parses numeric-looking text into a number; everything else stays text.
    fn parse(raw: &str) -> FieldValue {
        match raw.trim().parse::<f64>() {
            Ok(n) => FieldValue::Number(n),
            Err(_) => FieldValue::Text(raw.trim().to_string()),
        }
    }
}

/// One flat health record, constructed from form fields, a JSON body, or a
/// CSV row. Lives only for the duration of a single prediction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl HealthRecord {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), FieldValue::parse(v.as_ref())))
            .collect();
        Self { fields }
    }

    pub fn from_json_map(map: &serde_json::Map<String, serde_json::Value>) -> Result<Self, ApiError> {
        let mut fields = BTreeMap::new();
        for (name, value) in map {
            let field = match value {
                serde_json::Value::Number(n) => {
                    let n = n.as_f64().ok_or_else(|| ApiError::InvalidField {
                        field: name.clone(),
                        reason: "number is not representable as f64".to_string(),
                    })?;
                    FieldValue::Number(n)
                }
                serde_json::Value::String(s) => FieldValue::parse(s),
                serde_json::Value::Bool(b) => FieldValue::Number(if *b { 1.0 } else { 0.0 }),
                other => {
                    return Err(ApiError::InvalidField {
                        field: name.clone(),
                        reason: format!("expected a scalar, got {other}"),
                    });
                }
            };
            fields.insert(name.clone(), field);
        }
        Ok(Self { fields })
    }

    pub fn from_csv_row(headers: &StringRecord, row: &StringRecord) -> Self {
        let fields = headers
            .iter()
            .zip(row.iter())
            .map(|(name, raw)| (name.to_string(), FieldValue::parse(raw)))
            .collect();
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Numeric view of a field, parsing stored text if it looks numeric.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.fields.get(name)? {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(t) => t.trim().parse::<f64>().ok(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_pairs_parse_numbers_and_keep_text() {
        let record = HealthRecord::from_pairs([("Age", "45"), ("Gender", "Male")]);
        assert_eq!(record.number("Age"), Some(45.0));
        assert_eq!(
            record.get("Gender"),
            Some(&FieldValue::Text("Male".to_string()))
        );
    }

    #[test]
    fn csv_row_maps_headers_to_values() {
        let headers = StringRecord::from(vec!["Age", "BMI", "Smoking_Status"]);
        let row = StringRecord::from(vec!["61", "27.4", "Former"]);
        let record = HealthRecord::from_csv_row(&headers, &row);
        assert_eq!(record.number("BMI"), Some(27.4));
        assert_eq!(record.number("Smoking_Status"), None);
    }

    #[test]
    fn json_map_rejects_nested_values() {
        let map = serde_json::json!({"Age": {"value": 40}});
        let map = map.as_object().unwrap();
        assert!(HealthRecord::from_json_map(map).is_err());
    }

    #[test]
    fn json_numeric_strings_act_as_numbers() {
        let map = serde_json::json!({"Systolic_BP": "135"});
        let map = map.as_object().unwrap();
        let record = HealthRecord::from_json_map(map).unwrap();
        assert_eq!(record.number("Systolic_BP"), Some(135.0));
    }
}
