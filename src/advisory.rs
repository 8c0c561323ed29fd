//! Rule-based clinical warnings, independent of the model output.
//!
//! Four fixed thresholds, all strict comparisons: a value equal to its
//! threshold produces no warning. The checks are order-insensitive and do
//! not interact.

use crate::record::HealthRecord;
use crate::schema;

const SYSTOLIC_LIMIT: f64 = 140.0;
const DIASTOLIC_LIMIT: f64 = 90.0;
const CHOLESTEROL_LIMIT: f64 = 240.0;
const BMI_LIMIT: f64 = 30.0;
const GLUCOSE_LIMIT: f64 = 180.0;

pub const HIGH_BLOOD_PRESSURE: &str = "High blood pressure detected";
pub const HIGH_CHOLESTEROL: &str = "High cholesterol";
pub const OBESITY_RISK: &str = "Obesity risk";
pub const HIGH_BLOOD_SUGAR: &str = "High blood sugar";

pub fn check(record: &HealthRecord) -> Vec<&'static str> {
    let mut warnings = Vec::new();
    let over = |field, limit| record.number(field).is_some_and(|v| v > limit);

    if over(schema::SYSTOLIC_BP, SYSTOLIC_LIMIT) || over(schema::DIASTOLIC_BP, DIASTOLIC_LIMIT) {
        warnings.push(HIGH_BLOOD_PRESSURE);
    }
    if over(schema::CHOLESTEROL, CHOLESTEROL_LIMIT) {
        warnings.push(HIGH_CHOLESTEROL);
    }
    if over(schema::BMI, BMI_LIMIT) {
        warnings.push(OBESITY_RISK);
    }
    if over(schema::GLUCOSE_LEVEL, GLUCOSE_LIMIT) {
        warnings.push(HIGH_BLOOD_SUGAR);
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::HealthRecord;

    fn record(pairs: &[(&str, &str)]) -> HealthRecord {
        HealthRecord::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn boundary_values_produce_no_warnings() {
        let r = record(&[
            ("Systolic_BP", "140"),
            ("Diastolic_BP", "90"),
            ("Cholesterol", "240"),
            ("BMI", "30"),
            ("Glucose_Level", "180"),
        ]);
        assert!(check(&r).is_empty());
    }

    #[test]
    fn systolic_just_over_limit_warns() {
        let r = record(&[("Systolic_BP", "141"), ("Diastolic_BP", "80")]);
        assert_eq!(check(&r), vec![HIGH_BLOOD_PRESSURE]);
    }

    #[test]
    fn diastolic_alone_can_trigger_the_bp_warning() {
        let r = record(&[("Systolic_BP", "120"), ("Diastolic_BP", "91")]);
        assert_eq!(check(&r), vec![HIGH_BLOOD_PRESSURE]);
    }

    #[test]
    fn cholesterol_241_warns() {
        let r = record(&[("Cholesterol", "241")]);
        assert_eq!(check(&r), vec![HIGH_CHOLESTEROL]);
    }

    #[test]
    fn bmi_just_over_30_warns() {
        let r = record(&[("BMI", "30.1")]);
        assert_eq!(check(&r), vec![OBESITY_RISK]);
    }

    #[test]
    fn glucose_181_warns() {
        let r = record(&[("Glucose_Level", "181")]);
        assert_eq!(check(&r), vec![HIGH_BLOOD_SUGAR]);
    }

    #[test]
    fn all_rules_fire_independently() {
        let r = record(&[
            ("Systolic_BP", "150"),
            ("Cholesterol", "250"),
            ("BMI", "32"),
            ("Glucose_Level", "200"),
        ]);
        assert_eq!(
            check(&r),
            vec![
                HIGH_BLOOD_PRESSURE,
                HIGH_CHOLESTEROL,
                OBESITY_RISK,
                HIGH_BLOOD_SUGAR
            ]
        );
    }

    #[test]
    fn absent_fields_never_warn() {
        assert!(check(&record(&[("Age", "40")])).is_empty());
    }
}
