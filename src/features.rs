use std::collections::HashMap;

use thiserror::Error;

/// Number of inputs the classifier was trained on.
pub const FEATURE_COUNT: usize = 16;

/// Feature names in training order. Model input vectors, the `patients`
/// columns and the submission form all follow this order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "ex_fum",
    "consum_alcoh",
    "consum_alcoh_30",
    "niveldeactividadesemanal",
    "act_fis_frisk",
    "diet_frisk",
    "med_hta_fr",
    "glu_alta",
    "parien_dm",
    "edad",
    "mets",
    "sedentarismo",
    "talla",
    "peso",
    "imc",
    "mme",
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("field {field} is not numeric: {value:?}")]
    NotNumeric { field: &'static str, value: String },
}

/// A validated, fully populated submission. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub ex_fum: f64,
    pub consum_alcoh: f64,
    pub consum_alcoh_30: f64,
    pub niveldeactividadesemanal: f64,
    pub act_fis_frisk: f64,
    pub diet_frisk: f64,
    pub med_hta_fr: f64,
    pub glu_alta: f64,
    pub parien_dm: f64,
    pub edad: f64,
    pub mets: f64,
    pub sedentarismo: f64,
    pub talla: f64,
    pub peso: f64,
    pub imc: f64,
    pub mme: f64,
}

impl FeatureVector {
    /// Builds a vector from raw named form values. Every field in
    /// [`FEATURE_NAMES`] must be present and parse to a finite number.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let mut values = [0f64; FEATURE_COUNT];
        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            let raw = form
                .get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .ok_or(ValidationError::MissingField(name))?;
            let parsed: f64 = raw.parse().map_err(|_| ValidationError::NotNumeric {
                field: name,
                value: raw.to_string(),
            })?;
            if !parsed.is_finite() {
                return Err(ValidationError::NotNumeric {
                    field: name,
                    value: raw.to_string(),
                });
            }
            *slot = parsed;
        }
        Ok(Self::from_array(values))
    }

    fn from_array(v: [f64; FEATURE_COUNT]) -> Self {
        Self {
            ex_fum: v[0],
            consum_alcoh: v[1],
            consum_alcoh_30: v[2],
            niveldeactividadesemanal: v[3],
            act_fis_frisk: v[4],
            diet_frisk: v[5],
            med_hta_fr: v[6],
            glu_alta: v[7],
            parien_dm: v[8],
            edad: v[9],
            mets: v[10],
            sedentarismo: v[11],
            talla: v[12],
            peso: v[13],
            imc: v[14],
            mme: v[15],
        }
    }

    /// The vector in training order, ready to feed the classifier.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.ex_fum,
            self.consum_alcoh,
            self.consum_alcoh_30,
            self.niveldeactividadesemanal,
            self.act_fis_frisk,
            self.diet_frisk,
            self.med_hta_fr,
            self.glu_alta,
            self.parien_dm,
            self.edad,
            self.mets,
            self.sedentarismo,
            self.talla,
            self.peso,
            self.imc,
            self.mme,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> HashMap<String, String> {
        FEATURE_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), format!("{}", i + 1)))
            .collect()
    }

    #[test]
    fn accepts_complete_numeric_form() {
        let vector = FeatureVector::from_form(&full_form()).unwrap();
        let expected: Vec<f64> = (1..=FEATURE_COUNT).map(|i| i as f64).collect();
        assert_eq!(vector.to_array().to_vec(), expected);
        assert_eq!(vector.edad, 10.0);
        assert_eq!(vector.peso, 14.0);
        assert_eq!(vector.imc, 15.0);
    }

    #[test]
    fn rejects_missing_field() {
        let mut form = full_form();
        form.remove("glu_alta");
        assert_eq!(
            FeatureVector::from_form(&form),
            Err(ValidationError::MissingField("glu_alta"))
        );
    }

    #[test]
    fn rejects_blank_field_as_missing() {
        let mut form = full_form();
        form.insert("edad".to_string(), "   ".to_string());
        assert_eq!(
            FeatureVector::from_form(&form),
            Err(ValidationError::MissingField("edad"))
        );
    }

    #[test]
    fn rejects_non_numeric_field() {
        let mut form = full_form();
        form.insert("imc".to_string(), "heavy".to_string());
        assert!(matches!(
            FeatureVector::from_form(&form),
            Err(ValidationError::NotNumeric { field: "imc", .. })
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        for bad in ["NaN", "inf", "-inf"] {
            let mut form = full_form();
            form.insert("mets".to_string(), bad.to_string());
            assert!(
                matches!(
                    FeatureVector::from_form(&form),
                    Err(ValidationError::NotNumeric { field: "mets", .. })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let mut form = full_form();
        form.insert("peso".to_string(), " 82.5 ".to_string());
        let vector = FeatureVector::from_form(&form).unwrap();
        assert_eq!(vector.peso, 82.5);
    }
}
