//! The four-step nutrient recommendation form.

use nutriform_types::{DefinitionError, FieldKind, FormDefinition, FormField, Step};

/// Gender value that reveals the pregnancy/lactation field.
pub const PREGNANCY_ELIGIBLE_GENDER: &str = "Female";

/// Neutral pregnancy/lactation value written whenever the field is hidden.
pub const NO_PREGNANCY: &str = "None";

/// Tag tokens offered for the health condition field.
pub const HEALTH_CONDITION_TAGS: [&str; 6] = [
    "Diabetes",
    "Hypertension",
    "Celiac Disease",
    "Lactose Intolerance",
    "Anemia",
    "Osteoporosis",
];

/// Build the nutrient form definition.
pub fn nutrient_form() -> Result<FormDefinition, DefinitionError> {
    let steps = vec![
        Step::new(
            "Personal details",
            vec![
                FormField::new("age", "Age", FieldKind::Text).required(),
                FormField::new("gender", "Gender", FieldKind::cards(["Male", "Female", "Other"]))
                    .required(),
            ],
        ),
        Step::new(
            "Body metrics",
            vec![
                FormField::new("height", "Height (cm)", FieldKind::Text).required(),
                FormField::new("weight", "Weight (kg)", FieldKind::Text).required(),
                FormField::new(
                    "activity_level",
                    "Activity level",
                    FieldKind::dropdown(
                        "Select activity level",
                        ["Sedentary", "Light", "Moderate", "Active", "Very Active"],
                    ),
                )
                .required(),
            ],
        ),
        Step::new(
            "Health",
            vec![
                FormField::new(
                    "pregnancy_or_lactation",
                    "Pregnancy or lactation",
                    FieldKind::dropdown("Select status", [NO_PREGNANCY, "Pregnant", "Lactating"]),
                )
                .visible_when("gender", PREGNANCY_ELIGIBLE_GENDER)
                .with_default(NO_PREGNANCY),
                FormField::new(
                    "health_condition",
                    "Health conditions",
                    FieldKind::tags(HEALTH_CONDITION_TAGS),
                ),
            ],
        ),
        Step::new(
            "Dietary preferences",
            vec![
                FormField::new(
                    "dietary_preferences",
                    "Dietary preference",
                    FieldKind::cards(["Veg", "Vegan", "Non-Veg"]),
                )
                .required(),
            ],
        ),
    ];

    Ok(FormDefinition::new(steps)?
        .with_prelude("Tell us about yourself to get personalised nutrient recommendations."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriform_types::{FieldName, RecommendationRequest};

    #[test]
    fn covers_every_request_field() {
        let form = nutrient_form().unwrap();
        let json = serde_json::to_value(RecommendationRequest::default()).unwrap();
        for key in json.as_object().unwrap().keys() {
            assert!(
                form.field(&FieldName::new(key.as_str())).is_some(),
                "missing field {key}"
            );
        }
        assert_eq!(form.total_steps(), 4);
    }

    #[test]
    fn pregnancy_is_gated_on_gender() {
        let form = nutrient_form().unwrap();
        let gender = FieldName::new("gender");
        let dependents: Vec<_> = form
            .dependents(&gender)
            .map(|f| f.name().as_str())
            .collect();
        assert_eq!(dependents, vec!["pregnancy_or_lactation"]);
    }
}
