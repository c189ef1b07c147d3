//! Output schemas handed to the structured-decode capability. They are derived
//! from the Rust contracts and closed so the model cannot add or omit fields.

use schemars::{schema_for, JsonSchema};
use serde_json::{json, Value};

use crate::models::domain::{
    question::{FillInTheBlankQuestion, MatchingQuestion, MultipleChoiceQuestion, SingleChoiceQuestion},
    AnalysisOutput, QuestionType,
};

pub fn strict_schema_for<T: JsonSchema>() -> Value {
    let mut schema = schema_for!(T).to_value();
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
    }
    close_objects(&mut schema);
    schema
}

/// Every object schema gets `additionalProperties: false` and lists all of its
/// properties as required.
fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let property_names: Option<Vec<Value>> = match map.get("properties") {
                Some(Value::Object(properties)) => {
                    Some(properties.keys().cloned().map(Value::String).collect())
                }
                _ => None,
            };
            if let Some(names) = property_names {
                map.insert("required".to_string(), Value::Array(names));
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            for child in map.values_mut() {
                close_objects(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(close_objects),
        _ => {}
    }
}

pub fn analysis_schema() -> Value {
    strict_schema_for::<AnalysisOutput>()
}

pub fn question_set_schema_name(question_type: QuestionType) -> String {
    format!("question_set_{}", question_type.as_str().replace('-', "_"))
}

/// `{ "questions": [...] }` admitting only the requested question variant.
pub fn question_set_schema(question_type: QuestionType) -> Value {
    let mut item = match question_type {
        QuestionType::FillInTheBlank => strict_schema_for::<FillInTheBlankQuestion>(),
        QuestionType::SingleChoice => strict_schema_for::<SingleChoiceQuestion>(),
        QuestionType::MultipleChoice => strict_schema_for::<MultipleChoiceQuestion>(),
        QuestionType::Matching => strict_schema_for::<MatchingQuestion>(),
    };

    let mut definitions = None;
    if let Some(object) = item.as_object_mut() {
        definitions = object.remove("$defs");
        object.remove("title");
        if let Some(Value::Object(properties)) = object.get_mut("properties") {
            properties.insert(
                "type".to_string(),
                json!({
                    "type": "string",
                    "enum": [question_type.as_str()],
                    "description": "The type of the question."
                }),
            );
        }
        if let Some(Value::Array(required)) = object.get_mut("required") {
            required.insert(0, json!("type"));
        }
    }

    let mut schema = json!({
        "type": "object",
        "properties": {
            "questions": {
                "type": "array",
                "description": "An array of generated test questions.",
                "items": item
            }
        },
        "required": ["questions"],
        "additionalProperties": false
    });
    if let Some(definitions) = definitions {
        schema["$defs"] = definitions;
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_closed(value: &Value) {
        match value {
            Value::Object(map) => {
                if let Some(Value::Object(properties)) = map.get("properties") {
                    assert_eq!(map.get("additionalProperties"), Some(&Value::Bool(false)));
                    let required = map["required"].as_array().expect("required list");
                    assert_eq!(required.len(), properties.len());
                }
                map.values().for_each(assert_closed);
            }
            Value::Array(items) => items.iter().for_each(assert_closed),
            _ => {}
        }
    }

    #[test]
    fn analysis_schema_requires_all_fields() {
        let schema = analysis_schema();
        let properties = schema["properties"].as_object().expect("properties");

        assert!(properties.contains_key("keyConcepts"));
        assert!(properties.contains_key("themes"));
        assert!(properties.contains_key("summary"));
        assert!(schema.get("$schema").is_none());
        assert_closed(&schema);
    }

    #[test]
    fn question_set_schema_admits_only_requested_type() {
        for question_type in QuestionType::ALL {
            let schema = question_set_schema(question_type);
            let item = &schema["properties"]["questions"]["items"];

            assert_eq!(item["properties"]["type"]["enum"], json!([question_type.as_str()]));
            assert_eq!(item["required"][0], "type");
            assert_closed(&schema);
        }
    }

    #[test]
    fn schema_differs_per_question_type() {
        let single = question_set_schema(QuestionType::SingleChoice);
        let matching = question_set_schema(QuestionType::Matching);

        assert_ne!(single, matching);
        let matching_item = &matching["properties"]["questions"]["items"]["properties"];
        assert!(matching_item.get("correctMatches").is_some());
        assert!(matching_item.get("correctAnswer").is_none());
    }

    #[test]
    fn schema_name_is_identifier_safe() {
        assert_eq!(
            question_set_schema_name(QuestionType::FillInTheBlank),
            "question_set_fill_in_the_blank"
        );
    }
}
