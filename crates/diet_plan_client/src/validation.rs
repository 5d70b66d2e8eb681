//! Field-level validation of raw form values into a [`DietInput`].
//!
//! Every field is checked on its own and every violation is reported, so a
//! caller can show all messages at once. Two kinds of error exist:
//! [`ErrorKind::Required`] when the field is absent or empty, and
//! [`ErrorKind::Invalid`] when a value is present but unusable.

use crate::{ActivityLevel, DietInput, Goal, Sex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single unvalidated value as it arrives from a form or JSON body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    /// Booleans, arrays, objects: never valid for any field.
    Other(serde_json::Value),
}

impl RawValue {
    /// Empty text counts as absent. Only the name keeps whitespace, since its
    /// length rule counts every character.
    fn is_absent_for(&self, field: Field) -> bool {
        match self {
            RawValue::Text(s) if field == Field::Name => s.is_empty(),
            RawValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// Unvalidated form input, keyed by the same wire names as [`DietInput`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDietInput {
    #[serde(rename = "nome", default)]
    pub name: Option<RawValue>,
    #[serde(rename = "idade", default)]
    pub age: Option<RawValue>,
    #[serde(rename = "altura_cm", default)]
    pub height_cm: Option<RawValue>,
    #[serde(rename = "peso_kg", default)]
    pub weight_kg: Option<RawValue>,
    #[serde(rename = "sexo", default)]
    pub sex: Option<RawValue>,
    #[serde(rename = "nivel_atividade", default)]
    pub activity_level: Option<RawValue>,
    #[serde(rename = "objetivo", default)]
    pub goal: Option<RawValue>,
}

impl From<&DietInput> for RawDietInput {
    fn from(input: &DietInput) -> Self {
        Self {
            name: Some(RawValue::Text(input.name.clone())),
            age: Some(RawValue::Number(f64::from(input.age))),
            height_cm: Some(RawValue::Number(input.height_cm)),
            weight_kg: Some(RawValue::Number(input.weight_kg)),
            sex: Some(input.sex.as_str().into()),
            activity_level: Some(input.activity_level.as_str().into()),
            goal: Some(input.goal.as_str().into()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "nome")]
    Name,
    #[serde(rename = "idade")]
    Age,
    #[serde(rename = "altura_cm")]
    HeightCm,
    #[serde(rename = "peso_kg")]
    WeightKg,
    #[serde(rename = "sexo")]
    Sex,
    #[serde(rename = "nivel_atividade")]
    ActivityLevel,
    #[serde(rename = "objetivo")]
    Goal,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Name,
        Field::Age,
        Field::HeightCm,
        Field::WeightKg,
        Field::Sex,
        Field::ActivityLevel,
        Field::Goal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "nome",
            Field::Age => "idade",
            Field::HeightCm => "altura_cm",
            Field::WeightKg => "peso_kg",
            Field::Sex => "sexo",
            Field::ActivityLevel => "nivel_atividade",
            Field::Goal => "objetivo",
        }
    }

    /// Message shown for an error of `kind` on this field.
    pub fn message(self, kind: ErrorKind) -> &'static str {
        match (self, kind) {
            (Field::Name, ErrorKind::Required) => "O nome é obrigatório",
            (Field::Name, ErrorKind::Invalid) => "O nome deve ter pelo menos 2 caracteres",
            (Field::Age, ErrorKind::Required) => "Preencha sua idade",
            (Field::Age, ErrorKind::Invalid) => "A idade deve ser um número inteiro positivo",
            (Field::HeightCm, ErrorKind::Required) => "Preencha sua altura",
            (Field::HeightCm, ErrorKind::Invalid) => "A altura deve ser um número positivo",
            (Field::WeightKg, ErrorKind::Required) => "Preencha seu peso",
            (Field::WeightKg, ErrorKind::Invalid) => "O peso deve ser um número positivo",
            (Field::Sex, ErrorKind::Required) => "Selecione seu sexo",
            (Field::Sex, ErrorKind::Invalid) => "Sexo inválido",
            (Field::ActivityLevel, ErrorKind::Required) => "Selecione seu nível de atividade",
            (Field::ActivityLevel, ErrorKind::Invalid) => "Nível de atividade inválido",
            (Field::Goal, ErrorKind::Required) => "Selecione seu objetivo",
            (Field::Goal, ErrorKind::Invalid) => "Objetivo inválido",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Required,
    Invalid,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, kind: ErrorKind) -> Self {
        Self {
            kind,
            message: field.message(kind).to_string(),
        }
    }
}

/// Per-field errors, ordered by field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, FieldError>);

impl ValidationErrors {
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn kind(&self, field: Field) -> Option<ErrorKind> {
        self.get(field).map(|e| e.kind)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.0.iter().map(|(f, e)| (*f, e))
    }

    fn insert(&mut self, field: Field, kind: ErrorKind) {
        self.0.insert(field, FieldError::new(field, kind));
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, err) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a raw submission.
///
/// Empty text counts as absent, and so does whitespace-only text for every
/// field but the name. Numeric text is coerced; numbers are taken as they
/// are. The returned record keeps the name exactly as submitted.
pub fn validate(raw: &RawDietInput) -> Result<DietInput, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = check(&mut errors, Field::Name, raw.name.as_ref(), person_name);
    let age = check(&mut errors, Field::Age, raw.age.as_ref(), positive_integer);
    let height_cm = check(&mut errors, Field::HeightCm, raw.height_cm.as_ref(), positive);
    let weight_kg = check(&mut errors, Field::WeightKg, raw.weight_kg.as_ref(), positive);
    let sex = check(&mut errors, Field::Sex, raw.sex.as_ref(), one_of::<Sex>);
    let activity_level = check(
        &mut errors,
        Field::ActivityLevel,
        raw.activity_level.as_ref(),
        one_of::<ActivityLevel>,
    );
    let goal = check(&mut errors, Field::Goal, raw.goal.as_ref(), one_of::<Goal>);

    match (name, age, height_cm, weight_kg, sex, activity_level, goal) {
        (
            Some(name),
            Some(age),
            Some(height_cm),
            Some(weight_kg),
            Some(sex),
            Some(activity_level),
            Some(goal),
        ) if errors.is_empty() => Ok(DietInput {
            name,
            age,
            height_cm,
            weight_kg,
            sex,
            activity_level,
            goal,
        }),
        _ => Err(errors),
    }
}

/// Run `parse` on a present value and record the outcome.
fn check<T>(
    errors: &mut ValidationErrors,
    field: Field,
    value: Option<&RawValue>,
    parse: fn(&RawValue) -> Option<T>,
) -> Option<T> {
    let value = match value {
        Some(v) if !v.is_absent_for(field) => v,
        _ => {
            errors.insert(field, ErrorKind::Required);
            return None;
        }
    };
    let parsed = parse(value);
    if parsed.is_none() {
        errors.insert(field, ErrorKind::Invalid);
    }
    parsed
}

fn person_name(value: &RawValue) -> Option<String> {
    match value {
        RawValue::Text(s) if s.chars().count() >= 2 => Some(s.clone()),
        _ => None,
    }
}

fn number(value: &RawValue) -> Option<f64> {
    let n = match value {
        RawValue::Number(n) => *n,
        RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        RawValue::Other(_) => return None,
    };
    n.is_finite().then_some(n)
}

fn positive(value: &RawValue) -> Option<f64> {
    number(value).filter(|n| *n > 0.0)
}

fn positive_integer(value: &RawValue) -> Option<u32> {
    let n = positive(value)?;
    if n.fract() != 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    Some(n as u32)
}

fn one_of<T: FromStr>(value: &RawValue) -> Option<T> {
    match value {
        RawValue::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}
