//! Diet form domain: the validated `DietInput` record, its validator, backend
//! URL resolution and the `DietPlanClient` trait that receives valid records.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod retry;
pub mod validation;

pub use validation::{
    ErrorKind, Field, FieldError, RawDietInput, RawValue, ValidationErrors, validate,
};

#[derive(Debug, Error)]
pub enum DietError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("backend rejected the request: {0}")]
    Rejected(String),
    #[error("backend returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Response body of the diet backend. Its shape belongs to the backend, so it
/// is passed through untouched.
pub type DietPlan = serde_json::Value;

/// Returned by `FromStr` on the closed enumerations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $wire:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Value sent to and accepted from the wire.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Label shown to the user.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    Sex, "sex" {
        Male => "masculino", "Masculino";
        Female => "feminino", "Feminino";
    }
}

wire_enum! {
    /// How often the person trains.
    ActivityLevel, "activity level" {
        Sedentary => "sedentario", "Sedentário";
        TwiceWeekly => "2X_semana", "2X por semana";
        FourTimesWeekly => "4X_semana", "4X por semana";
    }
}

wire_enum! {
    Goal, "goal" {
        WeightLoss => "perda_de_peso", "Perda de Peso";
        Hypertrophy => "hipertrofia", "Hipertrofia";
        MuscleGain => "ganhar_musculo", "Ganhar Musculo";
        MaintainMuscleMass => "manter_massa_muscular", "Manter Massa Muscular";
    }
}

/// A form submission in the shape the backend expects.
///
/// Build one from user input with [`validate`]. Deserializing skips the field
/// checks and is only meant for payloads that already passed them, such as a
/// `/validate` response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct DietInput {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "idade")]
    pub age: u32,
    #[serde(rename = "altura_cm")]
    pub height_cm: f64,
    #[serde(rename = "peso_kg")]
    pub weight_kg: f64,
    #[serde(rename = "sexo")]
    pub sex: Sex,
    #[serde(rename = "nivel_atividade")]
    pub activity_level: ActivityLevel,
    #[serde(rename = "objetivo")]
    pub goal: Goal,
}

/// Receives validated records. This is the only way a `DietInput` leaves the
/// form boundary.
#[async_trait]
pub trait DietPlanClient: Send + Sync + 'static {
    async fn submit_diet(&self, input: &DietInput) -> Result<DietPlan, DietError>;
}

/// Validate `raw` and hand the result to `client` only when every field passed.
pub async fn submit_form<C>(client: &C, raw: &RawDietInput) -> Result<DietPlan, DietError>
where
    C: DietPlanClient + ?Sized,
{
    let input = validate(raw)?;
    tracing::debug!(age = input.age, goal = %input.goal, "form valid; submitting");
    client.submit_diet(&input).await
}
