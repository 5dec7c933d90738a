use crate::action::ActionOutcome;
use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Signup form. Fields the backend accepts beyond the required ones travel
/// in `extra`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Builder)]
pub struct NewUser {
    #[builder(into)]
    pub username: String,
    #[builder(into)]
    pub password: String,
    #[builder(into)]
    pub email: String,
    #[serde(flatten)]
    #[builder(default)]
    pub extra: Map<String, Value>,
}

impl NewUser {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Builder)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[builder(into)]
    pub email: Option<String>,
    #[builder(into)]
    pub phone: Option<String>,
    #[builder(into)]
    pub hp_title: Option<String>,
    #[builder(into)]
    pub hp_uri: Option<String>,
    #[builder(into)]
    pub x: Option<String>,
    #[builder(into)]
    pub instagram: Option<String>,
    #[builder(into)]
    pub facebook: Option<String>,
    #[builder(into)]
    pub telegram: Option<String>,
    #[builder(into)]
    pub linkedin: Option<String>,
    #[builder(into)]
    pub reddit: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub pass_current: String,
    pub pass_new: String,
}

/// Everything shown on a user's profile page, one outcome per backend call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub account: ActionOutcome,
    pub journals: ActionOutcome,
    pub statistics: ActionOutcome,
    pub friends: ActionOutcome,
    pub biography: ActionOutcome,
    pub contact: ActionOutcome,
}
