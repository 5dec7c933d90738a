use crate::action::{
    ActionOutcome, ActionRequest, FieldRule, RemoteActionRunner, SuccessSentinel, UploadRequest,
};
use crate::analytics::{AnalyticsEvent, EmitPolicy};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{ApiClient, FilePart, HttpMethod, ReqParam};
use crate::journal::api;
use crate::journal::model::{Contact, Credentials, NewUser, PasswordChange, Profile};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

/// Typed bindings for the journal backend, one method per user action.
#[derive(Clone)]
pub struct JournalClient {
    runner: RemoteActionRunner,
}

impl JournalClient {
    pub fn new(runner: RemoteActionRunner) -> Self {
        Self { runner }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::new(RemoteActionRunner::new(ApiClient::new(config)?)))
    }

    pub fn runner(&self) -> &RemoteActionRunner {
        &self.runner
    }

    pub async fn login(&self, username: &str, password: &str) -> ActionOutcome {
        let fields = HashMap::from([
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ]);
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let payload = match to_payload(&credentials) {
            Ok(payload) => payload,
            Err(outcome) => return outcome,
        };
        let request = ActionRequest::builder()
            .method(HttpMethod::POST)
            .endpoint(api::LOGIN)
            .payload(payload)
            .action("Your login")
            .success_sentinel(SuccessSentinel::new("status", api::LOGIN_OK))
            .failure_message(api::INVALID_LOGIN)
            .analytics(AnalyticsEvent::new("login", "Authentication", "Login"))
            .emit_policy(EmitPolicy::OnSuccess)
            .build();
        self.runner.submit(&fields, &login_rules(), request).await
    }

    /// Signs up and, when the backend accepts the account, logs straight in
    /// with the same credentials.
    pub async fn create_account(&self, user: &NewUser) -> ActionOutcome {
        let payload = match to_payload(user) {
            Ok(payload) => payload,
            Err(outcome) => return outcome,
        };
        let request = ActionRequest::builder()
            .method(HttpMethod::POST)
            .endpoint(api::SIGNUP)
            .payload(payload)
            .failure_message(api::SIGNUP_FAILED)
            .analytics(AnalyticsEvent::new("sign_up", "Account", "Signup"))
            .emit_policy(EmitPolicy::OnSuccess)
            .build();
        let outcome = self.runner.execute(request).await;
        if !outcome.is_success() {
            return outcome;
        }
        info!("account {} created, logging in", user.username);
        let credentials = user.credentials();
        self.login(&credentials.username, &credentials.password).await
    }

    pub async fn get_contact(&self, username: &str) -> ActionOutcome {
        self.get_by(api::CONTACT_BY_ID, "id", username).await
    }

    pub async fn update_contact(&self, contact: &Contact) -> ActionOutcome {
        let payload = match to_payload(contact) {
            Ok(payload) => payload,
            Err(outcome) => return outcome,
        };
        let request = ActionRequest::builder()
            .method(HttpMethod::PUT)
            .endpoint(api::CONTACT)
            .payload(payload)
            .action("Contact")
            .analytics(AnalyticsEvent::new("contact", "Preferences", "Contact"))
            .build();
        self.runner.execute(request).await
    }

    pub async fn get_account(&self, username: &str) -> ActionOutcome {
        self.get_by(api::ACCOUNT_BY_ID, "id", username).await
    }

    pub async fn change_password(&self, current: &str, new_password: &str) -> ActionOutcome {
        let change = PasswordChange {
            pass_current: current.to_string(),
            pass_new: new_password.to_string(),
        };
        let payload = match to_payload(&change) {
            Ok(payload) => payload,
            Err(outcome) => return outcome,
        };
        let request = ActionRequest::builder()
            .method(HttpMethod::POST)
            .endpoint(api::ACCOUNT_PASSWORD)
            .payload(payload)
            .analytics(AnalyticsEvent::new(
                "password_reset",
                "Authentication",
                "PasswordReset",
            ))
            .build();
        self.runner.execute(request).await
    }

    pub async fn delete_account(&self) -> ActionOutcome {
        let request = ActionRequest::builder()
            .method(HttpMethod::DELETE)
            .endpoint(api::ACCOUNT)
            .analytics(AnalyticsEvent::new(
                "account_delete",
                "Preferences",
                "AccountDelete",
            ))
            .build();
        self.runner.execute(request).await
    }

    pub async fn get_biography(&self, username: &str) -> ActionOutcome {
        self.get_by(api::BIOGRAPHY_BY_ID, "id", username).await
    }

    pub async fn save_biography(&self, biography: &str) -> ActionOutcome {
        let request = ActionRequest::builder()
            .method(HttpMethod::POST)
            .endpoint(api::BIOGRAPHY)
            .payload(serde_json::json!({ "bio": biography }))
            .analytics(AnalyticsEvent::new(
                "biography_upload",
                "Preferences",
                "BiographyUpdate",
            ))
            .emit_policy(EmitPolicy::OnSuccess)
            .build();
        self.runner.execute(request).await
    }

    pub async fn get_journal(&self, username: &str) -> ActionOutcome {
        self.get_by(api::JOURNAL_BY_ID, "id", username).await
    }

    pub async fn journals_by_user(&self, username: &str) -> ActionOutcome {
        self.get_by(api::JOURNALS_BY_USER, "user", username).await
    }

    /// Saves journal settings. A selected `style` object has its id copied
    /// into `styleId`, which is the field the backend reads.
    pub async fn save_journal(&self, mut journal: Value) -> ActionOutcome {
        if let Some(style_id) = journal.pointer("/style/id").cloned() {
            if let Some(settings) = journal.as_object_mut() {
                settings.insert("styleId".to_string(), style_id);
            }
        }
        let request = ActionRequest::builder()
            .method(HttpMethod::POST)
            .endpoint(api::JOURNAL)
            .payload(journal)
            .analytics(AnalyticsEvent::new("journal", "Preferences", "Journal"))
            .build();
        self.runner.execute(request).await
    }

    pub async fn get_statistics(&self, username: &str) -> ActionOutcome {
        self.get_by(api::STATISTICS_BY_ID, "id", username).await
    }

    pub async fn list_friends(&self, username: &str) -> ActionOutcome {
        self.get_by(api::FRIENDS_BY_ID, "id", username).await
    }

    /// Issues all profile lookups at once; parts fail independently.
    pub async fn load_profile(&self, username: &str) -> Profile {
        let (account, journals, statistics, friends, biography, contact) = futures::join!(
            self.get_account(username),
            self.journals_by_user(username),
            self.get_statistics(username),
            self.list_friends(username),
            self.get_biography(username),
            self.get_contact(username),
        );
        Profile {
            account,
            journals,
            statistics,
            friends,
            biography,
            contact,
        }
    }

    pub async fn upload_avatar<F>(&self, file: FilePart, observer: F) -> ActionOutcome
    where
        F: FnMut(u8),
    {
        let request = UploadRequest::builder()
            .endpoint(api::AVATAR)
            .file(file)
            .analytics(AnalyticsEvent::new(
                "avatar_upload",
                "Preferences",
                "AvatarUpload",
            ))
            .build();
        self.runner.upload(request, observer).await
    }

    pub async fn upload_album_image<F>(&self, title: &str, file: FilePart, observer: F) -> ActionOutcome
    where
        F: FnMut(u8),
    {
        let request = UploadRequest::builder()
            .endpoint(api::ALBUM_IMAGE)
            .fields(vec![ReqParam::new("title", title)])
            .file(file)
            .analytics(AnalyticsEvent::new(
                "image_upload",
                "Preferences",
                "ImageUpload",
            ))
            .build();
        self.runner.upload(request, observer).await
    }

    async fn get_by(&self, endpoint: &str, key: &str, value: &str) -> ActionOutcome {
        let request = ActionRequest::builder()
            .method(HttpMethod::GET)
            .endpoint(endpoint)
            .path_params(vec![ReqParam::new(key, value)])
            .build();
        self.runner.execute(request).await
    }
}

fn login_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::min_length("username", 3),
        FieldRule::min_length("password", 5),
    ]
}

fn to_payload<T: Serialize>(value: &T) -> Result<Value, ActionOutcome> {
    serde_json::to_value(value).map_err(|err| ActionOutcome::ValidationFailure {
        message: format!("Invalid form data: {}", err),
    })
}
