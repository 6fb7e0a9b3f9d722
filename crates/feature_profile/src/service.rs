use crate::actions;
use crate::registration_flow::RegistrationFlow;
use crate::state::ProfileState;
use api_gateway::{ApiClient, ApiError};
use app_protocol::{Dispatch, ProfilePatch, PROFILES};
use common::{Navigator, TokenProvider};
use feature_notification::show_notification;
use serde_json::Value;
use std::sync::Arc;

const UPDATED: &str = "Your profile has been updated.";
const UNAUTHORIZED: &str = "This action is unauthorized. Please make sure you are logged in.";
const UPDATE_FAILED: &str = "There was an error updating your profile.";
const LOAD_FAILED: &str = "There was an error loading your profile.";

/// What the profile operations need from the store: a way in and a view of the slice.
pub trait ProfileStore: Dispatch {
    fn profile(&self) -> Arc<ProfileState>;
}

/// Success bodies are taken as they come: fields that do not fit the typed patch are
/// logged and skipped instead of failing a request the server already committed.
fn lenient_patch(body: Value) -> ProfilePatch {
    if !body.is_object() {
        log::warn!("Ignoring non-object profile response: {}", body);
    }
    let (patch, dropped) = ProfilePatch::from_value_lossy(body);
    for key in dropped {
        log::warn!("Ignoring profile field '{}' with unexpected shape", key);
    }
    patch
}

fn failure_message(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Unauthorized => UNAUTHORIZED.to_string(),
        ApiError::Api { detail, .. } => format!("There was an error: {}", detail),
        _ => fallback.to_string(),
    }
}

pub struct ProfileService {
    client: ApiClient,
    tokens: Arc<dyn TokenProvider>,
    navigator: Arc<dyn Navigator>,
    flow: RegistrationFlow,
}

impl ProfileService {
    pub fn new(
        client: ApiClient,
        tokens: Arc<dyn TokenProvider>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            client,
            tokens,
            navigator,
            flow: RegistrationFlow::default(),
        }
    }

    pub fn with_flow(mut self, flow: RegistrationFlow) -> Self {
        self.flow = flow;
        self
    }

    fn token(&self) -> Option<String> {
        self.tokens.api_token().filter(|t| !t.is_empty())
    }

    /// Pushes the current profile to the server. Failures end up in the store as a
    /// notification plus `PutError`; nothing is returned to the caller.
    pub async fn update<S>(&self, store: &S)
    where
        S: ProfileStore + ?Sized,
    {
        store.dispatch(actions::put_request());
        let profile = store.profile();
        let token = self.token();

        let result = match profile.id {
            Some(id) => {
                let url = self.client.resource_url(PROFILES, Some(id));
                self.client
                    .put_json::<_, Value>(&url, &profile.outgoing(), token.as_deref())
                    .await
            }
            None => Err(ApiError::InvalidRequest("profile has no id".to_string())),
        };

        match result {
            Ok(body) => {
                let data = lenient_patch(body);
                let page = data.page().map(str::to_string);
                store.dispatch(actions::put_success(data));
                if let Some(page) = page {
                    match self.flow.next(&page) {
                        Some(next) => self.navigator.navigate(next),
                        None => log::warn!("No registration step registered for page '{}'", page),
                    }
                }
                store.dispatch(show_notification(UPDATED));
            }
            Err(err) => {
                log::error!("Profile update failed: {}", err);
                store.dispatch(show_notification(failure_message(&err, UPDATE_FAILED)));
                store.dispatch(actions::put_error(err.to_info()));
            }
        }
    }

    /// Loads profile `id` into the slice.
    pub async fn fetch<S>(&self, store: &S, id: i64)
    where
        S: ProfileStore + ?Sized,
    {
        store.dispatch(actions::get_request());
        let url = self.client.resource_url(PROFILES, Some(id));
        let token = self.token();

        match self.client.get_json::<Value>(&url, token.as_deref()).await {
            Ok(body) => store.dispatch(actions::get_success(lenient_patch(body))),
            Err(err) => {
                log::error!("Profile fetch failed: {}", err);
                store.dispatch(show_notification(failure_message(&err, LOAD_FAILED)));
                store.dispatch(actions::get_error(err.to_info()));
            }
        }
    }
}
