use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

pub const PROFILES: &str = "profiles";
pub const NOTIFICATIONS: &str = "notifications";
pub const LOGOUT_SUCCESS: &str = "LOGOUT_SUCCESS";

// ==========================================
// Action Tags
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Put,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Request,
    Success,
    Error,
}

/// The `type` string an action carries on the store contract.
///
/// Tags are only ever derived from an [`Action`] variant, so creators and reducers
/// cannot drift apart on spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    Lifecycle { module: &'static str, verb: Verb, phase: Phase },
    Module { module: &'static str, tag: &'static str },
    Global(&'static str),
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Lifecycle { module, verb, phase } => {
                write!(f, "{}/{:?}{:?}", module, verb, phase)
            }
            ActionType::Module { module, tag } => write!(f, "{}/{}", module, tag),
            ActionType::Global(tag) => f.write_str(tag),
        }
    }
}

// ==========================================
// Profile Payloads
// ==========================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

/// Keeps `null` distinct from a missing key: missing is `None`, null is `Some(None)`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial profile record carried by `GetSuccess`, `PutSuccess` and `OnChange`.
///
/// Nullable profile fields are double options so an explicit `null` can be told apart
/// from an omitted key. For the non-nullable fields a `null` reads as omitted.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub woman: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poc: Option<bool>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub lgbtqa: Option<Option<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronouns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<Topic>>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub current_page: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub page: Option<Option<String>>,
}

impl ProfilePatch {
    /// The page the server reported, if it reported a non-null one.
    pub fn page(&self) -> Option<&str> {
        self.page.as_ref().and_then(|p| p.as_deref())
    }

    /// Builds a patch from an arbitrary JSON body. Keys whose value does not fit the typed
    /// field are left out and returned by name. A non-object body yields an empty patch.
    pub fn from_value_lossy(body: Value) -> (ProfilePatch, Vec<String>) {
        let fields = match body {
            Value::Object(fields) => fields,
            _ => return (ProfilePatch::default(), Vec::new()),
        };

        let mut kept = Map::new();
        let mut dropped = Vec::new();
        for (key, value) in fields {
            let mut single = Map::new();
            single.insert(key.clone(), value);
            match serde_json::from_value::<ProfilePatch>(Value::Object(single.clone())) {
                Ok(_) => kept.extend(single),
                Err(_) => dropped.push(key),
            }
        }

        let patch = serde_json::from_value(Value::Object(kept)).unwrap_or_default();
        (patch, dropped)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    Unauthorized,
    Api,
    Unknown,
}

/// Serializable record of a failed request, stored in `ProfileState::error`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub message: String,
    pub detail: Option<String>,
}

// ==========================================
// Notification Payloads
// ==========================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
}

// ==========================================
// Actions
// ==========================================

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileAction {
    GetRequest,
    GetSuccess(ProfilePatch),
    GetError(ErrorInfo),
    PutRequest,
    PutSuccess(ProfilePatch),
    PutError(ErrorInfo),
    OnChange(ProfilePatch),
}

impl ProfileAction {
    pub fn action_type(&self) -> ActionType {
        use ProfileAction::*;
        let lifecycle = |verb, phase| ActionType::Lifecycle { module: PROFILES, verb, phase };
        match self {
            GetRequest => lifecycle(Verb::Get, Phase::Request),
            GetSuccess(_) => lifecycle(Verb::Get, Phase::Success),
            GetError(_) => lifecycle(Verb::Get, Phase::Error),
            PutRequest => lifecycle(Verb::Put, Phase::Request),
            PutSuccess(_) => lifecycle(Verb::Put, Phase::Success),
            PutError(_) => lifecycle(Verb::Put, Phase::Error),
            OnChange(_) => ActionType::Module { module: PROFILES, tag: "OnChange" },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationAction {
    Show(Notification),
    Dismiss(Uuid),
}

impl NotificationAction {
    pub fn action_type(&self) -> ActionType {
        match self {
            NotificationAction::Show(_) => ActionType::Module {
                module: NOTIFICATIONS,
                tag: "Show",
            },
            NotificationAction::Dismiss(_) => ActionType::Module {
                module: NOTIFICATIONS,
                tag: "Dismiss",
            },
        }
    }
}

/// Everything that can be dispatched into the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Profile(ProfileAction),
    Notification(NotificationAction),
    LogoutSuccess,
}

impl Action {
    pub fn action_type(&self) -> ActionType {
        match self {
            Action::Profile(a) => a.action_type(),
            Action::Notification(a) => a.action_type(),
            Action::LogoutSuccess => ActionType::Global(LOGOUT_SUCCESS),
        }
    }

    /// Plain `{ type, data?, error? }` record, as seen by logs and devtools.
    pub fn to_record(&self) -> Value {
        let mut record = Map::new();
        record.insert("type".into(), Value::String(self.action_type().to_string()));

        let (data, error) = match self {
            Action::Profile(ProfileAction::GetSuccess(d))
            | Action::Profile(ProfileAction::PutSuccess(d))
            | Action::Profile(ProfileAction::OnChange(d)) => (serde_json::to_value(d).ok(), None),
            Action::Profile(ProfileAction::GetError(e))
            | Action::Profile(ProfileAction::PutError(e)) => (None, serde_json::to_value(e).ok()),
            Action::Notification(NotificationAction::Show(n)) => {
                (serde_json::to_value(n).ok(), None)
            }
            Action::Notification(NotificationAction::Dismiss(id)) => {
                (serde_json::to_value(id).ok(), None)
            }
            _ => (None, None),
        };
        if let Some(data) = data {
            record.insert("data".into(), data);
        }
        if let Some(error) = error {
            record.insert("error".into(), error);
        }
        Value::Object(record)
    }
}

impl From<ProfileAction> for Action {
    fn from(action: ProfileAction) -> Self {
        Action::Profile(action)
    }
}

impl From<NotificationAction> for Action {
    fn from(action: NotificationAction) -> Self {
        Action::Notification(action)
    }
}

/// The single write path into the store.
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, action: Action);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_type_tags() {
        let tag = |action: ProfileAction| Action::Profile(action).action_type().to_string();
        assert_eq!(tag(ProfileAction::GetRequest), "profiles/GetRequest");
        assert_eq!(tag(ProfileAction::PutSuccess(ProfilePatch::default())), "profiles/PutSuccess");
        assert_eq!(tag(ProfileAction::OnChange(ProfilePatch::default())), "profiles/OnChange");
        assert_eq!(Action::LogoutSuccess.action_type().to_string(), "LOGOUT_SUCCESS");
    }

    #[test]
    fn test_patch_keeps_null_apart_from_missing() {
        let patch: ProfilePatch = serde_json::from_value(json!({
            "lgbtqa": null,
            "pronouns": "she",
            "woman": null,
            "unknown_field": 3
        }))
        .unwrap();
        assert_eq!(patch.lgbtqa, Some(None));
        assert_eq!(patch.pronouns.as_deref(), Some("she"));
        assert_eq!(patch.woman, None);
        assert_eq!(patch.page, None);
    }

    #[test]
    fn test_lossy_patch_drops_mismatched_fields() {
        let (patch, dropped) = ProfilePatch::from_value_lossy(json!({
            "id": 5,
            "page": "step2",
            "lgbtqa": null,
            "location": { "id": 1, "name": "Toronto" },
            "topics": [1, 2],
            "extra": "ignored"
        }));
        assert_eq!(patch.id, Some(Some(5)));
        assert_eq!(patch.page(), Some("step2"));
        assert_eq!(patch.lgbtqa, Some(None));
        assert_eq!(patch.location, None);
        assert_eq!(patch.topics, None);

        let mut dropped = dropped;
        dropped.sort();
        assert_eq!(dropped, vec!["location".to_string(), "topics".to_string()]);

        let (patch, dropped) = ProfilePatch::from_value_lossy(json!("not an object"));
        assert_eq!(patch, ProfilePatch::default());
        assert!(dropped.is_empty());
    }

    #[test]
    fn test_record_shape() {
        let patch = ProfilePatch { pronouns: Some("she".into()), ..Default::default() };
        let record = Action::Profile(ProfileAction::OnChange(patch)).to_record();
        assert_eq!(record, json!({ "type": "profiles/OnChange", "data": { "pronouns": "she" } }));

        let record = Action::LogoutSuccess.to_record();
        assert_eq!(record, json!({ "type": "LOGOUT_SUCCESS" }));
    }
}
