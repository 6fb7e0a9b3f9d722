use app_protocol::{ErrorInfo, ProfilePatch, Topic};
use serde::{Deserialize, Serialize};

/// Snapshot of the profile slice. Flag names follow the server record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProfileState {
    #[serde(rename = "isInitialized")]
    pub is_initialized: bool,
    #[serde(rename = "isLoading")]
    pub is_loading: bool,
    #[serde(rename = "isRequesting")]
    pub is_requesting: bool,
    pub woman: bool,
    pub poc: bool,
    pub lgbtqa: Option<bool>,
    pub pronouns: String,
    pub location: i64,
    pub error: Option<ErrorInfo>,
    pub topics: Vec<Topic>,
    pub id: Option<i64>,
    pub current_page: Option<String>,
    pub page: Option<String>,
}

pub fn initial_state() -> ProfileState {
    ProfileState {
        is_initialized: false,
        is_loading: false,
        is_requesting: false,
        woman: true,
        poc: true,
        lgbtqa: None,
        pronouns: "they".to_string(),
        location: 1,
        error: None,
        topics: Vec::new(),
        id: None,
        current_page: None,
        page: None,
    }
}

impl Default for ProfileState {
    fn default() -> Self {
        initial_state()
    }
}

impl ProfileState {
    /// Applies only the values the patch actually carries; nulls leave the field alone.
    pub fn merge_present(&mut self, patch: &ProfilePatch) {
        self.merge_required(patch);
        if let Some(Some(v)) = patch.lgbtqa {
            self.lgbtqa = Some(v);
        }
        if let Some(Some(v)) = patch.id {
            self.id = Some(v);
        }
        if let Some(Some(v)) = &patch.current_page {
            self.current_page = Some(v.clone());
        }
        if let Some(Some(v)) = &patch.page {
            self.page = Some(v.clone());
        }
    }

    /// Applies every key the patch carries, explicit nulls included.
    pub fn merge_all(&mut self, patch: &ProfilePatch) {
        self.merge_required(patch);
        if let Some(v) = patch.lgbtqa {
            self.lgbtqa = v;
        }
        if let Some(v) = patch.id {
            self.id = v;
        }
        if let Some(v) = &patch.current_page {
            self.current_page = v.clone();
        }
        if let Some(v) = &patch.page {
            self.page = v.clone();
        }
    }

    fn merge_required(&mut self, patch: &ProfilePatch) {
        if let Some(v) = patch.woman {
            self.woman = v;
        }
        if let Some(v) = patch.poc {
            self.poc = v;
        }
        if let Some(v) = &patch.pronouns {
            self.pronouns = v.clone();
        }
        if let Some(v) = patch.location {
            self.location = v;
        }
        if let Some(v) = &patch.topics {
            self.topics = v.clone();
        }
    }

    /// The record sent on update: the whole profile with `page` taken from `current_page`.
    pub fn outgoing(&self) -> ProfileState {
        ProfileState {
            page: self.current_page.clone(),
            ..self.clone()
        }
    }
}
