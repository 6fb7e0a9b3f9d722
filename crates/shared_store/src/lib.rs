use app_protocol::{Action, Dispatch};
use feature_notification::NotificationState;
use feature_profile::{ProfileState, ProfileStore};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub profile: Arc<ProfileState>,
    pub notifications: Arc<NotificationState>,
}

/// Runs every slice reducer. When no slice changed the previous snapshot is returned as is.
pub fn root_reduce(state: &Arc<AppState>, action: &Action) -> Arc<AppState> {
    let profile = feature_profile::reduce(&state.profile, action);
    let notifications = feature_notification::reduce(&state.notifications, action);

    if Arc::ptr_eq(&profile, &state.profile) && Arc::ptr_eq(&notifications, &state.notifications) {
        return Arc::clone(state);
    }
    Arc::new(AppState { profile, notifications })
}

/// Owner of the global state. The reducer is the only way the snapshot changes.
#[derive(Debug)]
pub struct Store {
    tx: watch::Sender<Arc<AppState>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        let (tx, _) = watch::channel(Arc::new(initial));
        Self { tx }
    }

    pub fn state(&self) -> Arc<AppState> {
        self.tx.borrow().clone()
    }

    /// Receivers are woken only when an action actually changed the state.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.tx.subscribe()
    }
}

impl Dispatch for Store {
    fn dispatch(&self, action: Action) {
        log::debug!("dispatch {}", action.to_record());
        self.tx.send_if_modified(|state| {
            let next = root_reduce(state, &action);
            if Arc::ptr_eq(&next, state) {
                return false;
            }
            *state = next;
            true
        });
    }
}

impl ProfileStore for Store {
    fn profile(&self) -> Arc<ProfileState> {
        Arc::clone(&self.state().profile)
    }
}
