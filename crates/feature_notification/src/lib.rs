use app_protocol::{Action, Notification, NotificationAction};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    pub items: Vec<Notification>,
}

impl NotificationState {
    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }
}

pub fn show_notification(message: impl Into<String>) -> Action {
    let notification = Notification {
        id: Uuid::new_v4(),
        message: message.into(),
    };
    Action::Notification(NotificationAction::Show(notification))
}

pub fn dismiss(id: Uuid) -> Action {
    Action::Notification(NotificationAction::Dismiss(id))
}

pub fn reduce(state: &Arc<NotificationState>, action: &Action) -> Arc<NotificationState> {
    match action {
        Action::Notification(NotificationAction::Show(notification)) => {
            let mut next = NotificationState::clone(state);
            next.items.push(notification.clone());
            Arc::new(next)
        }
        Action::Notification(NotificationAction::Dismiss(id)) => {
            if !state.items.iter().any(|n| n.id == *id) {
                return Arc::clone(state);
            }
            let items = state.items.iter().filter(|n| n.id != *id).cloned().collect();
            Arc::new(NotificationState { items })
        }
        Action::LogoutSuccess => Arc::new(NotificationState::default()),
        _ => Arc::clone(state),
    }
}
