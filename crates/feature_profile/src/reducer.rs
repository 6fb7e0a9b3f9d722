use crate::state::{initial_state, ProfileState};
use app_protocol::{Action, ProfileAction};
use std::sync::Arc;

/// Pure transition of the profile slice. Actions owned by other slices hand back the
/// same snapshot, so `Arc::ptr_eq(&state, &reduce(&state, action))` holds for them.
pub fn reduce(state: &Arc<ProfileState>, action: &Action) -> Arc<ProfileState> {
    let action = match action {
        Action::Profile(action) => action,
        Action::LogoutSuccess => return Arc::new(initial_state()),
        _ => return Arc::clone(state),
    };

    let mut next = ProfileState::clone(state);
    match action {
        ProfileAction::GetRequest => {
            next.is_loading = true;
            next.is_requesting = true;
        }
        ProfileAction::GetSuccess(data) => {
            next.is_initialized = true;
            next.is_loading = false;
            next.is_requesting = false;
            next.merge_present(data);
        }
        ProfileAction::GetError(error) => {
            next.is_requesting = false;
            next.is_loading = false;
            next.error = Some(error.clone());
        }
        ProfileAction::PutRequest => {
            next.is_requesting = true;
        }
        ProfileAction::PutSuccess(data) => {
            next.is_requesting = false;
            next.merge_all(data);
        }
        ProfileAction::PutError(error) => {
            next.is_requesting = false;
            next.error = Some(error.clone());
        }
        ProfileAction::OnChange(data) => {
            next.merge_all(data);
        }
    }
    Arc::new(next)
}
