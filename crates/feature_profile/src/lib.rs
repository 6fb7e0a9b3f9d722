//! The `profiles` slice: state, action creators, reducer and the remote operations
//! that keep it in sync with `/api/v1/profiles/`.

mod reducer;
mod registration_flow;
mod service;
mod state;

pub use reducer::reduce;
pub use registration_flow::{FlowStep, RegistrationFlow};
pub use service::{ProfileService, ProfileStore};
pub use state::{initial_state, ProfileState};

pub mod actions {
    use app_protocol::{Action, ErrorInfo, ProfileAction, ProfilePatch};

    pub fn get_request() -> Action {
        ProfileAction::GetRequest.into()
    }

    pub fn get_success(data: ProfilePatch) -> Action {
        ProfileAction::GetSuccess(data).into()
    }

    pub fn get_error(error: ErrorInfo) -> Action {
        ProfileAction::GetError(error).into()
    }

    pub(crate) fn put_request() -> Action {
        ProfileAction::PutRequest.into()
    }

    pub(crate) fn put_success(data: ProfilePatch) -> Action {
        ProfileAction::PutSuccess(data).into()
    }

    pub(crate) fn put_error(error: ErrorInfo) -> Action {
        ProfileAction::PutError(error).into()
    }

    /// Local edits from the UI, applied without a round trip.
    pub fn on_change(data: ProfilePatch) -> Action {
        ProfileAction::OnChange(data).into()
    }

    pub fn logout_success() -> Action {
        Action::LogoutSuccess
    }
}
