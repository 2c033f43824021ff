//! Registration flow state machine.
//!
//! Orchestrates the two-step signup wizard: collect credentials, confirm
//! username availability, dispatch an OTP, then verify the code and
//! submit the final registration. The step is an explicit enum with a
//! forward-only transition; resending an OTP never steps back.
//!
//! All state lives on one logical task - mutation happens through
//! `&mut self` in response to user input or completed calls - while the
//! debounce and countdown run as cancellable background tasks owned by
//! the flow.

pub mod timer;
pub mod username;

use std::sync::Arc;

use spinline_core::{OtpCode, PhoneNumber, Username};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::affiliate::{
    AffiliateClient, AffiliateError, RegistrationRequest, UpstreamEnvelope, UsernameAvailability,
};

pub use timer::{RESEND_BUDGET_SECS, ResendTimer};
pub use username::{DEBOUNCE_WINDOW, UsernameCheckState, UsernameChecker, UsernameLookup};

/// Discrete stage of the registration wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowStep {
    /// Step 1: username, password, and phone number.
    #[default]
    CollectingCredentials,
    /// Step 2: OTP code and name fields. Entered on successful dispatch,
    /// never left except by completing or abandoning the flow.
    VerifyingOtp,
}

/// Transient, in-memory form state.
///
/// Created empty when the flow starts and discarded on successful
/// submission. Nothing here is persisted.
#[derive(Debug, Clone, Default)]
pub struct RegistrationDraft {
    pub username: String,
    pub password: String,
    pub phone_number: String,
    pub otp_code: String,
    pub first_name: String,
    pub last_name: String,
    /// Optional; empty means not provided.
    pub email: String,
}

/// Errors surfaced to the user by the flow.
///
/// None of these are retried automatically; the user retries by
/// re-triggering the relevant step.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A local precondition failed; no network call was made.
    #[error("{0}")]
    Validation(String),

    /// The upstream API answered `success: false` with a message.
    #[error("{0}")]
    Upstream(String),

    /// The upstream API could not be reached or answered garbage.
    #[error("network error: {0}")]
    Transport(#[from] AffiliateError),
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    /// Session token issued by the upstream API, when present.
    pub token: Option<String>,
    /// External login destination the user should be sent to.
    pub redirect: Url,
}

/// OTP dispatch and registration submission, abstracted for testing.
///
/// Implemented by [`AffiliateClient`]; tests substitute fakes with
/// scripted envelopes.
pub trait RegistrationGateway: Send + Sync + 'static {
    /// Request an OTP for `phone_number`.
    fn dispatch_otp(
        &self,
        phone_number: PhoneNumber,
    ) -> impl Future<Output = Result<UpstreamEnvelope, AffiliateError>> + Send;

    /// Submit the final registration.
    fn submit_registration(
        &self,
        request: RegistrationRequest,
    ) -> impl Future<Output = Result<UpstreamEnvelope, AffiliateError>> + Send;
}

impl UsernameLookup for AffiliateClient {
    async fn availability(
        &self,
        username: Username,
    ) -> Result<UsernameAvailability, AffiliateError> {
        self.check_username(&username).await
    }
}

impl RegistrationGateway for AffiliateClient {
    async fn dispatch_otp(
        &self,
        phone_number: PhoneNumber,
    ) -> Result<UpstreamEnvelope, AffiliateError> {
        self.send_otp(&phone_number).await
    }

    async fn submit_registration(
        &self,
        request: RegistrationRequest,
    ) -> Result<UpstreamEnvelope, AffiliateError> {
        self.register(&request).await
    }
}

/// The registration wizard.
///
/// Generic over the affiliate gateway so the whole flow runs against
/// fakes in tests; production uses [`AffiliateClient`] for both roles.
pub struct RegistrationFlow<C> {
    client: Arc<C>,
    draft: RegistrationDraft,
    step: FlowStep,
    checker: UsernameChecker<C>,
    timer: ResendTimer,
    login_redirect: Url,
}

impl<C> RegistrationFlow<C>
where
    C: UsernameLookup + RegistrationGateway,
{
    /// Create a fresh flow in step 1 with an empty draft.
    #[must_use]
    pub fn new(client: Arc<C>, login_redirect: Url) -> Self {
        let checker = UsernameChecker::new(Arc::clone(&client));
        Self {
            client,
            draft: RegistrationDraft::default(),
            step: FlowStep::CollectingCredentials,
            checker,
            timer: ResendTimer::new(),
            login_redirect,
        }
    }

    /// Current wizard step.
    #[must_use]
    pub const fn step(&self) -> FlowStep {
        self.step
    }

    /// Current draft contents.
    #[must_use]
    pub const fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// Current username check state.
    #[must_use]
    pub fn username_state(&self) -> UsernameCheckState {
        self.checker.state()
    }

    /// Seconds until OTP resend unlocks.
    #[must_use]
    pub fn resend_remaining(&self) -> u32 {
        self.timer.remaining()
    }

    /// Update the username field and kick the debounced availability check.
    pub fn set_username(&mut self, value: &str) {
        self.draft.username = value.to_owned();
        self.checker.submit(value);
    }

    /// Update the password field.
    pub fn set_password(&mut self, value: &str) {
        self.draft.password = value.to_owned();
    }

    /// Update the phone number field.
    pub fn set_phone_number(&mut self, value: &str) {
        self.draft.phone_number = value.to_owned();
    }

    /// Update the OTP code field.
    pub fn set_otp_code(&mut self, value: &str) {
        self.draft.otp_code = value.to_owned();
    }

    /// Update the first name field.
    pub fn set_first_name(&mut self, value: &str) {
        self.draft.first_name = value.to_owned();
    }

    /// Update the last name field.
    pub fn set_last_name(&mut self, value: &str) {
        self.draft.last_name = value.to_owned();
    }

    /// Update the optional email field.
    pub fn set_email(&mut self, value: &str) {
        self.draft.email = value.to_owned();
    }

    /// Dispatch (or resend) an OTP to the draft phone number.
    ///
    /// Local preconditions, checked before any network call: the username
    /// must be confirmed available for the exact current draft value, the
    /// phone number must be ten digits, and a resend is only allowed once
    /// the countdown has expired.
    ///
    /// On upstream success the flow advances to [`FlowStep::VerifyingOtp`]
    /// and the resend countdown restarts at the full budget.
    ///
    /// # Errors
    ///
    /// [`FlowError::Validation`] on precondition failure,
    /// [`FlowError::Upstream`] when the API rejects the dispatch, and
    /// [`FlowError::Transport`] on network/parse failure. The step never
    /// regresses on error.
    #[instrument(skip(self), fields(step = ?self.step))]
    pub async fn send_otp(&mut self) -> Result<(), FlowError> {
        match self.username_state() {
            UsernameCheckState::Available(ref confirmed)
                if confirmed.as_str() == self.draft.username => {}
            UsernameCheckState::Taken(_) => {
                return Err(FlowError::Validation(
                    "That username is already taken".to_owned(),
                ));
            }
            _ => {
                return Err(FlowError::Validation(
                    "Please choose an available username first".to_owned(),
                ));
            }
        }

        let phone_number = PhoneNumber::parse(&self.draft.phone_number)
            .map_err(|e| FlowError::Validation(e.to_string()))?;

        if self.step == FlowStep::VerifyingOtp && !self.timer.is_expired() {
            return Err(FlowError::Validation(format!(
                "Please wait {}s before resending",
                self.timer.remaining()
            )));
        }

        let envelope = self.client.dispatch_otp(phone_number).await?;
        if !envelope.success {
            return Err(FlowError::Upstream(
                envelope
                    .message
                    .unwrap_or_else(|| "Failed to send OTP".to_owned()),
            ));
        }

        self.step = FlowStep::VerifyingOtp;
        self.timer.start();
        tracing::info!("OTP dispatched, flow advanced to verification");
        Ok(())
    }

    /// Submit the final registration.
    ///
    /// Requires step 2 and non-empty OTP code, first name, and last name;
    /// otherwise fails locally without a network call. On success the
    /// draft is discarded and the caller receives the external login
    /// redirect; on failure the flow stays in step 2 so the user can
    /// correct the code or resend.
    ///
    /// # Errors
    ///
    /// [`FlowError::Validation`], [`FlowError::Upstream`], or
    /// [`FlowError::Transport`], as for [`send_otp`](Self::send_otp).
    #[instrument(skip(self), fields(step = ?self.step))]
    pub async fn submit(&mut self) -> Result<RegistrationOutcome, FlowError> {
        if self.step != FlowStep::VerifyingOtp {
            return Err(FlowError::Validation(
                "Request an OTP before submitting".to_owned(),
            ));
        }

        let otp_code =
            OtpCode::parse(&self.draft.otp_code).map_err(|e| FlowError::Validation(e.to_string()))?;

        if self.draft.first_name.trim().is_empty() {
            return Err(FlowError::Validation("First name is required".to_owned()));
        }
        if self.draft.last_name.trim().is_empty() {
            return Err(FlowError::Validation("Last name is required".to_owned()));
        }

        let username = Username::parse(&self.draft.username)
            .map_err(|e| FlowError::Validation(e.to_string()))?;
        let phone_number = PhoneNumber::parse(&self.draft.phone_number)
            .map_err(|e| FlowError::Validation(e.to_string()))?;

        let request = RegistrationRequest {
            username,
            phone_number,
            password: self.draft.password.clone(),
            otp_code,
        };

        let envelope = self.client.submit_registration(request).await?;
        if !envelope.success {
            return Err(FlowError::Upstream(envelope.message.unwrap_or_else(|| {
                "Registration failed. Mobile might already be registered.".to_owned()
            })));
        }

        tracing::info!("registration succeeded");
        let outcome = RegistrationOutcome {
            token: envelope.token,
            redirect: self.login_redirect.clone(),
        };

        // The draft's job is done; a fresh flow starts from step 1.
        self.draft = RegistrationDraft::default();
        self.step = FlowStep::CollectingCredentials;
        self.timer.cancel();
        self.checker.submit("");

        Ok(outcome)
    }
}
