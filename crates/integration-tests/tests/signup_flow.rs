//! End-to-end registration flow against a mocked affiliate backend.
//!
//! Drives the real [`RegistrationFlow`] with the real
//! [`AffiliateClient`] - encryption included - against mockito stand-ins
//! for the three upstream endpoints. Timing here is real (the debounce
//! window is waited out), so the waits are kept short.

use std::sync::Arc;
use std::time::Duration;

use spinline_core::Username;
use spinline_integration_tests::test_config;
use spinline_signup::affiliate::AffiliateClient;
use spinline_signup::flow::{
    FlowStep, RESEND_BUDGET_SECS, RegistrationFlow, UsernameCheckState,
};

/// Wait out the debounce window plus network slack.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(900)).await;
}

fn flow_against(server: &mockito::ServerGuard) -> RegistrationFlow<AffiliateClient> {
    let config = test_config(
        &server.url(),
        &format!("{}/username-check.php", server.url()),
    );
    let client =
        AffiliateClient::new(&config.affiliate, &config.keys).expect("client builds");
    RegistrationFlow::new(Arc::new(client), config.login_redirect_url)
}

#[tokio::test]
async fn test_full_registration_happy_path() {
    let mut server = mockito::Server::new_async().await;
    let check = server
        .mock("POST", "/username-check.php")
        .with_status(200)
        .with_body(r#"{"message":{"is_username_exists":false}}"#)
        .create_async()
        .await;
    let otp = server
        .mock("POST", "/user/send-otp")
        .match_header("origin", "https://brand.test")
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;
    let register = server
        .mock("POST", "/user/user-register")
        .match_header("origin", "https://brand.test")
        .with_status(200)
        .with_body(r#"{"success":true,"token":"abc"}"#)
        .create_async()
        .await;

    let mut flow = flow_against(&server);

    // Step 1: credentials. The availability check is debounced.
    flow.set_username("freshplayer");
    flow.set_password("hunter22");
    flow.set_phone_number("9876543210");
    settle().await;
    assert_eq!(
        flow.username_state(),
        UsernameCheckState::Available(Username::parse("freshplayer").expect("valid username"))
    );

    // OTP dispatch advances to step 2 and arms the countdown.
    flow.send_otp().await.expect("otp dispatch succeeds");
    assert_eq!(flow.step(), FlowStep::VerifyingOtp);
    assert_eq!(flow.resend_remaining(), RESEND_BUDGET_SECS);

    // Step 2: code and names, then the final submission.
    flow.set_otp_code("482913");
    flow.set_first_name("Asha");
    flow.set_last_name("Rao");

    let outcome = flow.submit().await.expect("registration succeeds");
    assert_eq!(outcome.token.as_deref(), Some("abc"));
    assert_eq!(outcome.redirect.as_str(), "https://play.test/login");
    assert_eq!(flow.step(), FlowStep::CollectingCredentials);

    check.assert_async().await;
    otp.assert_async().await;
    register.assert_async().await;
}

#[tokio::test]
async fn test_taken_username_blocks_otp_dispatch() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/username-check.php")
        .with_status(200)
        .with_body(r#"{"message":{"is_username_exists":true}}"#)
        .create_async()
        .await;
    let otp = server
        .mock("POST", "/user/send-otp")
        .expect(0)
        .create_async()
        .await;

    let mut flow = flow_against(&server);
    flow.set_username("takenname");
    flow.set_phone_number("9876543210");
    settle().await;
    assert!(matches!(flow.username_state(), UsernameCheckState::Taken(_)));

    let err = flow.send_otp().await.expect_err("dispatch must be refused");
    assert!(matches!(
        err,
        spinline_signup::flow::FlowError::Validation(_)
    ));
    otp.assert_async().await;
}

#[tokio::test]
async fn test_rejected_registration_keeps_flow_in_verification() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/username-check.php")
        .with_status(200)
        .with_body(r#"{"message":{"is_username_exists":false}}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/user/send-otp")
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/user/user-register")
        .with_status(200)
        .with_body(r#"{"success":false,"message":"Invalid OTP"}"#)
        .create_async()
        .await;

    let mut flow = flow_against(&server);
    flow.set_username("freshplayer");
    flow.set_password("hunter22");
    flow.set_phone_number("9876543210");
    settle().await;
    flow.send_otp().await.expect("otp dispatch succeeds");

    flow.set_otp_code("000000");
    flow.set_first_name("Asha");
    flow.set_last_name("Rao");

    let err = flow.submit().await.expect_err("upstream rejects the code");
    assert!(
        matches!(err, spinline_signup::flow::FlowError::Upstream(ref m) if m == "Invalid OTP")
    );
    assert_eq!(flow.step(), FlowStep::VerifyingOtp);
}

#[tokio::test]
async fn test_check_failure_degrades_to_idle_and_blocks_progress() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/username-check.php")
        .with_status(500)
        .with_body("upstream down")
        .create_async()
        .await;

    let mut flow = flow_against(&server);
    flow.set_username("freshplayer");
    flow.set_phone_number("9876543210");
    settle().await;

    assert_eq!(flow.username_state(), UsernameCheckState::Idle);
    assert!(flow.send_otp().await.is_err());
}
