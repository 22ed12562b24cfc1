use std::sync::Arc;
use std::sync::atomic::Ordering;

use filemaker_bridge::{CredentialRole, SessionError};

use crate::common::{MockFileMaker, test_bridge};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_use_creates_one_session() {
    let mock = MockFileMaker::start().await;
    let bridge = Arc::new(test_bridge(&mock));

    let mut handles = Vec::new();
    for _ in 0..20 {
        let bridge = bridge.clone();
        handles.push(tokio::spawn(
            async move { bridge.sessions().get_session().await },
        ));
    }

    let mut tokens = Vec::new();
    for handle in handles {
        tokens.push(handle.await.unwrap().expect("session should be created"));
    }

    assert_eq!(mock.state.session_creates.load(Ordering::SeqCst), 1);
    assert!(tokens.iter().all(|t| t == &tokens[0]));
    assert!(tokens[0].starts_with("data-token-"));
}

#[tokio::test]
async fn test_validate_and_revoke_round() {
    let mock = MockFileMaker::start().await;
    let bridge = test_bridge(&mock);
    let sessions = bridge.sessions();

    let token = sessions.get_session().await.unwrap();
    assert!(sessions.validate_session(&token).await);
    assert!(sessions.revoke_session(&token).await);
    assert!(!sessions.validate_session(&token).await);
}

#[tokio::test]
async fn test_revoke_invalid_token_returns_false() {
    let mock = MockFileMaker::start().await;
    let bridge = test_bridge(&mock);

    assert!(!bridge.sessions().revoke_session("never-issued").await);
    assert_eq!(mock.state.revoked(), vec!["never-issued".to_string()]);
}

#[tokio::test]
async fn test_failed_health_check_forces_recreation() {
    let mock = MockFileMaker::start().await;
    let bridge = test_bridge(&mock);
    let sessions = bridge.sessions();

    let first = sessions.get_session().await.unwrap();
    assert!(sessions.health_check().await);

    mock.state.expire_all();
    assert!(!sessions.health_check().await);
    assert!(!sessions.has_session().await);

    let second = sessions.get_session().await.unwrap();
    assert_ne!(first, second);
    assert_eq!(mock.state.session_creates.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_transient_creation_failures_are_retried() {
    let mock = MockFileMaker::start().await;
    mock.state.fail_creates.store(2, Ordering::SeqCst);
    let bridge = test_bridge(&mock);

    let token = bridge.sessions().get_session().await.unwrap();

    assert!(token.starts_with("data-token-"));
    assert_eq!(mock.state.session_creates.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_exhausted_retries_leave_cache_clean() {
    let mock = MockFileMaker::start().await;
    mock.state.fail_creates.store(3, Ordering::SeqCst);
    let bridge = test_bridge(&mock);

    let err = bridge.sessions().get_session().await.unwrap_err();
    match err {
        SessionError::CreateFailed { attempts, source } => {
            assert_eq!(attempts, 3);
            assert!(matches!(
                source,
                filemaker_bridge::ClientError::Status { status: 500, .. }
            ));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!bridge.sessions().has_session().await);

    assert!(bridge.sessions().get_session().await.is_ok());
    assert_eq!(mock.state.session_creates.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_auth_role_uses_its_own_credentials() {
    let mock = MockFileMaker::start().await;
    let bridge = test_bridge(&mock);

    let token = bridge
        .sessions()
        .create_session(CredentialRole::Auth)
        .await
        .unwrap();

    assert!(token.starts_with("auth-token-"));
    assert!(!bridge.sessions().has_session().await);
}

#[tokio::test]
async fn test_session_info_is_masked() {
    let mock = MockFileMaker::start().await;
    let bridge = test_bridge(&mock);

    assert!(bridge.sessions().info().await.is_none());
    let token = bridge.sessions().get_session().await.unwrap();

    let info = bridge.sessions().info().await.unwrap();
    assert_ne!(info.token_preview, token);
    assert!(info.expires_in_secs > 0);
}
