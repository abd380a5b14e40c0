mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;

use common::*;
use leavehub::config::{Config, MailConfig, MediaStorageConfig};
use leavehub::database::models::{LoginInput, RegisterInput, UserRole};
use leavehub::services::auth::Claims;
use leavehub::AuthService;

fn test_config() -> Config {
    Config {
        database_url: "postgres://@localhost:5432/leavehub_test".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_expiration_days: 7,
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        client_base_url: "http://localhost:3000".to_string(),
        mail: MailConfig {
            api_url: String::new(),
            api_key: String::new(),
            sender_name: "Leave App".to_string(),
            sender_email: "no-reply@leavehub.local".to_string(),
        },
        media_storage: MediaStorageConfig {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
        },
    }
}

fn auth_service(env: &TestEnv) -> AuthService {
    let users: Arc<dyn leavehub::database::repositories::UserStore> = env.users.clone();
    AuthService::new(test_config(), users)
}

#[tokio::test]
async fn register_issues_a_verifiable_token() {
    let env = TestEnv::new();
    let auth = auth_service(&env);

    let response = auth
        .register(RegisterInput {
            name: "Priya Raman".to_string(),
            email: "priya@example.com".to_string(),
            password: "hunter2hunter2".to_string(),
        })
        .await
        .expect("register");

    assert_eq!(response.user.email, "priya@example.com");
    // Self-registration never grants elevated roles.
    assert_eq!(response.user.role, UserRole::Employee);

    let claims = auth.verify_token(&response.token).expect("valid token");
    assert_eq!(claims.user_id(), response.user.id);
    assert_eq!(claims.email, "priya@example.com");
    assert!(!claims.is_manager_or_admin());
}

#[tokio::test]
async fn register_rejects_duplicate_emails() {
    let env = TestEnv::new();
    let auth = auth_service(&env);

    let input = RegisterInput {
        name: "Priya Raman".to_string(),
        email: "priya@example.com".to_string(),
        password: "hunter2hunter2".to_string(),
    };
    auth.register(input.clone()).await.expect("first register");

    let err = auth.register(input).await.unwrap_err();
    assert_eq!(err.to_string(), "Email already exists");
}

#[tokio::test]
async fn login_round_trip() {
    let env = TestEnv::new();
    let auth = auth_service(&env);

    let registered = auth
        .register(RegisterInput {
            name: "Priya Raman".to_string(),
            email: "priya@example.com".to_string(),
            password: "hunter2hunter2".to_string(),
        })
        .await
        .expect("register");

    let logged_in = auth
        .login(LoginInput {
            email: "priya@example.com".to_string(),
            password: "hunter2hunter2".to_string(),
        })
        .await
        .expect("login");

    assert_eq!(logged_in.user.id, registered.user.id);
    let claims = auth.verify_token(&logged_in.token).expect("valid token");
    assert_eq!(claims.user_id(), registered.user.id);
}

#[tokio::test]
async fn login_failures_do_not_reveal_which_part_was_wrong() {
    let env = TestEnv::new();
    let auth = auth_service(&env);

    auth.register(RegisterInput {
        name: "Priya Raman".to_string(),
        email: "priya@example.com".to_string(),
        password: "hunter2hunter2".to_string(),
    })
    .await
    .expect("register");

    let wrong_password = auth
        .login(LoginInput {
            email: "priya@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    let unknown_email = auth
        .login(LoginInput {
            email: "nobody@example.com".to_string(),
            password: "hunter2hunter2".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(wrong_password.to_string(), "Invalid email or password");
    assert_eq!(unknown_email.to_string(), wrong_password.to_string());
}

#[tokio::test]
async fn garbage_tokens_are_rejected() {
    let env = TestEnv::new();
    let auth = auth_service(&env);
    assert!(auth.verify_token("not-a-jwt").is_err());
}

#[test]
fn role_helpers_partition_the_roles() {
    let claims = |role| Claims {
        sub: uuid::Uuid::new_v4(),
        email: "x@example.com".to_string(),
        role,
        exp: 0,
    };

    assert!(!claims(UserRole::Employee).is_manager_or_admin());
    assert!(claims(UserRole::Manager).is_manager_or_admin());
    assert!(!claims(UserRole::Manager).is_admin());
    assert!(claims(UserRole::Admin).is_manager_or_admin());
    assert!(claims(UserRole::Admin).is_admin());
}
