use taskpro_core::AppError;
use taskpro_domain::{Role, UserId};

use crate::test_support::{fixture, seed_user};
use crate::{RegisterParams, UpdateProfileInput, UserRepository};

fn params(email: &str) -> RegisterParams {
    RegisterParams {
        display_name: "Grace Hopper".to_owned(),
        email: email.to_owned(),
        password: "correct horse battery".to_owned(),
    }
}

#[tokio::test]
async fn first_registration_becomes_admin_and_later_ones_users() {
    let fixture = fixture();

    let first = fixture
        .user_service
        .register(params("first@example.com"))
        .await
        .unwrap_or_else(|_| panic!("first registration should succeed"));
    let second = fixture
        .user_service
        .register(params("second@example.com"))
        .await
        .unwrap_or_else(|_| panic!("second registration should succeed"));

    assert_eq!(first.identity.role(), Role::Admin);
    assert_eq!(second.identity.role(), Role::User);
    assert!(!second.token.as_str().is_empty());
}

#[tokio::test]
async fn duplicate_email_is_conflict_regardless_of_case() {
    let fixture = fixture();
    assert!(
        fixture
            .user_service
            .register(params("dup@example.com"))
            .await
            .is_ok()
    );

    let result = fixture
        .user_service
        .register(params("DUP@Example.com"))
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn weak_password_is_rejected() {
    let fixture = fixture();
    let mut weak = params("weak@example.com");
    weak.password = "short".to_owned();

    let result = fixture.user_service.register(weak).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn login_failures_share_one_message() {
    let fixture = fixture();
    seed_user(&fixture.users, "known@example.com", Role::User).await;

    let wrong_password = fixture
        .user_service
        .login("known@example.com", "not the password")
        .await;
    let unknown_email = fixture
        .user_service
        .login("nobody@example.com", "correct horse battery")
        .await;

    for result in [wrong_password, unknown_email] {
        assert!(
            matches!(result, Err(AppError::Unauthorized(ref message)) if message == "Invalid email or password")
        );
    }
}

#[tokio::test]
async fn login_with_valid_credentials_opens_session() {
    let fixture = fixture();
    let identity = seed_user(&fixture.users, "known@example.com", Role::Manager).await;

    let session = fixture
        .user_service
        .login("Known@Example.com", "correct horse battery")
        .await
        .unwrap_or_else(|_| panic!("login should succeed"));

    assert_eq!(session.identity, identity);
}

#[tokio::test]
async fn update_profile_changes_name_and_keeps_email() {
    let fixture = fixture();
    let identity = seed_user(&fixture.users, "me@example.com", Role::User).await;

    let updated = fixture
        .user_service
        .update_profile(
            &identity,
            UpdateProfileInput {
                display_name: Some("  New Name ".to_owned()),
                email: None,
            },
        )
        .await
        .unwrap_or_else(|_| panic!("profile update should succeed"));

    assert_eq!(updated.display_name(), "New Name");
    assert_eq!(updated.email().as_str(), "me@example.com");
}

#[tokio::test]
async fn update_profile_rejects_email_of_other_account() {
    let fixture = fixture();
    let identity = seed_user(&fixture.users, "me@example.com", Role::User).await;
    seed_user(&fixture.users, "taken@example.com", Role::User).await;

    let result = fixture
        .user_service
        .update_profile(
            &identity,
            UpdateProfileInput {
                display_name: None,
                email: Some("taken@example.com".to_owned()),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn change_password_requires_current_password() {
    let fixture = fixture();
    let identity = seed_user(&fixture.users, "me@example.com", Role::User).await;

    let wrong = fixture
        .user_service
        .change_password(&identity, "wrong", "a brand new secret")
        .await;
    assert!(matches!(wrong, Err(AppError::Unauthorized(_))));

    let changed = fixture
        .user_service
        .change_password(&identity, "correct horse battery", "a brand new secret")
        .await;
    assert!(changed.is_ok());
    assert!(
        fixture
            .user_service
            .login("me@example.com", "a brand new secret")
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn list_users_requires_users_read() {
    let fixture = fixture();
    let plain = seed_user(&fixture.users, "plain@example.com", Role::User).await;
    let manager = seed_user(&fixture.users, "manager@example.com", Role::Manager).await;

    let denied = fixture.user_service.list_users(&plain).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let listed = fixture
        .user_service
        .list_users(&manager)
        .await
        .unwrap_or_else(|_| panic!("manager should list users"));
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn admin_changes_role_of_other_account() {
    let fixture = fixture();
    let admin = seed_user(&fixture.users, "admin@example.com", Role::Admin).await;
    let target = seed_user(&fixture.users, "target@example.com", Role::User).await;

    let updated = fixture
        .user_service
        .change_role(&admin, target.id(), Role::Manager)
        .await
        .unwrap_or_else(|_| panic!("role change should succeed"));
    assert_eq!(updated.role(), Role::Manager);

    let stored = fixture
        .users
        .find_by_id(target.id())
        .await
        .unwrap_or_else(|_| panic!("lookup should succeed"));
    assert_eq!(stored.map(|user| user.role), Some(Role::Manager));
}

#[tokio::test]
async fn role_change_guards() {
    let fixture = fixture();
    let admin = seed_user(&fixture.users, "admin@example.com", Role::Admin).await;
    let manager = seed_user(&fixture.users, "manager@example.com", Role::Manager).await;

    let by_manager = fixture
        .user_service
        .change_role(&manager, admin.id(), Role::User)
        .await;
    assert!(matches!(by_manager, Err(AppError::Forbidden(_))));

    let missing = fixture
        .user_service
        .change_role(&admin, UserId::new(), Role::User)
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn own_role_cannot_be_changed() {
    let fixture = fixture();
    let admin = seed_user(&fixture.users, "admin@example.com", Role::Admin).await;

    let own = fixture
        .user_service
        .change_role(&admin, admin.id(), Role::User)
        .await;
    assert!(
        matches!(own, Err(AppError::Forbidden(ref message)) if message == "you cannot change your own role")
    );

    let stored = fixture
        .users
        .find_by_id(admin.id())
        .await
        .unwrap_or_else(|_| panic!("lookup should succeed"));
    assert_eq!(stored.map(|user| user.role), Some(Role::Admin));
}
