use mockall::predicate;
use salon_api::middleware::auth::{hash_password, verify_password};
use salon_core::{
    errors::SalonError,
    models::user::{Role, User},
};

use crate::test_utils::{db_user, TestContext};

// Mirrors the login handler over the mock repositories
async fn login_wrapper(ctx: &TestContext, email: &str, password: &str) -> Result<User, SalonError> {
    let invalid = || SalonError::Authentication("Invalid email or password".to_string());

    let db_user = ctx
        .user_repo
        .get_user_by_email(email.to_string())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(password, &db_user.password_hash) {
        return Err(invalid());
    }
    User::try_from(db_user)
}

fn context_with_user(email: &'static str, password: &str, role: Role) -> TestContext {
    let mut ctx = TestContext::new();
    let hash = hash_password(password).unwrap();
    ctx.user_repo
        .expect_get_user_by_email()
        .with(predicate::eq(email.to_string()))
        .returning(move |_| Ok(Some(db_user(email, &hash, role))));
    ctx.user_repo
        .expect_get_user_by_email()
        .with(predicate::ne(email.to_string()))
        .returning(|_| Ok(None));
    ctx
}

#[tokio::test]
async fn test_login_with_correct_password() {
    let ctx = context_with_user("ana@example.com", "s3cret", Role::Barber);

    let user = login_wrapper(&ctx, "ana@example.com", "s3cret").await.unwrap();

    assert_eq!(user.email, "ana@example.com");
    assert_eq!(user.role, Role::Barber);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let ctx = context_with_user("ana@example.com", "s3cret", Role::Client);

    let wrong_password = login_wrapper(&ctx, "ana@example.com", "guess")
        .await
        .unwrap_err()
        .to_string();
    let unknown_email = login_wrapper(&ctx, "bob@example.com", "s3cret")
        .await
        .unwrap_err()
        .to_string();

    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password, "Authentication error: Invalid email or password");
}
