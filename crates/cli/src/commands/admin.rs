//! Admin account management commands.

use std::io::{BufRead, Write as _};

use teknokalakal_core::{Email, UserRole};
use teknokalakal_storefront::db::UserRepository;
use teknokalakal_storefront::services::AuthService;

/// Create a new admin account, reading the password from stdin.
///
/// # Errors
///
/// Returns an error if validation fails or the account exists.
pub async fn create(
    email: &str,
    name: &str,
    username: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let password = read_password()?;

    let pool = super::connect().await?;

    let user = AuthService::new(&pool)
        .signup(name, email, username, &password)
        .await?;
    UserRepository::new(&pool)
        .set_role(user.id, UserRole::Admin)
        .await?;

    tracing::info!(user_id = %user.id, "admin account created");
    Ok(())
}

/// Promote an existing account to admin.
///
/// # Errors
///
/// Returns an error if the account does not exist.
pub async fn promote(email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let users = UserRepository::new(&pool);

    let email = Email::parse(email)?;
    let user = users
        .get_by_email(&email)
        .await?
        .ok_or_else(|| format!("no account with email {email}"))?;

    users.set_role(user.id, UserRole::Admin).await?;

    tracing::info!(user_id = %user.id, "account promoted to admin");
    Ok(())
}

/// Prompt on stderr and read a password line from stdin.
#[allow(clippy::print_stderr)]
fn read_password() -> Result<String, Box<dyn std::error::Error>> {
    eprint!("Password: ");
    std::io::stderr().flush()?;

    let mut password = String::new();
    std::io::stdin().lock().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']).to_owned();

    if password.is_empty() {
        return Err("password cannot be empty".into());
    }

    Ok(password)
}
