//! Account settings handlers.
//!
//! Both forms post over HTMX and swap a small result fragment under the
//! form, leaving the rest of the page alone.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use meada_core::Email;
use serde::Deserialize;
use tracing::instrument;

use crate::api::types::{UpdateEmail, UpdatePassword};
use crate::filters;
use crate::state::AppState;

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Account settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/show.html")]
pub struct AccountShowTemplate;

/// Form result fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/form_result.html")]
pub struct FormResultTemplate {
    pub success: bool,
    pub message: String,
}

impl FormResultTemplate {
    fn success(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_owned(),
        }
    }

    fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_owned(),
        }
    }
}

/// Email update form data.
#[derive(Debug, Deserialize)]
pub struct UpdateEmailForm {
    #[serde(default)]
    pub email: String,
}

/// Password update form data.
#[derive(Deserialize)]
pub struct UpdatePasswordForm {
    #[serde(default)]
    pub senha: String,
    #[serde(default)]
    pub confirmar_senha: String,
}

/// Check a new password against the local rules.
fn validate_new_password(password: &str, confirmation: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err("A senha deve ter pelo menos 6 caracteres.");
    }
    if password != confirmation {
        return Err("As senhas não coincidem.");
    }
    Ok(())
}

/// Display the account settings page.
#[instrument]
pub async fn show() -> AccountShowTemplate {
    AccountShowTemplate
}

/// Update the account email (HTMX).
#[instrument(skip(state, form))]
pub async fn update_email(
    State(state): State<AppState>,
    Form(form): Form<UpdateEmailForm>,
) -> FormResultTemplate {
    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected email update");
            return FormResultTemplate::failure("E-mail inválido.");
        }
    };

    match state.api().update_email(&UpdateEmail { email }).await {
        Ok(()) => FormResultTemplate::success("E-mail atualizado com sucesso."),
        Err(e) => {
            tracing::error!(error = %e, "Email update failed");
            FormResultTemplate::failure("Não foi possível atualizar o e-mail.")
        }
    }
}

/// Update the account password (HTMX).
#[instrument(skip(state, form))]
pub async fn update_password(
    State(state): State<AppState>,
    Form(form): Form<UpdatePasswordForm>,
) -> FormResultTemplate {
    if let Err(message) = validate_new_password(&form.senha, &form.confirmar_senha) {
        return FormResultTemplate::failure(message);
    }

    let update = UpdatePassword {
        password: form.senha,
    };

    match state.api().update_password(&update).await {
        Ok(()) => FormResultTemplate::success("Senha atualizada com sucesso."),
        Err(e) => {
            tracing::error!(error = %e, "Password update failed");
            FormResultTemplate::failure("Não foi possível atualizar a senha.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_are_rejected() {
        assert!(validate_new_password("12345", "12345").is_err());
        assert!(validate_new_password("123456", "123456").is_ok());
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let result = validate_new_password("segredo1", "segredo2");
        assert_eq!(result, Err("As senhas não coincidem."));
    }
}
