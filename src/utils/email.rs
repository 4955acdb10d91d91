use chrono::Duration;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::models::user::User;
use crate::utils::app_error::AppError;
use crate::views;
use crate::AppState;

const RESET_PASSWORD_EXPIRES_IN_SECONDS: i64 = 600;

/// SMTP client described by the configuration, `None` when no mail server is set
pub fn build_smtp_client(
    mail: &MailConfig,
) -> Result<Option<SmtpTransport>, lettre::transport::smtp::Error> {
    let Some(server) = &mail.server else {
        return Ok(None);
    };

    let builder = if mail.use_tls {
        SmtpTransport::starttls_relay(server)?
    } else {
        SmtpTransport::builder_dangerous(server)
    };
    let mut builder = builder.port(mail.port);
    if let (Some(username), Some(password)) = (&mail.username, &mail.password) {
        builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
    }

    Ok(Some(builder.build()))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, AppError> {
    address.parse::<Mailbox>().map_err(|e| {
        warn!("Cannot parse email `{address}` : {e}");
        AppError::internal_server_error()
    })
}

/// Build the message and send it from a background task, returning right away.
/// Delivery failures are only logged.
pub fn send_email(
    smtp_client: Option<SmtpTransport>,
    subject: &str,
    sender: &str,
    recipients: &[&str],
    text_body: String,
    html_body: String,
) -> Result<(), AppError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(sender)?)
        .subject(subject);
    for recipient in recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    let Some(smtp_client) = smtp_client else {
        info!("No mail server configured, `{subject}` to {recipients:?} not sent :\n{text_body}");
        return Ok(());
    };

    let message = builder
        .multipart(MultiPart::alternative_plain_html(text_body, html_body))
        .map_err(|e| {
            warn!("Error building email `{subject}` : {e}");
            AppError::internal_server_error()
        })?;

    let subject = subject.to_string();
    tokio::task::spawn_blocking(move || match smtp_client.send(&message) {
        Ok(_) => info!("Email `{subject}` sent"),
        Err(e) => warn!("Error while sending email `{subject}` : {e}"),
    });

    Ok(())
}

pub fn send_password_reset_email(app_state: &AppState, user: &User) -> Result<(), AppError> {
    let token = user.get_reset_password_token(
        app_state.config.secret_key.as_bytes(),
        Duration::seconds(RESET_PASSWORD_EXPIRES_IN_SECONDS),
    )?;
    let url = format!("{}/reset_password/{}", app_state.config.server_url, token);

    let sender = app_state.config.admins.first().ok_or_else(|| {
        warn!("No admin address to send emails from");
        AppError::internal_server_error()
    })?;

    send_email(
        app_state.smtp_client.clone(),
        "[Microblog] Reset Your Password",
        sender,
        &[&user.email],
        views::email::reset_password_text(user, &url),
        views::email::reset_password_html(user, &url),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_mail_server_nothing_is_sent() {
        let result = send_email(
            None,
            "[Microblog] Reset Your Password",
            "admin@microblog.local",
            &["susan@example.com"],
            "text".to_string(),
            "<p>html</p>".to_string(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn invalid_addresses_are_rejected() {
        let result = send_email(
            None,
            "subject",
            "not an address",
            &["susan@example.com"],
            String::new(),
            String::new(),
        );
        assert!(result.is_err());

        let result = send_email(
            None,
            "subject",
            "admin@microblog.local",
            &["susan"],
            String::new(),
            String::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn smtp_client_is_disabled_without_server() {
        let mail = MailConfig {
            server: None,
            port: 25,
            use_tls: false,
            username: None,
            password: None,
        };
        assert!(build_smtp_client(&mail).unwrap().is_none());
    }
}
