//! Email service for login codes and wishlist sharing.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::SmtpConfig;

/// HTML template for the one-time login code email.
#[derive(Template)]
#[template(path = "email/login_code.html")]
struct LoginCodeEmailHtml<'a> {
    code: &'a str,
}

/// Plain text template for the one-time login code email.
#[derive(Template)]
#[template(path = "email/login_code.txt")]
struct LoginCodeEmailText<'a> {
    code: &'a str,
}

/// HTML template for a shared wishlist.
#[derive(Template)]
#[template(path = "email/wishlist_share.html")]
struct WishlistShareEmailHtml<'a> {
    owner: &'a str,
    links: &'a [String],
}

/// Plain text template for a shared wishlist.
#[derive(Template)]
#[template(path = "email/wishlist_share.txt")]
struct WishlistShareEmailText<'a> {
    owner: &'a str,
    links: &'a [String],
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if SMTP connection fails.
    pub fn new(config: &SmtpConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send a one-time login code.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_login_code(&self, to: &str, code: &str) -> Result<(), EmailError> {
        let html = LoginCodeEmailHtml { code }.render()?;
        let text = LoginCodeEmailText { code }.render()?;

        self.send_multipart_email(to, "Your Shopscout Login Code", &text, &html)
            .await
    }

    /// Send a user's wishlist links to a recipient.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_wishlist_share(
        &self,
        to: &str,
        owner: &str,
        links: &[String],
    ) -> Result<(), EmailError> {
        let html = WishlistShareEmailHtml { owner, links }.render()?;
        let text = WishlistShareEmailText { owner, links }.render()?;

        let subject = format!("shopscout wishlist of {owner}");
        self.send_multipart_email(to, &subject, &text, &html).await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

/// Generate a 6-digit login code.
#[must_use]
pub fn generate_login_code() -> String {
    use rand::Rng;
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    code.to_string()
}
