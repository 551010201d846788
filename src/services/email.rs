//! Email service for booking notifications
//!
//! Invoked after a conversion or cancellation commits. Delivery failures
//! are reported to the caller, which logs them as warnings; they never
//! fail the booking itself.

use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::booking::Booking,
    scheduling::RefundResult,
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send a booking confirmation
    pub async fn send_booking_confirmation(&self, to: &str, booking: &Booking) -> AppResult<()> {
        let subject = format!("Your booking {} is confirmed", booking.reference_code);
        let body = format!(
            r#"
Your booking is confirmed.

Reference: {reference}
Date: {date} at {time}
Total: {total}
Paid so far: {paid}

Please quote your reference if you need to get in touch.
"#,
            reference = booking.reference_code,
            date = booking.booking_date,
            time = booking.booking_time.format("%H:%M"),
            total = booking.amount_total,
            paid = booking.amount_paid,
        );

        self.send_email(to, &subject, &body).await
    }

    /// Send a cancellation notice with the refund outcome
    pub async fn send_cancellation_notice(
        &self,
        to: &str,
        booking: &Booking,
        refund: &RefundResult,
    ) -> AppResult<()> {
        let subject = format!("Booking {} cancelled", booking.reference_code);
        let body = format!(
            r#"
Your booking {reference} has been cancelled.

Refund tier: {tier}
Refund amount: {amount}

Refunds are returned to the original payment method and can take a few
working days to appear.
"#,
            reference = booking.reference_code,
            tier = refund.tier,
            amount = refund.final_refund_amount,
        );

        self.send_email(to, &subject, &body).await
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Forecourt");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) = (
            &self.config.smtp_username,
            &self.config.smtp_password,
        ) {
            mailer_builder.credentials(Credentials::new(
                username.clone(),
                password.clone(),
            ))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        mailer
            .send(&email)
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
