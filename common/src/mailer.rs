use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use rand::Rng;

use crate::{
    env_config::EmailConfig,
    error::{AppError, Res},
};

const OTP_SUBJECT: &str = "Your salon booking verification code";

/// Delivers one-time passwords. Without SMTP settings the code is only logged.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<SmtpTransport>,
}

#[derive(Clone)]
struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl Mailer {
    pub fn new(config: Option<&EmailConfig>) -> Res<Self> {
        let Some(config) = config else {
            log::warn!("SMTP is not configured, one-time passwords will only be logged");
            return Ok(Self::disabled());
        };

        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        );
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| AppError::Mail(e.to_string()))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport: Some(SmtpTransport {
                mailer,
                from_address: config.from_address.clone(),
            }),
        })
    }

    pub fn disabled() -> Self {
        Self { transport: None }
    }

    pub async fn send_otp(&self, to: &str, otp: &str) -> Res<()> {
        let Some(transport) = &self.transport else {
            log::info!("OTP for {}: {}", to, otp);
            return Ok(());
        };

        let email = Message::builder()
            .from(
                transport
                    .from_address
                    .parse()
                    .map_err(|_| AppError::Mail(format!("Invalid sender {}", transport.from_address)))?,
            )
            .to(to
                .parse()
                .map_err(|_| AppError::Mail(format!("Invalid recipient {}", to)))?)
            .subject(OTP_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(format!("Your verification code is {}", otp))
            .map_err(|e| AppError::Mail(e.to_string()))?;

        transport
            .mailer
            .send(email)
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?;

        log::info!("OTP mail sent to {}", to);
        Ok(())
    }
}

/// Generate a 6-digit one-time password.
pub fn generate_otp() -> String {
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_is_six_digits() {
        for _ in 0..100 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn disabled_mailer_accepts_any_recipient() {
        let mailer = Mailer::disabled();
        assert!(mailer.send_otp("customer@example.com", "123456").await.is_ok());
    }
}
