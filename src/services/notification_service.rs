use crate::config::Config;
use crate::errors::AppError;
use lettre::{
    message::{header::ContentType, Attachment, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use std::fs;
use std::path::Path;
use tracing::info;

/// Emails the finished report as a PDF attachment over implicit TLS.
///
/// Subject and body templates substitute `{ticker}`. The pipeline treats any
/// error from here as non-fatal; this function only reports it.
pub fn send_report(cfg: &Config, pdf_path: &Path, ticker: &str) -> Result<(), AppError> {
    if !pdf_path.exists() {
        return Err(AppError::Mail(format!(
            "report attachment does not exist: {}",
            pdf_path.display()
        )));
    }
    let attachment_data = fs::read(pdf_path)?;
    let attachment_name = pdf_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{ticker}.pdf"));

    let subject = cfg.email_subject.replace("{ticker}", ticker);
    let body = cfg.email_body.replace("{ticker}", ticker);

    let pdf_type = ContentType::parse("application/pdf")
        .map_err(|e| AppError::Mail(format!("bad attachment content type: {e}")))?;

    let email = Message::builder()
        .from(cfg.smtp_user.parse().map_err(|e| {
            AppError::Mail(format!("invalid sender address {}: {e}", cfg.smtp_user))
        })?)
        .to(cfg.email_recipient.parse().map_err(|e| {
            AppError::Mail(format!(
                "invalid recipient address {}: {e}",
                cfg.email_recipient
            ))
        })?)
        .subject(&subject)
        .multipart(
            MultiPart::mixed()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(body),
                )
                .singlepart(Attachment::new(attachment_name).body(attachment_data, pdf_type)),
        )
        .map_err(|e| AppError::Mail(format!("failed to build email: {e}")))?;

    let creds = Credentials::new(cfg.smtp_user.clone(), cfg.smtp_password.clone());
    let mailer = SmtpTransport::relay(&cfg.smtp_server)
        .map_err(|e| AppError::Mail(format!("failed to create SMTP transport: {e}")))?
        .port(cfg.smtp_port)
        .credentials(creds)
        .build();

    info!(
        recipient = %cfg.email_recipient,
        server = %cfg.smtp_server,
        port = cfg.smtp_port,
        "sending report email"
    );
    mailer
        .send(&email)
        .map_err(|e| AppError::Mail(format!("SMTP send failed: {e}")))?;

    info!("report email sent");
    Ok(())
}
