use std::env;
use std::path::{Path, PathBuf};

/// Run configuration, collected once from the environment.
///
/// Path templates may contain `{ticker}`, which is substituted per run.
/// The converter command must contain `{input}` and `{output}`.
#[derive(Debug, Clone)]
pub struct Config {
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub output_deck: String,
    pub output_pdf: String,
    pub convert_cmd: String,
    pub open_pdf: bool,
    pub send_email: bool,

    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub email_recipient: String,
    pub email_subject: String,
    pub email_body: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            template_path: PathBuf::from(env_str("TEMPLATE_PATH", "template.json")),
            output_dir: PathBuf::from(env_str("OUTPUT_DIR", ".")),
            output_deck: env_str("OUTPUT_DECK", "{ticker}_report.json"),
            output_pdf: env_str("OUTPUT_PDF", "{ticker}_report.pdf"),
            convert_cmd: env_str("CONVERT_CMD", ""),
            open_pdf: env_bool("OPEN_PDF", true),
            send_email: env_bool("SEND_EMAIL", false),
            smtp_server: env_str("SMTP_SERVER", ""),
            smtp_port: env_u16("SMTP_PORT", 465),
            smtp_user: env_str("SMTP_USER", ""),
            smtp_password: env_str("SMTP_PASSWORD", ""),
            email_recipient: env_str("EMAIL_RECIPIENT", ""),
            email_subject: env_str("EMAIL_SUBJECT", "Equity report {ticker}"),
            email_body: env_str(
                "EMAIL_BODY",
                "Please find attached the equity report for {ticker}.",
            ),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.convert_cmd.is_empty() {
            return Err("CONVERT_CMD is not set".to_string());
        }
        if !self.convert_cmd.contains("{input}") || !self.convert_cmd.contains("{output}") {
            return Err("CONVERT_CMD must contain {input} and {output}".to_string());
        }
        if self.send_email {
            for (name, value) in [
                ("SMTP_SERVER", &self.smtp_server),
                ("SMTP_USER", &self.smtp_user),
                ("SMTP_PASSWORD", &self.smtp_password),
                ("EMAIL_RECIPIENT", &self.email_recipient),
            ] {
                if value.is_empty() {
                    return Err(format!("SEND_EMAIL is true but {name} is not set"));
                }
            }
        }
        Ok(())
    }

    pub fn deck_path(&self, ticker: &str) -> PathBuf {
        self.output_dir.join(self.output_deck.replace("{ticker}", ticker))
    }

    pub fn pdf_path(&self, ticker: &str) -> PathBuf {
        self.output_dir.join(self.output_pdf.replace("{ticker}", ticker))
    }

    pub fn chart_dir(&self) -> &Path {
        &self.output_dir
    }
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
