use crate::errors::AppError;
use std::path::Path;
use std::process::Command;
use tracing::{error, info};

/// Converts the filled deck to PDF by running the configured converter
/// command. `{input}` and `{output}` in the command template are substituted
/// with the deck and PDF paths. Conversion is an essential step: any failure
/// is surfaced to the operator.
pub fn convert_to_pdf(cmd_template: &str, input: &Path, output: &Path) -> Result<(), AppError> {
    let rendered = cmd_template
        .replace("{input}", &input.to_string_lossy())
        .replace("{output}", &output.to_string_lossy());

    let mut parts = rendered.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| AppError::Export("empty converter command".to_string()))?;

    info!(command = %rendered, "converting deck to PDF");
    let status = Command::new(program)
        .args(parts)
        .status()
        .map_err(|e| AppError::Export(format!("failed to run converter: {e}")))?;

    if !status.success() {
        return Err(AppError::Export(format!(
            "converter exited with status {status}"
        )));
    }

    info!(path = %output.display(), "PDF created");
    Ok(())
}

/// Opens the PDF with the platform's default viewer. Best-effort: failures
/// are logged and never affect the run.
pub fn open_document(path: &Path) {
    let result = match std::env::consts::OS {
        "macos" => Command::new("open").arg(path).spawn(),
        "windows" => Command::new("cmd").args(["/C", "start", ""]).arg(path).spawn(),
        _ => Command::new("xdg-open").arg(path).spawn(),
    };

    match result {
        Ok(_) => info!(path = %path.display(), "opened document viewer"),
        Err(e) => error!(path = %path.display(), error = %e, "could not open document"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    #[cfg(unix)]
    fn successful_converter_run_is_ok() {
        let result = convert_to_pdf(
            "true {input} {output}",
            &PathBuf::from("in.json"),
            &PathBuf::from("out.pdf"),
        );
        assert!(result.is_ok());
    }

    #[test]
    #[cfg(unix)]
    fn failing_converter_surfaces_an_export_error() {
        let result = convert_to_pdf(
            "false {input} {output}",
            &PathBuf::from("in.json"),
            &PathBuf::from("out.pdf"),
        );
        assert!(matches!(result, Err(AppError::Export(_))));
    }

    #[test]
    fn missing_converter_binary_is_an_export_error() {
        let result = convert_to_pdf(
            "definitely-not-a-real-converter {input} {output}",
            &PathBuf::from("in.json"),
            &PathBuf::from("out.pdf"),
        );
        assert!(matches!(result, Err(AppError::Export(_))));
    }
}
