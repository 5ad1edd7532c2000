use serde_json::Value;

use v1cli_common::Colors;

use crate::commands::OutputFormat;

/// Trait for presenting output to the user.
///
/// Abstracts the output formatting so handlers support both human-readable
/// tables and JSON without duplicating logic.
pub trait Presenter {
    /// Present a success line.
    fn present_success(&self, message: &str);

    /// Present an error message.
    fn present_error(&self, message: &str);

    /// Present a structured value (for JSON output, shows the raw value).
    fn present_value(&self, value: &Value);

    /// Present a simple key-value pair.
    fn present_kv(&self, key: &str, value: &str);

    /// Present a bold header.
    fn present_header(&self, text: &str);

    /// Present a dim/info message.
    fn present_info(&self, message: &str);

    /// Present raw text without formatting.
    fn present_raw(&self, text: &str);
}

/// Text presenter for human-readable output.
pub struct TextPresenter;

impl Presenter for TextPresenter {
    fn present_success(&self, message: &str) {
        println!("{} {}", Colors::success("✓"), message);
    }

    fn present_error(&self, message: &str) {
        eprintln!("{} {}", Colors::error("Error:"), message);
    }

    fn present_value(&self, value: &Value) {
        if let Some(s) = value.as_str() {
            println!("{}", s);
        } else {
            println!(
                "{}",
                serde_json::to_string_pretty(value).unwrap_or_default()
            );
        }
    }

    fn present_kv(&self, key: &str, value: &str) {
        println!("{} {}", Colors::dim(&format!("{}:", key)), value);
    }

    fn present_header(&self, text: &str) {
        println!("{}", Colors::bold(text));
    }

    fn present_info(&self, message: &str) {
        println!("{}", Colors::dim(message));
    }

    fn present_raw(&self, text: &str) {
        println!("{}", text);
    }
}

/// JSON presenter: only structured values reach stdout.
pub struct JsonPresenter;

impl Presenter for JsonPresenter {
    fn present_success(&self, _message: &str) {}

    fn present_error(&self, message: &str) {
        eprintln!("{} {}", Colors::error("Error:"), message);
    }

    fn present_value(&self, value: &Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }

    fn present_kv(&self, _key: &str, _value: &str) {}

    fn present_header(&self, _text: &str) {}

    fn present_info(&self, _message: &str) {}

    fn present_raw(&self, _text: &str) {}
}

pub fn create_presenter(format: &OutputFormat) -> Box<dyn Presenter> {
    match format {
        OutputFormat::Table => Box::new(TextPresenter),
        OutputFormat::Json => Box::new(JsonPresenter),
    }
}
