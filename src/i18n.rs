use crate::error::CkeditError;
use fluent_templates::fluent_bundle::FluentValue;
use fluent_templates::{static_loader, Loader};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

static_loader! {
    static LOCALES = {
        locales: "locales",
        fallback_language: "en-US",
    };
}

pub fn localize_error(err: &CkeditError) -> String {
    let langid = resolve_language();
    match err {
        CkeditError::InvalidUrl(detail) => message_with_detail(&langid, "error-invalid-url", detail),
        CkeditError::Io(detail) => message_with_detail(&langid, "error-io", &detail.to_string()),
        CkeditError::Json(detail) => message_with_detail(&langid, "error-json", &detail.to_string()),
        CkeditError::Store(detail) => message_with_detail(&langid, "error-store", detail),
        CkeditError::UnknownDomain(domain) => {
            message_with_detail(&langid, "error-unknown-domain", domain)
        }
        CkeditError::AlreadyListening => LOCALES.lookup(&langid, "error-already-listening"),
        CkeditError::Config(detail) => message_with_detail(&langid, "error-config", detail),
        CkeditError::PermissionDenied(detail) => {
            message_with_detail(&langid, "error-permission-denied", detail)
        }
        CkeditError::FileNotFound(detail) => {
            message_with_detail(&langid, "error-file-not-found", detail)
        }
    }
}

fn message_with_detail(langid: &LanguageIdentifier, key: &str, detail: &str) -> String {
    let mut args = HashMap::new();
    args.insert("detail", FluentValue::from(detail));
    LOCALES.lookup_with_args(langid, key, &args)
}

fn resolve_language() -> LanguageIdentifier {
    for key in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(value) = std::env::var(key) {
            if let Some(lang) = normalize_lang(value) {
                if let Ok(langid) = lang.parse::<LanguageIdentifier>() {
                    return langid;
                }
            }
        }
    }
    "en-US".parse().expect("valid fallback language")
}

fn normalize_lang(value: String) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == "C" || value == "POSIX" {
        return None;
    }
    let value = value.split('.').next().unwrap_or(value);
    let value = value.replace('_', "-");
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::{localize_error, normalize_lang};
    use crate::error::CkeditError;

    #[test]
    fn normalize_lang_trims_and_normalizes() {
        assert_eq!(
            normalize_lang("ja_JP.UTF-8".to_string()),
            Some("ja-JP".to_string())
        );
        assert_eq!(normalize_lang("".to_string()), None);
        assert_eq!(normalize_lang("C".to_string()), None);
    }

    #[test]
    fn localize_error_includes_detail() {
        let err = CkeditError::UnknownDomain("example.com".to_string());
        let message = localize_error(&err);
        assert!(message.contains("example.com"));
    }
}
