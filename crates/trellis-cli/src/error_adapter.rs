//! Error adapter for converting TrellisError to miette diagnostics.
//!
//! The library error type stays free of presentation concerns; this module
//! gives each variant a stable diagnostic code and, where one exists, a hint
//! for fixing the input.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use trellis::{ModelError, TrellisError};

/// Adapter rendering a [`TrellisError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a TrellisError);

impl ErrorAdapter<'_> {
    /// Stable diagnostic code for the wrapped error.
    pub fn code_str(&self) -> &'static str {
        match self.0 {
            TrellisError::Destroyed => "trellis::destroyed",
            TrellisError::Io(_) => "trellis::io",
            TrellisError::Json(_) => "trellis::json",
            TrellisError::Model(_) => "trellis::model",
            TrellisError::Export(_) => "trellis::export",
            TrellisError::Config(_) => "trellis::config",
            TrellisError::Rejected(_) => "trellis::rejected",
        }
    }

    fn help_str(&self) -> Option<&'static str> {
        match self.0 {
            TrellisError::Json(_) => Some("the input must be a diagram model in JSON format"),
            TrellisError::Model(ModelError::UnsupportedVersion(_)) => {
                Some("only models with a major version of 2 can be imported")
            }
            TrellisError::Model(ModelError::OwnershipCycle(_)) => {
                Some("every element's owner chain must end at a root element")
            }
            TrellisError::Model(_) => Some("every referenced id must name an existing element"),
            TrellisError::Config(_) => {
                Some("configuration files are TOML with `layout`, `interaction` and `style` tables")
            }
            _ => None,
        }
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help_str()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use trellis::{Rejection, identifier::Id, model::DiagramModel};

    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let cases = [
            (TrellisError::Destroyed, "trellis::destroyed"),
            (
                TrellisError::Io(io::Error::new(io::ErrorKind::NotFound, "gone")),
                "trellis::io",
            ),
            (
                TrellisError::Model(ModelError::DuplicateId(Id::new("a"))),
                "trellis::model",
            ),
            (TrellisError::Config("bad".to_string()), "trellis::config"),
            (TrellisError::Rejected(Rejection::ReadOnly), "trellis::rejected"),
        ];

        for (err, code) in &cases {
            let adapter = ErrorAdapter(err);
            assert_eq!(adapter.code().unwrap().to_string(), *code);
        }
    }

    #[test]
    fn test_json_error_has_help() {
        let json_err = DiagramModel::from_json("{").unwrap_err();
        let err = TrellisError::Json(json_err);
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code_str(), "trellis::json");
        assert!(adapter.help().is_some());
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_display_matches_wrapped_error() {
        let err = TrellisError::Model(ModelError::UnsupportedVersion("3.0".to_string()));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.to_string(), "Invalid model: unsupported model version `3.0`");
        assert!(adapter.help().unwrap().to_string().contains("version"));
    }
}
