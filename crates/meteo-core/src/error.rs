use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while ingesting meteo archives.
#[derive(Error, Debug)]
pub enum MeteoError {
    /// The directory walk below the data root could not continue.
    #[error("Failed to walk directory {path}: {source}")]
    DirectoryWalk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// An archive file could not be opened.
    #[error("Failed to open file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The gzip stream of an archive could not be initialised.
    #[error("Failed to initialise gzip decoder for {path}: {source}")]
    Decompress {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a line from an (optionally decompressed) archive failed.
    #[error("Failed to read line {line} of {path}: {source}")]
    LineRead {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// A line exceeded the maximum accepted length.
    #[error("Line {line} of {path} exceeds {limit} bytes")]
    LineTooLong {
        path: PathBuf,
        line: usize,
        limit: usize,
    },

    /// A decode error located at a specific line of an archive.
    #[error("Failed to decode line {line} of {path}: {source}")]
    Decode {
        path: PathBuf,
        line: usize,
        #[source]
        source: Box<MeteoError>,
    },

    /// The JSON envelope of an archive line could not be parsed.
    #[error("Failed to parse JSON envelope: {0}")]
    Envelope(#[from] serde_json::Error),

    /// The embedded XML document could not be decoded.
    #[error("Failed to decode XML document: {0}")]
    Markup(#[from] quick_xml::DeError),

    /// A numeric field held a value that is not a number.
    #[error("Invalid value for field {field}: {value:?}")]
    FieldParse { field: &'static str, value: String },

    /// A timestamp string did not match `D.M.YYYY H:MM ZONE`.
    #[error("Invalid timestamp {input:?}: {reason}")]
    TimestampParse { input: String, reason: String },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MeteoError {
    /// Returns `true` for errors raised while scanning or decoding the
    /// contents of a file, as opposed to discovery and open failures.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            MeteoError::LineRead { .. }
                | MeteoError::LineTooLong { .. }
                | MeteoError::Decode { .. }
                | MeteoError::Envelope(_)
                | MeteoError::Markup(_)
                | MeteoError::FieldParse { .. }
                | MeteoError::TimestampParse { .. }
        )
    }
}

/// Convenience alias used throughout the meteo crates.
pub type Result<T> = std::result::Result<T, MeteoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_open() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = MeteoError::FileOpen {
            path: PathBuf::from("/data/meteo_data_archive_1.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to open file"));
        assert!(msg.contains("/data/meteo_data_archive_1.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_timestamp_parse() {
        let err = MeteoError::TimestampParse {
            input: "2024-01-02".to_string(),
            reason: "bad layout".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid timestamp \"2024-01-02\": bad layout");
    }

    #[test]
    fn test_error_display_field_parse() {
        let err = MeteoError::FieldParse {
            field: "tavg",
            value: "n/a".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for field tavg: \"n/a\"");
    }

    #[test]
    fn test_error_display_line_too_long() {
        let err = MeteoError::LineTooLong {
            path: PathBuf::from("a.json"),
            line: 7,
            limit: 10,
        };
        assert_eq!(err.to_string(), "Line 7 of a.json exceeds 10 bytes");
    }

    #[test]
    fn test_error_display_decode_wraps_source() {
        let inner = MeteoError::FieldParse {
            field: "td",
            value: String::new(),
        };
        let err = MeteoError::Decode {
            path: PathBuf::from("a.json"),
            line: 3,
            source: Box::new(inner),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to decode line 3 of a.json"));
        assert!(msg.contains("td"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: MeteoError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON envelope"));
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_error_from_io_is_not_decode_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: MeteoError = io_err.into();
        assert!(err.to_string().contains("denied"));
        assert!(!err.is_decode_error());
    }

    #[test]
    fn test_access_errors_are_not_decode_errors() {
        let err = MeteoError::Decompress {
            path: PathBuf::from("a.json.gz"),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "invalid gzip header"),
        };
        assert!(!err.is_decode_error());
        assert!(!MeteoError::Config("x".to_string()).is_decode_error());
    }
}
