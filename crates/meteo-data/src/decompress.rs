//! Transparent gzip decompression keyed on the file extension.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use meteo_core::error::{MeteoError, Result};

/// Extension of gzip-compressed archives.
pub const GZIP_EXTENSION: &str = "gz";

/// Returns `true` when `path` names a gzip-compressed archive.
pub fn is_compressed(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == GZIP_EXTENSION)
}

/// Wrap `raw` in a gzip decoder when `path` ends in `.gz`, otherwise buffer
/// it unchanged.
///
/// The gzip header is read before returning, so a corrupt header surfaces
/// here as [`MeteoError::Decompress`] rather than on the first line read.
pub fn open_reader<R: Read + 'static>(path: &Path, raw: R) -> Result<Box<dyn BufRead>> {
    if !is_compressed(path) {
        return Ok(Box::new(BufReader::new(raw)));
    }

    let mut decoder = BufReader::new(MultiGzDecoder::new(raw));
    decoder
        .fill_buf()
        .map_err(|source| MeteoError::Decompress {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Box::new(decoder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn read_all(mut reader: Box<dyn BufRead>) -> String {
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_is_compressed() {
        assert!(is_compressed(Path::new("meteo_data_archive_1.json.gz")));
        assert!(!is_compressed(Path::new("meteo_data_archive_1.json")));
        assert!(!is_compressed(Path::new("archive.gzip")));
        assert!(!is_compressed(Path::new("gz")));
    }

    #[test]
    fn test_plain_stream_passes_through() {
        let raw = Cursor::new(b"line one\nline two\n".to_vec());
        let reader = open_reader(Path::new("a.json"), raw).unwrap();
        assert_eq!(read_all(reader), "line one\nline two\n");
    }

    #[test]
    fn test_gzip_stream_is_decompressed() {
        let raw = Cursor::new(gzip(b"{\"xml\": \"<data/>\"}\n"));
        let reader = open_reader(Path::new("a.json.gz"), raw).unwrap();
        assert_eq!(read_all(reader), "{\"xml\": \"<data/>\"}\n");
    }

    #[test]
    fn test_concatenated_gzip_members_are_read() {
        let mut data = gzip(b"first\n");
        data.extend(gzip(b"second\n"));
        let reader = open_reader(Path::new("a.json.gz"), Cursor::new(data)).unwrap();
        assert_eq!(read_all(reader), "first\nsecond\n");
    }

    #[test]
    fn test_invalid_gzip_header_fails_on_open() {
        let raw = Cursor::new(b"this is not gzip at all".to_vec());
        let result = open_reader(Path::new("broken.json.gz"), raw);
        match result {
            Err(MeteoError::Decompress { path, .. }) => {
                assert_eq!(path, Path::new("broken.json.gz"));
            }
            Err(other) => panic!("expected Decompress error, got {other}"),
            Ok(_) => panic!("expected Decompress error, got a reader"),
        }
    }

    #[test]
    fn test_plain_extension_does_not_decompress_gzip_bytes() {
        let compressed = gzip(b"hello\n");
        let mut reader = open_reader(Path::new("a.json"), Cursor::new(compressed.clone())).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, compressed);
    }
}
