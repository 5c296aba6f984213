//! Content-type resolution for blob bytes.
//!
//! Resolution is a fallback chain:
//!
//! 1. Match leading bytes against known file signatures, then map the
//!    detected extension to a MIME type.
//! 2. Try to parse the whole buffer as JSON (any value, primitives included).
//! 3. Fall back to `application/octet-stream`.
//!
//! The resolver never fails.

use serde::de::IgnoredAny;

/// MIME type for JSON bodies.
pub const JSON_MIME: &str = "application/json; charset=utf-8";

/// MIME type for bytes of unknown shape.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A magic-number entry: `magic` must appear at `offset`.
struct Signature {
    offset: usize,
    magic: &'static [u8],
    ext: &'static str,
}

const fn sig(offset: usize, magic: &'static [u8], ext: &'static str) -> Signature {
    Signature { offset, magic, ext }
}

/// Plain prefix signatures. Longer, more specific entries come first.
static SIGNATURES: &[Signature] = &[
    // images
    sig(0, b"\x89PNG\r\n\x1a\n", "png"),
    sig(0, b"\xff\xd8\xff", "jpg"),
    sig(0, b"GIF87a", "gif"),
    sig(0, b"GIF89a", "gif"),
    sig(0, b"BM", "bmp"),
    sig(0, b"\x00\x00\x01\x00", "ico"),
    sig(0, b"II*\x00", "tif"),
    sig(0, b"MM\x00*", "tif"),
    sig(0, b"8BPS", "psd"),
    sig(0, b"\x00\x00\x00\x0cjP  \r\n\x87\n", "jp2"),
    // audio
    sig(0, b"ID3", "mp3"),
    sig(0, b"\xff\xfb", "mp3"),
    sig(0, b"\xff\xf3", "mp3"),
    sig(0, b"\xff\xf2", "mp3"),
    sig(0, b"fLaC", "flac"),
    sig(0, b"MThd", "mid"),
    sig(0, b"#!AMR", "amr"),
    // video
    sig(0, b"\x1a\x45\xdf\xa3", "webm"),
    sig(0, b"FLV\x01", "flv"),
    sig(0, b"\x00\x00\x01\xba", "mpg"),
    sig(0, b"\x00\x00\x01\xb3", "mpg"),
    // documents and archives
    sig(0, b"%PDF-", "pdf"),
    sig(0, b"{\\rtf", "rtf"),
    sig(0, b"PK\x03\x04", "zip"),
    sig(0, b"PK\x05\x06", "zip"),
    sig(0, b"\x1f\x8b\x08", "gz"),
    sig(0, b"BZh", "bz2"),
    sig(0, b"7z\xbc\xaf\x27\x1c", "7z"),
    sig(0, b"Rar!\x1a\x07", "rar"),
    sig(0, b"\xfd7zXZ\x00", "xz"),
    sig(0, b"\x28\xb5\x2f\xfd", "zst"),
    sig(257, b"ustar", "tar"),
    sig(0, b"SQLite format 3\x00", "sqlite"),
    // fonts
    sig(0, b"wOFF", "woff"),
    sig(0, b"wOF2", "woff2"),
    sig(0, b"OTTO", "otf"),
    sig(0, b"\x00\x01\x00\x00\x00", "ttf"),
    // executables
    sig(0, b"\x00asm", "wasm"),
    sig(0, b"\x7fELF", "elf"),
    sig(0, b"MZ", "exe"),
];

/// Extension to MIME type.
static MIME_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("ico", "image/vnd.microsoft.icon"),
    ("tif", "image/tiff"),
    ("psd", "image/vnd.adobe.photoshop"),
    ("jp2", "image/jp2"),
    ("avif", "image/avif"),
    ("heic", "image/heic"),
    ("mp3", "audio/mpeg"),
    ("flac", "audio/flac"),
    ("ogg", "audio/ogg"),
    ("wav", "audio/wav"),
    ("mid", "audio/midi"),
    ("amr", "audio/amr"),
    ("m4a", "audio/mp4"),
    ("mp4", "video/mp4"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("avi", "video/x-msvideo"),
    ("flv", "video/x-flv"),
    ("mpg", "video/mpeg"),
    ("pdf", "application/pdf"),
    ("rtf", "application/rtf"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("bz2", "application/x-bzip2"),
    ("7z", "application/x-7z-compressed"),
    ("rar", "application/vnd.rar"),
    ("xz", "application/x-xz"),
    ("zst", "application/zstd"),
    ("tar", "application/x-tar"),
    ("sqlite", "application/vnd.sqlite3"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("otf", "font/otf"),
    ("ttf", "font/ttf"),
    ("wasm", "application/wasm"),
    ("elf", "application/x-elf"),
    ("exe", "application/x-msdownload"),
];

/// Detect a file extension from the leading bytes of `bytes`.
pub fn sniff_extension(bytes: &[u8]) -> Option<&'static str> {
    if let Some(ext) = sniff_container(bytes) {
        return Some(ext);
    }

    SIGNATURES
        .iter()
        .find(|s| {
            bytes
                .get(s.offset..s.offset + s.magic.len())
                .is_some_and(|window| window == s.magic)
        })
        .map(|s| s.ext)
}

/// Container formats whose subtype lives past a shared header.
fn sniff_container(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"RIFF") {
        return match bytes.get(8..12)? {
            b"WEBP" => Some("webp"),
            b"WAVE" => Some("wav"),
            b"AVI " => Some("avi"),
            _ => None,
        };
    }

    if bytes.starts_with(b"OggS") {
        return Some("ogg");
    }

    if bytes.get(4..8)? == b"ftyp" {
        return match bytes.get(8..12)? {
            b"avif" | b"avis" => Some("avif"),
            b"heic" | b"heix" | b"mif1" => Some("heic"),
            b"qt  " => Some("mov"),
            b"M4A " | b"M4B " => Some("m4a"),
            _ => Some("mp4"),
        };
    }

    None
}

/// Look up the MIME type for a file extension.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    MIME_TYPES
        .iter()
        .find(|(e, _)| e.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}

/// Resolve a MIME type for a byte buffer via the fallback chain.
pub fn resolve_type(bytes: &[u8]) -> &'static str {
    if let Some(mime) = sniff_extension(bytes).and_then(mime_for_extension) {
        return mime;
    }

    if serde_json::from_slice::<IgnoredAny>(bytes).is_ok() {
        return JSON_MIME;
    }

    OCTET_STREAM
}
