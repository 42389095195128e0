// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains. Reading
//! these constants should tell you the story of how the system operates:
//! what grammar the note dump uses, where files go, which remote endpoints
//! are spoken to, and how long the one timeout in the program is.

// ---------------------------------------------------------------------------
// Note dump grammar
// ---------------------------------------------------------------------------

/// Marker opening each note in the `osascript` dump.
pub const NOTE_START_MARKER: &str = "---NOTE START---";

/// Marker closing each note in the `osascript` dump.
pub const NOTE_END_MARKER: &str = "---NOTE END---";

/// Title used for notes whose segment carries no `Title:` line.
pub const DEFAULT_NOTE_TITLE: &str = "Untitled";

/// The AppleScript handed to `osascript -e`.
///
/// Notes.app serializes every note as a start marker, a `Title:` line, a
/// `Body:` block, and an end marker. The `\n` escapes are interpreted by
/// AppleScript itself (string escapes since AppleScript 2.0), so the dump
/// arrives with real newlines between markers.
pub const NOTES_EXPORT_SCRIPT: &str = r#"
set output to ""
tell application "Notes"
    repeat with aNote in every note
        set noteName to the name of aNote
        set noteBody to the body of aNote
        set output to output & "---NOTE START---\n"
        set output to output & "Title: " & noteName & "\n"
        set output to output & "Body:\n" & noteBody & "\n"
        set output to output & "---NOTE END---\n"
    end repeat
end tell
return output
"#;

/// Binary that executes the export script.
pub const OSASCRIPT_BIN: &str = "osascript";

// ---------------------------------------------------------------------------
// Export boundaries
// ---------------------------------------------------------------------------

/// Maximum length, in characters, of a sanitized filename stem.
///
/// Long note titles are truncated here rather than rejected; the cap keeps
/// generated paths comfortably inside every filesystem's name limit.
pub const FILENAME_MAX_CHARS: usize = 100;

/// Extension given to every exported note file.
pub const EXPORT_FILE_EXTENSION: &str = "txt";

/// MIME type attached to every uploaded note file.
pub const EXPORT_MIME_TYPE: &str = "text/plain";

// ---------------------------------------------------------------------------
// Connectivity probe
// ---------------------------------------------------------------------------

/// URL probed once before the upload phase. Any HTTP response at all counts
/// as "online"; only transport failures count against reachability.
pub const CONNECTIVITY_PROBE_URL: &str = "https://www.google.com";

/// How long the connectivity probe waits before declaring the network down.
pub const CONNECTIVITY_TIMEOUT_SECS: u64 = 5;

// ---------------------------------------------------------------------------
// Google Drive API boundaries
// ---------------------------------------------------------------------------

/// Drive v3 multipart upload endpoint (metadata + content in one request).
pub const DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";

/// OAuth scope requested during authorization. `drive.file` grants access
/// only to files this tool creates, which is all the uploader needs.
pub const DRIVE_OAUTH_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

/// Authorization endpoint used when the client secrets file omits one.
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";

/// Token endpoint used when the client secrets file omits one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Redirect target for the console authorization flow. The browser lands on
/// a dead localhost page whose URL carries the authorization code the user
/// pastes back into the terminal.
pub const OAUTH_REDIRECT_URI: &str = "http://localhost";

/// Timeout applied to OAuth token-endpoint requests.
pub const OAUTH_HTTP_TIMEOUT_SECS: u64 = 30;

/// Access tokens within this many seconds of expiry are treated as expired,
/// so a token cannot lapse between the check and the upload that uses it.
pub const TOKEN_EXPIRY_SKEW_SECS: i64 = 60;

// ---------------------------------------------------------------------------
// Configuration defaults
// ---------------------------------------------------------------------------

/// Where exported note files land when nothing else is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "./exported-notes";

/// Per-user configuration directory, created under the home directory.
pub const CONFIG_DIR_NAME: &str = ".notes2drive";

/// Default file name for the persisted OAuth token.
pub const TOKEN_FILE_NAME: &str = "credentials.json";

/// Default file name for the Google client secrets.
pub const SECRETS_FILE_NAME: &str = "client_secrets.json";

/// Default file name for the append-only run log.
pub const LOG_FILE_NAME: &str = "notes2drive.log";

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing remote error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
