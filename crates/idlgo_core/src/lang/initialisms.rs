//! Common initialisms that Go naming conventions spell in full caps (`UserID`, `APIKey`).

/// The initialism dictionary, upper-case spellings.
pub const COMMON_INITIALISMS: &[&str] = &[
    "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID", "IP", "JSON", "LHS", "QPS",
    "RAM", "RHS", "RPC", "SLA", "SMTP", "SSH", "TCP", "TLS", "TTL", "UDP", "UI", "UID", "UUID", "URI", "URL", "UTF8",
    "VM", "XML", "XSRF", "XSS",
];

/// Check whether an already upper-cased word is a known initialism.
///
/// ## Notes
/// - The lookup is exact; callers upper-case the candidate word first.
pub fn is_initialism(word: &str) -> bool {
    COMMON_INITIALISMS.contains(&word)
}
