//! Secret-free copies of settings, safe to hand to logging.

use super::settings::Settings;

/// Returns a copy of `settings` with every secret field left neutral.
///
/// The copy starts from a fresh neutral instance and only non-secret fields
/// are copied into it, so nothing reachable from a secret field of the
/// source is reachable from the result. Secret fields are not replaced by a
/// placeholder; callers that want one write it themselves.
pub fn without_secrets<S: Settings>(settings: &S) -> S {
    let mut copy = S::neutral();
    for field in S::schema().fields().iter().filter(|f| !f.is_secret()) {
        copy.copy_field(settings, field.name());
    }
    copy
}
