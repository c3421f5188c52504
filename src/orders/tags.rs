// src/orders/tags.rs

/// Tag that marks an order as cash-on-delivery.
pub const COD_TAG: &str = "COD";

/// True when the comma-separated `tags` list contains `target` as a whole token,
/// ignoring surrounding whitespace and case.
pub fn has_tag(tags: Option<&str>, target: &str) -> bool {
    let Some(tags) = tags else {
        return false;
    };
    let target = target.trim().to_lowercase();
    tags.split(',')
        .map(|t| t.trim().to_lowercase())
        .any(|t| !t.is_empty() && t == target)
}
