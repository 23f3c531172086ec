//! Runtime method IDs
//!
//! Stable identifiers of the methods the bytecode backend may invoke. The
//! runtime dispatches on these, so a value must never be reused.
//!
//! IDs are grouped by owner:
//! - 0x01xx: Lists
//! - 0x02xx: Math
//! - 0x03xx: Strings
//! - 0x04xx: Sanitizers

// ============================================================================
// Lists (0x01xx)
// ============================================================================

/// `Lists.flat(list)`
pub const LISTS_FLAT: u16 = 0x0100;
/// `Lists.flat(list, depth)`
pub const LISTS_FLAT_DEPTH: u16 = 0x0101;
/// `list.size()`
pub const LIST_SIZE: u16 = 0x0102;

// ============================================================================
// Math (0x02xx)
// ============================================================================

/// `Math.max(a, b)`
pub const MATH_MAX: u16 = 0x0200;
/// `Math.min(a, b)`
pub const MATH_MIN: u16 = 0x0201;
/// `Math.round(x)`
pub const MATH_ROUND: u16 = 0x0202;
/// `Math.round(x, digits)`
pub const MATH_ROUND_DIGITS: u16 = 0x0203;

// ============================================================================
// Strings (0x03xx)
// ============================================================================

/// `Strings.contains(haystack, needle)`
pub const STRINGS_CONTAINS: u16 = 0x0300;

// ============================================================================
// Sanitizers (0x04xx)
// ============================================================================

/// `Sanitizers.escapeHtml(value)`
pub const SANITIZERS_ESCAPE_HTML: u16 = 0x0400;
/// `Sanitizers.cleanHtml(value)`
pub const SANITIZERS_CLEAN_HTML: u16 = 0x0401;
/// `Sanitizers.cleanHtml(value, tags)`
pub const SANITIZERS_CLEAN_HTML_TAGS: u16 = 0x0402;

/// Human-readable name of a method ID, for diagnostics.
pub fn method_name(id: u16) -> &'static str {
    match id {
        LISTS_FLAT | LISTS_FLAT_DEPTH => "Lists.flat",
        LIST_SIZE => "List.size",
        MATH_MAX => "Math.max",
        MATH_MIN => "Math.min",
        MATH_ROUND | MATH_ROUND_DIGITS => "Math.round",
        STRINGS_CONTAINS => "Strings.contains",
        SANITIZERS_ESCAPE_HTML => "Sanitizers.escapeHtml",
        SANITIZERS_CLEAN_HTML | SANITIZERS_CLEAN_HTML_TAGS => "Sanitizers.cleanHtml",
        _ => "unknown",
    }
}
