//! Argument-list splitting (spec.md §4.2 item 1).
//!
//! A function header's parameter text is free-form, e.g.
//! `_1: i32, _2: &mut MyStruct`. Every parameter name has the fixed shape
//! `_<digits>`, so splitting reduces to a single lookahead: find each
//! `_<digits>:` marker and treat the text between it and the next marker (or
//! the end of the string) as the preceding parameter's type.

/// Split a header's parameter-list source into `(name, type)` pairs, in
/// declaration order. Never panics on malformed input — anything that
/// doesn't match the `_<digits>:` shape is simply not a marker.
pub fn split_params(src: &str) -> Vec<(String, String)> {
    let bytes = src.as_bytes();
    let mut markers = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'_' {
            let start = i;
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > start + 1 {
                let mut k = j;
                while k < bytes.len() && bytes[k] == b' ' {
                    k += 1;
                }
                if k < bytes.len() && bytes[k] == b':' {
                    markers.push((start, j, k + 1));
                    i = k + 1;
                    continue;
                }
            }
        }
        i += 1;
    }

    let mut out = Vec::new();
    for (idx, &(name_start, name_end, type_start)) in markers.iter().enumerate() {
        let name = src[name_start..name_end].to_string();
        let type_end = markers.get(idx + 1).map_or(src.len(), |&(s, _, _)| s);
        let ty = src[type_start..type_end]
            .trim()
            .trim_end_matches(',')
            .trim()
            .to_string();
        if ty.is_empty() {
            continue;
        }
        out.push((name, ty));
    }
    out
}
