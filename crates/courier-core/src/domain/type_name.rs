//! Readable type names for error messages and logs.
//!
//! `std::any::type_name` は `my_app::orders::PlaceOrder` のようなフルパスを返す。
//! Errors should say `PlaceOrder`, so module paths are stripped, including the
//! ones nested inside generic arguments.

/// Strip module paths from a fully-qualified type name.
///
/// `alloc::vec::Vec<my_app::Ping>` -> `Vec<Ping>`
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();

    for ch in full.chars() {
        match ch {
            // `::` の前は path なので捨てる
            ':' => segment.clear(),
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';' | '*' => {
                out.push_str(&segment);
                segment.clear();
                out.push(ch);
            }
            _ => segment.push(ch),
        }
    }
    out.push_str(&segment);
    out
}

/// `short_type_name` for a static type.
pub fn short_name_of<T: ?Sized>() -> String {
    short_type_name(std::any::type_name::<T>())
}
