/// Identity key for a person: whitespace runs collapsed to one space, trimmed, uppercased.
pub fn normalize_name(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_and_uppercases() {
        assert_eq!(normalize_name("  jan   pereira "), "JAN PEREIRA");
        assert_eq!(normalize_name("JAN PEREIRA"), "JAN PEREIRA");
        assert_eq!(normalize_name("Ana\tMaría\nLópez"), "ANA MARÍA LÓPEZ");
        assert_eq!(normalize_name("   "), "");
    }
}
