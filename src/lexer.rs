use std::str;

/// Splits one sentence into its fields.
///
/// Unlike `strtok`-style tokenizers this one splits eagerly: an empty field
/// between two consecutive delimiters yields `""` instead of being skipped,
/// which is what keeps the positional NMEA fields aligned. Every `Tokenizer`
/// is scoped to the one string it was built over; starting a new tokenization
/// means building a new value, so tokenizations nest and restart freely.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    fields: str::Split<'a, &'a [char]>,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over `input`, splitting at every character in
    /// `delimiters`.
    pub fn new(input: &'a str, delimiters: &'a [char]) -> Tokenizer<'a> {
        Tokenizer {
            fields: input.split(delimiters),
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.fields.next()
    }
}

#[cfg(test)]
mod tests {
    use super::Tokenizer;

    const DELIMITERS: &[char] = &[',', '*'];

    #[test]
    fn empty_fields_are_kept() {
        let mut tk = Tokenizer::new("a,b,,c", DELIMITERS);
        assert_eq!(tk.next(), Some("a"));
        assert_eq!(tk.next(), Some("b"));
        assert_eq!(tk.next(), Some(""));
        assert_eq!(tk.next(), Some("c"));
        assert_eq!(tk.next(), None);
        assert_eq!(tk.next(), None);
    }

    #[test]
    fn both_delimiters_split() {
        let fields: Vec<_> = Tokenizer::new("GPGGA,545.4,M*47", DELIMITERS).collect();
        assert_eq!(fields, ["GPGGA", "545.4", "M", "47"]);
    }

    #[test]
    fn empty_input_yields_one_empty_field() {
        let mut tk = Tokenizer::new("", DELIMITERS);
        assert_eq!(tk.next(), Some(""));
        assert_eq!(tk.next(), None);
    }

    #[test]
    fn tokenizers_do_not_share_state() {
        let mut outer = Tokenizer::new("a,b", DELIMITERS);
        assert_eq!(outer.next(), Some("a"));
        // a nested tokenization must not disturb the outer one
        let inner: Vec<_> = Tokenizer::new("x,y", DELIMITERS).collect();
        assert_eq!(inner, ["x", "y"]);
        assert_eq!(outer.next(), Some("b"));
        assert_eq!(outer.next(), None);
    }
}
