use glob::{MatchOptions, Pattern, PatternError};

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// File name pattern as understood by SMB servers: `*` matches any run of
/// characters, `?` exactly one, everything else is literal and compared
/// case-insensitively.
#[derive(Debug, Clone)]
pub struct Wildcard(Pattern);

impl Wildcard {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let mut glob = String::with_capacity(pattern.len());
        let mut previous = None;

        for c in pattern.chars() {
            match c {
                '*' if previous == Some('*') => {}
                '*' | '?' => glob.push(c),
                _ => glob.push_str(&Pattern::escape(c.encode_utf8(&mut [0; 4]))),
            }
            previous = Some(c);
        }

        Pattern::new(&glob).map(Self)
    }

    pub fn matches(&self, name: &str) -> bool {
        self.0.matches_with(name, OPTIONS)
    }
}
