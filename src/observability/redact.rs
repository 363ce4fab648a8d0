//! Display wrappers that keep personal data and credentials out of logs.

use std::fmt;

const MASK: &str = "****";

/// Shows the international prefix and first digit only: `+2439****`.
pub struct MaskedPhone<'a>(pub &'a str);

impl fmt::Display for MaskedPhone<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.chars().count() <= 5 {
            return f.write_str(MASK);
        }
        let head: String = self.0.chars().take(5).collect();
        write!(f, "{head}{MASK}")
    }
}

/// Shows the last four characters only: `****0000`.
pub struct MaskedId<'a>(pub &'a str);

impl fmt::Display for MaskedId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.0.chars().count();
        if len <= 4 {
            return f.write_str(MASK);
        }
        let tail: String = self.0.chars().skip(len - 4).collect();
        write!(f, "{MASK}{tail}")
    }
}
