use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhonemeDiscrepancy {
    Substitution { expected: String, actual: String },
    Missing(String),
    Unexpected(String),
}

impl fmt::Display for PhonemeDiscrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substitution { expected, actual } => {
                write!(f, "Expected /{expected}/ but got /{actual}/")
            }
            Self::Missing(phoneme) => write!(f, "Missing phoneme /{phoneme}/"),
            Self::Unexpected(phoneme) => write!(f, "Unexpected phoneme /{phoneme}/"),
        }
    }
}

/// Index-by-index comparison of expected and actual phonemes.
///
/// This is positional, not an edit-distance alignment: one insertion or
/// deletion early on shifts every later position and reports each of them as
/// a substitution. The surplus tail of the longer sequence is reported as
/// missing (expected longer) or unexpected (actual longer), in order.
pub fn positional_discrepancies<S: AsRef<str>, T: AsRef<str>>(
    expected: &[S],
    actual: &[T],
) -> Vec<PhonemeDiscrepancy> {
    let mut out: Vec<PhonemeDiscrepancy> = expected
        .iter()
        .zip(actual.iter())
        .filter(|(e, a)| e.as_ref() != a.as_ref())
        .map(|(e, a)| PhonemeDiscrepancy::Substitution {
            expected: e.as_ref().to_string(),
            actual: a.as_ref().to_string(),
        })
        .collect();

    let paired = expected.len().min(actual.len());
    out.extend(
        expected[paired..]
            .iter()
            .map(|e| PhonemeDiscrepancy::Missing(e.as_ref().to_string())),
    );
    out.extend(
        actual[paired..]
            .iter()
            .map(|a| PhonemeDiscrepancy::Unexpected(a.as_ref().to_string())),
    );
    out
}
