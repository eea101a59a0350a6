//! Cursor codec
//!
//! Format v1 is `<sequence_id>-<created_at epoch seconds>`. v1 tokens always
//! start with an ASCII digit; later formats must start with something else
//! so links already handed out keep decoding.
//!
//! Decoding is permissive: anything that is not a well-formed token decodes
//! to the origin cursor `(0, 0)`, which places no lower bound on the page.

use std::fmt;

use crate::person::Person;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub sequence_id: i64,
    pub created_at: i64,
}

impl Cursor {
    pub const ORIGIN: Cursor = Cursor {
        sequence_id: 0,
        created_at: 0,
    };

    pub fn new(sequence_id: i64, created_at: i64) -> Self {
        Self {
            sequence_id,
            created_at,
        }
    }

    /// Ordering key of a persisted person.
    pub fn from_person(person: &Person) -> Self {
        Self::new(person.seq_id, person.created_at_secs())
    }

    /// Cursor positioned after the last record of `page`.
    ///
    /// An empty page yields the empty token, meaning "no next page".
    pub fn encode_page(page: &[Person]) -> String {
        page.last()
            .map(|last| Self::from_person(last).encode())
            .unwrap_or_default()
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Decode a token, falling back to [`Cursor::ORIGIN`] on any malformation.
    pub fn decode(token: &str) -> Self {
        match token.as_bytes().first() {
            Some(b) if b.is_ascii_digit() => Self::decode_v1(token).unwrap_or(Self::ORIGIN),
            _ => Self::ORIGIN,
        }
    }

    fn decode_v1(token: &str) -> Option<Self> {
        let (id, secs) = token.split_once('-')?;
        let sequence_id = id.parse::<i64>().ok()?;
        let created_at = secs.parse::<i64>().ok()?;
        Some(Self::new(sequence_id, created_at))
    }

    /// The origin places no bound on the listing.
    pub fn is_origin(&self) -> bool {
        self.sequence_id == 0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.sequence_id, self.created_at)
    }
}
