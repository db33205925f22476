//! Creature sizes understood by the tabletop application.
//!
//! Each size is identified inside `content.xml` by a fixed GUID owned by the
//! application's grid definitions. These values are reproduced as-is.

use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Token size on a square grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TokenSize {
    Fine,
    Diminutive,
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
    Gargantuan,
    Colossal,
}

impl TokenSize {
    /// All sizes, smallest first
    pub const ALL: [TokenSize; 9] = [
        TokenSize::Fine,
        TokenSize::Diminutive,
        TokenSize::Tiny,
        TokenSize::Small,
        TokenSize::Medium,
        TokenSize::Large,
        TokenSize::Huge,
        TokenSize::Gargantuan,
        TokenSize::Colossal,
    ];

    /// Display name, as accepted by `from_str`
    pub fn name(self) -> &'static str {
        match self {
            TokenSize::Fine => "Fine",
            TokenSize::Diminutive => "Diminutive",
            TokenSize::Tiny => "Tiny",
            TokenSize::Small => "Small",
            TokenSize::Medium => "Medium",
            TokenSize::Large => "Large",
            TokenSize::Huge => "Huge",
            TokenSize::Gargantuan => "Gargantuan",
            TokenSize::Colossal => "Colossal",
        }
    }

    /// Encoded size GUID written into `content.xml`
    pub fn guid(self) -> &'static str {
        match self {
            TokenSize::Fine => "fwABAc1lFSoBAAAAKgABAQ==",
            TokenSize::Diminutive => "fwABAc1lFSoCAAAAKgABAQ==",
            TokenSize::Tiny => "fwABAc5lFSoDAAAAKgABAA==",
            TokenSize::Small => "fwABAc5lFSoEAAAAKgABAA==",
            TokenSize::Medium => "fwABAc9lFSoFAAAAKgABAQ==",
            TokenSize::Large => "fwABAdBlFSoGAAAAKgABAA==",
            TokenSize::Huge => "fwABAdBlFSoHAAAAKgABAA==",
            TokenSize::Gargantuan => "fwABAdFlFSoIAAAAKgABAQ==",
            TokenSize::Colossal => "fwABAeFlFSoJAAAAKgABAQ==",
        }
    }
}

impl std::fmt::Display for TokenSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for TokenSize {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenSize::ALL
            .into_iter()
            .find(|size| size.name() == s)
            .ok_or_else(|| TokenError::UnknownSize(s.to_string()))
    }
}
