//! Citation linking for a hierarchical text corpus.
//!
//! Given a mention such as `רש"י פרק יום טוב בביצה`, `Exodus 9:6,5` or `שם`,
//! already split into typed parts, find the structured reference(s) it denotes.
//!
//! ```text
//! RawRef ──▶ Linker::resolve_raw_ref ──▶ Vec<Resolution>
//!                   │                        ├─ Resolved(ResolvedRef)   Rashi on Beitzah 15b-23b
//!                   │                        └─ Ambiguous(..)           Tosefta Berakhot 1:1 | (Lieberman) 1:1
//!                   └─ Library (terms, schema trees, tries, DH index)
//! ```
//!
//! # Example
//! ```
//! use mekorot::{Lang, Library, Linker, Options, raw_ref};
//!
//! let linker = Linker::new(Library::sample(), Options::default());
//! let resolutions = linker.resolve_raw_ref(Lang::En, None, &raw_ref!(en, "@Exodus #9:#6~,#5")).unwrap();
//! let refs: Vec<String> = resolutions.iter().flat_map(|r| r.refs()).map(|r| r.normal()).collect();
//! assert_eq!(refs, vec!["Exodus 9:6", "Exodus 9:5"]);
//! ```

extern crate self as mekorot;

#[macro_use]
mod macros;
pub mod address;
mod api;
pub mod doc;
pub mod engine;
mod error;
pub mod legacy;
pub mod library;
pub mod normalize;
pub mod raw_ref;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use api::{LinkedRef, Linker, Options, ResolutionThoroughness};
pub use engine::{
    AmbiguousResolvedRef, ContextPart, ContextType, IbidHistory, MentionResult, PartRef, Resolution, ResolvedRef,
    RunMetrics, RunResult,
};
pub use error::{LegacyRefError, LibraryError, ResolutionError};
pub use library::Library;
pub use library::refs::Ref;
pub use raw_ref::{PartType, RawRef, RawRefPart};

/// Language of a mention and of the titles it is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    He,
    En,
}

impl Lang {
    pub fn code(self) -> &'static str {
        match self {
            Lang::He => "he",
            Lang::En => "en",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "he" | "hebrew" => Ok(Lang::He),
            "en" | "english" => Ok(Lang::En),
            other => Err(format!("unknown language '{other}' (expected he or en)")),
        }
    }
}
