//! Monster search.
//!
//! Free-text queries such as `type=dragon & cr>10` are parsed into clauses
//! and evaluated against the local monster compendium. Text comparisons are
//! case- and accent-insensitive.
//!
//! | Key | Example | Matches |
//! |---|---|---|
//! | *(none)* / `name=` | `lich` | name or index contains the text |
//! | `type=` | `type=undead` | creature type contains the text |
//! | `cr` | `cr>5`, `cr<1`, `cr=0.25` | numeric challenge rating comparison |
//! | `spell=` | `spell=fireball` | any resolved spell name or index |
//! | `legendary` | `legendary` | has legendary actions |
//! | `source=` | `source=monster manual` | source book contains the text |
//! | `edited` / `cloned` / `imported` | `edited` | local status |

pub mod cache;
pub mod engine;
pub mod error;
pub mod key;
pub mod latest;
pub mod normalize;
pub mod parser;
pub mod predicate;

pub use cache::MonsterSearchCache;
pub use engine::MonsterSearch;
pub use error::SearchError;
pub use key::{Operator, SearchKey, SearchValueType};
pub use latest::{LatestSearch, SearchUpdate};
pub use parser::{parse_query, SearchClause};
