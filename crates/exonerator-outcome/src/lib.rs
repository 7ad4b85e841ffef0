//! ExoneraTor-OUTCOME: turning validated inputs into an answer
//!
//! Every request ends in exactly one [`OutcomeState`]. The resolver is a
//! pure function of the two validated inputs, the lookup result and the
//! current date, so it can be tested without a backend.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use exonerator_core::{CanonicalAddress, LookupResult, ValidatedDate};
//! use exonerator_outcome::{resolve, OutcomeKind};
//!
//! let today = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
//! let address = CanonicalAddress::Invalid { raw: "999.1.1.1".to_string() };
//! let date = ValidatedDate::Empty;
//!
//! let state = resolve(&address, &date, None, today);
//! assert_eq!(state.kind(), OutcomeKind::MissingDate);
//!
//! let state = resolve(&CanonicalAddress::Empty, &ValidatedDate::Empty, Some(&LookupResult::Unreachable), today);
//! assert_eq!(state.kind(), OutcomeKind::StartPage);
//! ```

pub mod echo;
pub mod outcome;
pub mod resolver;

pub use echo::{truncate_echo, ELLIPSIS, MAX_ADDRESS_ECHO, MAX_DATE_ECHO};
pub use outcome::{OutcomeKind, OutcomeState, QueryEcho, RelatedAddress, Requery};
pub use resolver::resolve;
