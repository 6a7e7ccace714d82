//! Declarative claims about the shape of a value, and an engine that checks
//! values against them.
//!
//! ```
//! use claim_check::{validate, Claim, Field, Lookup, Validation, Value};
//! use serde_json::json;
//!
//! let claim = Claim::record([
//!     Field::discriminant("kind", Claim::constant("point")),
//!     Field::reference("x", "coordinate"),
//!     Field::reference("y", "coordinate"),
//! ]);
//! let lookup = Lookup::new().with("coordinate", Claim::integer());
//!
//! let value = Value::from(json!({"kind": "point", "x": 1, "y": 2.5}));
//! let validation = validate(&claim, &value, &lookup).unwrap();
//! let Validation::KeyedValidations { validations } = validation else { unreachable!() };
//! assert_eq!(validations["y"], Validation::NotInteger { actual: 2.5 });
//! ```
pub mod claim;
pub mod error;
pub mod lookup;
pub mod path_de;
pub mod report;
pub mod validate;
pub mod validation;
pub mod value;

pub use claim::{Bound, Claim, Constant, Field, NumberRange, StringFormat, StringRange};
pub use error::{DecodeError, ValidateError};
pub use lookup::Lookup;
pub use report::Report;
pub use validate::validate;
pub use validation::{Path, Segment, Validation};
pub use value::{Instance, TypeOf, Value};
