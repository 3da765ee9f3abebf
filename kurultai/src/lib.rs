//! Kurultai is a fluent builder for `MongoDB` query expressions.
//!
//! ## Example
//!
//! ```
//! use kurultai::{ElemMatch, Expression};
//! use bson::doc;
//!
//! // Constrain fields one call at a time
//! let mut adults = Expression::new();
//! adults
//!     .where_greater_or_equal("age", 18)
//!     .where_not_empty("email");
//!
//! // Constraints on the same field accumulate
//! adults.where_less("age", 65);
//!
//! // Combine sub-expressions with `$or`, `$and` and `$nor`
//! let mut admin = Expression::new();
//! admin.r#where("role", "admin");
//!
//! let mut editor = Expression::new();
//! editor.r#where("role", "editor");
//!
//! let mut filter = Expression::new();
//! filter.merge(&adults).where_or([&admin, &editor]);
//!
//! // Match array elements
//! filter.where_elem_match(
//!     "sessions",
//!     ElemMatch::deferred(|session| {
//!         session.where_exists("expires_at");
//!     }),
//! )?;
//!
//! // Negate constraints field by field
//! let mut banned = Expression::new();
//! banned.r#where("status", "banned");
//! filter.where_not(&banned);
//!
//! assert_eq!(filter.as_document().get_document("status")?, &doc! { "$ne": "banned" });
//!
//! // Hand the document to the driver
//! let document: bson::Document = filter.into();
//! # let _ = document;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! With the `macros` feature (enabled by default), the same kind of filter can be
//! written declaratively:
//!
//! ```
//! # #[cfg(feature = "macros")]
//! # {
//! use bson::doc;
//!
//! let filter = kurultai::expression! {
//!     age: Gte(18),
//!     role: In(["admin", "editor"]),
//!     "address.city": "Ulaanbaatar",
//! };
//!
//! assert_eq!(
//!     filter.to_document(),
//!     doc! {
//!         "age": { "$gte": 18 },
//!         "role": { "$in": ["admin", "editor"] },
//!         "address.city": "Ulaanbaatar",
//!     }
//! );
//! # }
//! ```
//!
//! See [`guides`] module to learn more!

#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_errors_doc
)]

extern crate self as kurultai;

pub use bson;
#[cfg(feature = "macros")]
pub use kurultai_macros::{Fields, expression};

pub mod error;
pub mod expression;
pub mod geo;
pub mod guides;
pub mod operator;
pub mod types;

pub use error::{Error, Result};
pub use expression::{ElemMatch, Expression};
pub use geo::{Distance, Geometry, LineString, Point, Polygon};
pub use operator::FilterOperator;
pub use types::BsonType;
