/// ## Getting started
///
/// An [`Expression`](crate::Expression) owns a single BSON document. Each
/// constraint method builds a small fragment, merges it into that document and
/// returns the builder, so calls can be chained:
///
/// ```
/// use kurultai::Expression;
///
/// let mut expression = Expression::new();
/// expression
///     .where_greater("age", 18)
///     .where_like("name", "^kit", true)
///     .where_exists("email");
/// ```
///
/// The accumulated document can be read at any time with
/// [`to_document`](crate::Expression::to_document) (an owned copy),
/// [`as_document`](crate::Expression::as_document) (a shared borrow), or taken
/// with [`into_document`](crate::Expression::into_document). The result is a
/// plain [`bson::Document`], ready to be passed to the `mongodb` driver:
///
/// ```ignore
/// let users = db.collection::<User>("user").find(expression.into_document()).await?;
/// ```
///
/// ### Method overview
///
/// | Method                                        | Produces                                                 |
/// |-----------------------------------------------|----------------------------------------------------------|
/// | `r#where("name", "Kit")`                      | `{ name: "Kit" }`                                        |
/// | `where_greater("age", 5)`                     | `{ age: { $gt: 5 } }`                                    |
/// | `where_greater_or_equal("age", 5)`            | `{ age: { $gte: 5 } }`                                   |
/// | `where_less("age", 5)`                        | `{ age: { $lt: 5 } }`                                    |
/// | `where_less_or_equal("age", 5)`               | `{ age: { $lte: 5 } }`                                   |
/// | `where_not_equal("age", 5)`                   | `{ age: { $ne: 5 } }`                                    |
/// | `where_in("role", ["a", "b"])`                | `{ role: { $in: ["a", "b"] } }`                          |
/// | `where_not_in("role", ["a"])`                 | `{ role: { $nin: ["a"] } }`                              |
/// | `where_exists("email")`                       | `{ email: { $exists: true } }`                           |
/// | `where_not_exists("email")`                   | `{ email: { $exists: false } }`                          |
/// | `where_has_type("age", BsonType::Int32)`      | `{ age: { $type: 16 } }`                                 |
/// | `where_array("tags")`                         | `{ $where: "Array.isArray(this.tags)" }`                 |
/// | `where_js_condition("this.a > this.b")`       | `{ $where: "this.a > this.b" }`                          |
/// | `where_like("name", "^kit", true)`            | `{ name: { $regex: "^kit", $options: "i" } }`            |
/// | `where_all("tags", ["a", "b"])`               | `{ tags: { $all: ["a", "b"] } }`                         |
/// | `where_none_of("tags", ["a"])`                | `{ tags: { $not: { $all: ["a"] } } }`                    |
/// | `where_any("tags", ["a"])`                    | `{ tags: { $in: ["a"] } }`                               |
/// | `where_array_size("tags", 2)`                 | `{ tags: { $size: 2 } }`                                 |
/// | `where_elem_match("items", sub)?`             | `{ items: { $elemMatch: { ... } } }`                     |
/// | `where_elem_not_match("items", sub)?`         | `{ items: { $not: { $elemMatch: { ... } } } }`           |
/// | `where_empty("bio")`                          | `{ $or: [{ bio: null }, { bio: "" }, { bio: [] }, { bio: { $exists: false } }] }` |
/// | `where_not_empty("bio")`                      | the same four arms under `$nor`                          |
///
/// The typed shortcuts `where_double`, `where_string`, `where_object`,
/// `where_boolean`, `where_array_of_arrays`, `where_object_id`, `where_date` and
/// `where_null` forward to `where_has_type` with the matching
/// [`BsonType`](crate::BsonType).
mod getting_started {}

/// ## How constraints are merged
///
/// Everything goes through [`Expression::r#where`](crate::Expression::r#where).
/// When a field is constrained twice:
///
/// - if both values are documents, they are merged key by key, applying the same
///   rule one level deeper;
/// - if both values are arrays, the new elements are appended;
/// - otherwise the new value replaces the old one.
///
/// ```
/// use kurultai::Expression;
/// use bson::doc;
///
/// let mut expression = Expression::new();
/// expression.where_greater("age", 5).where_less("age", 10);
/// assert_eq!(expression.to_document(), doc! { "age": { "$gt": 5, "$lt": 10 } });
///
/// let mut expression = Expression::new();
/// expression.r#where("name", "A").r#where("name", "B");
/// assert_eq!(expression.to_document(), doc! { "name": "B" });
/// ```
///
/// The same operator on the same field is therefore replaced, not collected:
/// `where_greater("age", 5).where_greater("age", 7)` yields `{ age: { $gt: 7 } }`.
/// No attempt is made to simplify or validate the resulting document.
///
/// [`merge`](crate::Expression::merge) folds every entry of another expression
/// through the same rule.
mod merging {}

/// ## Logical combinators
///
/// [`where_or`](crate::Expression::where_or),
/// [`where_and`](crate::Expression::where_and) and
/// [`where_nor`](crate::Expression::where_nor) accept anything iterable over
/// expressions (owned or borrowed). Their documents are copied into an array
/// under `$or`, `$and` or `$nor`. Since arrays are appended on merge, repeated
/// calls add clauses:
///
/// ```
/// use kurultai::Expression;
/// use bson::doc;
///
/// let a = Expression::from(doc! { "a": 1 });
/// let b = Expression::from(doc! { "b": 2 });
///
/// let mut expression = Expression::new();
/// expression.where_or([&a]).where_or([&b]);
/// assert_eq!(expression.to_document(), doc! { "$or": [{ "a": 1 }, { "b": 2 }] });
/// ```
mod combinators {}

/// ## Negation
///
/// [`where_not`](crate::Expression::where_not) negates an expression field by
/// field:
///
/// - an operator document (every key a `$` operator) is wrapped in `$not`:
///   `{ age: { $gt: 5 } }` becomes `{ age: { $not: { $gt: 5 } } }`;
/// - a lone `$not` is unwrapped, so negating twice gives back the original
///   constraint: `{ tags: { $not: { $all: ["x"] } } }` becomes
///   `{ tags: { $all: ["x"] } }`;
/// - any other value, embedded documents included, becomes `$ne`:
///   `{ status: "active" }` becomes `{ status: { $ne: "active" } }`.
///
/// ```
/// use kurultai::Expression;
/// use bson::doc;
///
/// let mut sub = Expression::new();
/// sub.where_none_of("tags", ["x"]).r#where("address", doc! { "city": "X" });
///
/// let mut expression = Expression::new();
/// expression.where_not(&sub);
/// assert_eq!(
///     expression.to_document(),
///     doc! {
///         "tags": { "$all": ["x"] },
///         "address": { "$ne": { "city": "X" } },
///     }
/// );
/// ```
///
/// Negating `{ a: 1, b: 2 }` gives `{ a: { $ne: 1 }, b: { $ne: 2 } }`, which
/// matches documents where *neither* field matches, not documents where *at
/// least one* of them does not. Use [`where_nor`](crate::Expression::where_nor)
/// when the negation of the whole conjunction is needed.
///
/// Only field entries negate meaningfully. Top-level operators such as `$or`,
/// `$and`, `$nor` or `$where` are not fields, and negating an expression that
/// holds them does not produce a valid query. Wrap such an expression in
/// [`where_nor`](crate::Expression::where_nor) instead.
mod negation {}

/// ## Element match
///
/// [`where_elem_match`](crate::Expression::where_elem_match) accepts an
/// [`ElemMatch`](crate::ElemMatch), which can be built from a finished
/// expression, a closure that populates a fresh one, or a raw document:
///
/// ```
/// use kurultai::{ElemMatch, Expression};
/// use bson::doc;
///
/// let mut sub = Expression::new();
/// sub.where_greater("score", 8);
///
/// let mut a = Expression::new();
/// a.where_elem_match("results", &sub)?;
///
/// let mut b = Expression::new();
/// b.where_elem_match("results", ElemMatch::deferred(|sub| {
///     sub.where_greater("score", 8);
/// }))?;
///
/// let mut c = Expression::new();
/// c.where_elem_match("results", doc! { "score": { "$gt": 8 } })?;
///
/// assert_eq!(a, b);
/// assert_eq!(b, c);
/// # Ok::<(), kurultai::Error>(())
/// ```
///
/// A raw [`Bson`](bson::Bson) value that is not a document is rejected with
/// [`Error::MalformedArgument`](crate::Error::MalformedArgument), and the
/// expression is left as it was.
mod elem_match {}

/// ## Geospatial constraints
///
/// | Method                                              | Operator                         |
/// |-----------------------------------------------------|----------------------------------|
/// | `near_point("loc", [lng, lat], 500.0)`              | `$near` with `$maxDistance`      |
/// | `near_point("loc", [lng, lat], [100.0, 500.0])`     | `$near` with min and max         |
/// | `near_point_spherical("loc", [lng, lat], 500.0)`    | `$nearSphere`                    |
/// | `intersects("loc", &polygon)`                       | `$geoIntersects` + `$geometry`   |
/// | `within("loc", &polygon)`                           | `$geoWithin` + `$geometry`       |
/// | `within_circle("loc", [lng, lat], radius)`          | `$geoWithin` + `$center`         |
/// | `within_circle_spherical("loc", [lng, lat], rad)`   | `$geoWithin` + `$centerSphere`   |
/// | `within_box("loc", [x0, y0], [x1, y1])`             | `$geoWithin` + `$box`            |
/// | `within_polygon("loc", [[x, y], ...])`              | `$geoWithin` + `$polygon`        |
///
/// Distance bounds are described by [`Distance`](crate::Distance); a bound of
/// zero is left out of the query.
mod geospatial {}

/// ## Field enums and the `expression!` macro
///
/// Deriving [`Fields`](crate::Fields) generates a module named after the struct
/// (in `snake_case`) holding a `Fields` enum. Its variants convert into field
/// paths, and honor `#[serde(rename = "...")]`:
///
/// ```
/// # #[cfg(feature = "macros")]
/// # {
/// use kurultai::{Expression, Fields};
/// use serde::Serialize;
///
/// #[derive(Serialize, Fields)]
/// struct User {
///     #[serde(rename = "_id")]
///     id: u64,
///     name: String,
/// }
///
/// let mut expression = Expression::new();
/// expression.r#where(user::Fields::Id, 7).where_exists(user::Fields::Name);
///
/// assert_eq!(user::Fields::Id.as_str(), "_id");
///
/// // Keys are checked against `user::Fields`
/// let same: Expression = user::expression! {
///     id: 7,
///     name: Ne(bson::Bson::Null),
/// };
/// # let _ = same;
/// # }
/// ```
///
/// `kurultai::expression!` builds an expression without a field enum; keys are
/// idents or string literals. A bare value goes through `r#where`, while
/// `Eq`, `Ne`, `Gt`, `Gte`, `Lt`, `Lte`, `In` and `Nin` go through
/// [`where_operator`](crate::Expression::where_operator).
mod macros {}

/// This library is named "Kurultai" after the Mongol assembly that gathered every
/// voice before a decision was made.
mod naming {}
