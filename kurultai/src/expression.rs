use crate::{
    error::{Error, Result},
    geo::{Distance, Geometry, Point},
    operator::{FilterOperator, fragment, keyword},
    types::BsonType,
};
use bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt::Display};
use tracing::{debug, trace};

/// A fluent builder for `MongoDB` query documents.
///
/// Every constraint method merges a fragment into the accumulated document
/// with [`Expression::r#where`] and returns the builder, so calls can be
/// chained:
///
/// ```
/// use kurultai::Expression;
/// use bson::doc;
///
/// let mut expression = Expression::new();
/// expression
///     .where_greater("age", 18)
///     .where_less("age", 65)
///     .where_in("role", ["admin", "editor"]);
///
/// assert_eq!(
///     expression.to_document(),
///     doc! {
///         "age": { "$gt": 18, "$lt": 65 },
///         "role": { "$in": ["admin", "editor"] },
///     }
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression {
    document: Document,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `value` into the document under `field`.
    ///
    /// When both the stored value and `value` are documents, they are merged
    /// key by key with this same rule one level deeper. When both are arrays,
    /// `value` is appended to the stored array. In every other case `value`
    /// replaces what was stored.
    pub fn r#where(&mut self, field: impl Into<String>, value: impl Into<Bson>) -> &mut Self {
        let field: String = field.into();
        let value: Bson = value.into();

        match self.document.get_mut(&field) {
            Some(current) => {
                trace!(%field, "merging into existing key");
                merge_value(current, value);
            }
            None => {
                trace!(%field, "inserting key");
                self.document.insert(field, value);
            }
        }

        self
    }

    pub fn where_operator<T: Into<Bson>>(
        &mut self,
        field: impl Into<String>,
        operator: FilterOperator<T>,
    ) -> &mut Self {
        self.r#where(field, operator.into_document())
    }

    pub fn where_greater(&mut self, field: impl Into<String>, value: impl Into<Bson>) -> &mut Self {
        self.where_operator(field, FilterOperator::Gt(value))
    }

    pub fn where_greater_or_equal(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Bson>,
    ) -> &mut Self {
        self.where_operator(field, FilterOperator::Gte(value))
    }

    pub fn where_less(&mut self, field: impl Into<String>, value: impl Into<Bson>) -> &mut Self {
        self.where_operator(field, FilterOperator::Lt(value))
    }

    pub fn where_less_or_equal(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Bson>,
    ) -> &mut Self {
        self.where_operator(field, FilterOperator::Lte(value))
    }

    pub fn where_not_equal(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Bson>,
    ) -> &mut Self {
        self.where_operator(field, FilterOperator::Ne(value))
    }

    pub fn where_in<T: Into<Bson>>(
        &mut self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.where_operator(field, FilterOperator::In(values.into_iter().collect()))
    }

    pub fn where_not_in<T: Into<Bson>>(
        &mut self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.where_operator(field, FilterOperator::Nin(values.into_iter().collect()))
    }

    pub fn where_exists(&mut self, field: impl Into<String>) -> &mut Self {
        self.r#where(field, fragment(keyword::EXISTS, true))
    }

    pub fn where_not_exists(&mut self, field: impl Into<String>) -> &mut Self {
        self.r#where(field, fragment(keyword::EXISTS, false))
    }

    /// Accepts a [`BsonType`] or a raw numeric tag.
    pub fn where_has_type(
        &mut self,
        field: impl Into<String>,
        type_tag: impl Into<i32>,
    ) -> &mut Self {
        let type_tag: i32 = type_tag.into();
        self.r#where(field, fragment(keyword::TYPE, type_tag))
    }

    pub fn where_double(&mut self, field: impl Into<String>) -> &mut Self {
        self.where_has_type(field, BsonType::Double)
    }

    pub fn where_string(&mut self, field: impl Into<String>) -> &mut Self {
        self.where_has_type(field, BsonType::String)
    }

    pub fn where_object(&mut self, field: impl Into<String>) -> &mut Self {
        self.where_has_type(field, BsonType::Object)
    }

    pub fn where_boolean(&mut self, field: impl Into<String>) -> &mut Self {
        self.where_has_type(field, BsonType::Boolean)
    }

    /// Matches documents where `field` holds an array.
    ///
    /// `$type: 4` on an array field tests the array's elements rather than the
    /// field itself, so this goes through a `$where` condition instead. Note
    /// that a builder holds a single `$where` condition: a later
    /// [`where_js_condition`](Self::where_js_condition) replaces this one.
    pub fn where_array(&mut self, field: impl Into<String>) -> &mut Self {
        let field: String = field.into();
        self.where_js_condition(format!("Array.isArray(this.{field})"))
    }

    pub fn where_array_of_arrays(&mut self, field: impl Into<String>) -> &mut Self {
        self.where_has_type(field, BsonType::Array)
    }

    pub fn where_object_id(&mut self, field: impl Into<String>) -> &mut Self {
        self.where_has_type(field, BsonType::ObjectId)
    }

    pub fn where_date(&mut self, field: impl Into<String>) -> &mut Self {
        self.where_has_type(field, BsonType::Date)
    }

    pub fn where_null(&mut self, field: impl Into<String>) -> &mut Self {
        self.where_has_type(field, BsonType::Null)
    }

    /// Adds a `$where` JavaScript condition. The condition is opaque to the builder.
    pub fn where_js_condition(&mut self, condition: impl Into<String>) -> &mut Self {
        let condition: String = condition.into();
        self.r#where(keyword::WHERE, condition)
    }

    pub fn where_like(
        &mut self,
        field: impl Into<String>,
        regex: impl Into<String>,
        case_insensitive: bool,
    ) -> &mut Self {
        let regex: String = regex.into();
        let mut like = fragment(keyword::REGEX, regex);
        like.insert(keyword::OPTIONS, if case_insensitive { "i" } else { "" });

        self.r#where(field, like)
    }

    pub fn where_all<T: Into<Bson>>(
        &mut self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.r#where(field, fragment(keyword::ALL, bson_array(values)))
    }

    pub fn where_none_of<T: Into<Bson>>(
        &mut self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        let all = fragment(keyword::ALL, bson_array(values));
        self.r#where(field, fragment(keyword::NOT, all))
    }

    pub fn where_any<T: Into<Bson>>(
        &mut self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.where_in(field, values)
    }

    pub fn where_array_size(&mut self, field: impl Into<String>, length: i64) -> &mut Self {
        self.r#where(field, fragment(keyword::SIZE, length))
    }

    /// Matches documents where at least one element of the array `field`
    /// satisfies `expression`.
    ///
    /// Fails with [`Error::MalformedArgument`] if a raw [`Bson`] value that is
    /// not a document is passed. The builder is left untouched in that case.
    pub fn where_elem_match<'a>(
        &mut self,
        field: impl Into<String>,
        expression: impl Into<ElemMatch<'a>>,
    ) -> Result<&mut Self> {
        let field: String = field.into();
        let expression: ElemMatch<'a> = expression.into();
        let condition = expression.into_document().inspect_err(|error| {
            debug!(%field, %error, "rejected $elemMatch argument");
        })?;

        Ok(self.r#where(field, fragment(keyword::ELEM_MATCH, condition)))
    }

    pub fn where_elem_not_match<'a>(
        &mut self,
        field: impl Into<String>,
        expression: impl Into<ElemMatch<'a>>,
    ) -> Result<&mut Self> {
        let mut elem_match = Self::new();
        elem_match.where_elem_match(field, expression)?;

        Ok(self.where_not(&elem_match))
    }

    /// Matches documents where `field` is null, an empty string, an empty
    /// array or missing.
    pub fn where_empty(&mut self, field: impl Into<String>) -> &mut Self {
        let field: String = field.into();
        self.where_or(&empty_value_arms(&field))
    }

    /// The negation of [`where_empty`](Self::where_empty), expressed with `$nor`.
    pub fn where_not_empty(&mut self, field: impl Into<String>) -> &mut Self {
        let field: String = field.into();
        self.where_nor(&empty_value_arms(&field))
    }

    /// Adds the given expressions to the `$or` clause.
    ///
    /// Repeated calls append to the clause rather than replacing it.
    pub fn where_or<I>(&mut self, expressions: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Borrow<Expression>,
    {
        self.combine(keyword::OR, expressions)
    }

    pub fn where_and<I>(&mut self, expressions: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Borrow<Expression>,
    {
        self.combine(keyword::AND, expressions)
    }

    pub fn where_nor<I>(&mut self, expressions: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Borrow<Expression>,
    {
        self.combine(keyword::NOR, expressions)
    }

    fn combine<I>(&mut self, operator: &str, expressions: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Borrow<Expression>,
    {
        let clauses = expressions
            .into_iter()
            .map(|expression| Bson::Document(expression.borrow().to_document()))
            .collect::<Vec<_>>();

        self.r#where(operator, clauses)
    }

    /// Merges the negation of every field constraint of `expression`.
    ///
    /// Each field is negated on its own. An operator fragment (a non-empty
    /// document whose keys are all `$` operators) is wrapped in `$not`, and a
    /// fragment that is already a lone `$not` is unwrapped instead. Any other
    /// value, embedded documents included, becomes `$ne`. Negating an
    /// expression that constrains several fields therefore yields the
    /// conjunction of the negated constraints, not the negation of their
    /// conjunction.
    ///
    /// Only field entries negate meaningfully. Top-level operators such as
    /// `$or` or `$where` are not fields; use [`where_nor`](Self::where_nor) to
    /// negate them.
    pub fn where_not(&mut self, expression: &Expression) -> &mut Self {
        for (field, value) in &expression.document {
            let negated = match value {
                Bson::Document(constraint) if is_operator_fragment(constraint) => {
                    if let Some(inner) = single_not(constraint) {
                        debug!(%field, "unwrapping $not");
                        inner.clone()
                    } else {
                        debug!(%field, "negating with $not");
                        Bson::Document(fragment(keyword::NOT, constraint.clone()))
                    }
                }
                value => {
                    debug!(%field, "negating with $ne");
                    Bson::Document(fragment(keyword::NE, value.clone()))
                }
            };

            self.r#where(field.as_str(), negated);
        }

        self
    }

    pub fn near_point(
        &mut self,
        field: impl Into<String>,
        point: impl Into<Point>,
        distance: impl Into<Distance>,
    ) -> &mut Self {
        self.near(keyword::NEAR, field, point.into(), distance.into())
    }

    pub fn near_point_spherical(
        &mut self,
        field: impl Into<String>,
        point: impl Into<Point>,
        distance: impl Into<Distance>,
    ) -> &mut Self {
        self.near(keyword::NEAR_SPHERE, field, point.into(), distance.into())
    }

    fn near(
        &mut self,
        operator: &str,
        field: impl Into<String>,
        point: Point,
        distance: Distance,
    ) -> &mut Self {
        let mut near = fragment(keyword::GEOMETRY, point.to_geojson());

        let (min, max) = distance.bounds();
        if let Some(min) = min {
            near.insert(keyword::MIN_DISTANCE, min);
        }
        if let Some(max) = max {
            near.insert(keyword::MAX_DISTANCE, max);
        }

        self.r#where(field, fragment(operator, near))
    }

    pub fn intersects(&mut self, field: impl Into<String>, geometry: &impl Geometry) -> &mut Self {
        let intersects = fragment(keyword::GEOMETRY, geometry.to_geojson());
        self.r#where(field, fragment(keyword::GEO_INTERSECTS, intersects))
    }

    pub fn within(&mut self, field: impl Into<String>, geometry: &impl Geometry) -> &mut Self {
        self.geo_within(field, keyword::GEOMETRY, geometry.to_geojson())
    }

    /// Legacy-coordinate circle on a flat surface. `radius` is in coordinate units.
    pub fn within_circle(
        &mut self,
        field: impl Into<String>,
        center: impl Into<Point>,
        radius: f64,
    ) -> &mut Self {
        let center: Point = center.into();
        let circle = vec![center.position(), Bson::Double(radius)];
        self.geo_within(field, keyword::CENTER, circle)
    }

    /// Circle on a sphere. `radius` is in radians.
    pub fn within_circle_spherical(
        &mut self,
        field: impl Into<String>,
        center: impl Into<Point>,
        radius: f64,
    ) -> &mut Self {
        let center: Point = center.into();
        let circle = vec![center.position(), Bson::Double(radius)];
        self.geo_within(field, keyword::CENTER_SPHERE, circle)
    }

    pub fn within_box(
        &mut self,
        field: impl Into<String>,
        bottom_left: impl Into<Point>,
        upper_right: impl Into<Point>,
    ) -> &mut Self {
        let bottom_left: Point = bottom_left.into();
        let upper_right: Point = upper_right.into();
        let corners = vec![bottom_left.position(), upper_right.position()];
        self.geo_within(field, keyword::BOX, corners)
    }

    pub fn within_polygon<P: Into<Point>>(
        &mut self,
        field: impl Into<String>,
        points: impl IntoIterator<Item = P>,
    ) -> &mut Self {
        let vertices = points
            .into_iter()
            .map(|point| Point::position(point.into()))
            .collect::<Vec<_>>();
        self.geo_within(field, keyword::POLYGON, vertices)
    }

    fn geo_within(
        &mut self,
        field: impl Into<String>,
        shape: &str,
        value: impl Into<Bson>,
    ) -> &mut Self {
        self.r#where(field, fragment(keyword::GEO_WITHIN, fragment(shape, value)))
    }

    /// Folds every entry of `other` through [`Expression::r#where`].
    pub fn merge(&mut self, other: &Expression) -> &mut Self {
        self.extend(other.document.clone());
        self
    }

    /// Returns a copy of the accumulated document.
    pub fn to_document(&self) -> Document {
        self.document.clone()
    }

    pub fn as_document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }
}

impl From<Document> for Expression {
    fn from(document: Document) -> Self {
        Self { document }
    }
}

impl From<Expression> for Document {
    fn from(expression: Expression) -> Self {
        expression.document
    }
}

impl From<Expression> for Bson {
    fn from(expression: Expression) -> Self {
        Bson::Document(expression.document)
    }
}

impl<K: Into<String>, V: Into<Bson>> Extend<(K, V)> for Expression {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (field, value) in iter {
            self.r#where(field, value);
        }
    }
}

impl<K: Into<String>, V: Into<Bson>> FromIterator<(K, V)> for Expression {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut expression = Self::new();
        expression.extend(iter);
        expression
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.document)
    }
}

/// The argument of [`Expression::where_elem_match`].
pub enum ElemMatch<'a> {
    /// A finished sub-expression.
    Expression(Expression),
    /// Called with a fresh builder that it should populate.
    Deferred(Box<dyn FnOnce(&mut Expression) + 'a>),
    /// A raw value. Only documents are accepted.
    Raw(Bson),
}

impl<'a> ElemMatch<'a> {
    pub fn deferred(build: impl FnOnce(&mut Expression) + 'a) -> Self {
        Self::Deferred(Box::new(build))
    }

    pub fn into_document(self) -> Result<Document> {
        match self {
            Self::Expression(expression) => Ok(expression.into_document()),
            Self::Deferred(build) => {
                let mut expression = Expression::new();
                build(&mut expression);
                Ok(expression.into_document())
            }
            Self::Raw(Bson::Document(document)) => Ok(document),
            Self::Raw(other) => Err(Error::malformed_argument(format!(
                "$elemMatch expects a document, got {:?}",
                other.element_type()
            ))),
        }
    }
}

impl std::fmt::Debug for ElemMatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expression(expression) => f.debug_tuple("Expression").field(expression).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
            Self::Raw(bson) => f.debug_tuple("Raw").field(bson).finish(),
        }
    }
}

impl From<Expression> for ElemMatch<'_> {
    fn from(value: Expression) -> Self {
        Self::Expression(value)
    }
}

impl From<&Expression> for ElemMatch<'_> {
    fn from(value: &Expression) -> Self {
        Self::Expression(value.clone())
    }
}

impl From<Document> for ElemMatch<'_> {
    fn from(value: Document) -> Self {
        Self::Raw(Bson::Document(value))
    }
}

impl From<Bson> for ElemMatch<'_> {
    fn from(value: Bson) -> Self {
        Self::Raw(value)
    }
}

fn merge_value(current: &mut Bson, incoming: Bson) {
    match (current, incoming) {
        (Bson::Document(current), Bson::Document(incoming)) => {
            for (key, value) in incoming {
                match current.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        current.insert(key, value);
                    }
                }
            }
        }
        (Bson::Array(current), Bson::Array(incoming)) => current.extend(incoming),
        (current, incoming) => *current = incoming,
    }
}

fn is_operator_fragment(document: &Document) -> bool {
    !document.is_empty() && document.keys().all(|key| key.starts_with('$'))
}

fn single_not(document: &Document) -> Option<&Bson> {
    match document.len() {
        1 => document.get(keyword::NOT),
        _ => None,
    }
}

fn bson_array<T: Into<Bson>>(values: impl IntoIterator<Item = T>) -> Bson {
    Bson::Array(values.into_iter().map(Into::into).collect())
}

fn empty_value_arms(field: &str) -> [Expression; 4] {
    let arm = |value: Bson| {
        let mut expression = Expression::new();
        expression.r#where(field, value);
        expression
    };

    [
        arm(Bson::Null),
        arm(Bson::String(String::new())),
        arm(Bson::Array(Vec::new())),
        arm(Bson::Document(fragment(keyword::EXISTS, false))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Polygon;
    use bson::doc;

    #[test]
    fn same_field_constraints_accumulate() {
        let mut expression = Expression::new();
        expression
            .r#where("age", doc! { "$gt": 5 })
            .r#where("age", doc! { "$lt": 10 });

        assert_eq!(
            expression.to_document(),
            doc! { "age": { "$gt": 5, "$lt": 10 } }
        );
    }

    #[test]
    fn scalar_collision_replaces() {
        let mut expression = Expression::new();
        expression.r#where("name", "A").r#where("name", "B");

        assert_eq!(expression.to_document(), doc! { "name": "B" });
    }

    #[test]
    fn scalar_and_fragment_replace_each_other() {
        let mut expression = Expression::new();
        expression.r#where("age", 5).where_greater("age", 3);
        assert_eq!(expression.to_document(), doc! { "age": { "$gt": 3 } });

        expression.r#where("age", 7);
        assert_eq!(expression.to_document(), doc! { "age": 7 });
    }

    #[test]
    fn overlapping_operator_is_replaced_one_level_deeper() {
        let mut expression = Expression::new();
        expression.where_greater("age", 5).where_greater("age", 7);

        assert_eq!(expression.to_document(), doc! { "age": { "$gt": 7 } });
    }

    #[test]
    fn nested_arrays_concatenate() {
        let mut expression = Expression::new();
        expression
            .where_in("tag", ["a", "b"])
            .where_in("tag", ["b", "c"]);

        assert_eq!(
            expression.to_document(),
            doc! { "tag": { "$in": ["a", "b", "b", "c"] } }
        );
    }

    #[test]
    fn mixed_containers_replace() {
        let mut expression = Expression::new();
        expression
            .r#where("tags", vec!["a"])
            .r#where("tags", doc! { "$size": 1 });

        assert_eq!(expression.to_document(), doc! { "tags": { "$size": 1 } });
    }

    #[test]
    fn comparison_methods() {
        let mut expression = Expression::new();
        expression
            .where_greater("a", 1)
            .where_greater_or_equal("b", 2)
            .where_less("c", 3)
            .where_less_or_equal("d", 4)
            .where_not_equal("e", "x")
            .where_not_in("f", [1, 2]);

        assert_eq!(
            expression.to_document(),
            doc! {
                "a": { "$gt": 1 },
                "b": { "$gte": 2 },
                "c": { "$lt": 3 },
                "d": { "$lte": 4 },
                "e": { "$ne": "x" },
                "f": { "$nin": [1, 2] },
            }
        );
    }

    #[test]
    fn existence_and_type_checks() {
        let mut expression = Expression::new();
        expression
            .where_exists("a")
            .where_not_exists("b")
            .where_double("c")
            .where_string("d")
            .where_object("e")
            .where_boolean("f")
            .where_array_of_arrays("g")
            .where_object_id("h")
            .where_date("i")
            .where_null("j")
            .where_has_type("k", 18);

        assert_eq!(
            expression.to_document(),
            doc! {
                "a": { "$exists": true },
                "b": { "$exists": false },
                "c": { "$type": 1 },
                "d": { "$type": 2 },
                "e": { "$type": 3 },
                "f": { "$type": 8 },
                "g": { "$type": 4 },
                "h": { "$type": 7 },
                "i": { "$type": 9 },
                "j": { "$type": 10 },
                "k": { "$type": 18 },
            }
        );
    }

    #[test]
    fn array_check_goes_through_js_condition() {
        let mut expression = Expression::new();
        expression.where_array("tags");

        assert_eq!(
            expression.to_document(),
            doc! { "$where": "Array.isArray(this.tags)" }
        );
    }

    #[test]
    fn like_renders_options() {
        let mut insensitive = Expression::new();
        insensitive.where_like("name", "^ki", true);
        assert_eq!(
            insensitive.to_document(),
            doc! { "name": { "$regex": "^ki", "$options": "i" } }
        );

        let mut sensitive = Expression::new();
        sensitive.where_like("name", "^Ki", false);
        assert_eq!(
            sensitive.to_document(),
            doc! { "name": { "$regex": "^Ki", "$options": "" } }
        );
    }

    #[test]
    fn array_membership() {
        let mut expression = Expression::new();
        expression
            .where_all("a", [1, 2])
            .where_none_of("b", ["x"])
            .where_any("c", [true])
            .where_array_size("d", 3);

        assert_eq!(
            expression.to_document(),
            doc! {
                "a": { "$all": [1, 2] },
                "b": { "$not": { "$all": ["x"] } },
                "c": { "$in": [true] },
                "d": { "$size": 3_i64 },
            }
        );
    }

    #[test]
    fn elem_match_accepts_every_argument_shape() {
        let mut sub = Expression::new();
        sub.where_greater("score", 8).r#where("product", "xyz");

        let mut from_expression = Expression::new();
        from_expression.where_elem_match("results", &sub).unwrap();

        let mut from_deferred = Expression::new();
        from_deferred
            .where_elem_match(
                "results",
                ElemMatch::deferred(|sub| {
                    sub.where_greater("score", 8).r#where("product", "xyz");
                }),
            )
            .unwrap();

        let mut from_document = Expression::new();
        from_document
            .where_elem_match("results", doc! { "score": { "$gt": 8 }, "product": "xyz" })
            .unwrap();

        let expected = doc! {
            "results": { "$elemMatch": { "score": { "$gt": 8 }, "product": "xyz" } }
        };
        assert_eq!(from_expression.to_document(), expected);
        assert_eq!(from_deferred.to_document(), expected);
        assert_eq!(from_document.to_document(), expected);
    }

    #[test]
    fn elem_match_rejects_non_documents_without_mutating() {
        let mut expression = Expression::new();
        expression.where_exists("results");

        let error = expression
            .where_elem_match("results", Bson::Int32(5))
            .unwrap_err();

        assert!(matches!(error, Error::MalformedArgument(_)));
        assert_eq!(
            expression.to_document(),
            doc! { "results": { "$exists": true } }
        );

        assert!(
            expression
                .where_elem_not_match("results", Bson::String("x".into()))
                .is_err()
        );
        assert_eq!(
            expression.to_document(),
            doc! { "results": { "$exists": true } }
        );
    }

    #[test]
    fn elem_not_match_wraps_in_not() {
        let mut expression = Expression::new();
        expression
            .where_elem_not_match("results", doc! { "score": { "$lt": 3 } })
            .unwrap();

        assert_eq!(
            expression.to_document(),
            doc! { "results": { "$not": { "$elemMatch": { "score": { "$lt": 3 } } } } }
        );
    }

    #[test]
    fn empty_and_not_empty_expand_to_four_arms() {
        let arms = bson::bson!([
            { "bio": null },
            { "bio": "" },
            { "bio": [] },
            { "bio": { "$exists": false } },
        ]);

        let mut empty = Expression::new();
        empty.where_empty("bio");
        assert_eq!(empty.to_document(), doc! { "$or": arms.clone() });

        let mut not_empty = Expression::new();
        not_empty.where_not_empty("bio");
        assert_eq!(not_empty.to_document(), doc! { "$nor": arms });
    }

    #[test]
    fn combinators_accumulate() {
        let mut first = Expression::new();
        first.r#where("a", 1);
        let mut second = Expression::new();
        second.r#where("b", 2);

        let mut expression = Expression::new();
        expression.where_or([&first]).where_or([&second]).where_or([&first]);

        assert_eq!(
            expression.to_document(),
            doc! { "$or": [{ "a": 1 }, { "b": 2 }, { "a": 1 }] }
        );
    }

    #[test]
    fn combinators_accept_owned_expressions() {
        let clauses = vec![
            Expression::from(doc! { "a": 1 }),
            Expression::from(doc! { "b": { "$gt": 2 } }),
        ];

        let mut expression = Expression::new();
        expression.where_and(clauses).where_nor([Expression::from(doc! { "c": 3 })]);

        assert_eq!(
            expression.to_document(),
            doc! {
                "$and": [{ "a": 1 }, { "b": { "$gt": 2 } }],
                "$nor": [{ "c": 3 }],
            }
        );
    }

    #[test]
    fn not_wraps_operator_fragments() {
        let mut sub = Expression::new();
        sub.where_greater("age", 5);

        let mut expression = Expression::new();
        expression.where_not(&sub);

        assert_eq!(
            expression.to_document(),
            doc! { "age": { "$not": { "$gt": 5 } } }
        );
    }

    #[test]
    fn not_unwraps_negated_fragments() {
        let mut sub = Expression::new();
        sub.where_none_of("tags", ["x"]);

        let mut expression = Expression::new();
        expression.where_not(&sub);

        assert_eq!(expression.to_document(), doc! { "tags": { "$all": ["x"] } });

        let mut sub = Expression::new();
        sub.where_elem_not_match("items", doc! { "qty": { "$gt": 2 } }).unwrap();

        let mut expression = Expression::new();
        expression.where_not(&sub);

        assert_eq!(
            expression.to_document(),
            doc! { "items": { "$elemMatch": { "qty": { "$gt": 2 } } } }
        );
    }

    #[test]
    fn not_translates_scalars_to_ne() {
        let mut sub = Expression::new();
        sub.r#where("status", "active");

        let mut expression = Expression::new();
        expression.where_not(&sub);

        assert_eq!(
            expression.to_document(),
            doc! { "status": { "$ne": "active" } }
        );
    }

    #[test]
    fn not_negates_each_field_independently() {
        let mut sub = Expression::new();
        sub.r#where("status", "active").where_less("age", 18);

        let mut expression = Expression::new();
        expression.where_greater("age", 3).where_not(&sub);

        assert_eq!(
            expression.to_document(),
            doc! {
                "age": { "$gt": 3, "$not": { "$lt": 18 } },
                "status": { "$ne": "active" },
            }
        );
    }

    #[test]
    fn not_uses_ne_for_arrays_and_empty_documents() {
        let mut sub = Expression::new();
        sub.r#where("tags", vec!["a"])
            .r#where("meta", Document::new())
            .r#where("address", doc! { "city": "X" });

        let mut expression = Expression::new();
        expression.where_not(&sub);

        assert_eq!(
            expression.to_document(),
            doc! {
                "tags": { "$ne": ["a"] },
                "meta": { "$ne": {} },
                "address": { "$ne": { "city": "X" } },
            }
        );
    }

    #[test]
    fn near_point_renders_bounds() {
        let mut expression = Expression::new();
        expression
            .near_point("location", [106.9, 47.9], [100.0, 500.0])
            .near_point_spherical("home", (1.0, 2.0), 0.0);

        assert_eq!(
            expression.to_document(),
            doc! {
                "location": {
                    "$near": {
                        "$geometry": { "type": "Point", "coordinates": [106.9, 47.9] },
                        "$minDistance": 100.0,
                        "$maxDistance": 500.0,
                    }
                },
                "home": {
                    "$nearSphere": {
                        "$geometry": { "type": "Point", "coordinates": [1.0, 2.0] },
                    }
                },
            }
        );
    }

    #[test]
    fn geometry_operators() {
        let polygon = Polygon::new([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);

        let mut expression = Expression::new();
        expression
            .intersects("route", &Point::new(0.5, 0.5))
            .within("area", &polygon);

        assert_eq!(
            expression.to_document(),
            doc! {
                "route": {
                    "$geoIntersects": {
                        "$geometry": { "type": "Point", "coordinates": [0.5, 0.5] }
                    }
                },
                "area": {
                    "$geoWithin": {
                        "$geometry": {
                            "type": "Polygon",
                            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
                        }
                    }
                },
            }
        );
    }

    #[test]
    fn legacy_shapes_share_geo_within() {
        let mut expression = Expression::new();
        expression
            .within_circle("a", [1.0, 2.0], 3.0)
            .within_circle_spherical("b", [1.0, 2.0], 0.1)
            .within_box("c", [0.0, 0.0], [5.0, 5.0])
            .within_polygon("d", [[0.0, 0.0], [3.0, 6.0], [6.0, 0.0]]);

        assert_eq!(
            expression.to_document(),
            doc! {
                "a": { "$geoWithin": { "$center": [[1.0, 2.0], 3.0] } },
                "b": { "$geoWithin": { "$centerSphere": [[1.0, 2.0], 0.1] } },
                "c": { "$geoWithin": { "$box": [[0.0, 0.0], [5.0, 5.0]] } },
                "d": { "$geoWithin": { "$polygon": [[0.0, 0.0], [3.0, 6.0], [6.0, 0.0]] } },
            }
        );
    }

    #[test]
    fn merge_combines_documents() {
        let mut left = Expression::new();
        left.where_greater("age", 5).where_or([Expression::from(doc! { "a": 1 })]);

        let mut right = Expression::new();
        right
            .where_less("age", 10)
            .r#where("name", "Kit")
            .where_or([Expression::from(doc! { "b": 2 })]);

        left.merge(&right);

        assert_eq!(
            left.to_document(),
            doc! {
                "age": { "$gt": 5, "$lt": 10 },
                "$or": [{ "a": 1 }, { "b": 2 }],
                "name": "Kit",
            }
        );
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut expression = Expression::new();
        expression.r#where("a", 1);

        let mut snapshot = expression.to_document();
        snapshot.insert("b", 2);

        assert_eq!(expression.to_document(), doc! { "a": 1 });
    }

    #[test]
    fn serializes_as_plain_document() {
        let mut expression = Expression::new();
        expression.where_greater("age", 18);

        assert_eq!(
            serde_json::to_value(&expression).unwrap(),
            serde_json::json!({ "age": { "$gt": 18 } })
        );
        assert_eq!(expression.to_string(), doc! { "age": { "$gt": 18 } }.to_string());
    }
}
