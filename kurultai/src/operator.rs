use bson::{Bson, Document};

/// Query operator keywords understood by `MongoDB`.
pub mod keyword {
    pub const EQ: &str = "$eq";
    pub const NE: &str = "$ne";
    pub const GT: &str = "$gt";
    pub const GTE: &str = "$gte";
    pub const LT: &str = "$lt";
    pub const LTE: &str = "$lte";
    pub const IN: &str = "$in";
    pub const NIN: &str = "$nin";

    pub const EXISTS: &str = "$exists";
    pub const TYPE: &str = "$type";
    pub const WHERE: &str = "$where";
    pub const REGEX: &str = "$regex";
    pub const OPTIONS: &str = "$options";

    pub const ALL: &str = "$all";
    pub const SIZE: &str = "$size";
    pub const ELEM_MATCH: &str = "$elemMatch";

    pub const NOT: &str = "$not";
    pub const OR: &str = "$or";
    pub const AND: &str = "$and";
    pub const NOR: &str = "$nor";

    pub const NEAR: &str = "$near";
    pub const NEAR_SPHERE: &str = "$nearSphere";
    pub const GEOMETRY: &str = "$geometry";
    pub const MIN_DISTANCE: &str = "$minDistance";
    pub const MAX_DISTANCE: &str = "$maxDistance";
    pub const GEO_INTERSECTS: &str = "$geoIntersects";
    pub const GEO_WITHIN: &str = "$geoWithin";
    pub const CENTER: &str = "$center";
    pub const CENTER_SPHERE: &str = "$centerSphere";
    pub const BOX: &str = "$box";
    pub const POLYGON: &str = "$polygon";
}

/// A `MongoDB` [comparison operator](https://www.mongodb.com/docs/manual/reference/operator/query/#comparison)
/// together with its operand.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterOperator<T = Bson> {
    Eq(T),
    Ne(T),
    Gt(T),
    Gte(T),
    Lt(T),
    Lte(T),
    In(Vec<T>),
    Nin(Vec<T>),
}

impl<T> FilterOperator<T> {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Eq(_) => keyword::EQ,
            Self::Ne(_) => keyword::NE,
            Self::Gt(_) => keyword::GT,
            Self::Gte(_) => keyword::GTE,
            Self::Lt(_) => keyword::LT,
            Self::Lte(_) => keyword::LTE,
            Self::In(_) => keyword::IN,
            Self::Nin(_) => keyword::NIN,
        }
    }
}

impl<T: Into<Bson>> FilterOperator<T> {
    /// Renders the one-entry constraint fragment, e.g. `{ "$gt": 5 }`.
    pub fn into_document(self) -> Document {
        let operator = self.keyword();

        let bson = match self {
            Self::Eq(val)
            | Self::Ne(val)
            | Self::Gt(val)
            | Self::Gte(val)
            | Self::Lt(val)
            | Self::Lte(val) => val.into(),
            Self::In(vals) | Self::Nin(vals) => {
                Bson::Array(vals.into_iter().map(Into::into).collect())
            }
        };

        fragment(operator, bson)
    }
}

impl<T: Into<Bson>> From<FilterOperator<T>> for Bson {
    fn from(value: FilterOperator<T>) -> Self {
        Bson::Document(value.into_document())
    }
}

/// Builds `{ operator: value }`.
pub(crate) fn fragment(operator: &str, value: impl Into<Bson>) -> Document {
    let mut document = Document::new();
    document.insert(operator, value);
    document
}
