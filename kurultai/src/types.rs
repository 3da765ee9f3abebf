use bson::Bson;
use std::fmt::Display;

macro_rules! bson_types {
    ($( $(#[$meta:meta])* $variant:ident = $tag:literal, $alias:literal; )*) => {
        /// BSON types as understood by the `$type` query operator.
        ///
        /// See <https://www.mongodb.com/docs/manual/reference/bson-types/>.
        #[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
        pub enum BsonType {
            $( $(#[$meta])* $variant, )*
        }

        impl BsonType {
            pub const ALL: &'static [Self] = &[ $( Self::$variant ),* ];

            /// Numeric tag accepted by `$type`.
            pub const fn tag(self) -> i32 {
                match self {
                    $( Self::$variant => $tag ),*
                }
            }

            /// String alias accepted by `$type`.
            pub const fn alias(self) -> &'static str {
                match self {
                    $( Self::$variant => $alias ),*
                }
            }

            pub const fn from_tag(tag: i32) -> Option<Self> {
                match tag {
                    $( $tag => Some(Self::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

bson_types! {
    Double = 1, "double";
    String = 2, "string";
    Object = 3, "object";
    Array = 4, "array";
    Binary = 5, "binData";
    /// Deprecated by `MongoDB`.
    Undefined = 6, "undefined";
    ObjectId = 7, "objectId";
    Boolean = 8, "bool";
    Date = 9, "date";
    Null = 10, "null";
    Regex = 11, "regex";
    /// Deprecated by `MongoDB`.
    DbPointer = 12, "dbPointer";
    JavaScript = 13, "javascript";
    /// Deprecated by `MongoDB`.
    Symbol = 14, "symbol";
    /// Deprecated by `MongoDB`.
    JavaScriptWithScope = 15, "javascriptWithScope";
    Int32 = 16, "int";
    Timestamp = 17, "timestamp";
    Int64 = 18, "long";
    Decimal128 = 19, "decimal";
    MinKey = -1, "minKey";
    MaxKey = 127, "maxKey";
}

impl Display for BsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.alias())
    }
}

impl From<BsonType> for i32 {
    fn from(value: BsonType) -> Self {
        value.tag()
    }
}

impl From<BsonType> for Bson {
    fn from(value: BsonType) -> Self {
        Bson::Int32(value.tag())
    }
}
