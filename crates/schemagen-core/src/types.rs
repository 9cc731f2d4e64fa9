use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// General-purpose value type derived from a SQL type name.
///
/// This is the closed type enumeration the literal translator and the
/// emission layer work against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CodeType {
    String,
    Long,
    Short,
    Int,
    Guid,
    DateTime,
    DateTimeOffset,
    TimeSpan,
    Double,
    Float,
    Decimal,
    Byte,
    Bool,
    Bytes,
    Geography,
    Geometry,
}

impl CodeType {
    /// Map a SQL type name to its general-purpose type.
    ///
    /// Unknown names fall back to [`CodeType::String`].
    pub fn from_sql_type(sql_type: &str) -> Self {
        match normalize_type_name(sql_type).as_str() {
            "bigint" => CodeType::Long,
            "smallint" => CodeType::Short,
            "int" => CodeType::Int,
            "uniqueidentifier" => CodeType::Guid,
            "smalldatetime" | "datetime" | "datetime2" | "date" => CodeType::DateTime,
            "datetimeoffset" => CodeType::DateTimeOffset,
            "time" => CodeType::TimeSpan,
            "float" => CodeType::Double,
            "real" => CodeType::Float,
            "numeric" | "smallmoney" | "decimal" | "money" => CodeType::Decimal,
            "tinyint" => CodeType::Byte,
            "bit" => CodeType::Bool,
            "image" | "binary" | "varbinary" | "timestamp" | "rowversion" => CodeType::Bytes,
            "geography" => CodeType::Geography,
            "geometry" => CodeType::Geometry,
            _ => CodeType::String,
        }
    }

    /// Type name as written in the generated entity layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeType::String => "string",
            CodeType::Long => "long",
            CodeType::Short => "short",
            CodeType::Int => "int",
            CodeType::Guid => "Guid",
            CodeType::DateTime => "DateTime",
            CodeType::DateTimeOffset => "DateTimeOffset",
            CodeType::TimeSpan => "TimeSpan",
            CodeType::Double => "double",
            CodeType::Float => "float",
            CodeType::Decimal => "decimal",
            CodeType::Byte => "byte",
            CodeType::Bool => "bool",
            CodeType::Bytes => "byte[]",
            CodeType::Geography => "System.Data.Spatial.DbGeography",
            CodeType::Geometry => "System.Data.Spatial.DbGeometry",
        }
    }

    /// Returns true when a nullable column of this type needs an optional wrapper.
    pub fn is_nullable_value_type(&self) -> bool {
        !matches!(
            self,
            CodeType::String | CodeType::Bytes | CodeType::Geography | CodeType::Geometry
        )
    }
}

/// Provider-level parameter type used for stored procedure calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum SqlDbType {
    BigInt,
    SmallInt,
    Int,
    UniqueIdentifier,
    SmallDateTime,
    DateTime,
    DateTime2,
    Date,
    DateTimeOffset,
    Time,
    Float,
    Real,
    SmallMoney,
    Decimal,
    Money,
    TinyInt,
    Bit,
    Image,
    Binary,
    VarBinary,
    Timestamp,
    VarChar,
    NVarChar,
    Char,
    NChar,
    Text,
    NText,
    Xml,
    Variant,
}

impl SqlDbType {
    /// Strictly map a SQL type name; unknown names are a hard failure.
    pub fn from_sql_type(sql_type: &str) -> Result<Self> {
        let db_type = match normalize_type_name(sql_type).as_str() {
            "bigint" => SqlDbType::BigInt,
            "smallint" => SqlDbType::SmallInt,
            "int" => SqlDbType::Int,
            "uniqueidentifier" => SqlDbType::UniqueIdentifier,
            "smalldatetime" => SqlDbType::SmallDateTime,
            "datetime" => SqlDbType::DateTime,
            "datetime2" => SqlDbType::DateTime2,
            "date" => SqlDbType::Date,
            "datetimeoffset" => SqlDbType::DateTimeOffset,
            "time" => SqlDbType::Time,
            "float" => SqlDbType::Float,
            "real" => SqlDbType::Real,
            "smallmoney" => SqlDbType::SmallMoney,
            "decimal" | "numeric" => SqlDbType::Decimal,
            "money" => SqlDbType::Money,
            "tinyint" => SqlDbType::TinyInt,
            "bit" => SqlDbType::Bit,
            "image" => SqlDbType::Image,
            "binary" => SqlDbType::Binary,
            "varbinary" => SqlDbType::VarBinary,
            "timestamp" | "rowversion" => SqlDbType::Timestamp,
            "varchar" => SqlDbType::VarChar,
            "nvarchar" | "sysname" => SqlDbType::NVarChar,
            "char" => SqlDbType::Char,
            "nchar" => SqlDbType::NChar,
            "text" => SqlDbType::Text,
            "ntext" => SqlDbType::NText,
            "xml" => SqlDbType::Xml,
            "sql_variant" | "variant" => SqlDbType::Variant,
            _ => return Err(Error::UnsupportedType(sql_type.trim().to_string())),
        };
        Ok(db_type)
    }
}

/// Lower-case a SQL type name and drop any size suffix such as `(50)` or `(max)`.
pub fn normalize_type_name(sql_type: &str) -> String {
    strip_type_size(sql_type).to_lowercase()
}

/// Drop a trailing size suffix, keeping the original casing.
pub fn strip_type_size(sql_type: &str) -> &str {
    let trimmed = sql_type.trim();
    match trimmed.find('(') {
        Some(idx) if trimmed.ends_with(')') => trimmed[..idx].trim_end(),
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_types_and_falls_back_to_string() {
        assert_eq!(CodeType::from_sql_type("bigint"), CodeType::Long);
        assert_eq!(CodeType::from_sql_type("VARBINARY(max)"), CodeType::Bytes);
        assert_eq!(CodeType::from_sql_type("decimal(18,2)"), CodeType::Decimal);
        assert_eq!(CodeType::from_sql_type("hierarchyid"), CodeType::String);
    }

    #[test]
    fn strict_mapping_rejects_unknown_types() {
        assert_eq!(SqlDbType::from_sql_type("nvarchar(50)").ok(), Some(SqlDbType::NVarChar));
        assert!(matches!(
            SqlDbType::from_sql_type("dbo.OrderLineType"),
            Err(Error::UnsupportedType(name)) if name == "dbo.OrderLineType"
        ));
    }

    #[test]
    fn nullable_wrapper_only_for_value_types() {
        assert!(CodeType::Int.is_nullable_value_type());
        assert!(!CodeType::String.is_nullable_value_type());
        assert!(!CodeType::Bytes.is_nullable_value_type());
    }
}
