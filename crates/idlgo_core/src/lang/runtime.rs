//! Spellings of the Go wire-protocol runtime the generated code calls into.
//!
//! ## Notes
//! - The runtime package is always imported under the `thrift` identifier, whatever its path.

/// Default import path of the Go runtime library.
pub const DEFAULT_IMPORT_PATH: &str = "github.com/apache/thrift/lib/go/thrift";

/// Identifier the runtime package is bound to in generated units.
pub const PACKAGE_IDENT: &str = "thrift";

/// Package-level variable every generated package declares so imports are never unused.
pub const UNUSED_PROTECTION: &str = "GoUnusedProtection__";

/// Rendering of a nil struct receiver by `String()`.
pub const NIL_SENTINEL: &str = "<nil>";

/// Rendering of an out-of-domain enum value by `String()`.
pub const UNSET_SENTINEL: &str = "<UNSET>";

/// Wire type tags, as named by the runtime (`thrift.I32`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Stop,
    Bool,
    Byte,
    Double,
    I16,
    I32,
    I64,
    String,
    Struct,
    Map,
    Set,
    List,
}

impl WireType {
    /// Go expression for this tag.
    ///
    /// ## Examples
    /// ```rust
    /// use idlgo_core::lang::runtime::WireType;
    ///
    /// assert_eq!(WireType::I32.as_go(), "thrift.I32");
    /// ```
    pub fn as_go(self) -> &'static str {
        match self {
            WireType::Stop => "thrift.STOP",
            WireType::Bool => "thrift.BOOL",
            WireType::Byte => "thrift.BYTE",
            WireType::Double => "thrift.DOUBLE",
            WireType::I16 => "thrift.I16",
            WireType::I32 => "thrift.I32",
            WireType::I64 => "thrift.I64",
            WireType::String => "thrift.STRING",
            WireType::Struct => "thrift.STRUCT",
            WireType::Map => "thrift.MAP",
            WireType::Set => "thrift.SET",
            WireType::List => "thrift.LIST",
        }
    }

    /// Container begin/end method stem (`Map`, `Set`, `List`), if this is a container tag.
    pub fn container_stem(self) -> Option<&'static str> {
        match self {
            WireType::Map => Some("Map"),
            WireType::Set => Some("Set"),
            WireType::List => Some("List"),
            _ => None,
        }
    }
}

/// Scalar kinds that have a runtime pointer constructor (`thrift.Int32Ptr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Double,
    String,
}

impl ScalarKind {
    /// Runtime helper returning a pointer to its argument.
    pub fn ptr_constructor(self) -> &'static str {
        match self {
            ScalarKind::Bool => "thrift.BoolPtr",
            ScalarKind::I8 => "thrift.Int8Ptr",
            ScalarKind::I16 => "thrift.Int16Ptr",
            ScalarKind::I32 => "thrift.Int32Ptr",
            ScalarKind::I64 => "thrift.Int64Ptr",
            ScalarKind::Double => "thrift.Float64Ptr",
            ScalarKind::String => "thrift.StringPtr",
        }
    }

    /// Native Go type of the scalar.
    pub fn go_type(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "int8",
            ScalarKind::I16 => "int16",
            ScalarKind::I32 => "int32",
            ScalarKind::I64 => "int64",
            ScalarKind::Double => "float64",
            ScalarKind::String => "string",
        }
    }

    /// Protocol method suffix (`ReadI32`/`WriteI32`).
    pub fn protocol_suffix(self) -> &'static str {
        match self {
            ScalarKind::Bool => "Bool",
            ScalarKind::I8 => "Byte",
            ScalarKind::I16 => "I16",
            ScalarKind::I32 => "I32",
            ScalarKind::I64 => "I64",
            ScalarKind::Double => "Double",
            ScalarKind::String => "String",
        }
    }
}

/// Application exception kinds raised by generated clients and processors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppExceptionKind {
    UnknownMethod,
    MissingResult,
    InternalError,
    ProtocolError,
}

impl AppExceptionKind {
    pub fn as_go(self) -> &'static str {
        match self {
            AppExceptionKind::UnknownMethod => "thrift.UNKNOWN_METHOD",
            AppExceptionKind::MissingResult => "thrift.MISSING_RESULT",
            AppExceptionKind::InternalError => "thrift.INTERNAL_ERROR",
            AppExceptionKind::ProtocolError => "thrift.PROTOCOL_ERROR",
        }
    }
}
