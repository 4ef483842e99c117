//! Type descriptors and the eligibility filter.
//!
//! Only a bounded set of types can carry symbolic state: arithmetic scalars
//! and pointers or arrays whose element is an arithmetic scalar. Everything
//! else is left alone.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arithmetic {
    Bool,
    Char,
    Integer,
    Floating,
}

/// Canonical type information, typedefs already resolved by the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypeDescriptor {
    Void,
    Arithmetic { kind: Arithmetic },
    Pointer { pointee: Box<TypeDescriptor> },
    Array {
        element: Box<TypeDescriptor>,
        #[serde(default)]
        len: Option<u64>,
    },
    Reference { referent: Box<TypeDescriptor> },
    Record { name: String },
    Function,
    #[serde(other)]
    Other,
}

impl TypeDescriptor {
    pub fn int() -> Self {
        TypeDescriptor::Arithmetic { kind: Arithmetic::Integer }
    }

    pub fn pointer_to(pointee: TypeDescriptor) -> Self {
        TypeDescriptor::Pointer { pointee: Box::new(pointee) }
    }

    pub fn array_of(element: TypeDescriptor, len: Option<u64>) -> Self {
        TypeDescriptor::Array { element: Box::new(element), len }
    }

    pub fn record(name: &str) -> Self {
        TypeDescriptor::Record { name: name.to_string() }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, TypeDescriptor::Arithmetic { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeDescriptor::Array { .. })
    }

    /// Eligibility filter: may a value of this type be made symbolic?
    pub fn is_supported(&self) -> bool {
        match self {
            TypeDescriptor::Arithmetic { .. } => true,
            TypeDescriptor::Pointer { pointee } => pointee.is_arithmetic(),
            TypeDescriptor::Array { element, .. } => element.is_arithmetic(),
            TypeDescriptor::Void
            | TypeDescriptor::Reference { .. }
            | TypeDescriptor::Record { .. }
            | TypeDescriptor::Function
            | TypeDescriptor::Other => false,
        }
    }
}
