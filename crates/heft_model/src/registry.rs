//! Type registry.
//!
//! Interns every type the heap knows about behind a [`TypeIdx`]. Primitive
//! types and the well-known classes are pre-registered at fixed indices;
//! user classes and array types are appended after
//! [`TypeIdx::FIRST_DYNAMIC`].
//!
//! Class field lists are flattened at registration (inherited fields first),
//! so a descriptor never has to walk the superclass chain.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{FieldDescriptor, HeapError, PrimitiveKind, TypeDescriptor, TypeFlags, TypeIdx};

/// Inline capacity for flattened field lists. Most classes have few fields.
type FieldList = SmallVec<[FieldDescriptor; 4]>;

#[derive(Clone, Debug)]
enum TypeKind {
    Primitive,
    Class { superclass: Option<TypeIdx> },
    Array { element: TypeIdx },
}

#[derive(Clone, Debug)]
struct TypeEntry {
    name: String,
    kind: TypeKind,
    flags: TypeFlags,
    fields: FieldList,
}

/// Registry of every class and array type.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    entries: Vec<TypeEntry>,
    classes: FxHashMap<String, TypeIdx>,
    arrays: FxHashMap<TypeIdx, TypeIdx>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a registry holding the primitives and well-known classes.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(64),
            classes: FxHashMap::default(),
            arrays: FxHashMap::default(),
        };

        for kind in PrimitiveKind::ALL {
            registry.entries.push(TypeEntry {
                name: kind.name().to_owned(),
                kind: TypeKind::Primitive,
                flags: TypeFlags::IS_PRIMITIVE,
                fields: FieldList::new(),
            });
        }

        // Order must match the fixed indices on `TypeIdx`.
        let object = registry.push_class("Object", None, FieldList::new());
        debug_assert_eq!(object, TypeIdx::OBJECT);
        let string = registry.push_class(
            "String",
            Some(TypeIdx::OBJECT),
            smallvec::smallvec![
                FieldDescriptor::new("value", TypeIdx::CHAR_ARRAY),
                FieldDescriptor::new("hash", TypeIdx::INT),
            ],
        );
        debug_assert_eq!(string, TypeIdx::STRING);
        let integer = registry.push_class(
            "Integer",
            Some(TypeIdx::OBJECT),
            smallvec::smallvec![FieldDescriptor::new("value", TypeIdx::INT)],
        );
        debug_assert_eq!(integer, TypeIdx::INTEGER);
        let chars = registry.push_array(TypeIdx::CHAR);
        debug_assert_eq!(chars, TypeIdx::CHAR_ARRAY);

        registry
    }

    /// Number of registered types, primitives included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether `ty` was registered here.
    pub fn contains(&self, ty: TypeIdx) -> bool {
        (ty.raw() as usize) < self.entries.len()
    }

    /// Register a class.
    ///
    /// `fields` are the fields declared by this class only; inherited fields
    /// are taken from `superclass` (defaults to `Object`).
    pub fn register_class(
        &mut self,
        name: &str,
        superclass: Option<TypeIdx>,
        fields: &[(&str, TypeIdx)],
    ) -> Result<TypeIdx, HeapError> {
        if self.classes.contains_key(name) {
            return Err(HeapError::DuplicateClass(name.to_owned()));
        }
        let superclass = superclass.unwrap_or(TypeIdx::OBJECT);
        if !self.entry(superclass)?.flags.is_class() {
            return Err(HeapError::NotAClass(self.name(superclass).to_owned()));
        }

        let mut all_fields = self.entry(superclass)?.fields.clone();
        for &(field, ty) in fields {
            self.entry(ty)?;
            all_fields.push(FieldDescriptor::new(field, ty));
        }

        Ok(self.push_class(name, Some(superclass), all_fields))
    }

    /// Intern the array type with element type `element`.
    ///
    /// Returns the same index on every call for the same element type.
    pub fn array_of(&mut self, element: TypeIdx) -> Result<TypeIdx, HeapError> {
        self.entry(element)?;
        Ok(self.push_array(element))
    }

    /// Look up a class by name.
    pub fn class_named(&self, name: &str) -> Option<TypeIdx> {
        self.classes.get(name).copied()
    }

    /// Human-readable type name (`"int"`, `"String"`, `"Integer[]"`).
    ///
    /// Unknown indices render as `"<unknown>"`.
    pub fn name(&self, ty: TypeIdx) -> &str {
        self.entries
            .get(ty.raw() as usize)
            .map_or("<unknown>", |entry| entry.name.as_str())
    }

    pub fn flags(&self, ty: TypeIdx) -> Result<TypeFlags, HeapError> {
        Ok(self.entry(ty)?.flags)
    }

    /// Direct superclass of a class; `None` for `Object`, primitives and arrays.
    pub fn superclass(&self, ty: TypeIdx) -> Option<TypeIdx> {
        match self.entries.get(ty.raw() as usize)?.kind {
            TypeKind::Class { superclass } => superclass,
            TypeKind::Primitive | TypeKind::Array { .. } => None,
        }
    }

    /// Layout descriptor of a registered type.
    pub fn descriptor(&self, ty: TypeIdx) -> Result<TypeDescriptor<'_>, HeapError> {
        Ok(Self::describe_entry(ty, self.entry(ty)?))
    }

    /// Descriptor of a type the caller knows is registered (the type of a
    /// live heap object). Panics on an unknown index.
    pub(crate) fn registered_descriptor(&self, ty: TypeIdx) -> TypeDescriptor<'_> {
        Self::describe_entry(ty, &self.entries[ty.raw() as usize])
    }

    fn describe_entry(ty: TypeIdx, entry: &TypeEntry) -> TypeDescriptor<'_> {
        let element = match entry.kind {
            TypeKind::Array { element } => Some(element),
            TypeKind::Primitive | TypeKind::Class { .. } => None,
        };
        TypeDescriptor::new(ty, entry.flags, element, &entry.fields)
    }

    /// Position of the most-derived field called `name` in the flattened
    /// field list of `ty`.
    pub fn field_index(&self, ty: TypeIdx, name: &str) -> Result<usize, HeapError> {
        let entry = self.entry(ty)?;
        if !entry.flags.is_class() {
            return Err(HeapError::NotAClass(entry.name.clone()));
        }
        entry
            .fields
            .iter()
            .rposition(|f| f.name == name)
            .ok_or_else(|| HeapError::NoSuchField {
                ty: entry.name.clone(),
                field: name.to_owned(),
            })
    }

    /// Check whether a value of type `sub` may be stored in a slot declared
    /// as `sup`.
    ///
    /// Every reference type is assignable to `Object`; a class is assignable
    /// to any of its superclasses; arrays only to their own type.
    pub fn is_assignable(&self, sub: TypeIdx, sup: TypeIdx) -> bool {
        if sub == sup {
            return true;
        }
        if sup == TypeIdx::OBJECT {
            return sub.is_reference() && self.contains(sub);
        }
        let mut current = self.superclass(sub);
        while let Some(ty) = current {
            if ty == sup {
                return true;
            }
            current = self.superclass(ty);
        }
        false
    }

    fn entry(&self, ty: TypeIdx) -> Result<&TypeEntry, HeapError> {
        self.entries
            .get(ty.raw() as usize)
            .ok_or(HeapError::UnknownType(ty))
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "registries never approach u32::MAX types"
    )]
    fn next_idx(&self) -> TypeIdx {
        TypeIdx::from_raw(self.entries.len() as u32)
    }

    fn push_class(&mut self, name: &str, superclass: Option<TypeIdx>, fields: FieldList) -> TypeIdx {
        let mut flags = TypeFlags::IS_CLASS;
        if fields.iter().any(|f| f.ty.is_reference()) {
            flags |= TypeFlags::HAS_REFERENCES;
        }
        let idx = self.next_idx();
        self.entries.push(TypeEntry {
            name: name.to_owned(),
            kind: TypeKind::Class { superclass },
            flags,
            fields,
        });
        self.classes.insert(name.to_owned(), idx);
        idx
    }

    fn push_array(&mut self, element: TypeIdx) -> TypeIdx {
        if let Some(&existing) = self.arrays.get(&element) {
            return existing;
        }
        let mut flags = TypeFlags::IS_ARRAY;
        if element.is_reference() {
            flags |= TypeFlags::HAS_REFERENCES;
        }
        let idx = self.next_idx();
        let name = format!("{}[]", self.name(element));
        self.entries.push(TypeEntry {
            name,
            kind: TypeKind::Array { element },
            flags,
            fields: FieldList::new(),
        });
        self.arrays.insert(element, idx);
        idx
    }
}
