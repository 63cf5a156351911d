//! Managed object heap.
//!
//! An arena of objects addressed by [`ObjRef`]. Every object is either a
//! class instance (one slot per flattened field) or an array (one slot per
//! element). Writes are type checked against the slot's declared type.
//!
//! The heap is also the privileged runtime: its allocator records how many
//! bytes each object occupies at allocation time, according to its
//! [`HeapLayout`], and answers [`Instrumentation::object_size`] from that
//! record.

use crate::{
    HeapError, Instrumentation, ObjRef, ObjectGraph, PrimitiveKind, TypeDescriptor, TypeIdx,
    TypeRegistry, Value,
};

/// Allocation granularity of the heap.
const ALLOC_ALIGN: u64 = 8;

/// Object layout used by the heap allocator.
///
/// Every object starts with a header; arrays add one reference-wide length
/// slot after it. Field and element slots are packed, and the whole object
/// is rounded up to [`ALLOC_ALIGN`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct HeapLayout {
    reference_width: u64,
    header_bytes: u64,
}

impl Default for HeapLayout {
    fn default() -> Self {
        Self::LP64
    }
}

impl HeapLayout {
    /// 8-byte references, 16-byte headers.
    pub const LP64: Self = Self::new(8);
    /// 4-byte references, 8-byte headers.
    pub const ILP32: Self = Self::new(4);

    /// Layout with the given reference width and a two-word header.
    pub const fn new(reference_width: u64) -> Self {
        Self {
            reference_width,
            header_bytes: 2 * reference_width,
        }
    }

    #[must_use]
    pub const fn with_header_bytes(mut self, header_bytes: u64) -> Self {
        self.header_bytes = header_bytes;
        self
    }

    pub const fn reference_width(self) -> u64 {
        self.reference_width
    }

    pub const fn header_bytes(self) -> u64 {
        self.header_bytes
    }

    fn slot_width(self, ty: TypeIdx) -> u64 {
        ty.primitive()
            .map_or(self.reference_width, PrimitiveKind::width)
    }

    /// Bytes the allocator reserves for one object.
    ///
    /// This is the reference layout the size strategies are checked against:
    /// header, then every slot at its declared width, rounded up to
    /// [`ALLOC_ALIGN`]. It is not an independent measurement.
    fn allocation_size(self, desc: &TypeDescriptor<'_>, slots: usize) -> u64 {
        let end = match desc.element() {
            Some(element) => {
                let length_slot = self.header_bytes + self.reference_width;
                length_slot + self.slot_width(element) * slots as u64
            }
            None => desc
                .fields()
                .iter()
                .fold(self.header_bytes, |offset, field| {
                    offset + self.slot_width(field.ty)
                }),
        };
        end.next_multiple_of(ALLOC_ALIGN)
    }
}

#[derive(Clone, Debug)]
struct HeapObject {
    ty: TypeIdx,
    slots: Vec<Value>,
    /// Bytes recorded by the allocator.
    size: u64,
}

/// Arena of class instances and arrays.
#[derive(Clone, Debug, Default)]
pub struct Heap {
    types: TypeRegistry,
    layout: HeapLayout,
    objects: Vec<HeapObject>,
}

impl Heap {
    pub fn new(layout: HeapLayout) -> Self {
        Self {
            types: TypeRegistry::new(),
            layout,
            objects: Vec::new(),
        }
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    pub fn layout(&self) -> HeapLayout {
        self.layout
    }

    /// Number of objects ever allocated.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Shorthand for [`TypeRegistry::register_class`].
    pub fn register_class(
        &mut self,
        name: &str,
        superclass: Option<TypeIdx>,
        fields: &[(&str, TypeIdx)],
    ) -> Result<TypeIdx, HeapError> {
        self.types.register_class(name, superclass, fields)
    }

    // === Allocation ===

    /// Allocate a bare `Object`.
    pub fn new_object(&mut self) -> ObjRef {
        self.alloc(TypeIdx::OBJECT, Vec::new())
    }

    /// Allocate an instance of `class` with every field zeroed / null.
    pub fn new_instance(&mut self, class: TypeIdx) -> Result<ObjRef, HeapError> {
        let desc = self.types.descriptor(class)?;
        if !desc.flags().is_class() {
            return Err(HeapError::NotAClass(self.types.name(class).to_owned()));
        }
        let slots = desc.fields().iter().map(|f| Value::zero_for(f.ty)).collect();
        Ok(self.alloc(class, slots))
    }

    /// Allocate an array of `len` zeroed / null elements of type `element`.
    pub fn new_array(&mut self, element: TypeIdx, len: usize) -> Result<ObjRef, HeapError> {
        let ty = self.types.array_of(element)?;
        Ok(self.alloc(ty, vec![Value::zero_for(element); len]))
    }

    /// Allocate an array holding `values`, each checked against `element`.
    pub fn new_array_from(
        &mut self,
        element: TypeIdx,
        values: &[Value],
    ) -> Result<ObjRef, HeapError> {
        for value in values {
            self.check_store(element, *value)?;
        }
        let ty = self.types.array_of(element)?;
        Ok(self.alloc(ty, values.to_vec()))
    }

    /// Allocate a `String` and its `char[]` backing store (UTF-16 units).
    pub fn new_string(&mut self, text: &str) -> ObjRef {
        let chars = text.encode_utf16().map(Value::Char).collect();
        let value = self.alloc(TypeIdx::CHAR_ARRAY, chars);
        self.alloc(TypeIdx::STRING, vec![value.into(), Value::Int(0)])
    }

    /// Allocate a fresh boxed `Integer`. Never returns a shared instance.
    pub fn box_int(&mut self, value: i32) -> ObjRef {
        self.alloc(TypeIdx::INTEGER, vec![Value::Int(value)])
    }

    fn alloc(&mut self, ty: TypeIdx, slots: Vec<Value>) -> ObjRef {
        let size = self
            .layout
            .allocation_size(&self.types.registered_descriptor(ty), slots.len());
        #[expect(
            clippy::cast_possible_truncation,
            reason = "heaps never approach u32::MAX objects"
        )]
        let obj = ObjRef::from_raw(self.objects.len() as u32);
        self.objects.push(HeapObject { ty, slots, size });
        obj
    }

    // === Access ===

    /// Concrete type of `obj`.
    pub fn type_of(&self, obj: ObjRef) -> Result<TypeIdx, HeapError> {
        Ok(self.object(obj)?.ty)
    }

    pub fn get_field(&self, obj: ObjRef, field: &str) -> Result<Value, HeapError> {
        let index = self.instance_field(obj, field)?;
        Ok(self.object(obj)?.slots[index])
    }

    pub fn set_field(&mut self, obj: ObjRef, field: &str, value: Value) -> Result<(), HeapError> {
        let index = self.instance_field(obj, field)?;
        let slot_ty = self.types.registered_descriptor(self.object(obj)?.ty).fields()[index].ty;
        self.check_store(slot_ty, value)?;
        self.object_mut(obj)?.slots[index] = value;
        Ok(())
    }

    pub fn get_element(&self, arr: ObjRef, index: usize) -> Result<Value, HeapError> {
        self.array_element(arr, index)?;
        Ok(self.object(arr)?.slots[index])
    }

    pub fn set_element(&mut self, arr: ObjRef, index: usize, value: Value) -> Result<(), HeapError> {
        let element = self.array_element(arr, index)?;
        self.check_store(element, value)?;
        self.object_mut(arr)?.slots[index] = value;
        Ok(())
    }

    fn object(&self, obj: ObjRef) -> Result<&HeapObject, HeapError> {
        self.objects
            .get(obj.index() as usize)
            .ok_or(HeapError::InvalidRef(obj))
    }

    fn object_mut(&mut self, obj: ObjRef) -> Result<&mut HeapObject, HeapError> {
        self.objects
            .get_mut(obj.index() as usize)
            .ok_or(HeapError::InvalidRef(obj))
    }

    /// Slot index of `field` in instance `obj`.
    fn instance_field(&self, obj: ObjRef, field: &str) -> Result<usize, HeapError> {
        let ty = self.object(obj)?.ty;
        if self.types.flags(ty)?.is_array() {
            return Err(HeapError::NotAnInstance(self.types.name(ty).to_owned()));
        }
        self.types.field_index(ty, field)
    }

    /// Element type of array `arr`, after bounds-checking `index`.
    fn array_element(&self, arr: ObjRef, index: usize) -> Result<TypeIdx, HeapError> {
        let object = self.object(arr)?;
        let Some(element) = self.types.registered_descriptor(object.ty).element() else {
            return Err(HeapError::NotAnArray(self.types.name(object.ty).to_owned()));
        };
        if index >= object.slots.len() {
            return Err(HeapError::IndexOutOfBounds {
                index,
                len: object.slots.len(),
            });
        }
        Ok(element)
    }

    fn check_store(&self, slot_ty: TypeIdx, value: Value) -> Result<(), HeapError> {
        let found = match (slot_ty.primitive(), value) {
            (Some(kind), v) if v.primitive_kind() == Some(kind) => return Ok(()),
            (None, Value::Ref(None)) => return Ok(()),
            (None, Value::Ref(Some(target))) => {
                let target_ty = self.object(target)?.ty;
                if self.types.is_assignable(target_ty, slot_ty) {
                    return Ok(());
                }
                self.types.name(target_ty).to_owned()
            }
            _ => value.to_string(),
        };
        Err(HeapError::TypeMismatch {
            expected: self.types.name(slot_ty).to_owned(),
            found,
        })
    }
}

impl ObjectGraph for Heap {
    fn describe(&self, obj: ObjRef) -> Option<TypeDescriptor<'_>> {
        let object = self.objects.get(obj.index() as usize)?;
        Some(self.types.registered_descriptor(object.ty))
    }

    fn array_len(&self, obj: ObjRef) -> usize {
        self.objects
            .get(obj.index() as usize)
            .filter(|object| self.types.registered_descriptor(object.ty).is_array())
            .map_or(0, |object| object.slots.len())
    }

    fn read_field(&self, obj: ObjRef, field: usize) -> Option<ObjRef> {
        self.objects
            .get(obj.index() as usize)?
            .slots
            .get(field)
            .and_then(Value::as_object)
    }

    fn read_element(&self, obj: ObjRef, index: usize) -> Option<ObjRef> {
        self.objects
            .get(obj.index() as usize)?
            .slots
            .get(index)
            .and_then(Value::as_object)
    }
}

impl Instrumentation for Heap {
    fn object_size(&self, obj: ObjRef) -> Option<u64> {
        self.objects.get(obj.index() as usize).map(|object| object.size)
    }
}
