use crate::field::FieldKind;
use crate::Record;

/// One field of a record type: its name, kind and packed byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Offset of the field inside an encoded record.
    pub offset: usize,
}

impl FieldDescriptor {
    pub fn byte_size(&self) -> usize {
        self.kind.byte_size()
    }
}

/// Ordered field descriptors of a record type.
///
/// Built once per store from `T::default()` and never modified. Two schemas
/// of the same `T` are always equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    record_size: usize,
}

impl Schema {
    /// Describes `T` by walking the fields of a default-constructed value.
    pub fn of<T: Record>() -> Self {
        let mut fields = Vec::new();
        let mut offset = 0usize;
        T::default().for_each_field(&mut |name, field| {
            let kind = field.kind();
            fields.push(FieldDescriptor { name, kind, offset });
            offset += kind.byte_size();
        });
        Self {
            fields,
            record_size: offset,
        }
    }

    /// Number of fields (the file header's key count).
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encoded size of one record: the sum of all field sizes, no padding.
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Position of the first field called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}
